#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::http::{Method, StatusCode};
    use axum::response::Response;

    use crate::config::Environment;
    use crate::error::AppError;
    use crate::metrics::Metrics;
    use crate::responder::{
        ErrorResponder, FailureRecord, FileSink, MemorySink, RequestContext, GENERIC_MESSAGE,
    };

    fn ctx() -> RequestContext {
        RequestContext {
            method: Method::GET,
            uri: "/widgets/1".parse().unwrap(),
            user_agent: Some("test-agent/1.0".to_string()),
            client_ip: Some("203.0.113.9".parse().unwrap()),
        }
    }

    fn responder(env: Environment) -> (ErrorResponder, Arc<MemorySink>) {
        let sink = Arc::new(MemorySink::new());
        let responder = ErrorResponder::new(env, Metrics::new()).with_sink(sink.clone());
        (responder, sink)
    }

    async fn body_json(res: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(res.into_body(), 64 * 1024).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn development_passes_message_through() {
        let (responder, _) = responder(Environment::Development);
        let failure = AppError::new(404, "Not Found");

        let res = responder.respond(&failure, ctx()).await;
        assert_eq!(res.status(), StatusCode::NOT_FOUND);

        let body = body_json(res).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], "Not Found");
        assert!(body.get("stack").is_none());
    }

    #[tokio::test]
    async fn production_defaults_to_generic_500() {
        let (responder, _) = responder(Environment::Production);
        let failure = AppError::internal(anyhow::anyhow!("database handle dropped"));

        let res = responder.respond(&failure, ctx()).await;
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = body_json(res).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], GENERIC_MESSAGE);
        assert!(body.get("stack").is_none());
    }

    #[tokio::test]
    async fn production_redacts_message_but_keeps_status() {
        let (responder, _) = responder(Environment::Production);
        let failure = AppError::new(409, "row version conflict in widgets");

        let res = responder.respond(&failure, ctx()).await;
        assert_eq!(res.status(), StatusCode::CONFLICT);

        let body = body_json(res).await;
        assert_eq!(body["message"], GENERIC_MESSAGE);
        let text = body.to_string();
        assert!(!text.contains("row version conflict"));
    }

    #[tokio::test]
    async fn blank_message_falls_back_to_generic() {
        let (responder, _) = responder(Environment::Development);
        let failure = AppError::new(400, "   ");

        let res = responder.respond(&failure, ctx()).await;
        let body = body_json(res).await;
        assert_eq!(body["message"], GENERIC_MESSAGE);
    }

    #[tokio::test]
    async fn stack_is_development_only() {
        let failure = || AppError::internal(anyhow::anyhow!("lost connection"));

        let (dev, _) = responder(Environment::Development);
        let body = body_json(dev.respond(&failure(), ctx()).await).await;
        assert!(body["stack"].as_str().unwrap().contains("lost connection"));

        let (test_env, _) = responder(Environment::Test);
        let body = body_json(test_env.respond(&failure(), ctx()).await).await;
        assert!(body.get("stack").is_none());

        let (prod, _) = responder(Environment::Production);
        let body = body_json(prod.respond(&failure(), ctx()).await).await;
        assert!(body.get("stack").is_none());
    }

    #[tokio::test]
    async fn durable_sink_is_production_only() {
        let (dev, sink) = responder(Environment::Development);
        dev.respond(&AppError::new(404, "missing"), ctx()).await;
        assert!(sink.records().is_empty());

        let (prod, sink) = responder(Environment::Production);
        prod.respond(&AppError::new(404, "missing"), ctx()).await;
        let records = sink.records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].method, "GET");
        assert_eq!(records[0].url, "/widgets/1");
        assert_eq!(records[0].status_code, 404);
        assert_eq!(records[0].message, "missing");
        assert_eq!(records[0].user_agent.as_deref(), Some("test-agent/1.0"));
        assert_eq!(records[0].client_ip, Some("203.0.113.9".parse().unwrap()));
        assert!(records[0].stack.is_none());
    }

    #[tokio::test]
    async fn file_sink_appends_one_json_object_per_line() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("error.log");
        let responder = ErrorResponder::new(Environment::Production, Metrics::new())
            .with_sink(Arc::new(FileSink::new(&path)));

        responder.respond(&AppError::new(404, "first"), ctx()).await;
        responder.respond(&AppError::new(503, "second"), ctx()).await;

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 2);

        let first: FailureRecord = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(first.status_code, 404);
        assert_eq!(first.message, "first");
        let second: FailureRecord = serde_json::from_str(lines[1]).unwrap();
        assert_eq!(second.status_code, 503);
    }

    #[tokio::test]
    async fn file_sink_creates_missing_parent_dir() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("logs").join("error.log");
        let responder = ErrorResponder::new(Environment::Production, Metrics::new())
            .with_sink(Arc::new(FileSink::new(&path)));

        responder.respond(&AppError::new(404, "missing"), ctx()).await;
        assert!(path.exists());
    }

    #[tokio::test]
    async fn sink_failure_never_blocks_the_response() {
        // A regular file where the sink expects a directory makes every
        // append fail.
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, b"not a directory").unwrap();
        let path = blocker.join("error.log");

        let metrics = Metrics::new();
        let responder = ErrorResponder::new(Environment::Production, metrics.clone())
            .with_sink(Arc::new(FileSink::new(&path)));

        let res = responder.respond(&AppError::new(404, "missing"), ctx()).await;
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
        let body = body_json(res).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], GENERIC_MESSAGE);

        assert_eq!(metrics.get_snapshot().record_write_failures, 1);
    }

    #[tokio::test]
    async fn failures_handled_counter_increments() {
        let metrics = Metrics::new();
        let responder = ErrorResponder::new(Environment::Development, metrics.clone());

        responder.respond(&AppError::new(404, "one"), ctx()).await;
        responder.respond(&AppError::new(400, "two"), ctx()).await;

        let snapshot = metrics.get_snapshot();
        assert_eq!(snapshot.failures_handled, 2);
        assert_eq!(snapshot.record_write_failures, 0);
    }

    #[tokio::test]
    async fn absent_client_context_stays_absent() {
        let (prod, sink) = responder(Environment::Production);
        let ctx = RequestContext {
            method: Method::POST,
            uri: "/submit".parse().unwrap(),
            user_agent: None,
            client_ip: None,
        };
        prod.respond(&AppError::new(400, "bad"), ctx).await;

        let records = sink.records();
        assert!(records[0].user_agent.is_none());
        assert!(records[0].client_ip.is_none());

        // Absent context is omitted from the serialized record entirely
        let line = serde_json::to_string(&records[0]).unwrap();
        assert!(!line.contains("user_agent"));
        assert!(!line.contains("client_ip"));
    }
}
