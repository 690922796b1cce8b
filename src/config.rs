use std::fmt;
use std::path::PathBuf;

use serde::Deserialize;

/// Deployment environment flag.
///
/// Controls message redaction, stack inclusion and whether the durable
/// failure log is written. Injected into the responder at construction so
/// request handling never reads process-global state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl Environment {
    pub fn is_development(&self) -> bool {
        matches!(self, Environment::Development)
    }

    pub fn is_test(&self) -> bool {
        matches!(self, Environment::Test)
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Environment::Production)
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Directory for the rolling diagnostic log and the durable failure log.
    pub dir: String,
    /// File name of the append-only failure log inside `dir`.
    pub error_file: String,
}

impl LoggingConfig {
    /// Path of the durable failure log, relative to the working directory
    /// unless `dir` is absolute.
    pub fn error_log_path(&self) -> PathBuf {
        PathBuf::from(&self.dir).join(&self.error_file)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub server: ServerConfig,
    pub logging: LoggingConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        // Fallback: parse the embedded default TOML
        let defaults: &str = include_str!("../config/default.toml");
        match ::config::Config::builder()
            .add_source(::config::File::from_str(defaults, ::config::FileFormat::Toml))
            .build()
        {
            Ok(cfg) => match cfg.try_deserialize() {
                Ok(app_cfg) => app_cfg,
                Err(e) => {
                    eprintln!("FATAL: Failed to deserialize default config: {}", e);
                    panic!("Failed to deserialize default config: {}", e);
                }
            },
            Err(e) => {
                eprintln!("FATAL: Failed to parse default config: {}", e);
                panic!("Failed to parse default config: {}", e);
            }
        }
    }
}

pub fn load() -> anyhow::Result<AppConfig> {
    // Load .env first (optional)
    let _ = dotenvy::dotenv();

    let defaults: &str = include_str!("../config/default.toml");
    let mut builder = ::config::Config::builder()
        .add_source(::config::File::from_str(defaults, ::config::FileFormat::Toml))
        // Optional local file: grundgeruest.toml (in CWD)
        .add_source(::config::File::with_name("grundgeruest").required(false));

    if let Ok(custom_path) = std::env::var("GRUNDGERUEST_CONFIG") {
        builder = builder.add_source(::config::File::with_name(&custom_path).required(false));
    }
    // Environment variables last to have highest precedence
    builder = builder.add_source(::config::Environment::with_prefix("GRUNDGERUEST").separator("__"));

    let cfg = builder.build()?;
    let app_cfg: AppConfig = cfg.try_deserialize()?;
    validate(&app_cfg)?;
    Ok(app_cfg)
}

fn validate(cfg: &AppConfig) -> anyhow::Result<()> {
    // Server
    if cfg.server.port == 0 {
        return Err(anyhow::anyhow!("invalid server.port: {}", cfg.server.port));
    }
    // Warn for privileged ports on Unix-like systems
    #[cfg(unix)]
    if cfg.server.port < 1024 {
        tracing::warn!("Using privileged port {} - may require elevated permissions", cfg.server.port);
    }

    // Logging
    if cfg.logging.dir.trim().is_empty() {
        return Err(anyhow::anyhow!("logging.dir must not be empty"));
    }
    if cfg.logging.error_file.trim().is_empty() {
        return Err(anyhow::anyhow!("logging.error_file must not be empty"));
    }
    if cfg.logging.error_file.contains('/') || cfg.logging.error_file.contains('\\') {
        return Err(anyhow::anyhow!(
            "logging.error_file must be a plain file name, got {:?}",
            cfg.logging.error_file
        ));
    }

    Ok(())
}
