use std::env;
use std::path::Path;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    #[error("Invalid log level {0:?}: {1}")]
    InvalidLogLevel(String, String),

    #[error("Invalid log file path: {0}")]
    InvalidLogFile(String),

    #[error("Failed to install subscriber: {0}")]
    Subscriber(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Install the global tracing subscriber.
///
/// `LOG_LEVEL` (default `INFO`) feeds an `EnvFilter`, so directives like
/// `info,sea_orm=warn` work too. Setting `APP_LOG_FILE` adds a second,
/// daily-rotated plain-text layer next to the console one.
pub fn init_logging() -> Result<(), LoggingError> {
    let level = env::var("LOG_LEVEL").unwrap_or_else(|_| "INFO".to_string());

    // EnvFilter is not Clone, so each layer parses its own
    let filter = |spec: &str| {
        EnvFilter::try_new(spec)
            .map_err(|e| LoggingError::InvalidLogLevel(spec.to_string(), e.to_string()))
    };

    let console = fmt::layer()
        .with_target(true)
        .with_filter(filter(&level)?);

    let registry = tracing_subscriber::registry().with(console);

    match env::var("APP_LOG_FILE").ok() {
        Some(path) => {
            let path = Path::new(&path);
            let dir = path.parent().unwrap_or_else(|| Path::new("."));
            let name = path
                .file_name()
                .ok_or_else(|| LoggingError::InvalidLogFile(path.display().to_string()))?;
            std::fs::create_dir_all(dir)?;

            let file = fmt::layer()
                .with_writer(tracing_appender::rolling::daily(dir, name))
                .with_ansi(false)
                .with_target(true)
                .with_filter(filter(&level)?);

            registry
                .with(file)
                .try_init()
                .map_err(|e| LoggingError::Subscriber(e.to_string()))
        }
        None => registry
            .try_init()
            .map_err(|e| LoggingError::Subscriber(e.to_string())),
    }
}
