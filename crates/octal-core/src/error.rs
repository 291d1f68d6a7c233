use std::path::PathBuf;

/// Errors raised by the core engine services.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("failed to read or write '{0}': {1}")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("could not determine the user config directory")]
    NoConfigDir,

    #[error("failed to initialize logging: {0}")]
    LoggingInit(String),
}
