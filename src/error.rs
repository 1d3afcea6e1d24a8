use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MetricsError {
    #[error("unknown calculator: {0}")]
    UnknownCalculator(String),

    #[error("invalid input for {calculator}: {reason}")]
    InvalidInput { calculator: String, reason: String },

    #[error("failed to read config {}: {source}", .path.display())]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("failed to serialize config: {0}")]
    ConfigSerialize(#[from] toml::ser::Error),

    #[error("failed to write config {}: {source}", .path.display())]
    ConfigWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to encode output: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("server error: {0}")]
    Server(String),
}

impl MetricsError {
    pub fn invalid_input(calculator: impl Into<String>, reason: impl Into<String>) -> Self {
        MetricsError::InvalidInput {
            calculator: calculator.into(),
            reason: reason.into(),
        }
    }
}
