use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum NotifyError {
    /// TOML parse / deserialization error.
    #[error("config parse error: {0}")]
    ConfigParse(String),
    /// Config validation error (empty relay host, zero port, etc.).
    #[error("config validation error: {0}")]
    ConfigValidation(String),
    /// File could not be opened, read, created or written.
    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// Structured input is not valid JSON, or not a JSON object.
    #[error("structured input: {0}")]
    Json(String),
    /// Tabular input could not be read as CSV (header row, encoding).
    #[error("tabular input: {0}")]
    Csv(#[from] csv::Error),
    /// Missing required column in the tabular header.
    #[error("tabular input: missing column '{column}'")]
    MissingColumn { column: String },
    /// Recipient or sender is not a usable mailbox.
    #[error("invalid address '{address}': {reason}")]
    Address { address: String, reason: String },
    /// Message could not be assembled.
    #[error("cannot build message: {0}")]
    Message(String),
    /// Relay refused the message or the connection failed.
    #[error("mail relay {relay}: {reason}")]
    Transport { relay: String, reason: String },
    /// Writing to a print or artifact channel failed.
    #[error("write failed: {0}")]
    Write(#[from] std::io::Error),
}

impl NotifyError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io { path: path.into(), source }
    }
}
