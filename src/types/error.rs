use thiserror::Error;

/// stablewatch error types
#[derive(Error, Debug)]
pub enum StablewatchError {
    /// Failed to parse a provider payload
    #[error("parse error: {0}")]
    Parse(String),

    /// File I/O error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error (unknown transformer/formatter/source kind)
    #[error("config error: {0}")]
    Config(String),
}

/// Result type alias for stablewatch
pub type Result<T> = std::result::Result<T, StablewatchError>;
