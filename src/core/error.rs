//! Error types for the logging core

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Generic IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A visitor callback aborted a traversal
    #[error("visitor aborted: {0}")]
    Visitor(String),

    /// Sink error with the sink name
    #[error("sink '{name}' failed: {message}")]
    Sink { name: String, message: String },

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a visitor abort error
    pub fn visitor(msg: impl Into<String>) -> Self {
        Error::Visitor(msg.into())
    }

    /// Create a sink error
    pub fn sink(name: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Sink {
            name: name.into(),
            message: message.into(),
        }
    }

    /// Create a generic error
    pub fn other(msg: impl Into<String>) -> Self {
        Error::Other(msg.into())
    }
}
