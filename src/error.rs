use thiserror::Error;

/// Unified error type for hotfix operations
#[derive(Error, Debug)]
pub enum HotfixError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Merge conflict: {0}")]
    Conflict(String),

    #[error("Invalid version format: {0}")]
    Validation(String),

    #[error("Remote operation failed: {0}")]
    Remote(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for Results in hotfix-propagator
pub type Result<T> = std::result::Result<T, HotfixError>;

impl HotfixError {
    /// Create a not-found error with context
    pub fn not_found(msg: impl Into<String>) -> Self {
        HotfixError::NotFound(msg.into())
    }

    /// Create a merge conflict error with context
    pub fn conflict(msg: impl Into<String>) -> Self {
        HotfixError::Conflict(msg.into())
    }

    /// Create a version validation error; `msg` is the offending input
    pub fn validation(msg: impl Into<String>) -> Self {
        HotfixError::Validation(msg.into())
    }

    /// Create a remote error with context
    pub fn remote(msg: impl Into<String>) -> Self {
        HotfixError::Remote(msg.into())
    }

    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        HotfixError::Config(msg.into())
    }

    /// Message surfaced in per-branch results.
    ///
    /// Remote errors are reported verbatim, without the variant prefix.
    pub fn detail(&self) -> String {
        match self {
            HotfixError::Remote(msg) | HotfixError::Conflict(msg) => msg.clone(),
            other => other.to_string(),
        }
    }
}
