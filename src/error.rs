//! Error types for moonbench
//!
//! Centralized error handling using thiserror.

use thiserror::Error;

/// All error types that can occur in moonbench
#[derive(Debug, Error)]
pub enum MoonbenchError {
    /// The marker entry was absent from the freshly read log window.
    ///
    /// The window size is a per-test-type configuration property, so this is
    /// fatal rather than retryable; a looser retry could match a stale marker
    /// from an earlier iteration.
    #[error(
        "marker not found in the last {window} log entries; \
         the test produced more output than the read window holds - \
         increase the window for this test type and try again"
    )]
    MarkerNotFound { window: usize },

    /// The post-marker tail did not contain the number of matching lines the
    /// test type requires
    #[error("expected {expected} matching log line(s) in the post-marker tail, found {found}")]
    UnexpectedMessageCount { expected: usize, found: usize },

    /// A line matched the test type's pattern but its numeric field could not
    /// be parsed
    #[error("could not parse `{field}` from log line: {line}")]
    MalformedLogLine { field: &'static str, line: String },

    /// A remote call timed out; never retried, since the command may already
    /// be moving hardware
    #[error("remote request timed out: {0}")]
    RemoteTimeout(String),

    /// HTTP transport error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for moonbench operations
pub type Result<T> = std::result::Result<T, MoonbenchError>;
