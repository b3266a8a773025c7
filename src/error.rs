use thiserror::Error;

/// Errors raised by the browser session and workflow layers.
///
/// Resolution failures (`NotFound`, `Ambiguous`, transient faults) are *not*
/// errors: they are reported as [`crate::resolver::Outcome`] values so the
/// caller can decide whether to retry, skip, or abort. Only operations that
/// cannot produce a meaningful partial result error out through this enum.
#[derive(Debug, Error)]
pub enum AutomationError {
    /// Browser failed to launch
    #[error("Failed to launch browser: {0}")]
    LaunchFailed(String),

    /// Failed to connect to an existing browser instance
    #[error("Failed to connect to browser: {0}")]
    ConnectionFailed(String),

    /// Tab operation failed
    #[error("Tab operation failed: {0}")]
    TabOperationFailed(String),

    /// Navigation failed or timed out
    #[error("Navigation failed: {0}")]
    NavigationFailed(String),

    /// Actuation (click/fill) on a resolved element failed
    #[error("Actuation failed for goal '{goal}': {reason}")]
    ActuationFailed { goal: String, reason: String },

    /// Login could not be completed after all retries
    #[error("Login failed: {0}")]
    LoginFailed(String),

    /// Serialization of a report failed
    #[error("Serialization failed: {0}")]
    SerializationFailed(#[from] serde_json::Error),
}

/// Errors raised by a [`crate::document::Document`] when a single query or
/// element read fails. The resolver records and skips these per strategy;
/// only [`DocumentError::Detached`] aborts a whole resolution, because no
/// later strategy can succeed against a document that is gone.
#[derive(Debug, Error)]
pub enum DocumentError {
    /// The selector could not be parsed by the backend
    #[error("Malformed selector '{selector}': {reason}")]
    MalformedSelector { selector: String, reason: String },

    /// The document (tab, frame) is no longer attached
    #[error("Document detached: {0}")]
    Detached(String),

    /// Any other backend failure for this query
    #[error("Query backend error: {0}")]
    Backend(String),
}

/// Result type alias for element-resolve operations
pub type Result<T> = std::result::Result<T, AutomationError>;
