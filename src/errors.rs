use thiserror::Error;

/// Errors surfaced at the request boundary.
///
/// Traversals never return these for partial failures; a missing edge or an
/// unresolvable reference is dropped from the answer instead.
#[derive(Error, Debug)]
pub enum NavError {
    #[error("config error: {message}")]
    Config { message: String },

    #[error("code model is still indexing; retry when indexing completes")]
    IndexNotReady,

    #[error("element not found: {element}")]
    ElementNotFound { element: String },

    #[error("invalid request: {message}")]
    InvalidRequest { message: String },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience alias for results using `NavError`.
pub type Result<T> = std::result::Result<T, NavError>;

/// A failure reported by a code model for one lookup.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
    #[error("unresolved element: {0}")]
    Unresolved(String),

    #[error("introspection failed: {0}")]
    Introspection(String),
}

/// Result alias for code model lookups.
pub type ModelResult<T> = std::result::Result<T, ModelError>;
