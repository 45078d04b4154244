//! Cross-cutting error taxonomy.
//!
//! Every service in this crate returns `Result<T, CoordError>`. The HTTP
//! layer (`http::error`) is the only place that knows about status codes;
//! everywhere else the five variants below carry the decision about what
//! kind of failure occurred, not how it is surfaced.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoordError {
    /// Caller sent something structurally or semantically wrong. Never
    /// retried; maps to 422.
    #[error("validation error: {0}")]
    Validation(String),

    /// The referenced entity does not exist. Idempotent; maps to 404.
    #[error("not found: {0}")]
    NotFound(String),

    /// The request conflicts with the current state (e.g. an illegal
    /// handoff transition). Retryable after the caller re-reads state;
    /// maps to 409.
    #[error("conflict: {0}")]
    Conflict(String),

    /// An external collaborator (embedding provider, LLM provider, vector
    /// store) failed. Reads degrade to empty/null results where possible;
    /// writes surface as 502/503.
    #[error("dependency failure: {0}")]
    Dependency(String),

    /// Startup configuration is invalid. The process must not continue;
    /// `main` exits non-zero before binding the HTTP listener.
    #[error("fatal startup error: {0}")]
    Fatal(String),
}

pub type CoordResult<T> = Result<T, CoordError>;

impl CoordError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn dependency(msg: impl Into<String>) -> Self {
        Self::Dependency(msg.into())
    }
}

/// Extension trait mirroring the teacher's `ResultExt`, for wrapping
/// lower-level errors (I/O, serde, reqwest) into a dependency failure with
/// an operation label, at the boundary where we call out to the world.
pub trait ResultExt<T> {
    fn dependency_context(self, operation: &str) -> CoordResult<T>;
}

impl<T, E> ResultExt<T> for std::result::Result<T, E>
where
    E: std::fmt::Display,
{
    fn dependency_context(self, operation: &str) -> CoordResult<T> {
        self.map_err(|e| CoordError::dependency(format!("failed to {operation}: {e}")))
    }
}
