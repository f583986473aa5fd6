//! Shared error taxonomy used at every component boundary.
//!
//! Components return their own `thiserror` enums (`WalkError`, `ParserError`,
//! `CacheError`, ...) for the failure modes specific to them. Anything that
//! crosses a provider/search/index boundary gets classified into one of the
//! kinds below so callers can decide retryability without matching on
//! component-specific variants.

use thiserror::Error;

/// Categorized error kind shared by the embedding provider, cache, index, and
/// search components (spec §7).
#[derive(Error, Debug)]
pub enum CoreError {
    /// Empty text, non-positive k, malformed path, unknown provider tag. Non-retryable.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Function/file missing from the index or source tree.
    #[error("not found: {0}")]
    NotFound(String),

    /// Network failure, 5xx, 429, timeout. Retried per the provider retry policy.
    #[error("provider unavailable: {0}")]
    ProviderUnavailable(String),

    /// Missing or rejected API key. Non-retryable.
    #[error("authentication failed: {0}")]
    AuthFailure(String),

    /// Requested model name not recognized by the provider. Non-retryable.
    #[error("invalid model: {0}")]
    InvalidModel(String),

    /// Query-side embedding dimension disagrees with the stored index dimension.
    #[error("dimension mismatch: index expects {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// An on-disk index/metadata/cache file could not be parsed.
    #[error("corrupt state at {path}: {source}")]
    Corruption {
        path: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Wrapped error from a lower layer (I/O, serialization, ...).
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CoreError {
    /// Whether the embedding-service retry loop should retry this error.
    pub fn is_retryable(&self) -> bool {
        matches!(self, CoreError::ProviderUnavailable(_))
    }

    pub fn invalid_input(msg: impl Into<String>) -> Self {
        CoreError::InvalidInput(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        CoreError::NotFound(msg.into())
    }
}

pub type CoreResult<T> = Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_unavailable_is_retryable() {
        let e = CoreError::ProviderUnavailable("timeout".into());
        assert!(e.is_retryable());
    }

    #[test]
    fn invalid_input_is_not_retryable() {
        let e = CoreError::InvalidInput("empty query".into());
        assert!(!e.is_retryable());
    }

    #[test]
    fn auth_failure_is_not_retryable() {
        let e = CoreError::AuthFailure("missing key".into());
        assert!(!e.is_retryable());
    }
}
