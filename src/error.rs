//! Custom error types for the intelligence engine
//!
//! Each layer gets its own enum; the engine-level `EngineError` is what
//! callers of the public operations see.

use thiserror::Error;

/// Top-level engine errors
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Upstream {upstream} unavailable: {reason}")]
    UpstreamUnavailable { upstream: String, reason: String },

    #[error("Persistence failure: {0}")]
    Persistence(#[from] StoreError),

    #[error("Invariant violated: {0}")]
    InvariantViolation(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl EngineError {
    pub fn validation(msg: impl Into<String>) -> Self {
        EngineError::Validation(msg.into())
    }
}

/// Persistence gateway errors
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Version conflict for {prospect_id}: expected {expected}, found {found}")]
    VersionConflict {
        prospect_id: String,
        expected: u64,
        found: u64,
    },

    #[error("Storage backend error: {0}")]
    Backend(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Signal source errors
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("Deserialization error: {0}")]
    Deserialization(#[from] serde_json::Error),

    #[error("Insight producer error: {0}")]
    Llm(String),

    #[error("Timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },
}

pub type EngineResult<T> = Result<T, EngineError>;
pub type StoreResult<T> = Result<T, StoreError>;
pub type SourceResult<T> = Result<T, SourceError>;

impl From<SourceError> for EngineError {
    fn from(err: SourceError) -> Self {
        EngineError::UpstreamUnavailable {
            upstream: "signal source".to_string(),
            reason: err.to_string(),
        }
    }
}

/// Helper to spot optimistic-concurrency conflicts without matching on the enum
pub fn is_version_conflict(err: &EngineError) -> bool {
    matches!(
        err,
        EngineError::Persistence(StoreError::VersionConflict { .. })
    )
}
