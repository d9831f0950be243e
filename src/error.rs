use std::time::Duration;
use thiserror::Error;

/// The bounding polygon was given the wrong number of vertices.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("bounding box must have exactly {expected} points, got {found}")]
pub struct InvalidGeometryError {
    pub expected: usize,
    pub found: usize,
}

/// No rendering surface is registered under the requested selector.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("map surface with selector {selector} not found")]
pub struct SurfaceNotFoundError {
    pub selector: String,
}

/// Loading points from a data source failed.
///
/// Every variant names the source it came from so the caller can decide
/// whether to retry. The error is `Clone` because one failed load is fanned
/// out to every caller that was waiting on it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoadError {
    #[error("failed to fetch points from {source_id}: {cause}")]
    Transport { source_id: String, cause: String },

    #[error("{source_id} returned error status: {status}")]
    Status { source_id: String, status: u16 },

    #[error("failed to parse points from {source_id}: {cause}")]
    Malformed { source_id: String, cause: String },

    #[error("failed to read points from {source_id}: {cause}")]
    Io { source_id: String, cause: String },

    #[error("loading points from {source_id} timed out after {timeout:?}")]
    Timeout { source_id: String, timeout: Duration },
}

impl LoadError {
    pub fn source_id(&self) -> &str {
        match self {
            LoadError::Transport { source_id, .. }
            | LoadError::Status { source_id, .. }
            | LoadError::Malformed { source_id, .. }
            | LoadError::Io { source_id, .. }
            | LoadError::Timeout { source_id, .. } => source_id,
        }
    }

    /// Whether a later attempt could plausibly succeed.
    ///
    /// 429 and 5xx are treated like the transient failures they usually are;
    /// other statuses and unparseable payloads will not fix themselves.
    pub fn is_retryable(&self) -> bool {
        match self {
            LoadError::Transport { .. } | LoadError::Timeout { .. } => true,
            LoadError::Status { status, .. } => *status == 429 || *status >= 500,
            LoadError::Malformed { .. } | LoadError::Io { .. } => false,
        }
    }
}
