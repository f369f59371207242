use thiserror::Error;

/// Failure of a single metadata request.
///
/// `Cancelled` must stay distinguishable from the other two: callers drop it
/// silently because a newer request has already replaced the one that failed.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum MetadataError {
    /// Network failure, non-2xx status, timeout or an undecodable body
    #[error("transport error: {0}")]
    Transport(String),

    /// Well-formed response reporting no matching title
    #[error("not found: {0}")]
    NotFound(String),

    #[error("request cancelled")]
    Cancelled,
}

impl MetadataError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, MetadataError::Cancelled)
    }
}

impl From<reqwest::Error> for MetadataError {
    fn from(e: reqwest::Error) -> Self {
        MetadataError::Transport(e.to_string())
    }
}
