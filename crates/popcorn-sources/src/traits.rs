use async_trait::async_trait;
use popcorn_models::{MovieDetails, MovieSummary};
use tokio_util::sync::CancellationToken;
use crate::error::MetadataError;

#[async_trait]
pub trait MetadataSource: Send + Sync {
    fn source_name(&self) -> &str;

    /// Search titles matching `query`.
    ///
    /// Implementations must return `MetadataError::Cancelled` once `cancel`
    /// fires, abandoning the in-flight transport.
    async fn search(&self, query: &str, cancel: &CancellationToken) -> Result<Vec<MovieSummary>, MetadataError>;

    /// Fetch the full record for one title id, with the same cancellation contract as `search`.
    async fn details(&self, id: &str, cancel: &CancellationToken) -> Result<MovieDetails, MetadataError>;
}
