use crate::error::MetadataError;
use crate::omdb::api;
use crate::traits::MetadataSource;
use anyhow::Result;
use async_trait::async_trait;
use popcorn_config::OmdbConfig;
use popcorn_models::{MovieDetails, MovieSummary};
use reqwest::Client;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::debug;

#[derive(Clone)]
pub struct OmdbClient {
    client: Arc<Client>,
    base_url: String,
    api_key: String,
}

impl OmdbClient {
    pub fn new(api_key: impl Into<String>, base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("popcorn/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client: Arc::new(client),
            base_url: base_url.into(),
            api_key: api_key.into(),
        })
    }

    pub fn from_config(config: &OmdbConfig) -> Result<Self> {
        Self::new(config.api_key.clone(), config.base_url.clone(), config.timeout())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

/// Race `request` against `cancel`; dropping the losing future aborts the transport
async fn cancellable<T, F>(cancel: &CancellationToken, request: F) -> Result<T, MetadataError>
where
    F: Future<Output = Result<T, MetadataError>>,
{
    if cancel.is_cancelled() {
        return Err(MetadataError::Cancelled);
    }

    tokio::select! {
        biased;
        _ = cancel.cancelled() => {
            debug!("OMDb request cancelled");
            Err(MetadataError::Cancelled)
        }
        result = request => result,
    }
}

#[async_trait]
impl MetadataSource for OmdbClient {
    fn source_name(&self) -> &str {
        "omdb"
    }

    async fn search(&self, query: &str, cancel: &CancellationToken) -> Result<Vec<MovieSummary>, MetadataError> {
        cancellable(cancel, api::search_movies(&self.client, &self.base_url, &self.api_key, query)).await
    }

    async fn details(&self, id: &str, cancel: &CancellationToken) -> Result<MovieDetails, MetadataError> {
        cancellable(cancel, api::get_movie(&self.client, &self.base_url, &self.api_key, id)).await
    }
}
