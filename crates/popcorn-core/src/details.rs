//! Detail-view loading for the selected movie.
//!
//! Follows the selection: opening a movie starts a fetch (cancelling any
//! fetch for a previously opened one), closing cancels and resets. Same
//! request-gate discipline as search.

use crate::request::{RequestGate, RequestId};
use crate::search::NOT_FOUND_MESSAGE;
use popcorn_models::MovieDetails;
use popcorn_sources::MetadataError;
use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

pub const DETAILS_FAILED_MESSAGE: &str = "Something went wrong with fetching movie details";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum DetailState {
    Closed,
    Loading { id: String },
    Loaded { details: MovieDetails },
    Error { id: String, message: String },
}

#[derive(Debug, Clone)]
pub struct DetailRequest {
    pub id: RequestId,
    pub movie_id: String,
    pub cancel: CancellationToken,
}

#[derive(Debug)]
pub struct DetailCompletion {
    pub id: RequestId,
    pub outcome: Result<MovieDetails, MetadataError>,
}

#[derive(Debug)]
pub struct DetailController {
    state: DetailState,
    shown: Option<String>,
    gate: RequestGate,
}

impl Default for DetailController {
    fn default() -> Self {
        Self::new()
    }
}

impl DetailController {
    pub fn new() -> Self {
        Self {
            state: DetailState::Closed,
            shown: None,
            gate: RequestGate::new(),
        }
    }

    /// Bring the view in line with the current selection.
    ///
    /// Returns a request when a newly selected movie needs loading.
    pub fn show(&mut self, movie_id: Option<&str>) -> Option<DetailRequest> {
        if self.shown.as_deref() == movie_id {
            return None;
        }

        match movie_id {
            None => {
                if let Some(cancelled) = self.gate.cancel() {
                    debug!(request_id = %cancelled, "Cancelled details request");
                }
                self.shown = None;
                self.state = DetailState::Closed;
                None
            }
            Some(movie_id) => {
                let ticket = self.gate.begin();
                debug!(request_id = %ticket.id, id = %movie_id, "Loading details");
                self.shown = Some(movie_id.to_string());
                self.state = DetailState::Loading { id: movie_id.to_string() };
                Some(DetailRequest {
                    id: ticket.id,
                    movie_id: movie_id.to_string(),
                    cancel: ticket.cancel,
                })
            }
        }
    }

    pub fn complete(&mut self, completion: DetailCompletion) -> bool {
        if matches!(completion.outcome, Err(MetadataError::Cancelled)) || !self.gate.settle(completion.id) {
            debug!(request_id = %completion.id, "Dropping stale details");
            return false;
        }
        let Some(movie_id) = self.shown.clone() else {
            return false;
        };

        self.state = match completion.outcome {
            Ok(details) => DetailState::Loaded { details },
            Err(e) => {
                warn!(id = %movie_id, error = %e, "Details failed");
                let message = match e {
                    MetadataError::NotFound(_) => NOT_FOUND_MESSAGE,
                    _ => DETAILS_FAILED_MESSAGE,
                };
                DetailState::Error { id: movie_id, message: message.to_string() }
            }
        };
        true
    }

    pub fn state(&self) -> &DetailState {
        &self.state
    }

    pub fn shown_id(&self) -> Option<&str> {
        self.shown.as_deref()
    }

    /// Details for `movie_id`, if they are what the view currently shows
    pub fn loaded_for(&self, movie_id: &str) -> Option<&MovieDetails> {
        match &self.state {
            DetailState::Loaded { details } if self.shown.as_deref() == Some(movie_id) => Some(details),
            _ => None,
        }
    }
}
