//! Search-query lifecycle.
//!
//! The controller owns the query, the current result list and the derived
//! [`LifecycleState`]. Every query change re-runs the fetch policy:
//!
//! * trimmed query shorter than the minimum: cancel, clear results, `Idle`
//! * otherwise: cancel the previous request, go `Loading`, issue a new one
//!
//! Completions are applied only if they belong to the request still in
//! flight, so a slow response for an old query can never overwrite a newer
//! one.

use crate::request::{RequestGate, RequestId};
use popcorn_models::MovieSummary;
use popcorn_sources::MetadataError;
use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

pub const FETCH_FAILED_MESSAGE: &str = "Something went wrong with fetching movies";
pub const NOT_FOUND_MESSAGE: &str = "Movie not found";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "message", rename_all = "snake_case")]
pub enum LifecycleState {
    Idle,
    Loading,
    Success,
    Error(String),
}

/// Delivered to every [`QueryObserver`] when the query actually changes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryChange {
    pub previous: String,
    pub current: String,
}

pub trait QueryObserver {
    fn query_changed(&mut self, change: &QueryChange);
}

/// A fetch the caller must run against a metadata source
#[derive(Debug, Clone)]
pub struct SearchRequest {
    pub id: RequestId,
    pub query: String,
    pub cancel: CancellationToken,
}

#[derive(Debug)]
pub struct SearchCompletion {
    pub id: RequestId,
    pub outcome: Result<Vec<MovieSummary>, MetadataError>,
}

#[derive(Debug)]
pub struct SearchController {
    query: String,
    movies: Vec<MovieSummary>,
    state: LifecycleState,
    min_query_len: usize,
    gate: RequestGate,
}

impl SearchController {
    pub fn new(min_query_len: usize) -> Self {
        Self {
            query: String::new(),
            movies: Vec::new(),
            state: LifecycleState::Idle,
            min_query_len,
            gate: RequestGate::new(),
        }
    }

    /// Replace the query, notify `observers` and re-evaluate the fetch policy.
    ///
    /// Returns the request to run, if the new query warrants one. Setting the
    /// same query again is a no-op.
    pub fn set_query(&mut self, query: &str, observers: &mut [&mut dyn QueryObserver]) -> Option<SearchRequest> {
        if query == self.query {
            return None;
        }

        let change = QueryChange {
            previous: std::mem::replace(&mut self.query, query.to_string()),
            current: query.to_string(),
        };
        for observer in observers.iter_mut() {
            observer.query_changed(&change);
        }

        let trimmed = self.query.trim();
        if trimmed.chars().count() < self.min_query_len {
            if let Some(cancelled) = self.gate.cancel() {
                debug!(request_id = %cancelled, "Cancelled search for short query");
            }
            self.movies.clear();
            self.state = LifecycleState::Idle;
            return None;
        }

        let ticket = self.gate.begin();
        self.state = LifecycleState::Loading;
        info!(request_id = %ticket.id, query = %trimmed, "Searching");

        Some(SearchRequest {
            id: ticket.id,
            query: trimmed.to_string(),
            cancel: ticket.cancel,
        })
    }

    /// Apply a finished request. Returns whether visible state changed.
    pub fn complete(&mut self, completion: SearchCompletion) -> bool {
        if matches!(completion.outcome, Err(MetadataError::Cancelled)) {
            debug!(request_id = %completion.id, "Dropping cancelled search");
            return false;
        }
        if !self.gate.settle(completion.id) {
            debug!(request_id = %completion.id, "Dropping superseded search result");
            return false;
        }

        match completion.outcome {
            Ok(movies) => {
                info!(request_id = %completion.id, count = movies.len(), "Search succeeded");
                self.movies = movies;
                self.state = LifecycleState::Success;
            }
            Err(e) => {
                let message = match e {
                    MetadataError::NotFound(_) => NOT_FOUND_MESSAGE,
                    _ => FETCH_FAILED_MESSAGE,
                };
                warn!(request_id = %completion.id, error = %e, "Search failed");
                self.movies.clear();
                self.state = LifecycleState::Error(message.to_string());
            }
        }
        true
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn movies(&self) -> &[MovieSummary] {
        &self.movies
    }

    pub fn state(&self) -> &LifecycleState {
        &self.state
    }

    pub fn is_loading(&self) -> bool {
        self.state == LifecycleState::Loading
    }

    pub fn error(&self) -> Option<&str> {
        match &self.state {
            LifecycleState::Error(message) => Some(message),
            _ => None,
        }
    }

    pub fn in_flight(&self) -> Option<RequestId> {
        self.gate.in_flight()
    }

    pub fn min_query_len(&self) -> usize {
        self.min_query_len
    }
}
