//! Session coordinator.
//!
//! Owns one of each controller plus the watched list, turns user intents into
//! controller calls and runs the resulting requests as tokio tasks. Tasks
//! never touch state: they report a [`Completion`] on the channel returned
//! by [`Session::new`], and the owner feeds it back through
//! [`Session::apply`]. All mutation therefore happens on the owner's turn,
//! one event at a time.

use crate::details::{DetailCompletion, DetailController, DetailRequest, DetailState};
use crate::search::{SearchCompletion, SearchController, SearchRequest};
use crate::selection::SelectionController;
use crate::watchlist::{WatchlistError, WatchlistStore};
use popcorn_models::{MovieSummary, WatchedMovie, WatchlistSummary};
use popcorn_sources::MetadataSource;
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::mpsc;
use tracing::debug;

/// Everything the presentation layer can ask for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    QueryChanged(String),
    SelectMovie(String),
    CloseMovie,
    AddWatched { user_rating: u8 },
    DeleteWatched(String),
}

#[derive(Debug)]
pub enum Completion {
    Search(SearchCompletion),
    Details(DetailCompletion),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("no movie is selected")]
    NoSelection,

    #[error("details for {0} are not loaded yet")]
    DetailsNotLoaded(String),

    #[error(transparent)]
    Watchlist(#[from] WatchlistError),
}

/// Read-only view of the whole session, as consumed by renderers
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    pub query: String,
    pub movies: Vec<MovieSummary>,
    pub is_loading: bool,
    pub error: Option<String>,
    pub selected_id: Option<String>,
    pub details: DetailState,
    /// The user's rating for the selected movie, if it is already watched
    pub selected_user_rating: Option<u8>,
    pub watched: Vec<WatchedMovie>,
    pub summary: WatchlistSummary,
}

pub struct Session {
    source: Arc<dyn MetadataSource>,
    search: SearchController,
    details: DetailController,
    selection: SelectionController,
    watchlist: WatchlistStore,
    completions: mpsc::UnboundedSender<Completion>,
}

impl Session {
    pub fn new(source: Arc<dyn MetadataSource>, min_query_len: usize) -> (Self, mpsc::UnboundedReceiver<Completion>) {
        let (completions, receiver) = mpsc::unbounded_channel();
        let session = Self {
            source,
            search: SearchController::new(min_query_len),
            details: DetailController::new(),
            selection: SelectionController::new(),
            watchlist: WatchlistStore::new(),
            completions,
        };
        (session, receiver)
    }

    /// Handle one user intent. Must run inside a tokio runtime.
    pub fn dispatch(&mut self, intent: Intent) -> Result<(), SessionError> {
        debug!(?intent, "Dispatching intent");
        match intent {
            Intent::QueryChanged(query) => {
                if let Some(request) = self.search.set_query(&query, &mut [&mut self.selection]) {
                    self.spawn_search(request);
                }
            }
            Intent::SelectMovie(id) => {
                self.selection.select(&id);
            }
            Intent::CloseMovie => self.selection.close(),
            Intent::AddWatched { user_rating } => {
                let id = self.selection.selected().ok_or(SessionError::NoSelection)?.to_string();
                let details = self
                    .details
                    .loaded_for(&id)
                    .ok_or_else(|| SessionError::DetailsNotLoaded(id.clone()))?;

                self.watchlist.add(WatchedMovie::from_details(details, user_rating))?;
                self.selection.close();
            }
            Intent::DeleteWatched(id) => {
                self.watchlist.remove(&id);
            }
        }

        self.sync_details();
        Ok(())
    }

    /// Feed a finished request back in. Returns whether anything visible changed.
    pub fn apply(&mut self, completion: Completion) -> bool {
        match completion {
            Completion::Search(c) => self.search.complete(c),
            Completion::Details(c) => self.details.complete(c),
        }
    }

    pub fn snapshot(&self) -> Snapshot {
        let selected_id = self.selection.selected().map(str::to_string);
        Snapshot {
            query: self.search.query().to_string(),
            movies: self.search.movies().to_vec(),
            is_loading: self.search.is_loading(),
            error: self.search.error().map(str::to_string),
            selected_user_rating: selected_id
                .as_deref()
                .and_then(|id| self.watchlist.get(id))
                .map(|m| m.user_rating),
            selected_id,
            details: self.details.state().clone(),
            watched: self.watchlist.movies().to_vec(),
            summary: self.watchlist.summary(),
        }
    }

    pub fn search(&self) -> &SearchController {
        &self.search
    }

    pub fn selection(&self) -> &SelectionController {
        &self.selection
    }

    pub fn details(&self) -> &DetailController {
        &self.details
    }

    pub fn watchlist(&self) -> &WatchlistStore {
        &self.watchlist
    }

    fn sync_details(&mut self) {
        if let Some(request) = self.details.show(self.selection.selected()) {
            self.spawn_details(request);
        }
    }

    fn spawn_search(&self, request: SearchRequest) {
        let source = Arc::clone(&self.source);
        let completions = self.completions.clone();
        tokio::spawn(async move {
            let outcome = source.search(&request.query, &request.cancel).await;
            // Receiver gone means the session ended; nothing left to update
            let _ = completions.send(Completion::Search(SearchCompletion { id: request.id, outcome }));
        });
    }

    fn spawn_details(&self, request: DetailRequest) {
        let source = Arc::clone(&self.source);
        let completions = self.completions.clone();
        tokio::spawn(async move {
            let outcome = source.details(&request.movie_id, &request.cancel).await;
            let _ = completions.send(Completion::Details(DetailCompletion { id: request.id, outcome }));
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::{LifecycleState, NOT_FOUND_MESSAGE};
    use async_trait::async_trait;
    use popcorn_models::MovieDetails;
    use popcorn_sources::MetadataError;
    use std::collections::HashMap;
    use std::sync::Mutex;
    use tokio::sync::oneshot;
    use tokio_util::sync::CancellationToken;

    type SearchOutcome = Result<Vec<MovieSummary>, MetadataError>;

    /// Answers searches from canned results, or holds them until released.
    ///
    /// Held searches ignore cancellation, like a transport that finishes
    /// anyway after being told to stop.
    #[derive(Default)]
    struct FakeSource {
        canned: Mutex<HashMap<String, SearchOutcome>>,
        held: Mutex<HashMap<String, oneshot::Receiver<SearchOutcome>>>,
        details: Mutex<HashMap<String, MovieDetails>>,
    }

    impl FakeSource {
        fn answer(&self, query: &str, outcome: SearchOutcome) {
            self.canned.lock().unwrap().insert(query.to_string(), outcome);
        }

        fn hold(&self, query: &str) -> oneshot::Sender<SearchOutcome> {
            let (tx, rx) = oneshot::channel();
            self.held.lock().unwrap().insert(query.to_string(), rx);
            tx
        }

        fn with_details(&self, details: MovieDetails) {
            self.details.lock().unwrap().insert(details.id.clone(), details);
        }
    }

    #[async_trait]
    impl MetadataSource for FakeSource {
        fn source_name(&self) -> &str {
            "fake"
        }

        async fn search(&self, query: &str, _cancel: &CancellationToken) -> SearchOutcome {
            let held = self.held.lock().unwrap().remove(query);
            if let Some(rx) = held {
                return rx.await.unwrap_or(Err(MetadataError::Transport("dropped".to_string())));
            }
            self.canned
                .lock()
                .unwrap()
                .get(query)
                .cloned()
                .unwrap_or_else(|| Err(MetadataError::NotFound("Movie not found!".to_string())))
        }

        async fn details(&self, id: &str, cancel: &CancellationToken) -> Result<MovieDetails, MetadataError> {
            if cancel.is_cancelled() {
                return Err(MetadataError::Cancelled);
            }
            self.details
                .lock()
                .unwrap()
                .get(id)
                .cloned()
                .ok_or_else(|| MetadataError::NotFound("Incorrect IMDb ID.".to_string()))
        }
    }

    fn movie(id: &str, title: &str) -> MovieSummary {
        MovieSummary {
            id: id.to_string(),
            title: title.to_string(),
            year: "2005".to_string(),
            poster_url: None,
        }
    }

    fn batman_details() -> MovieDetails {
        MovieDetails {
            id: "tt0372784".to_string(),
            title: "Batman Begins".to_string(),
            year: "2005".to_string(),
            poster_url: None,
            runtime_minutes: Some(140),
            imdb_rating: Some(8.2),
            plot: "After witnessing his parents' death, Bruce learns the art of fighting.".to_string(),
            released: "15 Jun 2005".to_string(),
            actors: "Christian Bale, Michael Caine".to_string(),
            director: "Christopher Nolan".to_string(),
            genre: "Action, Crime, Drama".to_string(),
        }
    }

    fn session_with(fake: Arc<FakeSource>, min_query_len: usize) -> (Session, mpsc::UnboundedReceiver<Completion>) {
        Session::new(fake, min_query_len)
    }

    async fn settle_next(session: &mut Session, rx: &mut mpsc::UnboundedReceiver<Completion>) -> bool {
        let completion = rx.recv().await.unwrap();
        session.apply(completion)
    }

    #[tokio::test]
    async fn test_search_loading_then_success() {
        let fake = Arc::new(FakeSource::default());
        fake.answer("batman", Ok(vec![movie("tt0372784", "Batman Begins"), movie("tt0096895", "Batman")]));
        let (mut session, mut rx) = session_with(fake, 3);

        session.dispatch(Intent::QueryChanged("batman".to_string())).unwrap();
        assert!(session.snapshot().is_loading);

        assert!(settle_next(&mut session, &mut rx).await);
        let snapshot = session.snapshot();
        assert!(!snapshot.is_loading);
        assert_eq!(session.search().state(), &LifecycleState::Success);
        assert_eq!(snapshot.movies.len(), 2);
    }

    #[tokio::test]
    async fn test_not_found_surfaces_message() {
        let fake = Arc::new(FakeSource::default());
        let (mut session, mut rx) = session_with(fake, 3);

        session.dispatch(Intent::QueryChanged("qzxqzx".to_string())).unwrap();
        settle_next(&mut session, &mut rx).await;
        assert_eq!(session.snapshot().error.as_deref(), Some(NOT_FOUND_MESSAGE));
    }

    #[tokio::test]
    async fn test_only_final_query_applies() {
        let fake = Arc::new(FakeSource::default());
        let release_a = fake.hold("a");
        let release_ab = fake.hold("ab");
        let release_abc = fake.hold("abc");
        let (mut session, mut rx) = session_with(fake, 1);

        for query in ["a", "ab", "abc"] {
            session.dispatch(Intent::QueryChanged(query.to_string())).unwrap();
        }

        release_abc.send(Ok(vec![movie("tt3", "abc")])).unwrap();
        assert!(settle_next(&mut session, &mut rx).await);

        release_ab.send(Ok(vec![movie("tt2", "ab")])).unwrap();
        release_a.send(Ok(vec![movie("tt1", "a")])).unwrap();
        assert!(!settle_next(&mut session, &mut rx).await);
        assert!(!settle_next(&mut session, &mut rx).await);

        let snapshot = session.snapshot();
        assert_eq!(snapshot.query, "abc");
        assert_eq!(snapshot.movies, vec![movie("tt3", "abc")]);
        assert_eq!(snapshot.error, None);
    }

    #[tokio::test]
    async fn test_short_query_resets_regardless_of_prior_state() {
        let fake = Arc::new(FakeSource::default());
        fake.answer("batman", Ok(vec![movie("tt0372784", "Batman Begins")]));
        let (mut session, mut rx) = session_with(fake, 3);

        session.dispatch(Intent::QueryChanged("batman".to_string())).unwrap();
        settle_next(&mut session, &mut rx).await;
        session.dispatch(Intent::QueryChanged("ba".to_string())).unwrap();

        let snapshot = session.snapshot();
        assert!(snapshot.movies.is_empty());
        assert!(!snapshot.is_loading);
        assert_eq!(session.search().state(), &LifecycleState::Idle);
    }

    #[tokio::test]
    async fn test_select_loads_details_and_add_closes() {
        let fake = Arc::new(FakeSource::default());
        fake.with_details(batman_details());
        let (mut session, mut rx) = session_with(fake, 3);

        session.dispatch(Intent::SelectMovie("tt0372784".to_string())).unwrap();
        assert_eq!(session.snapshot().details, DetailState::Loading { id: "tt0372784".to_string() });
        assert!(settle_next(&mut session, &mut rx).await);

        session.dispatch(Intent::AddWatched { user_rating: 9 }).unwrap();
        let snapshot = session.snapshot();
        assert_eq!(snapshot.selected_id, None);
        assert_eq!(snapshot.details, DetailState::Closed);
        assert_eq!(snapshot.watched.len(), 1);
        assert_eq!(snapshot.watched[0].runtime_minutes, 140);
        assert_eq!(snapshot.summary.avg_user_rating, 9.0);
    }

    #[tokio::test]
    async fn test_reopening_watched_movie_shows_rating_and_rejects_duplicate() {
        let fake = Arc::new(FakeSource::default());
        fake.with_details(batman_details());
        let (mut session, mut rx) = session_with(fake, 3);

        session.dispatch(Intent::SelectMovie("tt0372784".to_string())).unwrap();
        settle_next(&mut session, &mut rx).await;
        session.dispatch(Intent::AddWatched { user_rating: 7 }).unwrap();

        session.dispatch(Intent::SelectMovie("tt0372784".to_string())).unwrap();
        settle_next(&mut session, &mut rx).await;
        assert_eq!(session.snapshot().selected_user_rating, Some(7));

        let err = session.dispatch(Intent::AddWatched { user_rating: 3 }).unwrap_err();
        assert_eq!(err, SessionError::Watchlist(WatchlistError::AlreadyWatched("tt0372784".to_string())));
        assert_eq!(session.watchlist().len(), 1);
    }

    #[tokio::test]
    async fn test_add_requires_loaded_selection() {
        let fake = Arc::new(FakeSource::default());
        fake.with_details(batman_details());
        let (mut session, _rx) = session_with(fake, 3);

        assert_eq!(session.dispatch(Intent::AddWatched { user_rating: 5 }), Err(SessionError::NoSelection));

        session.dispatch(Intent::SelectMovie("tt0372784".to_string())).unwrap();
        assert_eq!(
            session.dispatch(Intent::AddWatched { user_rating: 5 }),
            Err(SessionError::DetailsNotLoaded("tt0372784".to_string()))
        );
    }

    #[tokio::test]
    async fn test_query_change_clears_open_detail_view() {
        let fake = Arc::new(FakeSource::default());
        fake.with_details(batman_details());
        fake.answer("superman", Ok(vec![movie("tt0078346", "Superman")]));
        let (mut session, mut rx) = session_with(fake, 3);

        session.dispatch(Intent::SelectMovie("tt0372784".to_string())).unwrap();
        settle_next(&mut session, &mut rx).await;
        assert!(session.selection().selected().is_some());

        session.dispatch(Intent::QueryChanged("superman".to_string())).unwrap();
        let snapshot = session.snapshot();
        assert_eq!(snapshot.selected_id, None);
        assert_eq!(snapshot.details, DetailState::Closed);
    }

    #[tokio::test]
    async fn test_delete_watched() {
        let fake = Arc::new(FakeSource::default());
        fake.with_details(batman_details());
        let (mut session, mut rx) = session_with(fake, 3);

        session.dispatch(Intent::SelectMovie("tt0372784".to_string())).unwrap();
        settle_next(&mut session, &mut rx).await;
        session.dispatch(Intent::AddWatched { user_rating: 8 }).unwrap();

        session.dispatch(Intent::DeleteWatched("tt0372784".to_string())).unwrap();
        session.dispatch(Intent::DeleteWatched("tt0372784".to_string())).unwrap();
        assert!(session.watchlist().is_empty());
        assert_eq!(session.snapshot().summary, WatchlistSummary::default());
    }

    #[tokio::test]
    async fn test_snapshot_serializes() {
        let fake = Arc::new(FakeSource::default());
        let (session, _rx) = session_with(fake, 3);
        let json = serde_json::to_value(session.snapshot()).unwrap();
        assert_eq!(json["details"]["state"], "closed");
        assert_eq!(json["is_loading"], false);
    }
}
