use popcorn_models::{WatchedMovie, WatchlistSummary};
use thiserror::Error;
use tracing::info;

pub const MIN_USER_RATING: u8 = 1;
pub const MAX_USER_RATING: u8 = 10;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum WatchlistError {
    #[error("{0} is already in the watched list")]
    AlreadyWatched(String),

    #[error("rating must be between 1 and 10, got {0}")]
    InvalidRating(u8),
}

/// Session-local list of watched movies, at most one entry per id
#[derive(Debug, Default)]
pub struct WatchlistStore {
    movies: Vec<WatchedMovie>,
}

impl WatchlistStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, movie: WatchedMovie) -> Result<(), WatchlistError> {
        if !(MIN_USER_RATING..=MAX_USER_RATING).contains(&movie.user_rating) {
            return Err(WatchlistError::InvalidRating(movie.user_rating));
        }
        if self.contains(movie.id()) {
            return Err(WatchlistError::AlreadyWatched(movie.id().to_string()));
        }

        info!(id = %movie.id(), title = %movie.movie.title, rating = movie.user_rating, "Added to watched list");
        self.movies.push(movie);
        Ok(())
    }

    /// Remove by id; absent ids are a no-op
    pub fn remove(&mut self, id: &str) -> Option<WatchedMovie> {
        let index = self.movies.iter().position(|m| m.id() == id)?;
        let removed = self.movies.remove(index);
        info!(id = %id, "Removed from watched list");
        Some(removed)
    }

    pub fn get(&self, id: &str) -> Option<&WatchedMovie> {
        self.movies.iter().find(|m| m.id() == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    pub fn movies(&self) -> &[WatchedMovie] {
        &self.movies
    }

    pub fn len(&self) -> usize {
        self.movies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.movies.is_empty()
    }

    pub fn summary(&self) -> WatchlistSummary {
        WatchlistSummary {
            count: self.movies.len(),
            avg_user_rating: average(self.movies.iter().map(|m| f64::from(m.user_rating))),
            avg_imdb_rating: average(self.movies.iter().map(|m| m.imdb_rating)),
            avg_runtime_minutes: average(self.movies.iter().map(|m| f64::from(m.runtime_minutes))),
        }
    }
}

fn average(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, count) = values.fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use popcorn_models::MovieSummary;

    fn watched(id: &str, user_rating: u8, imdb_rating: f64, runtime_minutes: u32) -> WatchedMovie {
        WatchedMovie {
            movie: MovieSummary {
                id: id.to_string(),
                title: format!("Movie {}", id),
                year: "2010".to_string(),
                poster_url: None,
            },
            user_rating,
            runtime_minutes,
            imdb_rating,
        }
    }

    #[test]
    fn test_add_then_remove_restores() {
        let mut store = WatchlistStore::new();
        store.add(watched("tt001", 8, 7.5, 120)).unwrap();
        let before = store.movies().to_vec();

        store.add(watched("tt002", 6, 6.0, 90)).unwrap();
        assert_eq!(store.len(), 2);
        store.remove("tt002");
        assert_eq!(store.movies(), before.as_slice());
    }

    #[test]
    fn test_remove_absent_is_noop() {
        let mut store = WatchlistStore::new();
        store.add(watched("tt001", 8, 7.5, 120)).unwrap();
        assert!(store.remove("tt999").is_none());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_duplicate_rejected() {
        let mut store = WatchlistStore::new();
        store.add(watched("tt001", 8, 7.5, 120)).unwrap();
        let err = store.add(watched("tt001", 3, 7.5, 120)).unwrap_err();
        assert_eq!(err, WatchlistError::AlreadyWatched("tt001".to_string()));
        assert_eq!(store.get("tt001").unwrap().user_rating, 8);
    }

    #[test]
    fn test_rating_bounds() {
        let mut store = WatchlistStore::new();
        assert_eq!(store.add(watched("tt001", 0, 7.5, 120)), Err(WatchlistError::InvalidRating(0)));
        assert_eq!(store.add(watched("tt001", 11, 7.5, 120)), Err(WatchlistError::InvalidRating(11)));
        assert!(store.add(watched("tt001", 10, 7.5, 120)).is_ok());
        assert!(store.add(watched("tt002", 1, 7.5, 120)).is_ok());
    }

    #[test]
    fn test_summary_empty_is_zero() {
        let store = WatchlistStore::new();
        assert_eq!(store.summary(), WatchlistSummary::default());
        assert!(store.is_empty());
    }

    #[test]
    fn test_summary_averages() {
        let mut store = WatchlistStore::new();
        store.add(watched("tt001", 8, 7.0, 120)).unwrap();
        store.add(watched("tt002", 6, 9.0, 90)).unwrap();

        let summary = store.summary();
        assert_eq!(summary.count, 2);
        assert_eq!(summary.avg_user_rating, 7.0);
        assert_eq!(summary.avg_imdb_rating, 8.0);
        assert_eq!(summary.avg_runtime_minutes, 105.0);
    }
}
