use serde::{Deserialize, Serialize};
use crate::details::MovieDetails;
use crate::movie::MovieSummary;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WatchedMovie {
    #[serde(flatten)]
    pub movie: MovieSummary,
    pub user_rating: u8, // 1-10, entered by the user
    pub runtime_minutes: u32,
    pub imdb_rating: f64,
}

impl WatchedMovie {
    /// Build a watched entry from a loaded detail record.
    ///
    /// Missing runtime or IMDb rating count as 0 so the summary averages
    /// stay numeric.
    pub fn from_details(details: &MovieDetails, user_rating: u8) -> Self {
        Self {
            movie: details.summary(),
            user_rating,
            runtime_minutes: details.runtime_minutes.unwrap_or(0),
            imdb_rating: details.imdb_rating.unwrap_or(0.0),
        }
    }

    pub fn id(&self) -> &str {
        &self.movie.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn details(runtime: Option<u32>, rating: Option<f64>) -> MovieDetails {
        MovieDetails {
            id: "tt0372784".to_string(),
            title: "Batman Begins".to_string(),
            year: "2005".to_string(),
            poster_url: None,
            runtime_minutes: runtime,
            imdb_rating: rating,
            plot: String::new(),
            released: "15 Jun 2005".to_string(),
            actors: "Christian Bale, Michael Caine".to_string(),
            director: "Christopher Nolan".to_string(),
            genre: "Action, Crime, Drama".to_string(),
        }
    }

    #[test]
    fn test_from_details_copies_metadata() {
        let watched = WatchedMovie::from_details(&details(Some(140), Some(8.2)), 9);
        assert_eq!(watched.id(), "tt0372784");
        assert_eq!(watched.movie.title, "Batman Begins");
        assert_eq!(watched.user_rating, 9);
        assert_eq!(watched.runtime_minutes, 140);
        assert_eq!(watched.imdb_rating, 8.2);
    }

    #[test]
    fn test_from_details_missing_numbers_become_zero() {
        let watched = WatchedMovie::from_details(&details(None, None), 5);
        assert_eq!(watched.runtime_minutes, 0);
        assert_eq!(watched.imdb_rating, 0.0);
    }

    #[test]
    fn test_serializes_flat() {
        let watched = WatchedMovie::from_details(&details(Some(140), Some(8.2)), 9);
        let json = serde_json::to_value(&watched).unwrap();
        assert_eq!(json["id"], "tt0372784");
        assert_eq!(json["user_rating"], 9);
    }
}
