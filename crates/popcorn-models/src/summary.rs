use serde::{Deserialize, Serialize};

/// Aggregates over the watched list. Averages of an empty list are 0.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct WatchlistSummary {
    pub count: usize,
    pub avg_user_rating: f64,
    pub avg_imdb_rating: f64,
    pub avg_runtime_minutes: f64,
}
