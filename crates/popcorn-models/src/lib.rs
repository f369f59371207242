pub mod details;
pub mod movie;
pub mod summary;
pub mod watched;

pub use details::MovieDetails;
pub use movie::MovieSummary;
pub use summary::WatchlistSummary;
pub use watched::WatchedMovie;
