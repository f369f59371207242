pub mod config;
pub mod paths;

pub use config::{Config, LoggingConfig, OmdbConfig, SearchConfig, API_KEY_PLACEHOLDER, DEFAULT_OMDB_BASE_URL};
pub use paths::{PathManager, home_override};
