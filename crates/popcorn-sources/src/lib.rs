pub mod error;
pub mod omdb;
pub mod traits;

pub use error::MetadataError;
pub use omdb::OmdbClient;
pub use traits::MetadataSource;
