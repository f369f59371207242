use serde::{Deserialize, Serialize};

/// A single search hit as returned by the metadata API.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MovieSummary {
    pub id: String, // IMDb id, e.g. "tt0372784"
    pub title: String,
    pub year: String, // Kept verbatim: series come back as ranges like "2005–2007"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub poster_url: Option<String>,
}
