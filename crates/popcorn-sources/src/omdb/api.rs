use crate::error::MetadataError;
use popcorn_models::{MovieDetails, MovieSummary};
use reqwest::{Client, RequestBuilder};
use serde::Deserialize;
use tracing::{debug, warn};

#[derive(Debug, Deserialize)]
struct OmdbSearchResponse {
    #[serde(rename = "Response")]
    response: String,
    #[serde(rename = "Search", default)]
    search: Vec<OmdbSearchItem>,
    #[serde(rename = "Error")]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OmdbSearchItem {
    #[serde(rename = "imdbID")]
    imdb_id: String,
    #[serde(rename = "Title")]
    title: String,
    #[serde(rename = "Year", default)]
    year: String,
    #[serde(rename = "Poster")]
    poster: Option<String>,
}

// A "False" response carries only Response and Error, so every field defaults
#[derive(Debug, Deserialize)]
struct OmdbDetailsResponse {
    #[serde(rename = "Response")]
    response: String,
    #[serde(rename = "Error")]
    error: Option<String>,
    #[serde(rename = "imdbID", default)]
    imdb_id: String,
    #[serde(rename = "Title", default)]
    title: String,
    #[serde(rename = "Year", default)]
    year: String,
    #[serde(rename = "Poster")]
    poster: Option<String>,
    #[serde(rename = "Runtime", default)]
    runtime: String,
    #[serde(rename = "imdbRating", default)]
    imdb_rating: String,
    #[serde(rename = "Plot", default)]
    plot: String,
    #[serde(rename = "Released", default)]
    released: String,
    #[serde(rename = "Actors", default)]
    actors: String,
    #[serde(rename = "Director", default)]
    director: String,
    #[serde(rename = "Genre", default)]
    genre: String,
}

fn is_true(response: &str) -> bool {
    response.trim().eq_ignore_ascii_case("true")
}

/// OMDb uses "N/A" for every missing field
fn present(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty() && !v.eq_ignore_ascii_case("N/A"))
}

/// "148 min" -> 148
pub fn parse_runtime_minutes(runtime: &str) -> Option<u32> {
    runtime.split_whitespace().next()?.parse().ok()
}

/// "8.2" -> 8.2, "N/A" -> None
pub fn parse_imdb_rating(rating: &str) -> Option<f64> {
    rating.trim().parse::<f64>().ok().filter(|r| r.is_finite())
}

pub fn parse_search_payload(body: &str) -> Result<Vec<MovieSummary>, MetadataError> {
    let parsed: OmdbSearchResponse = serde_json::from_str(body)
        .map_err(|e| MetadataError::Transport(format!("invalid search payload: {}", e)))?;

    if !is_true(&parsed.response) {
        let reason = parsed.error.unwrap_or_else(|| "Movie not found!".to_string());
        return Err(MetadataError::NotFound(reason));
    }

    Ok(parsed
        .search
        .into_iter()
        .map(|item| MovieSummary {
            id: item.imdb_id,
            title: item.title,
            year: item.year,
            poster_url: present(item.poster),
        })
        .collect())
}

pub fn parse_details_payload(body: &str) -> Result<MovieDetails, MetadataError> {
    let parsed: OmdbDetailsResponse = serde_json::from_str(body)
        .map_err(|e| MetadataError::Transport(format!("invalid details payload: {}", e)))?;

    if !is_true(&parsed.response) {
        let reason = parsed.error.unwrap_or_else(|| "Incorrect IMDb ID.".to_string());
        return Err(MetadataError::NotFound(reason));
    }

    Ok(MovieDetails {
        runtime_minutes: parse_runtime_minutes(&parsed.runtime),
        imdb_rating: parse_imdb_rating(&parsed.imdb_rating),
        id: parsed.imdb_id,
        title: parsed.title,
        year: parsed.year,
        poster_url: present(parsed.poster),
        plot: parsed.plot,
        released: parsed.released,
        actors: parsed.actors,
        director: parsed.director,
        genre: parsed.genre,
    })
}

async fn fetch_body(request: RequestBuilder, what: &str) -> Result<String, MetadataError> {
    let response = request.send().await?;

    if !response.status().is_success() {
        let status = response.status();
        warn!(status = %status, "OMDb {} request failed", what);
        return Err(MetadataError::Transport(format!("{} request failed with status {}", what, status)));
    }

    Ok(response.text().await?)
}

/// `GET <base>?apikey=<key>&s=<query>`
pub async fn search_movies(
    client: &Client,
    base_url: &str,
    api_key: &str,
    query: &str,
) -> Result<Vec<MovieSummary>, MetadataError> {
    debug!(query = %query, "Searching OMDb");
    let request = client
        .get(base_url)
        .query(&[("apikey", api_key), ("s", query)])
        .header("Accept", "application/json");

    let body = fetch_body(request, "search").await?;
    let movies = parse_search_payload(&body)?;
    debug!(query = %query, count = movies.len(), "OMDb search returned");
    Ok(movies)
}

/// `GET <base>?apikey=<key>&i=<id>`
pub async fn get_movie(
    client: &Client,
    base_url: &str,
    api_key: &str,
    id: &str,
) -> Result<MovieDetails, MetadataError> {
    debug!(id = %id, "Fetching OMDb details");
    let request = client
        .get(base_url)
        .query(&[("apikey", api_key), ("i", id)])
        .header("Accept", "application/json");

    let body = fetch_body(request, "details").await?;
    parse_details_payload(&body)
}
