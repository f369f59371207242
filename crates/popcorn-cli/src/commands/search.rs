use crate::output::Output;
use crate::view;
use color_eyre::eyre::eyre;
use color_eyre::Result;
use indicatif::{ProgressBar, ProgressStyle};
use popcorn_config::Config;
use popcorn_core::details::DETAILS_FAILED_MESSAGE;
use popcorn_core::search::{FETCH_FAILED_MESSAGE, NOT_FOUND_MESSAGE};
use popcorn_sources::{MetadataError, MetadataSource, OmdbClient};
use serde_json::json;
use std::future::Future;
use std::io::IsTerminal;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

pub fn is_interactive() -> bool {
    std::io::stdout().is_terminal() && std::io::stderr().is_terminal()
}

fn spinner(output: &Output, message: String) -> Option<ProgressBar> {
    if !is_interactive() || !output.is_human() || output.is_quiet() {
        return None;
    }

    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner()
        .template("{spinner:.green} {msg}")
        .map(|s| s.tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"))
    {
        spinner.set_style(style);
    }
    spinner.set_message(message);
    spinner.enable_steady_tick(Duration::from_millis(80));
    Some(spinner)
}

/// Run one request with a spinner, cancelling it on Ctrl-C
async fn fetch<T, F>(output: &Output, message: String, cancel: CancellationToken, request: F) -> Result<T, MetadataError>
where
    F: Future<Output = Result<T, MetadataError>>,
{
    let spinner = spinner(output, message);

    let watcher = cancel.clone();
    let ctrl_c = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            watcher.cancel();
        }
    });

    let result = request.await;
    ctrl_c.abort();
    if let Some(spinner) = spinner {
        spinner.finish_and_clear();
    }
    result
}

/// Turn a failed fetch into the user-facing message, logging the cause
fn failure_message(error: &MetadataError, fallback: &str) -> String {
    match error {
        MetadataError::NotFound(reason) => {
            info!(reason = %reason, "Lookup returned nothing");
            NOT_FOUND_MESSAGE.to_string()
        }
        MetadataError::Transport(cause) => {
            warn!(error = %cause, "Request failed");
            fallback.to_string()
        }
        MetadataError::Cancelled => "Cancelled".to_string(),
    }
}

pub async fn run_search(config: &Config, query: &str, output: &Output) -> Result<()> {
    let query = query.trim();
    if query.chars().count() < config.search.min_query_len {
        output.warn(format!(
            "Search text must be at least {} characters",
            config.search.min_query_len
        ));
        return Ok(());
    }

    let client = OmdbClient::from_config(&config.omdb).map_err(|e| eyre!("Failed to create OMDb client: {}", e))?;
    let cancel = CancellationToken::new();
    let result = fetch(
        output,
        format!("Searching for '{}'...", query),
        cancel.clone(),
        client.search(query, &cancel),
    )
    .await;

    match result {
        Ok(movies) => {
            info!(query = %query, results = movies.len(), source = client.source_name(), "Search finished");
            output.emit(
                || format!("{}\n{}", view::num_results(movies.len()), view::movie_list(&movies, None)),
                &json!({ "query": query, "count": movies.len(), "movies": movies }),
            );
            Ok(())
        }
        Err(MetadataError::Cancelled) => {
            output.warn("Search cancelled");
            Ok(())
        }
        Err(e) => Err(eyre!(failure_message(&e, FETCH_FAILED_MESSAGE))),
    }
}

pub async fn run_details(config: &Config, id: &str, output: &Output) -> Result<()> {
    let id = id.trim();
    if id.is_empty() {
        return Err(eyre!("IMDb id cannot be empty"));
    }

    let client = OmdbClient::from_config(&config.omdb).map_err(|e| eyre!("Failed to create OMDb client: {}", e))?;
    let cancel = CancellationToken::new();
    let result = fetch(output, format!("Fetching {}...", id), cancel.clone(), client.details(id, &cancel)).await;

    match result {
        Ok(details) => {
            output.emit(|| view::detail_panel(&details, None), &details);
            Ok(())
        }
        Err(MetadataError::Cancelled) => {
            output.warn("Request cancelled");
            Ok(())
        }
        Err(e) => Err(eyre!(failure_message(&e, DETAILS_FAILED_MESSAGE))),
    }
}
