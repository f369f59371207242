//! Interactive session: plain lines search, `:` lines act on results and the watched list.

use super::search::is_interactive;
use crate::output::Output;
use crate::view;
use color_eyre::eyre::eyre;
use color_eyre::Result;
use popcorn_config::Config;
use popcorn_core::{Intent, Session, Snapshot};
use popcorn_sources::OmdbClient;
use serde_json::json;
use std::io::Write;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Intent(Intent),
    Help,
    Watched,
    Quit,
}

/// Resolve `<n|id>`: a 1-based position in `ids`, or an id taken as is
fn resolve_target<'a>(arg: &str, mut ids: impl ExactSizeIterator<Item = &'a str>, what: &str) -> Result<String, String> {
    if arg.is_empty() {
        return Err(format!("Which {}? Give a number or an IMDb id", what));
    }

    match arg.parse::<usize>() {
        Ok(n) => {
            let len = ids.len();
            n.checked_sub(1)
                .and_then(|index| ids.nth(index))
                .map(str::to_string)
                .ok_or_else(|| format!("No {} #{} (there are {})", what, n, len))
        }
        Err(_) => Ok(arg.to_string()),
    }
}

pub fn parse_command(line: &str, snapshot: &Snapshot) -> Result<Command, String> {
    let Some(rest) = line.trim_start().strip_prefix(':') else {
        return Ok(Command::Intent(Intent::QueryChanged(line.to_string())));
    };

    let (name, arg) = match rest.trim().split_once(char::is_whitespace) {
        Some((name, arg)) => (name, arg.trim()),
        None => (rest.trim(), ""),
    };

    match name {
        "q" | "quit" => Ok(Command::Quit),
        "h" | "help" => Ok(Command::Help),
        "w" | "watched" => Ok(Command::Watched),
        "c" | "close" => Ok(Command::Intent(Intent::CloseMovie)),
        "s" | "select" => {
            let ids = snapshot.movies.iter().map(|m| m.id.as_str());
            resolve_target(arg, ids, "result").map(|id| Command::Intent(Intent::SelectMovie(id)))
        }
        "d" | "delete" => {
            let ids = snapshot.watched.iter().map(|m| m.id());
            resolve_target(arg, ids, "watched movie").map(|id| Command::Intent(Intent::DeleteWatched(id)))
        }
        "a" | "add" => arg
            .parse::<u8>()
            .map(|user_rating| Command::Intent(Intent::AddWatched { user_rating }))
            .map_err(|_| format!("Rating must be a number from 1 to 10, got '{}'", arg)),
        other => Err(format!("Unknown command ':{}' (try :help)", other)),
    }
}

fn render(snapshot: &Snapshot, output: &Output) {
    if output.is_human() && !output.is_quiet() && is_interactive() {
        print!("\x1B[2J\x1B[H");
    }
    output.emit(|| view::screen(snapshot), snapshot);
}

fn prompt(output: &Output) {
    if output.is_human() && !output.is_quiet() {
        print!("> ");
        let _ = std::io::stdout().flush();
    }
}

pub async fn run_browse(config: Config, output: &Output) -> Result<()> {
    let client = OmdbClient::from_config(&config.omdb).map_err(|e| eyre!("Failed to create OMDb client: {}", e))?;
    let (mut session, mut completions) = Session::new(Arc::new(client), config.search.min_query_len);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    info!(min_query_len = config.search.min_query_len, "Session started");
    render(&session.snapshot(), output);
    output.info("Type to search, :help for commands");
    prompt(output);

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                let snapshot = session.snapshot();

                match parse_command(&line, &snapshot) {
                    Ok(Command::Quit) => break,
                    Ok(Command::Help) => output.info(view::help()),
                    Ok(Command::Watched) => output.emit(
                        || format!("{}\n{}", view::watched_summary(&snapshot.summary), view::watched_list(&snapshot.watched)),
                        &json!({ "summary": snapshot.summary, "watched": snapshot.watched }),
                    ),
                    Ok(Command::Intent(intent)) => {
                        let result = session.dispatch(intent);
                        render(&session.snapshot(), output);
                        if let Err(e) = result {
                            output.warn(e.to_string());
                        }
                    }
                    Err(message) => output.warn(message),
                }
                prompt(output);
            }
            Some(completion) = completions.recv() => {
                if session.apply(completion) {
                    render(&session.snapshot(), output);
                    prompt(output);
                } else {
                    debug!("Completion discarded");
                }
            }
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    info!(watched = session.watchlist().len(), "Session ended");
    output.info("Bye! The watched list is not kept between sessions.");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use popcorn_core::DetailState;
    use popcorn_models::{MovieDetails, MovieSummary, WatchedMovie, WatchlistSummary};

    fn snapshot() -> Snapshot {
        let details = MovieDetails {
            id: "tt0096895".to_string(),
            title: "Batman".to_string(),
            year: "1989".to_string(),
            poster_url: None,
            runtime_minutes: Some(126),
            imdb_rating: Some(7.5),
            plot: String::new(),
            released: "23 Jun 1989".to_string(),
            actors: "Michael Keaton".to_string(),
            director: "Tim Burton".to_string(),
            genre: "Action".to_string(),
        };
        Snapshot {
            query: "batman".to_string(),
            movies: vec![
                MovieSummary {
                    id: "tt0372784".to_string(),
                    title: "Batman Begins".to_string(),
                    year: "2005".to_string(),
                    poster_url: None,
                },
                details.summary(),
            ],
            is_loading: false,
            error: None,
            selected_id: None,
            details: DetailState::Closed,
            selected_user_rating: None,
            watched: vec![WatchedMovie::from_details(&details, 8)],
            summary: WatchlistSummary::default(),
        }
    }

    #[test]
    fn test_plain_line_is_a_query() {
        assert_eq!(
            parse_command("the dark knight", &snapshot()),
            Ok(Command::Intent(Intent::QueryChanged("the dark knight".to_string())))
        );
    }

    #[test]
    fn test_select_by_position_and_id() {
        let snap = snapshot();
        assert_eq!(
            parse_command(":select 2", &snap),
            Ok(Command::Intent(Intent::SelectMovie("tt0096895".to_string())))
        );
        assert_eq!(
            parse_command(":s tt1234567", &snap),
            Ok(Command::Intent(Intent::SelectMovie("tt1234567".to_string())))
        );
        assert!(parse_command(":select 3", &snap).is_err());
        assert!(parse_command(":select 0", &snap).is_err());
        assert!(parse_command(":select", &snap).is_err());
    }

    #[test]
    fn test_delete_indexes_watched_list() {
        assert_eq!(
            parse_command(":delete 1", &snapshot()),
            Ok(Command::Intent(Intent::DeleteWatched("tt0096895".to_string())))
        );
    }

    #[test]
    fn test_add_parses_rating() {
        assert_eq!(
            parse_command(":add 9", &snapshot()),
            Ok(Command::Intent(Intent::AddWatched { user_rating: 9 }))
        );
        assert!(parse_command(":add great", &snapshot()).is_err());
    }

    #[test]
    fn test_simple_commands() {
        let snap = snapshot();
        assert_eq!(parse_command(":q", &snap), Ok(Command::Quit));
        assert_eq!(parse_command(":help", &snap), Ok(Command::Help));
        assert_eq!(parse_command(":watched", &snap), Ok(Command::Watched));
        assert_eq!(parse_command(" :close ", &snap), Ok(Command::Intent(Intent::CloseMovie)));
        assert!(parse_command(":launch", &snap).is_err());
    }
}
