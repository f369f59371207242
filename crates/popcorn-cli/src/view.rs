//! Text renderers for the interactive session and one-shot commands.
//!
//! Everything here returns a `String` so callers decide where it goes.

use comfy_table::{presets, modifiers, Attribute, Cell, Color, Table};
use owo_colors::OwoColorize;
use popcorn_core::{DetailState, Snapshot};
use popcorn_models::{MovieDetails, MovieSummary, WatchedMovie, WatchlistSummary};

fn table() -> Table {
    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL);
    table.apply_modifier(modifiers::UTF8_ROUND_CORNERS);
    table
}

fn header(title: &str) -> Cell {
    Cell::new(title).fg(Color::Cyan).add_attribute(Attribute::Bold)
}

pub fn num_results(count: usize) -> String {
    format!("Found {} results", count.bold())
}

pub fn movie_list(movies: &[MovieSummary], selected_id: Option<&str>) -> String {
    let mut table = table();
    table.set_header(vec![header("#"), header("Title"), header("Year"), header("IMDb id")]);

    for (index, movie) in movies.iter().enumerate() {
        let mut title = Cell::new(&movie.title);
        if selected_id == Some(movie.id.as_str()) {
            title = title.fg(Color::Yellow).add_attribute(Attribute::Bold);
        }
        table.add_row(vec![
            Cell::new(index + 1),
            title,
            Cell::new(&movie.year),
            Cell::new(&movie.id),
        ]);
    }

    table.to_string()
}

/// Detail panel for one movie. `user_rating` is set when it is already watched.
pub fn detail_panel(details: &MovieDetails, user_rating: Option<u8>) -> String {
    let mut out = String::new();
    out.push_str(&format!("{} ({})\n", details.title.bright_cyan().bold(), details.year));

    let mut table = table();
    table.add_row(vec![Cell::new("Released"), Cell::new(&details.released)]);
    table.add_row(vec![
        Cell::new("Runtime"),
        Cell::new(
            details
                .runtime_minutes
                .map(|m| format!("{} min", m))
                .unwrap_or_else(|| "N/A".to_string()),
        ),
    ]);
    table.add_row(vec![Cell::new("Genre"), Cell::new(&details.genre)]);
    table.add_row(vec![
        Cell::new("IMDb rating"),
        Cell::new(
            details
                .imdb_rating
                .map(|r| format!("⭐ {}", r))
                .unwrap_or_else(|| "N/A".to_string()),
        ),
    ]);
    table.add_row(vec![Cell::new("Director"), Cell::new(&details.director)]);
    table.add_row(vec![Cell::new("Starring"), Cell::new(&details.actors)]);
    out.push_str(&table.to_string());
    out.push('\n');

    if !details.plot.is_empty() {
        out.push_str(&format!("{}\n", details.plot.italic()));
    }

    match user_rating {
        Some(rating) => out.push_str(&format!("You rated this movie {} ⭐", rating)),
        None => out.push_str(&format!("{}", "Rate it with :add <1-10> to add it to your watched list".dimmed())),
    }

    out
}

pub fn watched_summary(summary: &WatchlistSummary) -> String {
    format!(
        "{}\n#️⃣ {} movies  ⭐ {:.2}  🌟 {:.2}  ⏳ {:.0} min",
        "Movies you watched".bright_white().bold(),
        summary.count,
        summary.avg_imdb_rating,
        summary.avg_user_rating,
        summary.avg_runtime_minutes,
    )
}

pub fn watched_list(movies: &[WatchedMovie]) -> String {
    if movies.is_empty() {
        return "Nothing watched yet".dimmed().to_string();
    }

    let mut table = table();
    table.set_header(vec![
        header("#"),
        header("Title"),
        header("IMDb"),
        header("Yours"),
        header("Runtime"),
    ]);
    for (index, movie) in movies.iter().enumerate() {
        table.add_row(vec![
            Cell::new(index + 1),
            Cell::new(&movie.movie.title),
            Cell::new(format!("⭐ {}", movie.imdb_rating)),
            Cell::new(format!("🌟 {}", movie.user_rating)),
            Cell::new(format!("⏳ {} min", movie.runtime_minutes)),
        ]);
    }
    table.to_string()
}

/// Whole session screen: results on top, then either the open movie or the watched list.
pub fn screen(snapshot: &Snapshot) -> String {
    let mut sections = Vec::new();

    if !snapshot.query.is_empty() {
        sections.push(format!("🍿 {}", snapshot.query.bold()));
    }

    if snapshot.is_loading {
        sections.push("Loading...".yellow().to_string());
    } else if let Some(error) = &snapshot.error {
        sections.push(format!("⛔ {}", error.red()));
    } else if !snapshot.movies.is_empty() {
        sections.push(num_results(snapshot.movies.len()));
        sections.push(movie_list(&snapshot.movies, snapshot.selected_id.as_deref()));
    }

    match &snapshot.details {
        DetailState::Closed => {
            sections.push(watched_summary(&snapshot.summary));
            sections.push(watched_list(&snapshot.watched));
        }
        DetailState::Loading { .. } => sections.push("Loading...".yellow().to_string()),
        DetailState::Loaded { details } => sections.push(detail_panel(details, snapshot.selected_user_rating)),
        DetailState::Error { message, .. } => sections.push(format!("⛔ {}", message.red())),
    }

    sections.join("\n\n")
}

pub fn help() -> String {
    let mut table = table();
    table.set_header(vec![header("Command"), header("What it does")]);
    for (command, what) in [
        ("<text>", "Search for titles (at least 3 characters)"),
        (":select <n|id>", "Open a result, or close it if already open"),
        (":close", "Close the open movie"),
        (":add <1-10>", "Add the open movie to the watched list with your rating"),
        (":delete <n|id>", "Remove a movie from the watched list"),
        (":watched", "Show the watched list"),
        (":help", "Show this help"),
        (":quit", "Leave the session"),
    ] {
        table.add_row(vec![Cell::new(command), Cell::new(what)]);
    }
    table.to_string()
}
