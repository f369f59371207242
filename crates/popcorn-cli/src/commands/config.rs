use crate::output::{Output, OutputFormat};
use color_eyre::eyre::eyre;
use color_eyre::Result;
use comfy_table::{Attribute, Cell, Color, Table};
use owo_colors::OwoColorize;
use popcorn_config::{Config, PathManager, API_KEY_PLACEHOLDER};
use serde_json::json;
use std::path::PathBuf;

const MISSING_KEY_HINT: &str = "Run 'popcorn config set-key <KEY>' or pass --api-key";

pub fn run_config(cmd: crate::ConfigCommands, output: &Output) -> Result<()> {
    match cmd {
        crate::ConfigCommands::Show { full } => show_config(full, output),
        crate::ConfigCommands::SetKey { key } => set_key(&key, output),
        crate::ConfigCommands::Init { force } => init_config(force, output),
    }
}

/// Load the config for a command that talks to OMDb.
///
/// A missing file is fine as long as `--api-key` supplies the key.
pub fn load_config(api_key_override: Option<&str>) -> Result<Config> {
    let config_file = PathManager::default().config_file();
    let mut config = if config_file.exists() {
        Config::load_from_file(&config_file)
            .map_err(|e| eyre!("Failed to load config from {}: {}", config_file.display(), e))?
    } else {
        tracing::debug!(path = %config_file.display(), "No config file, using defaults");
        Config::default()
    };

    if let Some(key) = api_key_override {
        config.omdb.api_key = key.trim().to_string();
    }

    config.validate().map_err(|e| {
        if config.omdb.is_api_key_set() {
            eyre!("Invalid configuration in {}: {}", config_file.display(), e)
        } else {
            eyre!("No OMDb API key configured. {}", MISSING_KEY_HINT)
        }
    })?;

    Ok(config)
}

fn load_or_default(config_file: &PathBuf, output: &Output) -> Result<Config> {
    if config_file.exists() {
        Config::load_from_file(config_file)
            .map_err(|e| eyre!("Failed to load config from {}: {}", config_file.display(), e))
    } else {
        output.info("Configuration file not found. Creating default configuration...");
        Ok(Config::default())
    }
}

fn show_config(full: bool, output: &Output) -> Result<()> {
    let config_file = PathManager::default().config_file();

    if !config_file.exists() {
        output.warn(format!("Configuration file not found at: {}", config_file.display()));
        output.info("Create one with 'popcorn config init', then 'popcorn config set-key <KEY>'.");
        return Ok(());
    }

    let config = Config::load_from_file(&config_file)
        .map_err(|e| eyre!("Failed to load config from {}: {}", config_file.display(), e))?;

    let api_key = if full {
        config.omdb.api_key.clone()
    } else {
        mask_string(&config.omdb.api_key)
    };
    let log_file = config
        .logging
        .file
        .clone()
        .unwrap_or_else(|| PathManager::default().session_log_file());

    match output.format() {
        OutputFormat::Human => {
            if output.is_quiet() {
                return Ok(());
            }

            println!("\n{}\n", "Configuration".bright_cyan().bold());

            let mut table = Table::new();
            table.set_header(vec![
                Cell::new("Config File").add_attribute(Attribute::Bold),
                Cell::new(config_file.display().to_string()),
            ]);
            table.add_row(vec![Cell::new("OMDb API key").fg(Color::Cyan), Cell::new(&api_key)]);
            table.add_row(vec![Cell::new("OMDb base URL").fg(Color::Cyan), Cell::new(&config.omdb.base_url)]);
            table.add_row(vec![
                Cell::new("Request timeout").fg(Color::Cyan),
                Cell::new(format!("{} seconds", config.omdb.timeout_secs)),
            ]);
            table.add_row(vec![
                Cell::new("Minimum query length").fg(Color::Cyan),
                Cell::new(config.search.min_query_len),
            ]);
            table.add_row(vec![
                Cell::new("Session log").fg(Color::Cyan),
                Cell::new(log_file.display().to_string()),
            ]);
            table.load_preset(comfy_table::presets::UTF8_FULL);
            table.apply_modifier(comfy_table::modifiers::UTF8_ROUND_CORNERS);
            println!("{}", table);
        }
        OutputFormat::Json | OutputFormat::JsonPretty => {
            output.emit(String::new, &json!({
                "config_file": config_file.display().to_string(),
                "omdb": {
                    "api_key": api_key,
                    "base_url": config.omdb.base_url,
                    "timeout_secs": config.omdb.timeout_secs,
                },
                "search": {
                    "min_query_len": config.search.min_query_len,
                },
                "logging": {
                    "file": log_file.display().to_string(),
                },
            }));
        }
    }

    Ok(())
}

fn set_key(key: &str, output: &Output) -> Result<()> {
    let key = key.trim();
    if key.is_empty() || key == API_KEY_PLACEHOLDER {
        return Err(eyre!("API key cannot be empty"));
    }

    let path_manager = PathManager::default();
    path_manager
        .ensure_directories()
        .map_err(|e| eyre!("Failed to create configuration directories: {}", e))?;

    let config_file = path_manager.config_file();
    let mut config = load_or_default(&config_file, output)?;
    config.omdb.api_key = key.to_string();
    config
        .save_to_file(&config_file)
        .map_err(|e| eyre!("Failed to save config to {}: {}", config_file.display(), e))?;

    output.success(format!("OMDb API key saved to {}", config_file.display()));
    Ok(())
}

fn init_config(force: bool, output: &Output) -> Result<()> {
    let path_manager = PathManager::default();
    let config_file = path_manager.config_file();

    if config_file.exists() && !force {
        output.warn(format!("Configuration already exists at: {}", config_file.display()));
        output.info("Use --force to overwrite it.");
        return Ok(());
    }

    path_manager
        .ensure_directories()
        .map_err(|e| eyre!("Failed to create configuration directories: {}", e))?;
    Config::default()
        .save_to_file(&config_file)
        .map_err(|e| eyre!("Failed to save config to {}: {}", config_file.display(), e))?;

    output.success(format!("Configuration written to {}", config_file.display()));
    output.info("Next: store your OMDb key with 'popcorn config set-key <KEY>'.");
    Ok(())
}

fn mask_string(s: &str) -> String {
    if s.trim().is_empty() || s == API_KEY_PLACEHOLDER {
        return "<not set>".to_string();
    }
    let chars: Vec<char> = s.chars().collect();
    if chars.len() <= 4 {
        return "*".repeat(chars.len());
    }
    let head: String = chars[..2].iter().collect();
    let tail: String = chars[chars.len() - 2..].iter().collect();
    format!("{}***{}", head, tail)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_string() {
        assert_eq!(mask_string(""), "<not set>");
        assert_eq!(mask_string(API_KEY_PLACEHOLDER), "<not set>");
        assert_eq!(mask_string("abcd"), "****");
        assert_eq!(mask_string("f00dcafe"), "f0***fe");
    }
}
