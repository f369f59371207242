use clap::{ArgAction, Parser, Subcommand};
use commands::{browse, config, search};
use popcorn_config::PathManager;

mod commands;
mod logging;
mod output;
mod view;

#[derive(Parser)]
#[command(name = "popcorn")]
#[command(about = "popcorn - search movies and keep track of what you've watched")]
#[command(version)]
struct Cli {
    /// Enable verbose output (use multiple times for more verbosity: -v, -vv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Output format
    #[arg(long, global = true, default_value = "human", value_enum)]
    output: output::OutputFormat,

    /// OMDb API key to use instead of the one in the config file
    #[arg(long, global = true, value_name = "KEY")]
    api_key: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive search session (default)
    #[command(long_about = "Start an interactive session. Type to search, then use :select, :add, :delete and friends to manage the watched list. The watched list lives for the session only. Type :help inside the session for all commands.")]
    Browse,

    /// Search titles once and print the results
    Search {
        /// Search text (words are joined with spaces)
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,
    },

    /// Show the full record for one IMDb id
    Details {
        /// IMDb id, e.g. tt0372784
        id: String,
    },

    /// Manage configuration
    #[command(long_about = "View or change the configuration. Running without a subcommand shows the current configuration.")]
    Config {
        #[command(subcommand)]
        cmd: Option<ConfigCommands>,
    },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Show current configuration (masks the API key)
    Show {
        /// Show the API key unmasked
        #[arg(long, action = ArgAction::SetTrue)]
        full: bool,
    },

    /// Store the OMDb API key
    SetKey {
        /// OMDb API key (get one at https://www.omdbapi.com/apikey.aspx)
        key: String,
    },

    /// Write a config file with default settings
    Init {
        /// Overwrite an existing config file
        #[arg(long, action = ArgAction::SetTrue)]
        force: bool,
    },
}

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    let output = output::Output::new(cli.output, cli.quiet);

    match cli.command.unwrap_or(Commands::Browse) {
        Commands::Browse => {
            let config = config::load_config(cli.api_key.as_deref())?;

            // The session owns the terminal, so logs go to a file
            let log_file = config
                .logging
                .file
                .clone()
                .unwrap_or_else(|| PathManager::default().session_log_file());
            logging::init_logging_with_file(cli.verbose, cli.quiet, Some(log_file))
                .map_err(|e| color_eyre::eyre::eyre!("{}", e))?;

            browse::run_browse(config, &output).await
        }
        Commands::Search { query } => {
            logging::init_logging(cli.verbose, cli.quiet).map_err(|e| color_eyre::eyre::eyre!("{}", e))?;
            let config = config::load_config(cli.api_key.as_deref())?;
            search::run_search(&config, &query.join(" "), &output).await
        }
        Commands::Details { id } => {
            logging::init_logging(cli.verbose, cli.quiet).map_err(|e| color_eyre::eyre::eyre!("{}", e))?;
            let config = config::load_config(cli.api_key.as_deref())?;
            search::run_details(&config, &id, &output).await
        }
        Commands::Config { cmd } => {
            logging::init_logging(cli.verbose, cli.quiet).map_err(|e| color_eyre::eyre::eyre!("{}", e))?;
            config::run_config(cmd.unwrap_or(ConfigCommands::Show { full: false }), &output)
        }
    }
}
