//! favsites CLI
//!
//! Command-line interface for favsites - a collection of favorite websites
//! with preview images.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use favsites_core::{Config, Store};

mod commands;
mod output;
mod preview;
mod prompt;
mod tui;

use output::{Output, OutputFormat};
use preview::lookup_from_config;

#[derive(Parser)]
#[command(name = "favsites")]
#[command(about = "favsites - Your favorite websites with preview images")]
#[command(version)]
#[command(propagate_version = true)]
struct Cli {
    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Quiet mode - minimal output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Use this config file instead of the default
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the TUI interface
    Tui,
    /// Add a bookmark (looks up its preview image)
    Add {
        /// Display name
        name: String,
        /// URL to save
        link: String,
    },
    /// List bookmarks one page at a time
    #[command(alias = "ls")]
    List {
        /// Page number (starts at 1)
        #[arg(short, long)]
        page: Option<usize>,
    },
    /// Show bookmark details
    Show {
        /// Bookmark ID (full UUID or prefix)
        id: String,
    },
    /// Edit a bookmark (prompts for values not given)
    Edit {
        /// Bookmark ID (full UUID or prefix)
        id: String,
        /// New name
        #[arg(short, long)]
        name: Option<String>,
        /// New link
        #[arg(short, long)]
        link: Option<String>,
    },
    /// Delete a bookmark
    #[command(alias = "rm")]
    Delete {
        /// Bookmark ID (full UUID or prefix)
        id: String,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Show or set configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },
}

#[derive(Subcommand, Clone)]
enum ConfigCommands {
    /// Show current configuration
    Show,
    /// Set a configuration value
    Set {
        /// Configuration key (data_dir, preview_endpoint, preview_api_key,
        /// preview_timeout_secs, page_size, log_file)
        key: String,
        /// Configuration value
        value: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let output = Output::new(OutputFormat::from_flags(cli.json, cli.quiet));
    let config_path = cli.config.as_ref();

    let command = match cli.command {
        // TUI is the default; it sets up its own file logging
        None | Some(Commands::Tui) => {
            let config = Config::load_with_cli_override(config_path)
                .context("Failed to load configuration")?;
            return tui::run(config).await;
        }
        Some(command) => command,
    };

    init_cli_logging();

    // Config commands don't need the store
    if let Commands::Config { command } = &command {
        return handle_config_command(command.clone(), config_path, &output);
    }

    let config =
        Config::load_with_cli_override(config_path).context("Failed to load configuration")?;
    let lookup = lookup_from_config(&config);
    let mut store = Store::open_with_config(config)?;

    match command {
        Commands::Add { name, link } => {
            commands::bookmark::add(&mut store, name, link, lookup.as_ref(), &output).await
        }
        Commands::List { page } => commands::bookmark::list(&store, page, &output),
        Commands::Show { id } => commands::bookmark::show(&store, id, &output),
        Commands::Edit { id, name, link } => {
            commands::bookmark::edit(&mut store, id, name, link, lookup.as_ref(), &output).await
        }
        Commands::Delete { id, yes } => commands::bookmark::delete(&mut store, id, yes, &output),
        Commands::Tui | Commands::Config { .. } => unreachable!(), // Handled above
    }
}

fn handle_config_command(
    command: Option<ConfigCommands>,
    config_path: Option<&PathBuf>,
    output: &Output,
) -> Result<()> {
    match command {
        Some(ConfigCommands::Show) | None => commands::config::show(config_path, output),
        Some(ConfigCommands::Set { key, value }) => {
            commands::config::set(key, value, config_path, output)
        }
    }
}

/// Initialize stderr logging for one-shot commands
///
/// Filter comes from FAVSITES_LOG, defaulting to warnings only.
fn init_cli_logging() {
    let env_filter =
        EnvFilter::try_from_env("FAVSITES_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
