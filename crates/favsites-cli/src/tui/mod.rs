//! favsites TUI
//!
//! Terminal interface for the bookmark collection.
//!
//! ## Layout
//!
//! - Top: name and link inputs with an Add/Edit button
//! - Middle: card grid, four cards per row
//! - Bottom: Prev/Next controls with a page indicator, then the status bar
//!
//! ## Keys
//!
//! Form (name/link focused):
//! - Tab / Shift+Tab: Cycle focus
//! - Enter: Next field, or submit from the link field
//! - Esc: Leave edit mode, clear the form and focus the grid
//!
//! Grid:
//! - h/j/k/l or arrows: Move between cards
//! - n / ] / PageDown: Next page
//! - p / [ / PageUp: Previous page
//! - Enter / o: Open link in browser
//! - e: Edit selected card
//! - d: Delete selected card (asks for confirmation)
//! - a / i / Tab: Focus the form
//! - ?: Help
//! - q: Quit

mod app;
mod keys;
mod ui;

use std::fs::File;
use std::io::stdout;
use std::time::Duration;

use anyhow::Result;
use crossterm::{
    event::{self, Event},
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use ratatui::prelude::*;
use tracing::info;
use tracing_subscriber::EnvFilter;

use favsites_core::{Config, PreviewLookup, Store};

use app::App;
use keys::{handle_key, KeyAction};

use crate::preview::lookup_from_config;

/// Run the TUI application
pub async fn run(config: Config) -> Result<()> {
    // Initialize TUI logging (file-based, only if FAVSITES_LOG is set)
    init_tui_logging(&config);

    let lookup = lookup_from_config(&config);
    let mut store = Store::open_with_config(config)?;

    // Setup terminal
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;

    let mut app = App::new(&store);

    let result = run_app(&mut terminal, &mut app, &mut store, lookup.as_ref()).await;

    // Restore terminal
    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;

    result
}

async fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    store: &mut Store,
    lookup: &dyn PreviewLookup,
) -> Result<()> {
    loop {
        app.check_status_timeout();

        terminal.draw(|frame| ui::draw(frame, app, store))?;

        tokio::time::sleep(Duration::from_millis(50)).await;

        // Check for terminal events (non-blocking)
        if !event::poll(Duration::from_millis(0))? {
            continue;
        }
        let Event::Key(key) = event::read()? else {
            continue;
        };

        if handle_key(app, store, key) == KeyAction::Submit {
            if app.form_is_valid() {
                // Show the loading indicator while the preview lookup runs
                app.is_loading = true;
                terminal.draw(|frame| ui::draw(frame, app, store))?;
            }
            app.submit(store, lookup).await;
            app.is_loading = false;
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}

/// Initialize logging for TUI mode
///
/// Only initializes if FAVSITES_LOG environment variable is set.
/// Logs to file (config.log_file or default {data_dir}/debug.log).
fn init_tui_logging(config: &Config) {
    let Ok(log_level) = std::env::var("FAVSITES_LOG") else {
        return;
    };

    let log_path = config.log_path();

    let log_file = match File::create(&log_path) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("Warning: Could not create log file {:?}: {}", log_path, e);
            return;
        }
    };

    let env_filter = EnvFilter::new(format!(
        "favsites_core={},favsites={}",
        log_level, log_level
    ));

    // Ignore error if already initialized
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_ansi(false)
        .with_writer(log_file)
        .try_init();

    info!("TUI logging initialized to {:?}", log_path);
}
