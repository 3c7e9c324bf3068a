// tiledeck - browse items and their lazily loaded data tabs in the terminal.
// Parses flags, loads config, sets up logging and runs the TUI.

mod app;
mod config;
mod error;
mod paths;
mod registry;
mod remote;
mod state;
mod ui;

use std::fs::{self, File};
use std::io;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use clap::Parser;
use crossterm::{
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::prelude::*;
use tracing::info;
use tracing_subscriber::EnvFilter;

use app::{App, SHUTDOWN_GRACE};
use config::{Config, Overrides};
use error::Result;
use remote::{HttpFetcher, RemoteClient};
use state::{Dispatcher, PanelStateManager};

#[derive(Parser)]
#[command(name = "tiledeck")]
#[command(about = "Browse items and their data tabs in the terminal")]
#[command(version)]
struct Cli {
    /// Path to a JSON config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Base URL of the data API
    #[arg(long, env = "TILEDECK_BASE_URL")]
    base_url: Option<String>,

    /// Per-request timeout in seconds
    #[arg(long, env = "TILEDECK_TIMEOUT_SECS")]
    timeout_secs: Option<u64>,

    /// Write logs to this file instead of the cache directory
    #[arg(long)]
    log_file: Option<PathBuf>,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let mut config = Config::load(cli.config.as_deref())?;
    config.apply_overrides(&Overrides {
        base_url: cli.base_url,
        timeout_secs: cli.timeout_secs,
        log_file: cli.log_file,
    });
    config.validate()?;

    init_logging(&config);
    info!(base_url = %config.base_url, "starting tiledeck");

    let client = RemoteClient::new(&config.base_url)?;
    let base_url = client.base_url().to_string();
    let fetcher = HttpFetcher::new(client)
        .with_timeout(config.timeout())
        .with_unknown_tab_delay(config.unknown_tab_delay());
    let dispatcher = Dispatcher::new(Arc::new(fetcher));
    let panels = PanelStateManager::new(config.registry());
    let mut app = App::new(config.items(), panels, dispatcher, base_url);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = app.run(&mut terminal);

    // Restore terminal even when the loop failed
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    app.shutdown(SHUTDOWN_GRACE).await;
    info!("tiledeck exited");
    result.map_err(Into::into)
}

/// Route tracing output to a log file. The TUI owns stdout, so logs never go there.
fn init_logging(config: &Config) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let file = config.log_path().and_then(|path| {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).ok()?;
        }
        File::create(&path).ok()
    });

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_target(false);

    // A second init (tests, embedding) is not an error worth surfacing
    let _ = match file {
        Some(file) => builder.with_writer(Mutex::new(file)).try_init(),
        None => builder.with_writer(io::sink).try_init(),
    };
}
