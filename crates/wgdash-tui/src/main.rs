//! `wgdash` -- terminal dashboard for a wghttp-managed WireGuard
//! interface.
//!
//! Built on [ratatui](https://ratatui.rs) with reactive data from
//! `wgdash-core`'s [`ClientStream`](wgdash_core::ClientStream). One
//! screen: the clients table with its usage bars, plus inputs for the
//! usage ceiling and for creating clients.
//!
//! Logs are written to a file (default `/tmp/wgdash.log`) to avoid
//! corrupting the terminal UI. A background data bridge task streams
//! store snapshots from the controller into the TUI action loop.
//!
//! Entry point: CLI argument parsing, tracing setup, panic hooks, and
//! app launch.

mod action;
mod app;
mod component;
mod components;
mod data_bridge;
mod download;
mod event;
mod format;
mod theme;
mod tui;

use std::path::PathBuf;

use clap::Parser;
use color_eyre::eyre::Result;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};
use wgdash_core::Controller;

use crate::app::App;

/// Terminal dashboard for managing WireGuard peers through a wghttp
/// backend.
#[derive(Parser, Debug)]
#[command(name = "wgdash", version, about)]
struct Cli {
    /// wghttp base URL (e.g., http://localhost:3000); overrides the
    /// config file
    #[arg(short = 'u', long, env = "WGDASH_URL")]
    url: Option<String>,

    /// Config file path (defaults to the platform config directory)
    #[arg(short = 'c', long)]
    config: Option<PathBuf>,

    /// Usage ceiling in GB for the traffic bars; overrides the config
    /// file
    #[arg(long)]
    ceiling_gb: Option<f64>,

    /// Log file path (defaults to /tmp/wgdash.log)
    #[arg(long, default_value = "/tmp/wgdash.log")]
    log_file: PathBuf,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// Set up file-based tracing. We MUST NOT log to stdout/stderr --
/// that would corrupt the TUI output. Returns a guard that must be
/// held for the lifetime of the application to ensure logs are
/// flushed.
fn setup_tracing(cli: &Cli) -> WorkerGuard {
    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "wgdash={log_level},wgdash_core={log_level},wgdash_api={log_level}"
        ))
    });

    let log_dir = cli
        .log_file
        .parent()
        .unwrap_or(std::path::Path::new("/tmp"));
    let log_filename = cli
        .log_file
        .file_name()
        .unwrap_or(std::ffi::OsStr::new("wgdash.log"));

    let file_appender = tracing_appender::rolling::never(log_dir, log_filename);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_target(true)
                .with_thread_ids(true),
        )
        .init();

    guard
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Install panic/error hooks BEFORE entering the terminal
    tui::install_hooks()?;

    // Tracing to file -- hold the guard so logs flush on exit
    let _log_guard = setup_tracing(&cli);

    // Priority: CLI flags > environment > config file > defaults
    let mut config = match &cli.config {
        Some(path) => wgdash_config::load_config_from(path)?,
        None => wgdash_config::load_config()?,
    };
    if let Some(url) = cli.url {
        config.server.url = url;
    }
    if let Some(gb) = cli.ceiling_gb {
        config.ui.ceiling_gb = wgdash_config::validate_ceiling(gb)?;
    }

    info!(url = %config.server.url, "starting wgdash");

    let controller_config = wgdash_config::controller_config(&config)?;
    let controller = Controller::new(controller_config)?;

    App::new(controller, &config).run().await
}
