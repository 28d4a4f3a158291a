//! `depot`: terminal dashboard for a file-hosting server.
//!
//! Two screens, navigable with number keys or Tab: **Files** lists hosted
//! files with download, upload and confirmed delete; **Network** shows
//! transfer totals, a rolling chart and connection history, refreshed on a
//! fixed poll interval while the screen is open.
//!
//! Logs are written to a file (default `/tmp/depot.log`) to avoid
//! corrupting the terminal UI.

mod action;
mod app;
mod component;
mod event;
mod screen;
mod screens;
mod theme;
mod tui;
mod widgets;

use std::path::{Path, PathBuf};

use clap::Parser;
use color_eyre::eyre::Result;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use depot_core::Session;

use crate::app::App;

const DEFAULT_LOG_FILE: &str = "/tmp/depot.log";

/// Terminal dashboard for browsing hosted files and watching transfer stats.
#[derive(Parser, Debug)]
#[command(name = "depot", version, about)]
struct Cli {
    /// Server root URL (e.g., http://127.0.0.1:5000)
    #[arg(short = 'u', long, env = "DEPOT_URL")]
    url: Option<String>,

    /// Config file path (defaults to the platform config directory)
    #[arg(short = 'c', long)]
    config: Option<PathBuf>,

    /// Directory downloads are saved to
    #[arg(long, env = "DEPOT_DOWNLOAD_DIR")]
    download_dir: Option<PathBuf>,

    /// Log file path (defaults to /tmp/depot.log)
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// Set up file-based tracing. Nothing may log to stdout/stderr while the
/// TUI owns the terminal. The returned guard flushes on drop.
fn setup_tracing(log_file: &Path, verbose: u8) -> WorkerGuard {
    let log_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "depot={log_level},depot_core={log_level},depot_api={log_level},depot_config={log_level}"
        ))
    });

    let log_dir = log_file.parent().unwrap_or(Path::new("/tmp"));
    let log_filename = log_file
        .file_name()
        .unwrap_or(std::ffi::OsStr::new("depot.log"));

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

/// Config file values with CLI overrides applied on top.
fn resolve_config(cli: &Cli) -> Result<depot_config::Config> {
    let mut config = match &cli.config {
        Some(path) => depot_config::load_config_from(path)?,
        None => depot_config::load_config()?,
    };
    if let Some(url) = &cli.url {
        config.server_url.clone_from(url);
    }
    if let Some(dir) = &cli.download_dir {
        config.download_dir.clone_from(dir);
    }
    if let Some(log_file) = &cli.log_file {
        config.log_file = Some(log_file.clone());
    }
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Install panic/error hooks BEFORE entering the terminal
    tui::install_hooks()?;

    let config = resolve_config(&cli)?;
    let log_file = config
        .log_file
        .clone()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_FILE));
    let _log_guard = setup_tracing(&log_file, cli.verbose);

    let dashboard = config.to_dashboard_config()?;
    info!(
        url = %dashboard.server_url,
        poll_ms = dashboard.poll_interval.as_millis(),
        "starting depot"
    );

    let session = Session::new(dashboard)?;
    let mut app = App::new(session);
    app.run().await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn cli_overrides_config_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "server_url = \"http://files.local:8080\"\ndownload_dir = \"/srv/in\"\n",
        )
        .expect("write config");

        let cli = Cli::parse_from([
            "depot",
            "--config",
            path.to_str().expect("utf-8 path"),
            "--download-dir",
            "/tmp/out",
        ]);
        let config = resolve_config(&cli).expect("config");
        assert_eq!(config.download_dir, PathBuf::from("/tmp/out"));
        if std::env::var_os("DEPOT_URL").is_none() && std::env::var_os("DEPOT_SERVER_URL").is_none() {
            assert_eq!(config.server_url, "http://files.local:8080");
        }
    }
}
