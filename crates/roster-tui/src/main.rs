//! `roster-tui`: terminal UI for the student roster.
//!
//! Built on [ratatui](https://ratatui.rs). One screen is mounted per route:
//! the student list, a student's details, and the add / edit form. Each
//! navigation mounts a fresh screen, and results of requests issued by a
//! screen that is no longer mounted are dropped.
//!
//! Logs are written to a file (default `/tmp/roster-tui.log`) so they never
//! corrupt the terminal.

mod action;
mod app;
mod component;
mod event;
mod screens;
mod theme;
mod tui;
mod widgets;

use std::path::PathBuf;

use clap::Parser;
use color_eyre::eyre::Result;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use roster_config::{ClientSettings, parse_api_url};
use roster_core::Route;

use crate::app::App;

/// Terminal UI for browsing and editing the student roster.
#[derive(Parser, Debug)]
#[command(name = "roster-tui", version, about)]
struct Cli {
    /// Screen to open first: /, /add-student, /student/<id>, /edit-student/<id>
    #[arg(default_value = "/")]
    route: Route,

    /// Config profile to use
    #[arg(short, long, env = "ROSTER_PROFILE")]
    profile: Option<String>,

    /// Service URL (overrides the profile)
    #[arg(short = 'u', long, env = "ROSTER_API_URL")]
    api_url: Option<String>,

    /// Log file path
    #[arg(long, default_value = "/tmp/roster-tui.log")]
    log_file: PathBuf,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// File-based tracing; stdout and stderr belong to the terminal UI. The
/// returned guard must live until exit so buffered lines are flushed.
fn setup_tracing(cli: &Cli) -> WorkerGuard {
    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "roster_tui={log_level},roster_core={log_level},roster_api={log_level}"
        ))
    });

    let log_dir = cli
        .log_file
        .parent()
        .unwrap_or(std::path::Path::new("/tmp"));
    let log_filename = cli
        .log_file
        .file_name()
        .unwrap_or(std::ffi::OsStr::new("roster-tui.log"));

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

/// Priority: `--api-url` > profile > built-in default service.
fn resolve_settings(cli: &Cli) -> Result<ClientSettings> {
    let cfg = roster_config::load_config_or_default();
    let mut settings = ClientSettings::resolve(&cfg, cli.profile.as_deref())?;
    if let Some(ref url) = cli.api_url {
        settings.api_url = parse_api_url(url)?;
    }
    Ok(settings)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    tui::install_hooks()?;
    let _log_guard = setup_tracing(&cli);

    let settings = resolve_settings(&cli)?;
    info!(url = %settings.api_url, route = %cli.route, "starting roster-tui");

    let api = settings.connect()?;
    let mut app = App::new(api, settings.api_url.to_string(), cli.route);
    app.run().await?;

    Ok(())
}
