mod cli;
mod commands;
mod config;
mod error;
mod output;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Command};
use crate::error::CliError;

#[tokio::main]
async fn main() {
    // Parse CLI arguments
    let mut cli = Cli::parse();

    // Setup tracing based on verbosity
    init_tracing(cli.global.verbose);

    // Config `[defaults]` fill flags that were not given
    let cfg = config::load_config_or_default();
    config::apply_defaults(&mut cli.global, &cfg);

    // Dispatch and handle errors with proper exit codes
    if let Err(err) = run(cli, &cfg).await {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
}

fn init_tracing(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run(cli: Cli, cfg: &config::Config) -> Result<(), CliError> {
    match cli.command {
        // Config commands don't need the service
        Command::Config(args) => commands::config_cmd::handle(args, &cli.global),

        // Shell completions generation
        Command::Completions(args) => {
            use clap::CommandFactory;
            use clap_complete::generate;

            let mut cmd = Cli::command();
            generate(args.shell, &mut cmd, "roster", &mut std::io::stdout());
            Ok(())
        }

        // Everything else talks to the student service
        cmd => {
            let settings = config::resolve_settings(&cli.global, cfg)?;
            tracing::debug!(url = %settings.api_url, timeout = ?settings.timeout, "resolved service");
            let api = settings.connect()?;

            tracing::debug!(command = ?cmd, "dispatching command");
            commands::dispatch(cmd, api, &cli.global).await
        }
    }
}
