// ABOUTME: Main entry point for the bl command-line client
// ABOUTME: Sets up logging and color, dispatches the command and renders failures

use backlog_cli::cli::Cli;
use backlog_cli::cli_output::CliOutput;
use backlog_cli::commands::{self, Context};
use backlog_cli::config::ConfigStore;
use backlog_sdk::BacklogError;
use clap::Parser;
use std::env;
use std::io::IsTerminal;
use std::process::ExitCode;

fn init_logging(verbose: bool) {
    // RUST_LOG takes precedence over --verbose
    let default_level = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .init();
}

fn use_color(cli: &Cli) -> bool {
    if cli.force_color {
        return true;
    }
    !cli.no_color
        && env::var_os("NO_COLOR").is_none()
        && env::var("TERM").unwrap_or_default() != "dumb"
        && std::io::stdout().is_terminal()
}

/// Print a failure without leaking request details
fn report(output: &CliOutput, err: &anyhow::Error) {
    let Some(backlog_err) = err.downcast_ref::<BacklogError>() else {
        output.error(&format!("{:#}", err));
        return;
    };

    match backlog_err {
        BacklogError::Network(_) | BacklogError::Timeout => {
            log::debug!("Transport failure: {}", backlog_err);
            output.error("Could not reach Backlog");
        }
        BacklogError::InvalidResponse(_) => {
            log::debug!("Decode failure: {}", backlog_err);
            output.error("Backlog sent a response that could not be read");
        }
        _ => output.error(&backlog_err.to_string()),
    }

    if let Some(help) = backlog_err.help_text() {
        output.hint(help);
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let use_color = use_color(&cli);
    let store = match ConfigStore::from_env() {
        Ok(store) => store,
        Err(err) => {
            report(&CliOutput::with_color(use_color), &err);
            return ExitCode::FAILURE;
        }
    };
    log::debug!("Using config at {}", store.path().display());

    let ctx = Context::new(store, use_color);
    match commands::run(&ctx, cli.command).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            report(ctx.output(), &err);
            ExitCode::FAILURE
        }
    }
}
