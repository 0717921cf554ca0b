// src/bin/dcsh.rs

use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use dcsh::{
    CancellationToken,
    cli::{Cli, Command, handlers},
};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// The main entry point of the `dcsh` application.
/// It sets up logging and colors, parses arguments, dispatches to the correct
/// handler, and performs centralized error handling.
fn main() {
    let cli = Cli::parse();
    init_logging(cli.debug);
    if cli.no_color {
        colored::control::set_override(false);
    }

    let cancellation_token: CancellationToken = Arc::new(AtomicBool::new(false));
    let handler_token = cancellation_token.clone();
    if let Err(e) = ctrlc::set_handler(move || handler_token.store(true, Ordering::SeqCst)) {
        log::warn!("Could not install the Ctrl+C handler: {}", e);
    }

    if let Err(e) = run_cli(cli, &cancellation_token) {
        eprintln!("{}: {:#}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

/// `RUST_LOG` wins; otherwise `warn`, or `debug` with `--debug`.
fn init_logging(debug: bool) {
    let default_filter = if debug { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();
}

fn run_cli(cli: Cli, cancellation_token: &CancellationToken) -> Result<()> {
    log::debug!("CLI args parsed: {:?}", cli);
    let flags = cli.flags();
    match cli.command() {
        Command::Shell => handlers::shell::handle(&flags, cancellation_token),
        Command::Show { raw } => handlers::show::handle(&flags, raw),
        Command::Help => handlers::help::handle(&flags, cancellation_token),
    }
}
