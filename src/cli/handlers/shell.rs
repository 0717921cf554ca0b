// src/cli/handlers/shell.rs

use anyhow::{Context, Result};

use super::commons;
use crate::{CancellationToken, models::CliFlags, system::shell::DcShell};

/// Loads the configuration and runs the interactive shell.
pub fn handle(flags: &CliFlags, cancellation_token: &CancellationToken) -> Result<()> {
    let mut settings = commons::load_settings(flags)?;
    let executor = commons::prepare_executor(&mut settings, cancellation_token)?;

    log::debug!(
        "Starting shell with {} tasks and {} wrapped commands",
        settings.tasks.len(),
        settings.dc_commands.len()
    );
    DcShell::new(&settings, &executor)
        .cmdloop()
        .context("The shell session ended unexpectedly")
}
