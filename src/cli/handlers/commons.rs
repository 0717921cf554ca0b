// src/cli/handlers/commons.rs

use anyhow::{Context, Result};

use crate::{
    CancellationToken,
    core::config_loader::ConfigLoader,
    models::{CliFlags, Settings},
    system::{compose, executor::ComposeExecutor},
};

/// Loads the layered configuration from the standard locations.
pub fn load_settings(flags: &CliFlags) -> Result<Settings> {
    ConfigLoader::discover()
        .load(flags)
        .context("Failed to load the dcsh configuration")
}

/// Builds the executor for the wrapped tool and fills in its subcommands.
pub fn prepare_executor(
    settings: &mut Settings,
    cancellation_token: &CancellationToken,
) -> Result<ComposeExecutor> {
    let executor = ComposeExecutor::new(settings, cancellation_token.clone())
        .context("Failed to prepare the wrapped tool")?;
    settings.dc_commands = compose::probe_commands(&executor);
    Ok(executor)
}
