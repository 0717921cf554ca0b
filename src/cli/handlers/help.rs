// src/cli/handlers/help.rs

use anyhow::Result;
use colored::Colorize;
use std::io::{self, Write};

use super::commons;
use crate::{CancellationToken, models::CliFlags, models::Settings, system::shell};

/// Prints the commands screen.
pub fn handle(flags: &CliFlags, cancellation_token: &CancellationToken) -> Result<()> {
    let mut settings = commons::load_settings(flags)?;
    commons::prepare_executor(&mut settings, cancellation_token)?;
    render(&settings, &mut io::stdout().lock())?;
    Ok(())
}

/// Renders the commands screen: built-ins, tasks and wrapped subcommands.
pub fn render(settings: &Settings, out: &mut dyn Write) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "{}", "DCSH Shell Commands".white().bold().underline())?;

    writeln!(out)?;
    writeln!(out, "{}", "Basic DCSH commands".white().bold())?;
    for (name, help) in shell::builtin_commands() {
        write!(out, "{}", format!("  {}: ", name).yellow())?;
        writeln!(out, "{}", help)?;
    }

    writeln!(out)?;
    if settings.tasks.is_empty() {
        writeln!(out, "No tasks are configured.")?;
    } else {
        writeln!(out, "{}", "User defined tasks".white().bold())?;
        for task in &settings.tasks {
            write!(out, "{}", format!("  {}", task.name).yellow())?;
            match &task.help {
                Some(help) => writeln!(out, ": {}", help)?,
                None => writeln!(out)?,
            }
        }
    }

    if !settings.dc_commands.is_empty() {
        writeln!(out)?;
        writeln!(out, "{}", "Docker-compose commands".white().bold())?;
        for command in &settings.dc_commands {
            write!(out, "{}", format!("  {}", command.name).yellow())?;
            writeln!(out, ": {}", command.help)?;
        }
    }
    writeln!(out)?;
    Ok(())
}
