// src/system/compose.rs

// Discovers the wrapped tool's subcommands by reading its usage text.

use crate::{models::ComposeCommand, system::executor::ComposeExecutor};
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // An indented `name   help text` row of the command listing.
    static ref COMMAND_ROW_RE: Regex =
        Regex::new(r"^\s+([\w][\w-]*)\s+(\S.*?)\s*$").expect("command row pattern is valid");
}

const COMMANDS_HEADER: &str = "Commands:";

/// Parses the `Commands:` section of a usage text.
///
/// Rows are read from the line after the header up to the first blank line.
/// Rows that do not look like `name  help` are skipped. A name listed twice
/// keeps its first help text.
pub fn parse_help_output(text: &str) -> Vec<ComposeCommand> {
    let mut commands: Vec<ComposeCommand> = Vec::new();
    let rows = text
        .lines()
        .skip_while(|line| line.trim_end() != COMMANDS_HEADER)
        .skip(1)
        .take_while(|line| !line.trim().is_empty());

    for row in rows {
        let Some(caps) = COMMAND_ROW_RE.captures(row) else {
            log::debug!("Skipping unrecognized command row: {:?}", row);
            continue;
        };
        let (Some(name), Some(help)) = (caps.get(1), caps.get(2)) else {
            continue;
        };
        if commands.iter().any(|c| c.name == name.as_str()) {
            continue;
        }
        commands.push(ComposeCommand {
            name: name.as_str().to_string(),
            help: help.as_str().to_string(),
        });
    }
    commands
}

/// Runs the bare tool and parses its command listing.
///
/// A tool that cannot be started yields no commands; the shell still works
/// through `dc` and tasks.
pub fn probe_commands(executor: &ComposeExecutor) -> Vec<ComposeCommand> {
    match executor.capture_output() {
        Ok(text) => {
            let commands = parse_help_output(&text);
            log::debug!("Discovered {} wrapped commands", commands.len());
            commands
        }
        Err(e) => {
            log::warn!("Could not list wrapped commands: {}", e);
            Vec::new()
        }
    }
}
