// src/cli/handlers/mod.rs

// One module per dcsh subcommand.

/// Steps shared by several handlers.
pub mod commons;
/// The `help` subcommand and screen.
pub mod help;
/// The `shell` subcommand.
pub mod shell;
/// The `show` subcommand and screen.
pub mod show;
