//! dcsh: an interactive shell around docker-compose, with tasks defined in
//! layered YAML configuration.

use std::sync::Arc;
use std::sync::atomic::AtomicBool;

/// Set by the Ctrl+C handler; polled while a child process runs.
pub type CancellationToken = Arc<AtomicBool>;

/// Command-line surface: argument parsing and subcommand handlers.
pub mod cli;
/// File names, paths and keys shared across the crate.
pub mod constants;
/// Configuration merging and task compilation.
pub mod core;
/// Data types shared by the core and the shell.
pub mod models;
/// Process execution and the interactive shell.
pub mod system;
