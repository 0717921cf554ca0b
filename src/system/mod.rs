//! # System Interaction Layer
//!
//! The boundary between the configuration core and the operating system.
//!
//! ## Modules
//!
//! - **`executor`**: Spawns the wrapped tool as a foreground child process,
//!   with sudo, the task environment and `Ctrl+C` cancellation. Also captures
//!   the tool's output for probing.
//! - **`compose`**: Reads the wrapped tool's usage text to discover its
//!   subcommands.
//! - **`shell`**: The interactive command loop and its command table.

/// Subcommand discovery from the wrapped tool's usage text.
pub mod compose;
/// Spawning the wrapped tool.
pub mod executor;
/// The interactive shell.
pub mod shell;
