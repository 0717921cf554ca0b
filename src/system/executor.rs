// src/system/executor.rs

//! Foreground execution of the wrapped tool.

use crate::{CancellationToken, models::Settings};
use std::process::{Command as StdCommand, Stdio};
use std::sync::atomic::Ordering;
use std::time::Duration;
use thiserror::Error;

/// Represents failures to run the wrapped tool.
#[derive(Error, Debug)]
pub enum ExecutionError {
    /// `dc_path` is empty or has unbalanced quoting.
    #[error("The wrapped tool path '{0}' could not be parsed.")]
    InvalidToolPath(String),
    /// The argument vector was empty.
    #[error("No command specified to run.")]
    EmptyCommand,
    /// The process could not be started or waited on.
    #[error("Command '{command}' could not be executed: {source}")]
    SpawnFailed {
        /// The command line, as displayed.
        command: String,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The process exited unsuccessfully.
    #[error("Command '{command}' exited with a non-zero status.")]
    NonZeroExitStatus {
        /// The command line, as displayed.
        command: String,
        /// The exit code, if the process was not killed by a signal.
        code: Option<i32>,
    },
    /// Ctrl+C arrived while the process ran.
    #[error("Command '{command}' was interrupted.")]
    Interrupted {
        /// The command line, as displayed.
        command: String,
    },
}

/// Anything that can run the wrapped tool with a list of arguments.
pub trait ComposeRunner {
    /// Runs the wrapped tool in the foreground with `args` appended.
    fn run(&self, args: &[String]) -> Result<(), ExecutionError>;
}

/// Runs the wrapped tool as a direct child process, never through a shell.
#[derive(Debug, Clone)]
pub struct ComposeExecutor {
    /// The tokenized tool path.
    tool: Vec<String>,
    sudo: bool,
    environment: Vec<(String, String)>,
    debug: bool,
    cancellation_token: CancellationToken,
}

impl ComposeExecutor {
    /// Builds an executor from the settings. Fails if `dc_path` is empty or
    /// has unbalanced quoting.
    pub fn new(
        settings: &Settings,
        cancellation_token: CancellationToken,
    ) -> Result<Self, ExecutionError> {
        let tool = shlex::split(&settings.dc_path)
            .filter(|parts| !parts.is_empty())
            .ok_or_else(|| ExecutionError::InvalidToolPath(settings.dc_path.clone()))?;

        Ok(Self {
            tool,
            sudo: settings.sudo,
            environment: settings.environment.clone(),
            debug: settings.debug,
            cancellation_token,
        })
    }

    /// The full argument vector that `run(args)` would spawn: `sudo` when
    /// enabled, then the tool, then `args`.
    pub fn command_line(&self, args: &[String]) -> Vec<String> {
        let sudo = self.sudo.then(|| "sudo".to_string());
        sudo.into_iter()
            .chain(self.tool.iter().cloned())
            .chain(args.iter().cloned())
            .collect()
    }

    /// The argument vector used to list the tool's commands. Never prefixed
    /// with `sudo`: the probe has no terminal to ask for a password on.
    pub fn probe_command_line(&self) -> Vec<String> {
        self.tool.clone()
    }

    fn command(&self, argv: &[String]) -> Result<StdCommand, ExecutionError> {
        let (program, rest) = argv.split_first().ok_or(ExecutionError::EmptyCommand)?;
        let mut command = StdCommand::new(program);
        command
            .args(rest)
            .envs(self.environment.iter().map(|(k, v)| (k, v)));
        Ok(command)
    }

    /// Runs the bare tool and returns its combined stdout and stderr.
    ///
    /// The exit status is ignored: most tools print their usage and exit
    /// non-zero when called without a subcommand.
    pub fn capture_output(&self) -> Result<String, ExecutionError> {
        let argv = self.probe_command_line();
        let display = argv.join(" ");
        log::debug!("Probing: {}", display);

        let output = self
            .command(&argv)?
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .map_err(|e| ExecutionError::SpawnFailed {
                command: display,
                source: e,
            })?;

        let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
        text.push_str(&String::from_utf8_lossy(&output.stderr));
        Ok(text)
    }
}

impl ComposeRunner for ComposeExecutor {
    fn run(&self, args: &[String]) -> Result<(), ExecutionError> {
        let argv = self.command_line(args);
        let display = argv.join(" ");
        if self.debug {
            println!("Running: {:?}", argv);
        }
        log::debug!("Spawning: {}", display);

        // A stale interrupt from the prompt must not kill the new child.
        self.cancellation_token.store(false, Ordering::SeqCst);

        let mut child = self
            .command(&argv)?
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|e| {
                log::warn!("Failed to spawn '{}': {}", display, e);
                ExecutionError::SpawnFailed {
                    command: display.clone(),
                    source: e,
                }
            })?;

        // Non-blocking wait loop to allow for cancellation.
        loop {
            match child.try_wait() {
                Ok(Some(status)) => {
                    if self.cancellation_token.swap(false, Ordering::SeqCst) {
                        return Err(ExecutionError::Interrupted { command: display });
                    }
                    if !status.success() {
                        log::warn!("'{}' exited with {}", display, status);
                        return Err(ExecutionError::NonZeroExitStatus {
                            command: display,
                            code: status.code(),
                        });
                    }
                    return Ok(());
                }
                Ok(None) => {
                    if self.cancellation_token.swap(false, Ordering::SeqCst) {
                        log::debug!(
                            "Cancellation requested, killing child process (PID: {})...",
                            child.id()
                        );
                        if let Err(e) = child.kill() {
                            log::warn!("Failed to kill child process {}: {}", child.id(), e);
                        }
                        child.wait().ok();
                        return Err(ExecutionError::Interrupted { command: display });
                    }
                    std::thread::sleep(Duration::from_millis(50));
                }
                Err(e) => {
                    return Err(ExecutionError::SpawnFailed {
                        command: display,
                        source: e,
                    });
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::AtomicBool;

    fn executor(dc_path: &str, sudo: bool) -> ComposeExecutor {
        let settings = Settings {
            dc_path: dc_path.to_string(),
            sudo,
            environment: vec![("DCSH_TEST_VAR".to_string(), "42".to_string())],
            ..Default::default()
        };
        ComposeExecutor::new(&settings, Arc::new(AtomicBool::new(false))).unwrap()
    }

    fn args(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_command_line_prefixes_sudo_and_splits_tool_path() {
        let exec = executor("docker compose", true);
        assert_eq!(
            exec.command_line(&args(&["run", "web"])),
            vec!["sudo", "docker", "compose", "run", "web"]
        );

        let exec = executor("docker-compose", false);
        assert_eq!(exec.command_line(&args(&["ps"])), vec!["docker-compose", "ps"]);
    }

    #[test]
    fn test_probe_runs_without_sudo() {
        let exec = executor("docker-compose", true);
        assert_eq!(exec.probe_command_line(), vec!["docker-compose"]);
        assert_eq!(exec.command_line(&[]), vec!["sudo", "docker-compose"]);

        let exec = executor("docker compose", true);
        assert_eq!(exec.probe_command_line(), vec!["docker", "compose"]);
    }

    #[cfg(unix)]
    #[test]
    fn test_capture_output_ignores_sudo_mode() {
        let exec = executor("sh -c 'echo probed'", true);
        assert!(exec.capture_output().unwrap().contains("probed"));
    }

    #[test]
    fn test_invalid_tool_path_is_rejected() {
        let settings = Settings {
            dc_path: "'unterminated".to_string(),
            ..Default::default()
        };
        let result = ComposeExecutor::new(&settings, Arc::new(AtomicBool::new(false)));
        assert!(matches!(result, Err(ExecutionError::InvalidToolPath(_))));

        let settings = Settings {
            dc_path: "   ".to_string(),
            ..Default::default()
        };
        let result = ComposeExecutor::new(&settings, Arc::new(AtomicBool::new(false)));
        assert!(matches!(result, Err(ExecutionError::InvalidToolPath(_))));
    }

    #[cfg(unix)]
    #[test]
    fn test_run_reports_exit_status() {
        let exec = executor("sh -c", false);
        assert!(exec.run(&args(&["exit 0"])).is_ok());
        assert!(matches!(
            exec.run(&args(&["exit 3"])),
            Err(ExecutionError::NonZeroExitStatus { code: Some(3), .. })
        ));
    }

    #[cfg(unix)]
    #[test]
    fn test_run_passes_environment() {
        let exec = executor("sh -c", false);
        assert!(exec.run(&args(&["test \"$DCSH_TEST_VAR\" = 42"])).is_ok());
    }

    #[cfg(unix)]
    #[test]
    fn test_capture_output_combines_streams_and_ignores_status() {
        let exec = executor("sh -c 'echo out; echo err >&2; exit 1'", false);
        let text = exec.capture_output().unwrap();
        assert!(text.contains("out"));
        assert!(text.contains("err"));
    }

    #[test]
    fn test_missing_program_fails_to_spawn() {
        let exec = executor("dcsh-definitely-not-a-real-binary", false);
        assert!(matches!(
            exec.run(&[]),
            Err(ExecutionError::SpawnFailed { .. })
        ));
    }
}
