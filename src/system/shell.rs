// src/system/shell.rs

//! The interactive dcsh shell.
//!
//! Commands are resolved through an explicit table built once from the
//! settings: built-ins from a static registry, one entry per probed subcommand
//! of the wrapped tool and one entry per compiled task. Precedence on name
//! collisions is built-in, then task, then wrapped subcommand.

use crate::{
    cli::handlers::{help, show},
    models::Settings,
    system::executor::{ComposeRunner, ExecutionError},
};
use colored::Colorize;
use dialoguer::{Input, theme::Theme};
use std::{
    collections::BTreeMap,
    fmt,
    io::{self, BufRead, IsTerminal, Write},
};
use thiserror::Error;

/// Represents I/O failures of the shell itself.
#[derive(Error, Debug)]
pub enum ShellError {
    /// Writing output failed.
    #[error("Could not write shell output: {0}")]
    Io(#[from] io::Error),
    /// The terminal prompt failed.
    #[error("Could not read input: {0}")]
    Input(#[from] dialoguer::Error),
}

/// Whether the loop keeps reading after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Read the next line.
    Continue,
    /// Leave the loop.
    Exit,
}

type BuiltinHandler = fn(&DcShell<'_>, &[String], &mut dyn Write) -> Result<Flow, ShellError>;

// --- Built-in Command Registry ---

/// Defines a built-in command, its aliases, its help line and its handler.
#[derive(Debug)]
struct BuiltinDefinition {
    name: &'static str,
    aliases: &'static [&'static str],
    help: &'static str,
    handler: BuiltinHandler,
}

static BUILTIN_REGISTRY: &[BuiltinDefinition] = &[
    BuiltinDefinition {
        name: "help",
        aliases: &[],
        help: "This help screen",
        handler: do_help,
    },
    BuiltinDefinition {
        name: "show",
        aliases: &[],
        help: "Displays DCSH configuration details",
        handler: do_show,
    },
    BuiltinDefinition {
        name: "exit",
        aliases: &["quit"],
        help: "Exits the shell",
        handler: do_exit,
    },
    BuiltinDefinition {
        name: "dc",
        aliases: &[],
        help: "Runs docker-compose",
        handler: do_dc,
    },
    BuiltinDefinition {
        name: "build",
        aliases: &[],
        help: "Builds all services or specified services",
        handler: do_build,
    },
];

/// Names and help lines of the built-in commands, in registry order.
pub fn builtin_commands() -> impl Iterator<Item = (&'static str, &'static str)> {
    BUILTIN_REGISTRY.iter().map(|def| (def.name, def.help))
}

fn do_help(shell: &DcShell<'_>, _args: &[String], out: &mut dyn Write) -> Result<Flow, ShellError> {
    help::render(shell.settings, out)?;
    Ok(Flow::Continue)
}

fn do_show(shell: &DcShell<'_>, _args: &[String], out: &mut dyn Write) -> Result<Flow, ShellError> {
    show::render(shell.settings, out)?;
    Ok(Flow::Continue)
}

fn do_exit(_shell: &DcShell<'_>, _args: &[String], _out: &mut dyn Write) -> Result<Flow, ShellError> {
    Ok(Flow::Exit)
}

fn do_dc(shell: &DcShell<'_>, args: &[String], out: &mut dyn Write) -> Result<Flow, ShellError> {
    shell.run(args, out)
}

fn do_build(shell: &DcShell<'_>, args: &[String], out: &mut dyn Write) -> Result<Flow, ShellError> {
    let argv: Vec<String> = std::iter::once("build".to_string())
        .chain(args.iter().cloned())
        .collect();
    shell.run(&argv, out)
}

#[derive(Debug, Clone)]
enum Handler {
    Builtin(&'static BuiltinDefinition),
    Compose { subcommand: String },
    Task { compiled_args: Vec<String> },
}

// --- Line Input ---

/// One read from the input source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadOutcome {
    /// A line, without its terminator.
    Line(String),
    /// Ctrl+C while reading.
    Interrupted,
    /// No more input.
    Eof,
}

/// A source of command lines for the loop.
pub trait LineReader {
    /// Reads the next line, blocking until one is available.
    fn read_line(&mut self) -> Result<ReadOutcome, ShellError>;
}

/// Renders the prompt verbatim followed by a space.
#[derive(Debug, Default)]
struct PromptTheme;

impl Theme for PromptTheme {
    fn format_input_prompt(
        &self,
        f: &mut dyn fmt::Write,
        prompt: &str,
        _default: Option<&str>,
    ) -> fmt::Result {
        write!(f, "{} ", prompt)
    }

    fn format_input_prompt_selection(
        &self,
        f: &mut dyn fmt::Write,
        prompt: &str,
        sel: &str,
    ) -> fmt::Result {
        write!(f, "{} {}", prompt, sel)
    }
}

/// Reads lines from an interactive terminal.
#[derive(Debug)]
pub struct TerminalReader {
    prompt: String,
    theme: PromptTheme,
}

impl TerminalReader {
    /// A reader that shows `prompt` before every line.
    pub fn new(prompt: String) -> Self {
        Self {
            prompt,
            theme: PromptTheme,
        }
    }
}

impl LineReader for TerminalReader {
    fn read_line(&mut self) -> Result<ReadOutcome, ShellError> {
        let result = Input::<String>::with_theme(&self.theme)
            .with_prompt(&self.prompt)
            .allow_empty(true)
            .interact_text();
        match result {
            Ok(line) => Ok(ReadOutcome::Line(line)),
            Err(dialoguer::Error::IO(e)) if e.kind() == io::ErrorKind::Interrupted => {
                Ok(ReadOutcome::Interrupted)
            }
            Err(dialoguer::Error::IO(e)) if e.kind() == io::ErrorKind::UnexpectedEof => {
                Ok(ReadOutcome::Eof)
            }
            Err(e) => Err(e.into()),
        }
    }
}

/// Reads lines from any buffered source, such as piped stdin. No prompt.
#[derive(Debug)]
pub struct BufferedReader<R> {
    inner: R,
}

impl<R: BufRead> BufferedReader<R> {
    /// Wraps a buffered source.
    pub fn new(inner: R) -> Self {
        Self { inner }
    }
}

impl<R: BufRead> LineReader for BufferedReader<R> {
    fn read_line(&mut self) -> Result<ReadOutcome, ShellError> {
        let mut buf = String::new();
        match self.inner.read_line(&mut buf) {
            Ok(0) => Ok(ReadOutcome::Eof),
            Ok(_) => Ok(ReadOutcome::Line(
                buf.trim_end_matches(['\n', '\r']).to_string(),
            )),
            Err(e) if e.kind() == io::ErrorKind::Interrupted => Ok(ReadOutcome::Interrupted),
            Err(e) => Err(e.into()),
        }
    }
}

// --- Shell ---

/// The interactive shell over a settings value and a runner.
pub struct DcShell<'a> {
    settings: &'a Settings,
    runner: &'a dyn ComposeRunner,
    commands: BTreeMap<String, Handler>,
}

impl fmt::Debug for DcShell<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DcShell")
            .field("commands", &self.commands)
            .finish_non_exhaustive()
    }
}

impl<'a> DcShell<'a> {
    /// Builds the command table from the settings.
    pub fn new(settings: &'a Settings, runner: &'a dyn ComposeRunner) -> Self {
        let mut commands = BTreeMap::new();
        for command in &settings.dc_commands {
            commands.insert(
                command.name.clone(),
                Handler::Compose {
                    subcommand: command.name.clone(),
                },
            );
        }
        for task in &settings.tasks {
            commands.insert(
                task.name.clone(),
                Handler::Task {
                    compiled_args: task.compiled_args.clone(),
                },
            );
        }
        for def in BUILTIN_REGISTRY {
            for name in std::iter::once(&def.name).chain(def.aliases) {
                commands.insert((*name).to_string(), Handler::Builtin(def));
            }
        }
        Self {
            settings,
            runner,
            commands,
        }
    }

    /// Every command name the shell accepts, sorted.
    pub fn command_names(&self) -> impl Iterator<Item = &str> {
        self.commands.keys().map(String::as_str)
    }

    /// Interprets one input line.
    pub fn onecmd(&self, line: &str, out: &mut dyn Write) -> Result<Flow, ShellError> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(Flow::Continue);
        }
        let (name, rest) = match line.split_once(char::is_whitespace) {
            Some((name, rest)) => (name, rest.trim_start()),
            None => (line, ""),
        };

        let Some(handler) = self.commands.get(name) else {
            writeln!(out, "*** Unknown syntax: {}", line)?;
            return Ok(Flow::Continue);
        };
        let Some(trailing) = shlex::split(rest) else {
            writeln!(out, "{}: malformed arguments: {}", "Error".red().bold(), rest)?;
            return Ok(Flow::Continue);
        };
        log::debug!("Command '{}' with arguments {:?}", name, trailing);

        match handler {
            Handler::Builtin(def) => (def.handler)(self, &trailing, out),
            Handler::Compose { subcommand } => {
                let argv: Vec<String> = std::iter::once(subcommand.clone())
                    .chain(trailing)
                    .collect();
                self.run(&argv, out)
            }
            Handler::Task { compiled_args } => {
                let argv: Vec<String> = compiled_args.iter().cloned().chain(trailing).collect();
                self.run(&argv, out)
            }
        }
    }

    /// Runs the wrapped tool. Failures are reported and never end the shell.
    fn run(&self, args: &[String], out: &mut dyn Write) -> Result<Flow, ShellError> {
        match self.runner.run(args) {
            Ok(()) => {}
            Err(ExecutionError::Interrupted { .. }) => writeln!(out, "KeyboardInterrupt")?,
            Err(e) => writeln!(out, "{}: {}", "Error".red().bold(), e)?,
        }
        Ok(Flow::Continue)
    }

    /// Reads and runs commands until `exit` or end of input.
    ///
    /// On a terminal, prints the intro and reads through a prompt. Piped input
    /// is read line by line with neither.
    pub fn cmdloop(&self) -> Result<(), ShellError> {
        let mut stdout = io::stdout();
        if io::stdin().is_terminal() {
            writeln!(stdout, "{}", self.settings.intro)?;
            let mut reader = TerminalReader::new(self.settings.rendered_prompt());
            self.run_loop(&mut reader, &mut stdout)
        } else {
            let mut reader = BufferedReader::new(io::stdin().lock());
            self.run_loop(&mut reader, &mut stdout)
        }
    }

    /// The loop body of `cmdloop`, over any reader and writer.
    pub fn run_loop(
        &self,
        reader: &mut dyn LineReader,
        out: &mut dyn Write,
    ) -> Result<(), ShellError> {
        loop {
            match reader.read_line()? {
                ReadOutcome::Line(line) => {
                    if self.onecmd(&line, out)? == Flow::Exit {
                        writeln!(out, "Exiting DCSH")?;
                        break;
                    }
                }
                ReadOutcome::Interrupted => writeln!(out, "KeyboardInterrupt")?,
                ReadOutcome::Eof => break,
            }
            out.flush()?;
        }
        out.flush()?;
        Ok(())
    }
}
