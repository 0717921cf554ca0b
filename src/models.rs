// src/models.rs

use crate::core::defaults::{
    DEFAULT_DC_PATH, DEFAULT_DEBUG_PROMPT, DEFAULT_INTRO, DEFAULT_PROMPT, default_settings,
};
use colored::{Color, Colorize};
use serde::Deserialize;
use serde_yaml::Mapping;

/// Activation switches given on the command line.
///
/// `debug` and `sudo` only ever turn their setting on; a configuration file
/// that enables them cannot be switched off from the command line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CliFlags {
    /// `--debug`.
    pub debug: bool,
    /// `--sudo`.
    pub sudo: bool,
    /// `--no-color`.
    pub no_color: bool,
}

/// Selects the task schema and the leading subcommand keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskKind {
    /// Starts a new container.
    Run,
    /// Runs inside an already running container.
    Exec,
}

impl TaskKind {
    /// The subcommand of the wrapped tool for this kind.
    pub fn keyword(self) -> &'static str {
        match self {
            Self::Run => "run",
            Self::Exec => "exec",
        }
    }
}

/// A schema-normalized, compiled task.
#[derive(Debug, Clone, PartialEq)]
pub struct Task {
    /// The task name, which is also its shell command.
    pub name: String,
    /// Selects the schema and the leading keyword.
    pub kind: TaskKind,
    /// The service the task runs against.
    pub service: String,
    /// One-line help shown by the `help` screen.
    pub help: Option<String>,
    /// The normalized definition, including `compiled_args`.
    pub definition: Mapping,
    /// Keyword, flags, service and arguments, ready to append to the tool.
    pub compiled_args: Vec<String>,
}

impl Task {
    /// The full argument vector for one invocation, with the user's trailing
    /// arguments appended. The compiled arguments are never modified.
    pub fn invocation(&self, trailing: &[String]) -> Vec<String> {
        self.compiled_args
            .iter()
            .chain(trailing)
            .cloned()
            .collect()
    }
}

/// A subcommand of the wrapped tool, discovered from its help output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComposeCommand {
    /// The subcommand name.
    pub name: String,
    /// Its one-line help text.
    pub help: String,
}

/// The parts of a project descriptor (`docker-compose.yml`) that dcsh reads.
#[derive(Deserialize, Debug, Clone, Default)]
pub struct ProjectDescriptor {
    /// The `services` section, verbatim.
    #[serde(default)]
    pub services: Option<Mapping>,
    /// The embedded dcsh configuration layer.
    #[serde(default, rename = "x-dcsh")]
    pub embedded: Option<Mapping>,
}

/// The fully merged and compiled program settings.
///
/// Built once at startup and passed by reference to everything that needs it.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Compiled tasks, in declaration order.
    pub tasks: Vec<Task>,
    /// Variables passed to every invocation of the wrapped tool.
    pub environment: Vec<(String, String)>,
    /// The project descriptor's services.
    pub services: Mapping,
    /// Echo every command line before running it.
    pub debug: bool,
    /// Prefix every invocation with `sudo`.
    pub sudo: bool,
    /// Prompt text in normal mode.
    pub prompt: String,
    /// Prompt text in debug mode.
    pub debug_prompt: String,
    /// Color of the normal-mode prompt.
    pub prompt_color: Color,
    /// Color of the debug-mode prompt.
    pub debug_prompt_color: Color,
    /// Banner printed when an interactive shell starts.
    pub intro: String,
    /// Command line of the wrapped tool, after `~` and variable expansion.
    pub dc_path: String,
    /// Subcommands discovered from the wrapped tool's usage text.
    pub dc_commands: Vec<ComposeCommand>,
    /// False when `--no-color` was given.
    pub use_color: bool,
    /// The merged settings tree, with every task replaced by its compiled form.
    pub tree: Mapping,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            tasks: Vec::new(),
            environment: Vec::new(),
            services: Mapping::new(),
            debug: false,
            sudo: false,
            prompt: DEFAULT_PROMPT.to_string(),
            debug_prompt: DEFAULT_DEBUG_PROMPT.to_string(),
            prompt_color: Color::Yellow,
            debug_prompt_color: Color::Red,
            intro: DEFAULT_INTRO.to_string(),
            dc_path: DEFAULT_DC_PATH.to_string(),
            dc_commands: Vec::new(),
            use_color: true,
            tree: default_settings(),
        }
    }
}

impl Settings {
    /// Looks up a compiled task by name.
    pub fn task(&self, name: &str) -> Option<&Task> {
        self.tasks.iter().find(|task| task.name == name)
    }

    /// The prompt text for the current mode, colored when color is enabled.
    pub fn rendered_prompt(&self) -> String {
        let (text, color) = if self.debug {
            (&self.debug_prompt, self.debug_prompt_color)
        } else {
            (&self.prompt, self.prompt_color)
        };
        if self.use_color {
            text.color(color).to_string()
        } else {
            text.clone()
        }
    }
}
