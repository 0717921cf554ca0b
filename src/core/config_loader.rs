//! # Config Loader
//!
//! Discovers the configuration layers, merges them in precedence order and
//! produces the single `Settings` value the rest of the program runs on.
//!
//! Layers, lowest to highest precedence:
//!
//! 1. the system-wide file (`/etc/dcsh.yml`),
//! 2. the user's file (`~/.dcsh.yml`),
//! 3. the project-local file (`./.dcsh.yml`),
//! 4. the `x-dcsh` section of the project descriptor (`./docker-compose.yml`).
//!
//! A layer that is missing, unreadable or not valid YAML simply contributes
//! nothing. Errors found in the merged result (a malformed task, a section of
//! the wrong type) abort the whole load.

use crate::{
    constants::{
        COMPOSE_FILENAMES, EMBEDDED_SECTION, PROJECT_CONFIG_FILENAME, SYSTEM_CONFIG_ENV,
        SYSTEM_CONFIG_PATH, USER_CONFIG_ENV, USER_CONFIG_FILENAME,
    },
    core::{
        color,
        commons::{is_scalar, is_truthy, key, render_value, untagged},
        compiler::{self, CompilerError},
        defaults::{
            DEFAULT_DC_PATH, DEFAULT_DEBUG_PROMPT, DEFAULT_DEBUG_PROMPT_COLOR, DEFAULT_INTRO,
            DEFAULT_PROMPT, DEFAULT_PROMPT_COLOR, default_settings, settings_strategy,
            task_arg_map,
        },
        merge::with_strategy,
    },
    models::{CliFlags, ProjectDescriptor, Settings},
};
use colored::Color;
use serde_yaml::{Mapping, Value};
use std::{
    env, fs,
    path::{Path, PathBuf},
};
use thiserror::Error;

/// Represents errors that abort configuration loading.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// A task could not be compiled.
    #[error(transparent)]
    Compile(#[from] CompilerError),
    /// A top-level section has the wrong shape after merging.
    #[error("Configuration section '{section}' must be {expected}.")]
    InvalidSection {
        /// The offending top-level key.
        section: String,
        /// The shape it must have.
        expected: &'static str,
    },
    /// An environment variable value is not a scalar.
    #[error("Environment variable '{name}' must have a scalar value.")]
    InvalidEnvironmentValue {
        /// The variable name.
        name: String,
    },
    /// A prompt color is not a known color name.
    #[error("Unknown color '{name}' for '{section}'.")]
    UnknownColor {
        /// The setting holding the color.
        section: String,
        /// The unrecognized color name.
        name: String,
    },
}

/// Where each configuration layer is looked up.
#[derive(Debug, Clone, Default)]
pub struct ConfigPaths {
    /// The system-wide layer.
    pub system: Option<PathBuf>,
    /// The user's layer.
    pub user: Option<PathBuf>,
    /// The project-local layer.
    pub project: Option<PathBuf>,
    /// Candidate project descriptors; the first one that exists is used.
    pub descriptors: Vec<PathBuf>,
}

impl ConfigPaths {
    /// Discovers the standard locations, honoring the path override variables.
    pub fn discover() -> Self {
        let system = env::var_os(SYSTEM_CONFIG_ENV)
            .map(PathBuf::from)
            .or_else(|| Some(PathBuf::from(SYSTEM_CONFIG_PATH)));
        let user = env::var_os(USER_CONFIG_ENV)
            .map(PathBuf::from)
            .or_else(|| dirs::home_dir().map(|home| home.join(USER_CONFIG_FILENAME)));
        Self {
            system,
            user,
            project: Some(PathBuf::from(PROJECT_CONFIG_FILENAME)),
            descriptors: COMPOSE_FILENAMES.iter().map(PathBuf::from).collect(),
        }
    }

    /// Project-relative locations rooted at `dir`, with no system or user layer.
    pub fn rooted_at(dir: &Path) -> Self {
        Self {
            system: None,
            user: None,
            project: Some(dir.join(PROJECT_CONFIG_FILENAME)),
            descriptors: COMPOSE_FILENAMES.iter().map(|name| dir.join(name)).collect(),
        }
    }

    fn descriptor(&self) -> Option<&Path> {
        self.descriptors
            .iter()
            .map(PathBuf::as_path)
            .find(|path| path.is_file())
    }
}

/// Reads a YAML mapping from `path`, or an empty mapping if the file is
/// missing, unreadable, unparsable or not a mapping.
pub fn load_yaml(path: &Path) -> Mapping {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            log::debug!("Skipping config layer {}: {}", path.display(), e);
            return Mapping::new();
        }
    };
    match serde_yaml::from_str::<Value>(&content) {
        Ok(Value::Mapping(map)) => {
            log::debug!("Loaded config layer {}", path.display());
            map
        }
        Ok(Value::Null) => Mapping::new(),
        Ok(_) => {
            log::warn!(
                "Ignoring config layer {}: top level is not a mapping",
                path.display()
            );
            Mapping::new()
        }
        Err(e) => {
            log::warn!("Ignoring config layer {}: {}", path.display(), e);
            Mapping::new()
        }
    }
}

/// Reads the project descriptor, or an empty one if it is missing or invalid.
pub fn load_descriptor(path: &Path) -> ProjectDescriptor {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            log::debug!("No project descriptor at {}: {}", path.display(), e);
            return ProjectDescriptor::default();
        }
    };
    serde_yaml::from_str(&content).unwrap_or_else(|e| {
        log::warn!("Ignoring project descriptor {}: {}", path.display(), e);
        ProjectDescriptor::default()
    })
}

/// Orchestrates loading, merging and compiling the configuration layers.
#[derive(Debug, Clone, Default)]
pub struct ConfigLoader {
    paths: ConfigPaths,
}

impl ConfigLoader {
    /// A loader over explicit layer locations.
    pub fn new(paths: ConfigPaths) -> Self {
        Self { paths }
    }

    /// Loads the layered configuration from the standard locations.
    pub fn discover() -> Self {
        Self::new(ConfigPaths::discover())
    }

    /// The layer locations this loader reads.
    pub fn paths(&self) -> &ConfigPaths {
        &self.paths
    }

    /// Merges every layer into one raw settings tree, before CLI flags and task
    /// compilation are applied.
    pub fn merged_tree(&self) -> Mapping {
        let strategy = settings_strategy();
        let mut tree = default_settings();

        let file_layers = [&self.paths.system, &self.paths.user, &self.paths.project];
        for path in file_layers.into_iter().flatten() {
            with_strategy(&strategy, &mut tree, &load_yaml(path));
        }

        let mut services = Mapping::new();
        if let Some(path) = self.paths.descriptor() {
            let descriptor = load_descriptor(path);
            if let Some(embedded) = descriptor.embedded {
                log::debug!(
                    "Loaded embedded '{}' section from {}",
                    EMBEDDED_SECTION,
                    path.display()
                );
                with_strategy(&strategy, &mut tree, &embedded);
            }
            services = descriptor.services.unwrap_or_default();
        }
        // Services only ever come from the project descriptor.
        tree.insert(key("services"), Value::Mapping(services));
        tree
    }

    /// Produces the final settings: merged layers, CLI flags applied, tasks compiled.
    pub fn load(&self, flags: &CliFlags) -> Result<Settings, ConfigError> {
        let tree = self.merged_tree();
        build_settings(tree, flags)
    }
}

/// Applies CLI flags to a merged tree, compiles its tasks and extracts the typed
/// settings.
pub fn build_settings(mut tree: Mapping, flags: &CliFlags) -> Result<Settings, ConfigError> {
    // One-way latch: flags can switch these on, never off.
    if flags.debug {
        tree.insert(key("debug"), Value::Bool(true));
    }
    if flags.sudo {
        tree.insert(key("sudo"), Value::Bool(true));
    }

    let environment_map = section(&tree, "environment")?;
    let environment = environment_map
        .iter()
        .map(|(name, value)| {
            if is_scalar(value) {
                Ok((render_value(name), render_value(value)))
            } else {
                Err(ConfigError::InvalidEnvironmentValue {
                    name: render_value(name),
                })
            }
        })
        .collect::<Result<Vec<_>, _>>()?;
    let services = section(&tree, "services")?;

    let mut tasks_map = section(&tree, "tasks")?;
    let tasks = compiler::compile_tasks(&mut tasks_map, &environment_map, &task_arg_map())?;
    tree.insert(key("tasks"), Value::Mapping(tasks_map));

    let dc_path = text_or(&tree, "dc_path", DEFAULT_DC_PATH);
    let dc_path = shellexpand::full(&dc_path)
        .map(|expanded| expanded.into_owned())
        .unwrap_or_else(|e| {
            log::warn!("Could not expand dc_path '{}': {}", dc_path, e);
            dc_path.clone()
        });

    Ok(Settings {
        tasks,
        environment,
        services,
        debug: flag(&tree, "debug"),
        sudo: flag(&tree, "sudo"),
        prompt: text_or(&tree, "prompt", DEFAULT_PROMPT),
        debug_prompt: text_or(&tree, "debug_prompt", DEFAULT_DEBUG_PROMPT),
        prompt_color: color_or(&tree, "prompt_color", DEFAULT_PROMPT_COLOR)?,
        debug_prompt_color: color_or(&tree, "debug_prompt_color", DEFAULT_DEBUG_PROMPT_COLOR)?,
        intro: text_or(&tree, "intro", DEFAULT_INTRO),
        dc_path,
        dc_commands: Vec::new(),
        use_color: !flags.no_color,
        tree,
    })
}

/// A section that must be a mapping; `null` counts as empty.
fn section(tree: &Mapping, name: &str) -> Result<Mapping, ConfigError> {
    match tree.get(name).map(untagged) {
        None | Some(Value::Null) => Ok(Mapping::new()),
        Some(Value::Mapping(map)) => Ok(map.clone()),
        Some(_) => Err(ConfigError::InvalidSection {
            section: name.to_string(),
            expected: "a mapping",
        }),
    }
}

fn flag(tree: &Mapping, name: &str) -> bool {
    tree.get(name).is_some_and(is_truthy)
}

/// A text setting; unset, `null` or empty values fall back to `default`.
fn text_or(tree: &Mapping, name: &str, default: &str) -> String {
    match tree.get(name).map(render_value) {
        Some(text) if !text.is_empty() => text,
        _ => default.to_string(),
    }
}

fn color_or(tree: &Mapping, name: &str, default: &str) -> Result<Color, ConfigError> {
    let color_name = text_or(tree, name, default);
    color::parse_color_name(&color_name).ok_or_else(|| ConfigError::UnknownColor {
        section: name.to_string(),
        name: color_name,
    })
}
