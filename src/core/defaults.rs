// src/core/defaults.rs

// Built-in settings, the strategy table used to layer configuration files, and
// the run/exec task schemas together with their argument map.

use crate::core::{
    arg_formatter::{ArgFormat, ArgMap},
    commons::key,
    merge::{Strategy, StrategyTable},
};
use serde_yaml::{Mapping, Value};

/// Prompt shown in normal mode.
pub const DEFAULT_PROMPT: &str = "(dcsh)$";
/// Prompt shown in debug mode.
pub const DEFAULT_DEBUG_PROMPT: &str = "(dcsh debug mode)$";
/// Color of the normal-mode prompt.
pub const DEFAULT_PROMPT_COLOR: &str = "yellow";
/// Color of the debug-mode prompt.
pub const DEFAULT_DEBUG_PROMPT_COLOR: &str = "red";
/// Banner printed when an interactive shell starts.
pub const DEFAULT_INTRO: &str = "DCSH started. Type \"help\" for assistance.";
/// Command line of the wrapped tool.
pub const DEFAULT_DC_PATH: &str = "docker-compose";

fn entry(map: &mut Mapping, name: &str, value: Value) {
    map.insert(key(name), value);
}

fn text(value: &str) -> Value {
    Value::String(value.to_string())
}

/// The settings tree every load starts from.
pub fn default_settings() -> Mapping {
    let mut settings = Mapping::new();
    entry(&mut settings, "tasks", Value::Mapping(Mapping::new()));
    entry(&mut settings, "environment", Value::Mapping(Mapping::new()));
    entry(&mut settings, "services", Value::Mapping(Mapping::new()));
    entry(&mut settings, "debug", Value::Bool(false));
    entry(&mut settings, "sudo", Value::Bool(false));
    entry(&mut settings, "prompt", text(DEFAULT_PROMPT));
    entry(&mut settings, "debug_prompt", text(DEFAULT_DEBUG_PROMPT));
    entry(&mut settings, "prompt_color", text(DEFAULT_PROMPT_COLOR));
    entry(&mut settings, "debug_prompt_color", text(DEFAULT_DEBUG_PROMPT_COLOR));
    entry(&mut settings, "intro", text(DEFAULT_INTRO));
    entry(&mut settings, "dc_path", text(DEFAULT_DC_PATH));
    settings
}

/// How each configuration layer is folded into the settings tree.
///
/// Keys not listed here are discarded, so unknown top-level keys never leak
/// into the merged settings.
pub fn settings_strategy() -> StrategyTable {
    StrategyTable::new(Strategy::Discard)
        .with("tasks", Strategy::Shallow)
        .with("environment", Strategy::Shallow)
        .with("debug", Strategy::Override)
        .with("sudo", Strategy::Override)
        .with("prompt", Strategy::Override)
        .with("debug_prompt", Strategy::Override)
        .with("prompt_color", Strategy::Override)
        .with("debug_prompt_color", Strategy::Override)
        .with("intro", Strategy::Override)
        .with("dc_path", Strategy::Override)
}

/// Schema for tasks that start a new container (`run`).
pub fn run_defaults() -> Mapping {
    let mut schema = Mapping::new();
    entry(&mut schema, "detach", Value::Bool(false));
    entry(&mut schema, "name", Value::Null);
    entry(&mut schema, "user", Value::Null);
    entry(&mut schema, "remove", Value::Bool(true));
    entry(&mut schema, "nodeps", Value::Bool(false));
    entry(&mut schema, "service-ports", Value::Bool(false));
    entry(&mut schema, "disable-tty", Value::Bool(false));
    entry(&mut schema, "entrypoint", Value::Null);
    entry(&mut schema, "labels", Value::Mapping(Mapping::new()));
    entry(&mut schema, "publish", Value::Sequence(Vec::new()));
    entry(&mut schema, "volumes", Value::Sequence(Vec::new()));
    entry(&mut schema, "environment", Value::Mapping(Mapping::new()));
    entry(&mut schema, "help", Value::Null);
    entry(&mut schema, "service", Value::Null);
    entry(&mut schema, "args", Value::Sequence(Vec::new()));
    schema
}

/// Schema for tasks that run inside an already running container (`exec`).
pub fn exec_defaults() -> Mapping {
    let mut schema = Mapping::new();
    entry(&mut schema, "detach", Value::Bool(false));
    entry(&mut schema, "privileged", Value::Null);
    entry(&mut schema, "user", Value::Null);
    entry(&mut schema, "disable-tty", Value::Null);
    entry(&mut schema, "index", Value::Null);
    entry(&mut schema, "environment", Value::Mapping(Mapping::new()));
    entry(&mut schema, "help", Value::Null);
    entry(&mut schema, "service", Value::Null);
    entry(&mut schema, "args", Value::Sequence(Vec::new()));
    schema
}

/// Task fields that become command-line flags, in emission order.
///
/// Options and their values are separate elements: the wrapped tool is
/// spawned directly, never through a shell.
pub fn task_arg_map() -> ArgMap {
    vec![
        ("detach", ArgFormat::flag(&["-d"])),
        ("name", ArgFormat::flag(&["--name", "{v}"])),
        ("nodeps", ArgFormat::flag(&["--no-deps"])),
        ("remove", ArgFormat::flag(&["--rm"])),
        ("disable-tty", ArgFormat::flag(&["-T"])),
        ("entrypoint", ArgFormat::flag(&["--entrypoint", "{v}"])),
        ("privileged", ArgFormat::flag(&["--privileged"])),
        ("user", ArgFormat::flag(&["--user", "{v}"])),
        ("index", ArgFormat::flag(&["--index", "{v}"])),
        ("service-ports", ArgFormat::flag(&["--service-ports"])),
        ("labels", ArgFormat::repeated(&["--label", "{k}={v}"])),
        ("volumes", ArgFormat::repeated(&["--volume", "{v}"])),
        ("publish", ArgFormat::repeated(&["--publish", "{v}"])),
        ("environment", ArgFormat::repeated(&["-e", "{k}={v}"])),
    ]
}
