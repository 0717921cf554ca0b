//! # Compiler
//!
//! Turns the user's declarative task definitions into invocation-ready argument
//! vectors. Every task goes through the same pipeline:
//!
//! 1. **Schema selection:** a truthy `exec` field selects the exec schema and the
//!    `exec` keyword; anything else is a `run` task.
//! 2. **Environment inheritance:** a task without its own `environment` inherits
//!    the global one.
//! 3. **Normalization:** the raw task is merged over its schema keeping only the
//!    schema's fields (`KeySelection::Left`); user values win.
//! 4. **Tokenization:** a string `args` is split with shell-word rules.
//! 5. **Compilation:** `keyword + flags + service + args`.
//!
//! Compilation is pure: the same input always yields the same task.

use crate::{
    constants::COMPILED_ARGS_KEY,
    core::{
        arg_formatter::{self, ArgFormat},
        commons::{is_scalar, is_truthy, key, render_value, untagged},
        defaults::{exec_defaults, run_defaults},
        merge::{KeySelection, merge_selected},
    },
    models::{Task, TaskKind},
};
use serde_yaml::{Mapping, Value};
use thiserror::Error;

/// Represents errors that can occur while compiling task definitions.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum CompilerError {
    /// The task body is not a mapping.
    #[error("Task '{task}' must be a mapping of task options.")]
    InvalidTask {
        /// The task name.
        task: String,
    },
    /// The task name is not a string.
    #[error("Task names must be strings, found '{name}'.")]
    InvalidTaskName {
        /// The offending key, rendered.
        name: String,
    },
    /// The task has no usable `service` field.
    #[error("Task '{task}' does not name a service to run against.")]
    MissingService {
        /// The task name.
        task: String,
    },
    /// The `args` string could not be split into words.
    #[error("Task '{task}' has malformed args (unbalanced quoting or escape): {args}")]
    MalformedArgs {
        /// The task name.
        task: String,
        /// The unsplittable `args` string.
        args: String,
    },
    /// The `args` sequence holds something other than scalars.
    #[error("Task '{task}' has an args list containing a nested value.")]
    NestedArgs {
        /// The task name.
        task: String,
    },
}

/// Compiles every task of a settings `tasks` mapping, in declaration order.
///
/// Each raw definition in `tasks` is replaced by its normalized form, which
/// carries the compiled argument vector under `compiled_args`.
pub fn compile_tasks(
    tasks: &mut Mapping,
    global_env: &Mapping,
    arg_map: &[(&'static str, ArgFormat)],
) -> Result<Vec<Task>, CompilerError> {
    let mut compiled = Vec::with_capacity(tasks.len());
    for (name, raw) in tasks.iter_mut() {
        let name = name
            .as_str()
            .ok_or_else(|| CompilerError::InvalidTaskName {
                name: render_value(name),
            })?
            .to_string();
        let task = compile_task(&name, raw, global_env, arg_map)?;
        *raw = Value::Mapping(task.definition.clone());
        compiled.push(task);
    }
    Ok(compiled)
}

/// Normalizes and compiles a single raw task definition.
pub fn compile_task(
    name: &str,
    raw: &Value,
    global_env: &Mapping,
    arg_map: &[(&'static str, ArgFormat)],
) -> Result<Task, CompilerError> {
    let mut raw_task = match untagged(raw) {
        Value::Mapping(map) => map.clone(),
        Value::Null => Mapping::new(),
        _ => {
            return Err(CompilerError::InvalidTask {
                task: name.to_string(),
            });
        }
    };

    // 1. Schema selection.
    let kind = match raw_task.get("exec") {
        Some(value) if is_truthy(value) => TaskKind::Exec,
        _ => TaskKind::Run,
    };
    let schema = match kind {
        TaskKind::Run => run_defaults(),
        TaskKind::Exec => exec_defaults(),
    };

    // 2. Environment inheritance.
    if !raw_task.contains_key("environment") {
        raw_task.insert(key("environment"), Value::Mapping(global_env.clone()));
    }

    // 3. Normalization against the schema.
    let dropped: Vec<String> = raw_task
        .keys()
        .filter(|k| !schema.contains_key(*k) && k.as_str() != Some("exec"))
        .map(render_value)
        .collect();
    if !dropped.is_empty() {
        log::debug!(
            "Task '{}' ignores fields unknown to the {} schema: {}",
            name,
            kind.keyword(),
            dropped.join(", ")
        );
    }
    let mut task = merge_selected(KeySelection::Left, &schema, &raw_task);

    let service = match task.get("service").map(untagged) {
        Some(Value::String(service)) if !service.is_empty() => service.clone(),
        _ => {
            return Err(CompilerError::MissingService {
                task: name.to_string(),
            });
        }
    };

    // 4. Tokenization.
    let args = tokenize_args(name, task.get("args").unwrap_or(&Value::Null))?;
    task.insert(
        key("args"),
        Value::Sequence(args.iter().cloned().map(Value::String).collect()),
    );

    // 5. Compilation.
    let mut compiled_args = vec![kind.keyword().to_string()];
    compiled_args.extend(arg_formatter::build(arg_map, &task));
    compiled_args.push(service.clone());
    compiled_args.extend(args);

    task.insert(
        key(COMPILED_ARGS_KEY),
        Value::Sequence(compiled_args.iter().cloned().map(Value::String).collect()),
    );

    let help = match task.get("help").map(untagged) {
        Some(Value::Null) | None => None,
        Some(value) => Some(render_value(value)),
    };

    Ok(Task {
        name: name.to_string(),
        kind,
        service,
        help,
        definition: task,
        compiled_args,
    })
}

/// Normalizes a task's `args` field into a list of words.
///
/// Strings are split with shell-word rules (quotes and escapes honored, no
/// expansion). Other scalars become a single word; sequences keep one word per
/// element.
pub fn tokenize_args(task: &str, args: &Value) -> Result<Vec<String>, CompilerError> {
    match untagged(args) {
        Value::Null => Ok(Vec::new()),
        Value::String(line) => shlex::split(line).ok_or_else(|| CompilerError::MalformedArgs {
            task: task.to_string(),
            args: line.clone(),
        }),
        Value::Sequence(items) => items
            .iter()
            .map(|item| {
                if is_scalar(item) {
                    Ok(render_value(item))
                } else {
                    Err(CompilerError::NestedArgs {
                        task: task.to_string(),
                    })
                }
            })
            .collect(),
        Value::Mapping(_) => Err(CompilerError::NestedArgs {
            task: task.to_string(),
        }),
        scalar => Ok(vec![render_value(scalar)]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::defaults::task_arg_map;

    fn yaml(text: &str) -> Value {
        serde_yaml::from_str(text).unwrap()
    }

    fn mapping(text: &str) -> Mapping {
        serde_yaml::from_str(text).unwrap()
    }

    fn detach_and_labels() -> Vec<(&'static str, ArgFormat)> {
        vec![
            ("detach", ArgFormat::flag(&["-d"])),
            ("labels", ArgFormat::repeated(&["--label", "{k}={v}"])),
        ]
    }

    #[test]
    fn test_compile_run_task_with_string_args() {
        let raw = yaml("{service: web, detach: true, labels: {env: prod}, args: '--no-cache'}");
        let task = compile_task("build-web", &raw, &Mapping::new(), &detach_and_labels()).unwrap();
        assert_eq!(task.kind, TaskKind::Run);
        assert_eq!(
            task.compiled_args,
            vec!["run", "-d", "--label", "env=prod", "web", "--no-cache"]
        );
    }

    #[test]
    fn test_compile_with_full_arg_map_applies_run_defaults() {
        let raw = yaml("{service: web, args: [pytest, -x]}");
        let task = compile_task("test", &raw, &Mapping::new(), &task_arg_map()).unwrap();
        // `remove` defaults to true for run tasks.
        assert_eq!(task.compiled_args, vec!["run", "--rm", "web", "pytest", "-x"]);
    }

    #[test]
    fn test_compile_exec_task() {
        let raw = yaml("{exec: true, service: db, user: postgres, args: 'psql -U postgres'}");
        let task = compile_task("psql", &raw, &Mapping::new(), &task_arg_map()).unwrap();
        assert_eq!(task.kind, TaskKind::Exec);
        assert_eq!(
            task.compiled_args,
            vec!["exec", "--user", "postgres", "db", "psql", "-U", "postgres"]
        );
    }

    #[test]
    fn test_unknown_fields_are_dropped() {
        let raw = yaml("{service: web, remove: false, bogus: 1, privileged: true}");
        let task = compile_task("t", &raw, &Mapping::new(), &task_arg_map()).unwrap();
        assert!(!task.definition.contains_key("bogus"));
        // `privileged` only exists in the exec schema.
        assert!(!task.definition.contains_key("privileged"));
        assert_eq!(task.compiled_args, vec!["run", "web"]);
    }

    #[test]
    fn test_environment_is_inherited_unless_overridden() {
        let global = mapping("{FOO: '1'}");
        let inherited = compile_task("a", &yaml("{service: web, remove: false}"), &global, &task_arg_map())
            .unwrap();
        assert_eq!(inherited.compiled_args, vec!["run", "-e", "FOO=1", "web"]);

        let overridden = compile_task(
            "b",
            &yaml("{service: web, remove: false, environment: {BAR: '2'}}"),
            &global,
            &task_arg_map(),
        )
        .unwrap();
        assert_eq!(overridden.compiled_args, vec!["run", "-e", "BAR=2", "web"]);
    }

    #[test]
    fn test_flags_follow_arg_map_order() {
        let raw = yaml(
            "{publish: ['8000:8000'], volumes: ['.:/src'], user: app, name: dev, detach: true, service: web}",
        );
        let task = compile_task("dev", &raw, &Mapping::new(), &task_arg_map()).unwrap();
        assert_eq!(
            task.compiled_args,
            vec![
                "run", "-d", "--name", "dev", "--rm", "--user", "app", "--volume", ".:/src",
                "--publish", "8000:8000", "web"
            ]
        );
    }

    #[test]
    fn test_definition_carries_compiled_args() {
        let raw = yaml("{service: web, help: Runs the app}");
        let task = compile_task("app", &raw, &Mapping::new(), &task_arg_map()).unwrap();
        assert_eq!(task.help.as_deref(), Some("Runs the app"));
        let stored: Vec<String> = task
            .definition
            .get(COMPILED_ARGS_KEY)
            .and_then(Value::as_sequence)
            .unwrap()
            .iter()
            .map(render_value)
            .collect();
        assert_eq!(stored, task.compiled_args);
    }

    #[test]
    fn test_compilation_is_deterministic() {
        let raw = yaml("{service: web, labels: {a: '1', b: '2'}, args: \"sh -c 'echo hi'\"}");
        let env = mapping("{X: y}");
        let first = compile_task("t", &raw, &env, &task_arg_map()).unwrap();
        let second = compile_task("t", &raw, &env, &task_arg_map()).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.compiled_args.last().map(String::as_str), Some("echo hi"));
    }

    #[test]
    fn test_malformed_args_are_fatal() {
        let raw = yaml("{service: web, args: \"echo 'unterminated\"}");
        let err = compile_task("broken", &raw, &Mapping::new(), &task_arg_map()).unwrap_err();
        assert!(matches!(err, CompilerError::MalformedArgs { ref task, .. } if task == "broken"));
    }

    #[test]
    fn test_missing_service_is_fatal() {
        let err = compile_task("t", &yaml("{args: ls}"), &Mapping::new(), &task_arg_map()).unwrap_err();
        assert_eq!(err, CompilerError::MissingService { task: "t".into() });

        let err = compile_task("t", &yaml("{service: [a]}"), &Mapping::new(), &task_arg_map()).unwrap_err();
        assert_eq!(err, CompilerError::MissingService { task: "t".into() });
    }

    #[test]
    fn test_non_mapping_task_is_rejected() {
        let err = compile_task("t", &yaml("just a string"), &Mapping::new(), &task_arg_map()).unwrap_err();
        assert_eq!(err, CompilerError::InvalidTask { task: "t".into() });
    }

    #[test]
    fn test_tokenize_args_shapes() {
        assert!(tokenize_args("t", &Value::Null).unwrap().is_empty());
        assert_eq!(tokenize_args("t", &yaml("42")).unwrap(), vec!["42"]);
        assert_eq!(
            tokenize_args("t", &yaml("[a, 1, true]")).unwrap(),
            vec!["a", "1", "true"]
        );
        assert_eq!(
            tokenize_args("t", &yaml("'a \"b c\" d\\ e'")).unwrap(),
            vec!["a", "b c", "d e"]
        );
        assert!(matches!(
            tokenize_args("t", &yaml("[[nested]]")),
            Err(CompilerError::NestedArgs { .. })
        ));
    }

    #[test]
    fn test_compile_tasks_replaces_definitions_in_order() {
        let mut tasks = mapping(
            "zeta: {service: a, remove: false}\nalpha: {service: b, remove: false, junk: 1}\n",
        );
        let compiled = compile_tasks(&mut tasks, &Mapping::new(), &task_arg_map()).unwrap();
        let names: Vec<&str> = compiled.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, ["zeta", "alpha"]);

        let alpha = tasks.get("alpha").and_then(Value::as_mapping).unwrap();
        assert!(alpha.contains_key(COMPILED_ARGS_KEY));
        assert!(!alpha.contains_key("junk"));
    }
}
