use dcsh::core::config_loader::{ConfigLoader, ConfigPaths};
use dcsh::models::{CliFlags, TaskKind};
use dcsh::system::executor::{ComposeRunner, ExecutionError};
use dcsh::system::shell::{BufferedReader, DcShell};
use std::cell::RefCell;
use std::fs;
use std::io::Cursor;
use tempfile::tempdir;

const USER_LAYER: &str = "\
environment:
  FOO: '1'
prompt: 'user>'
tasks:
  test:
    service: web
    args: pytest -x
    help: Runs the test suite
";

const PROJECT_LAYER: &str = "\
environment:
  BAR: '2'
tasks:
  serve:
    service: web
    detach: true
    labels:
      env: prod
    args: --no-cache
";

const DESCRIPTOR: &str = "\
version: '3'
services:
  web:
    image: python:3
  db:
    image: postgres
x-dcsh:
  sudo: true
  tasks:
    psql:
      exec: true
      service: db
      user: postgres
      args: [psql, -U, postgres]
";

#[derive(Default)]
struct Recorder {
    calls: RefCell<Vec<Vec<String>>>,
}

impl ComposeRunner for Recorder {
    fn run(&self, args: &[String]) -> Result<(), ExecutionError> {
        self.calls.borrow_mut().push(args.to_vec());
        Ok(())
    }
}

fn load() -> dcsh::models::Settings {
    let dir = tempdir().unwrap();
    let user = dir.path().join("home.yml");
    fs::write(&user, USER_LAYER).unwrap();
    fs::write(dir.path().join(".dcsh.yml"), PROJECT_LAYER).unwrap();
    fs::write(dir.path().join("docker-compose.yml"), DESCRIPTOR).unwrap();

    let paths = ConfigPaths {
        system: Some(dir.path().join("missing-system.yml")),
        user: Some(user),
        ..ConfigPaths::rooted_at(dir.path())
    };
    ConfigLoader::new(paths).load(&CliFlags::default()).unwrap()
}

#[test]
fn layers_merge_into_compiled_settings() {
    let settings = load();

    assert_eq!(
        settings.environment,
        vec![
            ("FOO".to_string(), "1".to_string()),
            ("BAR".to_string(), "2".to_string())
        ]
    );
    assert_eq!(settings.prompt, "user>");
    assert!(settings.sudo);
    assert!(!settings.debug);

    let names: Vec<&str> = settings.tasks.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, vec!["test", "serve", "psql"]);

    let serve = settings.task("serve").unwrap();
    assert_eq!(serve.kind, TaskKind::Run);
    assert_eq!(
        serve.compiled_args,
        vec![
            "run", "-d", "--rm", "--label", "env=prod", "-e", "FOO=1", "-e", "BAR=2", "web",
            "--no-cache"
        ]
    );

    let psql = settings.task("psql").unwrap();
    assert_eq!(psql.kind, TaskKind::Exec);
    assert_eq!(
        psql.compiled_args,
        vec![
            "exec", "--user", "postgres", "-e", "FOO=1", "-e", "BAR=2", "db", "psql", "-U",
            "postgres"
        ]
    );
}

#[test]
fn compiled_tasks_are_stored_back_into_the_tree() {
    let settings = load();
    let tasks = settings.tree.get("tasks").and_then(|v| v.as_mapping()).unwrap();
    let test = tasks.get("test").and_then(|v| v.as_mapping()).unwrap();
    assert!(test.contains_key("compiled_args"));
    assert!(test.contains_key("remove"));
}

#[test]
fn shell_dispatches_loaded_tasks() {
    let settings = load();
    let recorder = Recorder::default();
    let shell = DcShell::new(&settings, &recorder);
    let mut reader = BufferedReader::new(Cursor::new("test tests/unit\ndc ps\nquit\n"));
    let mut out = Vec::new();

    shell.run_loop(&mut reader, &mut out).unwrap();

    let calls = recorder.calls.borrow();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[0].last().map(String::as_str), Some("tests/unit"));
    assert_eq!(calls[1], vec!["ps"]);
    assert_eq!(settings.task("test").unwrap().compiled_args.last().map(String::as_str), Some("-x"));
}
