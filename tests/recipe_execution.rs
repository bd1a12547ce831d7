//! Integration tests for recipe execution

mod common;

use common::{create_test_config, registry_from_yaml, RecordingRunner, PROJECT_RECIPES};
use ordo::error::{ExecutionError, OrdoError, ResolveError};
use ordo::runner::{
    resolve, resolve_default, CommandStatus, Environment, ExecutionState, Executor, Platform,
    Registry, ShellConfig, ShellRunner,
};
use std::path::PathBuf;

fn executor(runner: RecordingRunner) -> Executor<RecordingRunner> {
    Executor::new(
        runner,
        ShellConfig::default_for(Platform::Posix),
        Environment::new("/project"),
    )
}

#[test]
fn test_default_runs_seven_commands_in_order() {
    let registry = registry_from_yaml(PROJECT_RECIPES);
    let plan = resolve_default(&registry).unwrap();

    let mut executor = executor(RecordingRunner::new());
    let report = executor.run(&registry, &plan).unwrap();

    assert_eq!(report.recipes, vec!["lint", "fmt", "test", "default"]);
    assert_eq!(report.commands_run, 7);
    assert_eq!(executor.state(), &ExecutionState::Succeeded);

    let runner = executor.into_runner();
    assert_eq!(runner.calls.len(), 7);
    assert_eq!(runner.recipes_called(), vec!["lint", "fmt", "test"]);
    let lines: Vec<&str> = runner.calls.iter().map(|c| c.line.as_str()).collect();
    assert_eq!(
        lines,
        vec![
            "typos",
            "cargo check",
            "cargo clippy -- -D warnings",
            "cargo doc --no-deps",
            "cargo deny check",
            "cargo fmt --all",
            "cargo test --all-features",
        ]
    );
}

#[test]
fn test_failure_in_third_lint_command_stops_everything() {
    let registry = registry_from_yaml(PROJECT_RECIPES);
    let plan = resolve_default(&registry).unwrap();

    let runner = RecordingRunner::new().with_status("lint", 3, CommandStatus::Failure(Some(2)));
    let mut executor = executor(runner);
    let err = executor.run(&registry, &plan).unwrap_err();

    match &err {
        OrdoError::Execution(ExecutionError::RecipeFailed {
            recipe,
            command_index,
            exit_code,
        }) => {
            assert_eq!(recipe, "lint");
            assert_eq!(*command_index, 3);
            assert_eq!(*exit_code, Some(2));
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_ne!(err.exit_code(), 0);
    assert_eq!(err.exit_code(), 2);
    assert!(matches!(executor.state(), ExecutionState::Failed(_)));

    let runner = executor.into_runner();
    assert_eq!(runner.calls.len(), 3);
    assert_eq!(runner.recipes_called(), vec!["lint"]);
}

#[test]
fn test_spawn_error_identifies_command() {
    let registry = registry_from_yaml(PROJECT_RECIPES);
    let plan = resolve(&registry, "test").unwrap();

    let mut executor = executor(RecordingRunner::new().with_spawn_error("test", 1));
    let err = executor.run(&registry, &plan).unwrap_err();

    assert!(matches!(
        err,
        OrdoError::Execution(ExecutionError::SpawnError { ref recipe, command_index: 1, .. })
            if recipe == "test"
    ));
    assert_eq!(err.exit_code(), 1);
}

#[test]
fn test_interrupted_command_cancels_plan() {
    let registry = registry_from_yaml(PROJECT_RECIPES);
    let plan = resolve_default(&registry).unwrap();

    let runner = RecordingRunner::new().with_status("fmt", 1, CommandStatus::Interrupted);
    let mut executor = executor(runner);
    let err = executor.run(&registry, &plan).unwrap_err();

    assert!(matches!(
        err,
        OrdoError::Execution(ExecutionError::Cancelled { ref recipe, command_index: 1 })
            if recipe == "fmt"
    ));
    assert_eq!(executor.into_runner().recipes_called(), vec!["lint", "fmt"]);
}

#[test]
fn test_resolution_errors_spawn_nothing() {
    let registry = registry_from_yaml(
        r#"
recipes:
  a:
    deps: b
    run: echo a
  b:
    deps: a
    run: echo b
"#,
    );

    assert!(matches!(
        resolve(&registry, "a"),
        Err(ResolveError::CyclicDependency(_))
    ));
    assert!(matches!(
        resolve(&registry, "missing"),
        Err(ResolveError::UnknownRecipe(_))
    ));

    // A plan resolved elsewhere cannot smuggle in unknown recipes either
    let other = registry_from_yaml("recipes:\n  ghost:\n    run: echo boo\n");
    let plan = resolve(&other, "ghost").unwrap();
    let mut executor = executor(RecordingRunner::new());
    let err = executor.run(&registry, &plan).unwrap_err();
    assert!(matches!(
        err,
        OrdoError::Resolve(ResolveError::UnknownRecipe(_))
    ));
    assert!(executor.into_runner().calls.is_empty());
}

#[test]
fn test_recipe_dir_override() {
    let registry = registry_from_yaml(PROJECT_RECIPES);
    let plan = resolve(&registry, "publish-try").unwrap();

    let mut executor = executor(RecordingRunner::new());
    executor.run(&registry, &plan).unwrap();

    let runner = executor.into_runner();
    assert_eq!(runner.calls[0].dir, PathBuf::from("/project").join("package"));
}

#[test]
fn test_recipe_without_commands_succeeds() {
    let mut registry = Registry::new();
    registry
        .define(ordo::runner::Recipe::new("noop"))
        .unwrap();
    let plan = resolve(&registry, "noop").unwrap();

    let mut executor = executor(RecordingRunner::new());
    let report = executor.run(&registry, &plan).unwrap();

    assert_eq!(report.recipes, vec!["noop"]);
    assert_eq!(report.commands_run, 0);
}

#[cfg(unix)]
#[test]
fn test_real_shell_runs_in_order_and_stops() {
    let (temp_dir, _config_path) = create_test_config("recipes: {}\n");
    let registry = registry_from_yaml(
        r#"
recipes:
  all:
    deps: [first, second]
  first:
    run:
      - echo one >> log.txt
      - echo two >> log.txt
  second:
    run:
      - echo three >> log.txt
      - exit 4
      - echo never >> log.txt
"#,
    );
    let plan = resolve(&registry, "all").unwrap();

    let mut executor = Executor::new(
        ShellRunner::default(),
        ShellConfig::new("sh", ["-c"]),
        Environment::new(temp_dir.path()),
    );
    let err = executor.run(&registry, &plan).unwrap_err();

    assert!(matches!(
        err,
        OrdoError::Execution(ExecutionError::RecipeFailed {
            command_index: 2,
            exit_code: Some(4),
            ..
        })
    ));
    let log = std::fs::read_to_string(temp_dir.path().join("log.txt")).unwrap();
    assert_eq!(log, "one\ntwo\nthree\n");
}

#[cfg(unix)]
#[test]
fn test_real_shell_sees_environment_overrides() {
    let (temp_dir, _config_path) = create_test_config("recipes: {}\n");
    let registry = registry_from_yaml(
        r#"
recipes:
  show:
    params:
      - name: suffix
        default: "!"
    run: echo "$GREETING${suffix}" > out.txt
"#,
    );
    let mut plan = resolve(&registry, "show").unwrap();
    plan.bind_arguments(&registry, &[]).unwrap();

    let mut executor = Executor::new(
        ShellRunner::default(),
        ShellConfig::new("sh", ["-c"]),
        Environment::new(temp_dir.path()).with_var("GREETING", "hello"),
    );
    executor.run(&registry, &plan).unwrap();

    let out = std::fs::read_to_string(temp_dir.path().join("out.txt")).unwrap();
    assert_eq!(out.trim(), "hello!");
}
