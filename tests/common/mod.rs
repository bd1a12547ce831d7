//! Common test utilities

#![allow(dead_code)]

use ordo::config::parse_config;
use ordo::runner::{CommandRunner, CommandStatus, Invocation, Registry};
use std::collections::HashMap;
use std::fs;
use std::io;
use tempfile::TempDir;

/// Create a temporary directory with an ordo.yml file
pub fn create_test_config(content: &str) -> (TempDir, std::path::PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("ordo.yml");
    fs::write(&config_path, content).unwrap();
    (temp_dir, config_path)
}

/// Build a registry straight from YAML
pub fn registry_from_yaml(yaml: &str) -> Registry {
    Registry::from_config(parse_config(yaml).unwrap()).unwrap()
}

/// The recipe set of a typical Rust project
pub const PROJECT_RECIPES: &str = r#"
recipes:
  default:
    deps: [lint, fmt, test]
  fmt:
    run: cargo fmt --all
  lint:
    run:
      - typos
      - cargo check
      - cargo clippy -- -D warnings
      - cargo doc --no-deps
      - cargo deny check
  test:
    run: cargo test --all-features
  publish-try:
    dir: package
    run: cargo publish --dry-run
  publish:
    dir: package
    run: cargo publish
"#;

/// A single recorded call to the runner
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Call {
    pub recipe: String,
    pub command_index: usize,
    pub line: String,
    pub dir: std::path::PathBuf,
}

/// Fake runner that records invocations and returns scripted outcomes
#[derive(Debug, Default)]
pub struct RecordingRunner {
    pub calls: Vec<Call>,
    outcomes: HashMap<(String, usize), io::Result<CommandStatus>>,
}

impl RecordingRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make command `index` (1-based) of `recipe` end with `status`
    pub fn with_status(mut self, recipe: &str, index: usize, status: CommandStatus) -> Self {
        self.outcomes.insert((recipe.to_string(), index), Ok(status));
        self
    }

    /// Make command `index` (1-based) of `recipe` fail to spawn
    pub fn with_spawn_error(mut self, recipe: &str, index: usize) -> Self {
        self.outcomes.insert(
            (recipe.to_string(), index),
            Err(io::Error::new(io::ErrorKind::NotFound, "interpreter missing")),
        );
        self
    }

    pub fn recipes_called(&self) -> Vec<String> {
        let mut recipes: Vec<String> = Vec::new();
        for call in &self.calls {
            if recipes.last() != Some(&call.recipe) {
                recipes.push(call.recipe.clone());
            }
        }
        recipes
    }
}

impl CommandRunner for RecordingRunner {
    fn run(&mut self, invocation: &Invocation<'_>) -> io::Result<CommandStatus> {
        self.calls.push(Call {
            recipe: invocation.recipe.to_string(),
            command_index: invocation.command_index,
            line: invocation.line.to_string(),
            dir: invocation.dir.to_path_buf(),
        });

        match self
            .outcomes
            .remove(&(invocation.recipe.to_string(), invocation.command_index))
        {
            Some(outcome) => outcome,
            None => Ok(CommandStatus::Success),
        }
    }
}
