//! Plan execution
//!
//! Runs every command of every recipe in a plan, strictly in order, and stops
//! at the first command that fails, cannot start, or is interrupted.

use crate::error::{ExecutionError, OrdoError, Result};
use crate::runner::{
    substitute, CancelToken, CommandRunner, CommandStatus, Invocation, Plan, Recipe, Registry,
    ShellConfig,
};
use crate::ui::Reporter;
use indexmap::IndexMap;
use std::env;
use std::io;
use std::path::PathBuf;
use tracing::debug;

/// Where commands run and which variables they see on top of the inherited
/// environment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Environment {
    pub working_dir: PathBuf,
    pub vars: IndexMap<String, String>,
}

impl Environment {
    pub fn new(working_dir: impl Into<PathBuf>) -> Self {
        Environment {
            working_dir: working_dir.into(),
            vars: IndexMap::new(),
        }
    }

    /// The invocation's current directory, no overrides
    pub fn current() -> io::Result<Self> {
        Ok(Self::new(env::current_dir()?))
    }

    pub fn with_vars(mut self, vars: IndexMap<String, String>) -> Self {
        self.vars = vars;
        self
    }

    pub fn with_var(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.vars.insert(key.into(), value.into());
        self
    }

    /// Directory a recipe's commands run in
    fn dir_for(&self, recipe: &Recipe) -> PathBuf {
        match &recipe.dir {
            Some(dir) => self.working_dir.join(dir),
            None => self.working_dir.clone(),
        }
    }
}

/// Per-invocation lifecycle of an executor
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecutionState {
    Pending,
    /// Both indices are positions in the plan and recipe; the command index
    /// is 1-based, matching error reports
    Running {
        recipe_index: usize,
        command_index: usize,
    },
    Succeeded,
    Failed(String),
}

/// Summary of a successful run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    /// Recipes that ran, in order
    pub recipes: Vec<String>,
    /// Total commands that exited zero
    pub commands_run: usize,
}

pub struct Executor<R> {
    runner: R,
    shell: ShellConfig,
    environment: Environment,
    cancel: CancelToken,
    reporter: Reporter,
    state: ExecutionState,
}

impl<R: CommandRunner> Executor<R> {
    pub fn new(runner: R, shell: ShellConfig, environment: Environment) -> Self {
        Executor {
            runner,
            shell,
            environment,
            cancel: CancelToken::new(),
            reporter: Reporter::silent(),
            state: ExecutionState::Pending,
        }
    }

    /// Check this token before every spawn
    pub fn with_cancel_token(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn with_reporter(mut self, reporter: Reporter) -> Self {
        self.reporter = reporter;
        self
    }

    pub fn state(&self) -> &ExecutionState {
        &self.state
    }

    pub fn shell(&self) -> &ShellConfig {
        &self.shell
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    pub fn into_runner(self) -> R {
        self.runner
    }

    /// Run a resolved plan against the registry it was resolved from
    pub fn run(&mut self, registry: &Registry, plan: &Plan) -> Result<Report> {
        self.state = ExecutionState::Pending;

        let recipes = match plan
            .recipes()
            .iter()
            .map(|name| registry.get(name))
            .collect::<std::result::Result<Vec<_>, _>>()
        {
            Ok(recipes) => recipes,
            Err(err) => {
                self.state = ExecutionState::Failed(err.to_string());
                return Err(err.into());
            }
        };

        let no_arguments = IndexMap::new();
        let mut report = Report {
            recipes: Vec::with_capacity(recipes.len()),
            commands_run: 0,
        };

        for (recipe_index, recipe) in recipes.into_iter().enumerate() {
            self.reporter.recipe_start(&recipe.name);
            let dir = self.environment.dir_for(recipe);
            let arguments = plan.arguments(&recipe.name).unwrap_or(&no_arguments);

            for (position, command) in recipe.commands.iter().enumerate() {
                let command_index = position + 1;
                self.state = ExecutionState::Running {
                    recipe_index,
                    command_index,
                };

                if self.cancel.is_cancelled() {
                    return Err(self.fail(ExecutionError::Cancelled {
                        recipe: recipe.name.clone(),
                        command_index,
                    }));
                }

                let line = substitute(&command.exec, arguments);
                if !command.quiet {
                    self.reporter.command(&substitute(command.print(), arguments));
                }

                let invocation = Invocation {
                    recipe: &recipe.name,
                    command_index,
                    shell: &self.shell,
                    line: &line,
                    dir: &dir,
                    env: &self.environment.vars,
                };

                match self.runner.run(&invocation) {
                    Ok(CommandStatus::Success) => report.commands_run += 1,
                    Ok(CommandStatus::Failure(exit_code)) => {
                        return Err(self.fail(ExecutionError::RecipeFailed {
                            recipe: recipe.name.clone(),
                            command_index,
                            exit_code,
                        }));
                    }
                    Ok(CommandStatus::Interrupted) => {
                        return Err(self.fail(ExecutionError::Cancelled {
                            recipe: recipe.name.clone(),
                            command_index,
                        }));
                    }
                    Err(cause) => {
                        return Err(self.fail(ExecutionError::SpawnError {
                            recipe: recipe.name.clone(),
                            command_index,
                            cause,
                        }));
                    }
                }
            }

            debug!(recipe = %recipe.name, "recipe finished");
            report.recipes.push(recipe.name.clone());
        }

        self.state = ExecutionState::Succeeded;
        Ok(report)
    }

    fn fail(&mut self, err: ExecutionError) -> OrdoError {
        self.state = ExecutionState::Failed(err.to_string());
        err.into()
    }
}
