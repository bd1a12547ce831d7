//! Runtime recipe representation
//!
//! This differs from `config::Recipe` by normalizing the one-or-many and
//! simple-or-detailed forms into a single shape.

use crate::config;
use std::path::PathBuf;

/// A named unit of work: prerequisites followed by command lines
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recipe {
    /// Recipe name
    pub name: String,

    /// Usage description
    pub usage: Option<String>,

    /// Whether this recipe is hidden from listings
    pub private: bool,

    /// Prerequisite recipe names, in declared order
    pub deps: Vec<String>,

    /// Parameters, in declared (positional) order
    pub params: Vec<Parameter>,

    /// Working directory override
    pub dir: Option<PathBuf>,

    /// Command lines, in declared order
    pub commands: Vec<Command>,
}

impl Recipe {
    /// Create an empty recipe
    pub fn new(name: impl Into<String>) -> Self {
        Recipe {
            name: name.into(),
            usage: None,
            private: false,
            deps: Vec::new(),
            params: Vec::new(),
            dir: None,
            commands: Vec::new(),
        }
    }

    /// Create a recipe from configuration
    pub fn from_config(name: String, config: config::Recipe) -> Self {
        Recipe {
            name,
            usage: config.usage,
            private: config.private,
            deps: config.deps,
            params: config.params.into_iter().map(Parameter::from_config).collect(),
            dir: config.dir.map(PathBuf::from),
            commands: config.run.into_iter().map(Command::from_config).collect(),
        }
    }

    /// Add a prerequisite
    pub fn with_dep(mut self, dep: impl Into<String>) -> Self {
        self.deps.push(dep.into());
        self
    }

    /// Add a command line
    pub fn with_command(mut self, exec: impl Into<String>) -> Self {
        self.commands.push(Command::new(exec));
        self
    }

    /// Add a parameter
    pub fn with_param(mut self, name: impl Into<String>, default: Option<&str>) -> Self {
        self.params.push(Parameter {
            name: name.into(),
            default: default.map(str::to_string),
        });
        self
    }

    /// Set the working directory override
    pub fn with_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.dir = Some(dir.into());
        self
    }
}

/// A recipe parameter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    pub name: String,
    pub default: Option<String>,
}

impl Parameter {
    pub fn from_config(config: config::Param) -> Self {
        match config {
            config::Param::Simple(name) => Parameter {
                name,
                default: None,
            },
            config::Param::Complex(detail) => Parameter {
                name: detail.name,
                default: detail.default,
            },
        }
    }
}

/// A command line and how it is echoed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    /// The line handed to the shell
    pub exec: String,

    /// What to echo instead of `exec`
    pub print: Option<String>,

    /// Whether to skip echoing entirely
    pub quiet: bool,
}

impl Command {
    pub fn new(exec: impl Into<String>) -> Self {
        Command {
            exec: exec.into(),
            print: None,
            quiet: false,
        }
    }

    pub fn from_config(config: config::Command) -> Self {
        match config {
            config::Command::Simple(exec) => Command::new(exec),
            config::Command::Complex(detail) => Command {
                exec: detail.exec,
                print: detail.print,
                quiet: detail.quiet,
            },
        }
    }

    /// Get what to echo
    pub fn print(&self) -> &str {
        self.print.as_deref().unwrap_or(&self.exec)
    }
}
