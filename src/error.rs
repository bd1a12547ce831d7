//! Error types for Ordo

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for Ordo operations
pub type Result<T> = std::result::Result<T, OrdoError>;

/// Main error type for Ordo
#[derive(Error, Debug)]
pub enum OrdoError {
    /// Declaration file errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Registry and plan resolution errors
    #[error("{0}")]
    Resolve(#[from] ResolveError),

    /// Recipe execution errors
    #[error("{0}")]
    Execution(#[from] ExecutionError),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// YAML parsing errors
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl OrdoError {
    /// Process exit code for this error.
    ///
    /// A failed recipe propagates the child's own code; a cancelled run exits
    /// with 130 like a shell interrupted by SIGINT. Everything else is 1.
    pub fn exit_code(&self) -> i32 {
        match self {
            OrdoError::Execution(ExecutionError::RecipeFailed { exit_code, .. }) => {
                match exit_code {
                    Some(code) if *code != 0 => *code,
                    _ => 1,
                }
            }
            OrdoError::Execution(ExecutionError::Cancelled { .. }) => 130,
            _ => 1,
        }
    }
}

/// Declaration file discovery, parsing and validation errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to find ordo file (searched: {0})")]
    NotFound(String),

    #[error("Failed to read '{path}': {error}")]
    Read { path: PathBuf, error: String },

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Recipe '{recipe}' declares parameter '{parameter}' more than once")]
    DuplicateParameter { recipe: String, parameter: String },

    #[error("Failed to load dotenv file '{path}': {error}")]
    Dotenv { path: PathBuf, error: String },
}

/// Resolution-time errors, raised before any subprocess is spawned
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    #[error("Recipe '{0}' is defined more than once")]
    DuplicateRecipe(String),

    #[error("Recipe '{0}' is not defined")]
    UnknownRecipe(String),

    #[error("Circular dependency detected: {}", .0.join(" -> "))]
    CyclicDependency(Vec<String>),

    #[error("No recipes defined, cannot pick a default")]
    NoDefaultRecipe,

    #[error("Recipe '{recipe}' needs a value for parameter '{parameter}'")]
    MissingArgument { recipe: String, parameter: String },

    #[error("Recipe '{recipe}' takes {expected} argument(s) but {got} were given")]
    TooManyArguments {
        recipe: String,
        expected: usize,
        got: usize,
    },
}

/// Execution-time errors; the remaining plan is abandoned when one occurs
#[derive(Error, Debug)]
pub enum ExecutionError {
    #[error("Recipe '{recipe}' failed at command {command_index} with {}", describe_exit(.exit_code))]
    RecipeFailed {
        recipe: String,
        /// 1-based position of the command within the recipe
        command_index: usize,
        exit_code: Option<i32>,
    },

    #[error("Recipe '{recipe}' could not spawn command {command_index}: {cause}")]
    SpawnError {
        recipe: String,
        command_index: usize,
        #[source]
        cause: io::Error,
    },

    #[error("Recipe '{recipe}' was cancelled at command {command_index}")]
    Cancelled { recipe: String, command_index: usize },
}

fn describe_exit(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exit code {}", code),
        None => "no exit code (terminated by signal)".to_string(),
    }
}

/// Specialized result type for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Specialized result type for resolution operations
pub type ResolveResult<T> = std::result::Result<T, ResolveError>;

/// Specialized result type for execution operations
pub type ExecutionResult<T> = std::result::Result<T, ExecutionError>;
