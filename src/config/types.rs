//! Core configuration types
//!
//! This module defines the data structures that represent an ordo.yml declaration file.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Top-level configuration structure
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Shell interpreters per platform class
    #[serde(default)]
    pub shell: ShellSettings,

    /// Dotenv file loaded before `env`, relative to the declaration file
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dotenv: Option<String>,

    /// Environment overrides applied to every command
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub env: IndexMap<String, String>,

    /// Recipes in declaration order; the first one is the default target
    #[serde(default)]
    pub recipes: IndexMap<String, Recipe>,
}

/// Interpreter selection for each platform class
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ShellSettings {
    /// Interpreter on POSIX-like hosts (e.g., ["sh", "-cu"])
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub posix: Option<Vec<String>>,

    /// Interpreter on desktop (Windows) hosts
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub desktop: Option<Vec<String>>,
}

/// A recipe definition
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Recipe {
    /// Usage description for listings
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<String>,

    /// Whether this recipe is private (hidden from listings)
    #[serde(default)]
    pub private: bool,

    /// Recipes that must run, in full, before this one
    #[serde(default, deserialize_with = "deserialize_names")]
    pub deps: Vec<String>,

    /// Parameters substituted into command lines as `${name}`
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub params: Vec<Param>,

    /// Working directory override, relative to the invocation directory
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dir: Option<String>,

    /// Command lines to execute
    #[serde(default, deserialize_with = "deserialize_commands")]
    pub run: Vec<Command>,
}

/// A command to execute
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(untagged)]
pub enum Command {
    /// Simple string command
    Simple(String),

    /// Complex command with additional options
    Complex(CommandDetail),
}

/// Detailed command specification
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct CommandDetail {
    /// The command to execute
    pub exec: String,

    /// What to print when running (defaults to exec)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub print: Option<String>,

    /// Whether to skip echoing the command
    #[serde(default)]
    pub quiet: bool,
}

/// A parameter declaration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(untagged)]
pub enum Param {
    /// Bare parameter name, no default
    Simple(String),

    /// Parameter with a default value
    Complex(ParamDetail),
}

/// Detailed parameter specification
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ParamDetail {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
}

impl Param {
    pub fn name(&self) -> &str {
        match self {
            Param::Simple(name) => name,
            Param::Complex(detail) => &detail.name,
        }
    }

    pub fn default_value(&self) -> Option<&str> {
        match self {
            Param::Simple(_) => None,
            Param::Complex(detail) => detail.default.as_deref(),
        }
    }
}

/// Custom deserializer for commands that handles both single values and arrays
fn deserialize_commands<'de, D>(deserializer: D) -> Result<Vec<Command>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::Error;
    use serde_yaml::Value;

    let value = Value::deserialize(deserializer)?;

    match value {
        // Single string or complex command
        Value::String(s) => Ok(vec![Command::Simple(s)]),
        Value::Mapping(_) => {
            let cmd = Command::deserialize(value).map_err(D::Error::custom)?;
            Ok(vec![cmd])
        }
        // Array of commands
        Value::Sequence(seq) => seq
            .into_iter()
            .map(|item| Command::deserialize(item).map_err(D::Error::custom))
            .collect(),
        // Null or not present
        Value::Null => Ok(Vec::new()),
        _ => Err(D::Error::custom("run must be a string, object, or array")),
    }
}

/// Custom deserializer for prerequisite names (a single name or a list)
fn deserialize_names<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::Error;
    use serde_yaml::Value;

    let value = Value::deserialize(deserializer)?;

    match value {
        Value::String(s) => Ok(vec![s]),
        Value::Sequence(seq) => seq
            .into_iter()
            .map(|item| match item {
                Value::String(s) => Ok(s),
                other => Err(D::Error::custom(format!(
                    "deps entries must be recipe names, got {:?}",
                    other
                ))),
            })
            .collect(),
        Value::Null => Ok(Vec::new()),
        _ => Err(D::Error::custom("deps must be a string or array")),
    }
}
