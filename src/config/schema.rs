//! Configuration validation
//!
//! Structural checks on a parsed declaration. Prerequisite references and
//! cycles are checked later by the resolver, per request.

use crate::config::types::{Config, Recipe};
use crate::error::{ConfigError, ConfigResult};
use regex::Regex;
use std::collections::HashSet;
use std::sync::OnceLock;

fn name_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_-]*$").expect("valid name regex"))
}

/// Validate a complete configuration
pub fn validate_config(config: &Config) -> ConfigResult<()> {
    validate_shell("posix", config.shell.posix.as_deref())?;
    validate_shell("desktop", config.shell.desktop.as_deref())?;

    for (name, recipe) in &config.recipes {
        validate_recipe(name, recipe)?;
    }

    Ok(())
}

/// Validate a single recipe
pub fn validate_recipe(name: &str, recipe: &Recipe) -> ConfigResult<()> {
    if !name_pattern().is_match(name) {
        return Err(ConfigError::Invalid(format!(
            "Invalid recipe name '{}': use letters, digits, '-' and '_'",
            name
        )));
    }

    for dep in &recipe.deps {
        if dep.trim().is_empty() {
            return Err(ConfigError::Invalid(format!(
                "Recipe '{}' has an empty prerequisite name",
                name
            )));
        }
    }

    let mut seen = HashSet::new();
    for param in &recipe.params {
        let param_name = param.name();
        if !name_pattern().is_match(param_name) || param_name.contains('-') {
            return Err(ConfigError::Invalid(format!(
                "Invalid parameter name '{}' in recipe '{}'",
                param_name, name
            )));
        }
        if !seen.insert(param_name) {
            return Err(ConfigError::DuplicateParameter {
                recipe: name.to_string(),
                parameter: param_name.to_string(),
            });
        }
    }

    Ok(())
}

/// Validate an interpreter declaration
fn validate_shell(class: &str, shell: Option<&[String]>) -> ConfigResult<()> {
    match shell {
        Some(parts) if parts.first().map_or(true, |program| program.trim().is_empty()) => {
            Err(ConfigError::Invalid(format!(
                "Shell for '{}' hosts must name an interpreter program",
                class
            )))
        }
        _ => Ok(()),
    }
}
