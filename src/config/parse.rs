//! Configuration file parsing and discovery

use crate::config::types::Config;
use crate::error::{ConfigError, ConfigResult, OrdoError};
use indexmap::IndexMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Default configuration file names to search for
const CONFIG_FILE_NAMES: &[&str] = &["ordo.yml", "ordo.yaml"];

/// Find the configuration file by searching current and parent directories
pub fn find_config_file() -> ConfigResult<PathBuf> {
    find_config_file_from(env::current_dir().map_err(|e| {
        ConfigError::Invalid(format!("Failed to get current directory: {}", e))
    })?)
}

/// Find the configuration file starting from a specific directory
pub fn find_config_file_from(start_dir: PathBuf) -> ConfigResult<PathBuf> {
    let mut current_dir = start_dir;
    let mut searched_paths = Vec::new();

    loop {
        for file_name in CONFIG_FILE_NAMES {
            let config_path = current_dir.join(file_name);
            searched_paths.push(config_path.display().to_string());

            if config_path.is_file() {
                debug!(path = %config_path.display(), "found ordo file");
                return Ok(config_path);
            }
        }

        match current_dir.parent() {
            Some(parent) => current_dir = parent.to_path_buf(),
            None => return Err(ConfigError::NotFound(searched_paths.join(", "))),
        }
    }
}

/// Parse a configuration file from a path
pub fn parse_config_file(path: &Path) -> Result<Config, OrdoError> {
    let contents = fs::read_to_string(path).map_err(|e| ConfigError::Read {
        path: path.to_path_buf(),
        error: e.to_string(),
    })?;

    parse_config(&contents)
}

/// Parse configuration from a string
pub fn parse_config(yaml: &str) -> Result<Config, OrdoError> {
    let config: Config = serde_yaml::from_str(yaml)?;
    Ok(config)
}

/// Parse configuration with automatic file discovery
pub fn parse_config_auto() -> Result<(Config, PathBuf), OrdoError> {
    let config_path = find_config_file()?;
    let config = parse_config_file(&config_path)?;
    Ok((config, config_path))
}

/// Collect environment overrides: the dotenv file first, then `env`.
///
/// The dotenv path is resolved against the declaration file's directory.
/// Later entries win over earlier ones.
pub fn environment_overrides(
    config: &Config,
    config_path: Option<&Path>,
) -> ConfigResult<IndexMap<String, String>> {
    let mut vars = IndexMap::new();

    if let Some(dotenv) = &config.dotenv {
        let base_dir = config_path
            .and_then(Path::parent)
            .unwrap_or_else(|| Path::new("."));
        let path = base_dir.join(dotenv);
        let entries = dotenvy::from_path_iter(&path).map_err(|e| ConfigError::Dotenv {
            path: path.clone(),
            error: e.to_string(),
        })?;
        for entry in entries {
            let (key, value) = entry.map_err(|e| ConfigError::Dotenv {
                path: path.clone(),
                error: e.to_string(),
            })?;
            vars.insert(key, value);
        }
        debug!(path = %path.display(), count = vars.len(), "loaded dotenv file");
    }

    for (key, value) in &config.env {
        vars.insert(key.clone(), value.clone());
    }

    Ok(vars)
}
