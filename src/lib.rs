//! Ordo - a small YAML-based recipe runner
//!
//! Recipes declare prerequisites and shell command lines in an `ordo.yml`
//! file. Ordo resolves the prerequisites of a requested recipe into a flat
//! plan, then runs each command in order on the configured shell, stopping at
//! the first failure.

// Public modules
pub mod cli;
pub mod config;
pub mod error;
pub mod runner;
pub mod ui;

// Re-export commonly used types
pub use error::{OrdoError, Result};

/// Current version of Ordo
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
