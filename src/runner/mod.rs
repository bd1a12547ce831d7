//! Recipe resolution and execution engine
//!
//! This module holds the recipe registry, the dependency resolver that turns a
//! request into a plan, and the executor that runs a plan through a shell.

pub mod cancel;
pub mod command;
pub mod executor;
pub mod interpolate;
pub mod recipe;
pub mod registry;
pub mod resolve;
pub mod shell;

// Re-export main types
pub use cancel::*;
pub use command::*;
pub use executor::*;
pub use interpolate::*;
pub use recipe::*;
pub use registry::*;
pub use resolve::*;
pub use shell::*;
