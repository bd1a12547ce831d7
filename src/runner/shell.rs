//! Shell interpreter selection

use crate::config::ShellSettings;
use std::fmt;

/// Host platform class; one shell is configured per class
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    /// Unix-like hosts
    Posix,
    /// Windows desktop hosts
    Desktop,
}

impl Platform {
    /// The class of the host this binary was built for
    pub fn current() -> Self {
        if cfg!(windows) {
            Platform::Desktop
        } else {
            Platform::Posix
        }
    }
}

/// Interpreter that wraps every command line: `program args... <line>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellConfig {
    pub program: String,
    pub args: Vec<String>,
}

impl ShellConfig {
    pub fn new<I, S>(program: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ShellConfig {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// Built-in interpreter for a platform class
    pub fn default_for(platform: Platform) -> Self {
        match platform {
            Platform::Posix => ShellConfig::new("sh", ["-c"]),
            Platform::Desktop => ShellConfig::new("powershell.exe", ["-NoLogo", "-Command"]),
        }
    }

    /// Pick the declared interpreter for a platform class, or the built-in one
    pub fn select(settings: &ShellSettings, platform: Platform) -> Self {
        let declared = match platform {
            Platform::Posix => settings.posix.as_deref(),
            Platform::Desktop => settings.desktop.as_deref(),
        };

        match declared {
            Some([program, args @ ..]) => ShellConfig::new(program.clone(), args.iter().cloned()),
            _ => ShellConfig::default_for(platform),
        }
    }
}

impl fmt::Display for ShellConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}
