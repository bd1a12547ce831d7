//! Terminal output for users
//!
//! Progress lines go to stderr so recipe output on stdout stays clean.

use colored::Colorize;

/// Verbosity levels for output
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Verbosity {
    Silent = 0,
    Quiet = 1,
    Normal = 2,
    Verbose = 3,
}

/// Prints progress according to a verbosity level
#[derive(Debug, Clone, Copy)]
pub struct Reporter {
    verbosity: Verbosity,
    echo_commands: bool,
}

impl Reporter {
    pub fn new(verbosity: Verbosity) -> Self {
        Reporter {
            verbosity,
            echo_commands: true,
        }
    }

    /// Prints nothing at all
    pub fn silent() -> Self {
        Self::new(Verbosity::Silent)
    }

    /// Stop echoing command lines (the runner prints them itself)
    pub fn without_command_echo(mut self) -> Self {
        self.echo_commands = false;
        self
    }

    pub fn verbosity(&self) -> Verbosity {
        self.verbosity
    }

    pub fn recipe_start(&self, name: &str) {
        if self.verbosity >= Verbosity::Verbose {
            eprintln!("{} {}", "==>".blue().bold(), name.bold());
        }
    }

    pub fn command(&self, line: &str) {
        if self.echo_commands && self.verbosity >= Verbosity::Normal {
            eprintln!("{}", line.bold());
        }
    }

    pub fn info(&self, message: &str) {
        if self.verbosity >= Verbosity::Normal {
            eprintln!("{} {}", "[INFO]".green(), message);
        }
    }

    /// Only printed with --verbose
    pub fn detail(&self, message: &str) {
        if self.verbosity >= Verbosity::Verbose {
            eprintln!("{} {}", "[DEBUG]".dimmed(), message);
        }
    }

    pub fn error(&self, message: &str) {
        if self.verbosity >= Verbosity::Quiet {
            eprintln!("{} {}", "error:".red().bold(), message);
        }
    }
}
