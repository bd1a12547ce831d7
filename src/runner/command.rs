//! Command execution
//!
//! The executor talks to a `CommandRunner` rather than to `std::process`
//! directly, so plans can be run against a fake in tests or printed instead of
//! run with `--dry-run`.

use crate::runner::{CancelToken, ShellConfig};
use indexmap::IndexMap;
use std::io::{self, Write};
use std::path::Path;
use std::process::{Child, Command as StdCommand, Stdio};
use std::time::Duration;
use tracing::{debug, warn};
use wait_timeout::ChildExt;

/// How often a waiting runner checks for cancellation
const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// How long a child gets to exit after SIGTERM before it is killed
const KILL_GRACE: Duration = Duration::from_secs(2);

/// One command line, ready to hand to a shell
#[derive(Debug, Clone, Copy)]
pub struct Invocation<'a> {
    /// Recipe the command belongs to
    pub recipe: &'a str,
    /// 1-based position of the command within its recipe
    pub command_index: usize,
    pub shell: &'a ShellConfig,
    /// Command line after parameter substitution
    pub line: &'a str,
    pub dir: &'a Path,
    /// Overrides layered on top of the inherited environment
    pub env: &'a IndexMap<String, String>,
}

/// Outcome of a single command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandStatus {
    Success,
    /// Non-zero exit; `None` when the child was terminated by a signal
    Failure(Option<i32>),
    /// The run was cancelled while the command was in flight
    Interrupted,
}

/// Runs a single command line and reports how it ended.
///
/// An `Err` means the command could not be started at all.
pub trait CommandRunner {
    fn run(&mut self, invocation: &Invocation<'_>) -> io::Result<CommandStatus>;
}

impl<R: CommandRunner + ?Sized> CommandRunner for &mut R {
    fn run(&mut self, invocation: &Invocation<'_>) -> io::Result<CommandStatus> {
        (**self).run(invocation)
    }
}

/// Spawns real subprocesses with inherited stdio
#[derive(Debug, Clone, Default)]
pub struct ShellRunner {
    cancel: CancelToken,
}

impl ShellRunner {
    pub fn new(cancel: CancelToken) -> Self {
        ShellRunner { cancel }
    }
}

impl CommandRunner for ShellRunner {
    fn run(&mut self, invocation: &Invocation<'_>) -> io::Result<CommandStatus> {
        let mut command = StdCommand::new(&invocation.shell.program);
        command
            .args(&invocation.shell.args)
            .arg(invocation.line)
            .current_dir(invocation.dir)
            .envs(invocation.env)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());

        // Own process group, so cancellation reaches everything the shell
        // starts. Terminal Ctrl-C no longer does; the poll loop forwards it.
        #[cfg(unix)]
        {
            use std::os::unix::process::CommandExt;
            command.process_group(0);
        }

        debug!(
            recipe = invocation.recipe,
            index = invocation.command_index,
            shell = %invocation.shell,
            dir = %invocation.dir.display(),
            "spawning command"
        );

        let mut child = command.spawn()?;

        loop {
            if self.cancel.is_cancelled() {
                warn!(recipe = invocation.recipe, pid = child.id(), "cancelling running command");
                terminate(&mut child)?;
                return Ok(CommandStatus::Interrupted);
            }

            if let Some(status) = child.wait_timeout(POLL_INTERVAL)? {
                if self.cancel.is_cancelled() {
                    signal_group(&child, Signal::Kill);
                    return Ok(CommandStatus::Interrupted);
                }
                return Ok(if status.success() {
                    CommandStatus::Success
                } else {
                    CommandStatus::Failure(status.code())
                });
            }
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Signal {
    Term,
    Kill,
}

/// Send a signal to the child's process group, ignoring groups already gone
#[cfg(unix)]
fn signal_group(child: &Child, signal: Signal) {
    use nix::sys::signal::{killpg, Signal as NixSignal};
    use nix::unistd::Pid;

    let signal = match signal {
        Signal::Term => NixSignal::SIGTERM,
        Signal::Kill => NixSignal::SIGKILL,
    };
    if let Ok(pid) = i32::try_from(child.id()) {
        if let Err(errno) = killpg(Pid::from_raw(pid), signal) {
            debug!(pid, %errno, "process group already gone");
        }
    }
}

#[cfg(not(unix))]
fn signal_group(_child: &Child, _signal: Signal) {}

/// Stop a child and its process group: SIGTERM, a grace period, then SIGKILL
/// for whatever is left. Always reaps the child.
fn terminate(child: &mut Child) -> io::Result<()> {
    signal_group(child, Signal::Term);
    #[cfg(unix)]
    {
        if child.wait_timeout(KILL_GRACE)?.is_some() {
            signal_group(child, Signal::Kill);
            return Ok(());
        }
    }

    signal_group(child, Signal::Kill);
    // Fails only if the child already exited, which `wait` handles.
    let _ = child.kill();
    child.wait()?;
    Ok(())
}

/// Prints each command line instead of running it
#[derive(Debug)]
pub struct DryRunRunner<W> {
    out: W,
}

impl<W: Write> DryRunRunner<W> {
    pub fn new(out: W) -> Self {
        DryRunRunner { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> CommandRunner for DryRunRunner<W> {
    fn run(&mut self, invocation: &Invocation<'_>) -> io::Result<CommandStatus> {
        writeln!(
            self.out,
            "[{}] {} {}",
            invocation.recipe, invocation.shell, invocation.line
        )?;
        Ok(CommandStatus::Success)
    }
}
