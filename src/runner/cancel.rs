//! Cancellation of a running plan
//!
//! A `CancelToken` is a shared flag. The executor checks it before spawning
//! each command and the shell runner checks it while waiting on a child.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    /// A token that is only cancelled through `cancel`
    pub fn new() -> Self {
        Self::default()
    }

    /// A token that is also cancelled by SIGINT or SIGTERM.
    ///
    /// Registers process-wide handlers that set this token's flag. On
    /// non-unix hosts this is the same as `new`; the console delivers Ctrl-C
    /// to the children directly.
    pub fn from_signals() -> std::io::Result<Self> {
        let token = Self::new();
        token.register_signals()?;
        Ok(token)
    }

    #[cfg(unix)]
    fn register_signals(&self) -> std::io::Result<()> {
        use signal_hook::consts::{SIGINT, SIGTERM};

        for signal in [SIGINT, SIGTERM] {
            signal_hook::flag::register(signal, Arc::clone(&self.flag))?;
        }
        Ok(())
    }

    #[cfg(not(unix))]
    fn register_signals(&self) -> std::io::Result<()> {
        Ok(())
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cancel_is_shared_between_clones() {
        let token = CancelToken::new();
        let clone = token.clone();
        assert!(!clone.is_cancelled());

        token.cancel();
        assert!(clone.is_cancelled());
    }

    #[cfg(unix)]
    #[test]
    fn test_signal_cancels_registered_token() {
        use nix::sys::signal::{raise, Signal};

        let token = CancelToken::from_signals().unwrap();
        let plain = CancelToken::new();
        assert!(!token.is_cancelled());

        raise(Signal::SIGTERM).unwrap();
        assert!(token.is_cancelled());
        assert!(!plain.is_cancelled());
    }
}
