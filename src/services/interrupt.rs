//! SIGINT capture for operations that must clean up before exiting.

use std::sync::atomic::{AtomicBool, Ordering};

#[cfg(unix)]
use nix::sys::signal::{SaFlags, SigAction, SigHandler, SigSet, Signal, sigaction};

static INTERRUPTED: AtomicBool = AtomicBool::new(false);

/// Whether SIGINT arrived while a guard was installed.
pub fn requested() -> bool {
    INTERRUPTED.load(Ordering::SeqCst)
}

/// Record an interrupt request without a signal.
#[cfg(test)]
pub(crate) fn request() {
    INTERRUPTED.store(true, Ordering::SeqCst);
}

#[cfg(unix)]
extern "C" fn on_interrupt(_signal: nix::libc::c_int) {
    INTERRUPTED.store(true, Ordering::SeqCst);
}

/// Catches SIGINT while alive and restores the previous disposition on drop.
pub struct InterruptGuard {
    #[cfg(unix)]
    previous: Option<SigAction>,
}

impl InterruptGuard {
    pub fn install() -> Self {
        INTERRUPTED.store(false, Ordering::SeqCst);

        #[cfg(unix)]
        {
            let handler = SigHandler::Handler(on_interrupt);
            let action = SigAction::new(handler, SaFlags::empty(), SigSet::empty());
            // SAFETY: the handler only stores to an atomic, which is async-signal-safe.
            let previous = match unsafe { sigaction(Signal::SIGINT, &action) } {
                Ok(previous) => Some(previous),
                Err(err) => {
                    tracing::warn!(error = %err, "could not install SIGINT handler");
                    None
                }
            };
            Self { previous }
        }

        #[cfg(not(unix))]
        Self {}
    }
}

impl Drop for InterruptGuard {
    fn drop(&mut self) {
        #[cfg(unix)]
        if let Some(previous) = self.previous.take() {
            // SAFETY: restores the disposition that was active before `install`.
            if let Err(err) = unsafe { sigaction(Signal::SIGINT, &previous) } {
                tracing::warn!(error = %err, "could not restore SIGINT handler");
            }
        }
    }
}
