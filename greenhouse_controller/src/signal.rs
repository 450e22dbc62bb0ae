//! Capacity-1 handoff from a threshold monitor to its controller.
//!
//! Raising an already pending signal is absorbed: the raiser never blocks
//! and the controller wakes once.

use parking_lot::{Condvar, Mutex};
use tracing::trace;

#[derive(Debug, Default)]
struct SignalState {
    pending: bool,
    closed: bool,
}

/// Binary notification token.
#[derive(Debug, Default)]
pub struct Signal {
    state: Mutex<SignalState>,
    wake: Condvar,
}

impl Signal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the token pending. Returns `false` when it already was.
    pub fn raise(&self) -> bool {
        let mut state = self.state.lock();
        if state.pending {
            trace!("signal absorbed");
            return false;
        }
        state.pending = true;
        self.wake.notify_one();
        true
    }

    /// Block until the token is pending, then consume it.
    ///
    /// Returns `false` once the signal was closed; a token still pending at
    /// close time is discarded.
    pub fn wait(&self) -> bool {
        let mut state = self.state.lock();
        while !state.pending && !state.closed {
            self.wake.wait(&mut state);
        }
        if state.closed {
            return false;
        }
        state.pending = false;
        true
    }

    /// Consume the token if pending, without blocking.
    pub fn try_take(&self) -> bool {
        std::mem::take(&mut self.state.lock().pending)
    }

    pub fn is_pending(&self) -> bool {
        self.state.lock().pending
    }

    /// Wake every waiter for shutdown. Subsequent waits return immediately.
    pub fn close(&self) {
        self.state.lock().closed = true;
        self.wake.notify_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn second_raise_is_absorbed() {
        let signal = Signal::new();
        assert!(signal.raise());
        assert!(!signal.raise());
        assert!(signal.is_pending());
        assert!(signal.try_take());
        assert!(!signal.try_take());
    }

    #[test]
    fn wait_consumes_one_token() {
        let signal = Arc::new(Signal::new());
        signal.raise();
        signal.raise();

        assert!(signal.wait());
        assert!(!signal.is_pending());
    }

    #[test]
    fn wait_blocks_until_raised() {
        let signal = Arc::new(Signal::new());
        let waiter = {
            let signal = Arc::clone(&signal);
            thread::spawn(move || signal.wait())
        };
        thread::sleep(std::time::Duration::from_millis(20));
        signal.raise();
        assert!(waiter.join().unwrap());
    }

    #[test]
    fn close_releases_waiters() {
        let signal = Arc::new(Signal::new());
        let waiter = {
            let signal = Arc::clone(&signal);
            thread::spawn(move || signal.wait())
        };
        thread::sleep(std::time::Duration::from_millis(20));
        signal.close();
        assert!(!waiter.join().unwrap());
        assert!(!signal.wait());
    }
}
