//! One-shot startup gate
//!
//! Workers park in [`StartGate::wait`] until the enumerator calls
//! [`StartSignal::release`]. The release closes a channel that never carries
//! a message, so every current and future waiter wakes with a disconnect.
//! Dropping the signal releases the gate as well, which keeps workers from
//! hanging if the enumerator dies early.

use crossbeam_channel::{Receiver, Sender, bounded};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Create a connected signal/gate pair
pub fn start_gate() -> (StartSignal, StartGate) {
    let (sender, receiver) = bounded::<()>(0);
    let released = Arc::new(AtomicBool::new(false));
    (
        StartSignal {
            sender: Some(sender),
            released: Arc::clone(&released),
        },
        StartGate { receiver, released },
    )
}

/// Releasing half, held by the enumerator
pub struct StartSignal {
    sender: Option<Sender<()>>,
    released: Arc<AtomicBool>,
}

impl StartSignal {
    /// Open the gate for every waiter; later calls are no-ops
    pub fn release(&mut self) {
        if let Some(sender) = self.sender.take() {
            self.released.store(true, Ordering::Release);
            drop(sender);
        }
    }

    pub fn is_released(&self) -> bool {
        self.released.load(Ordering::Acquire)
    }
}

impl Drop for StartSignal {
    fn drop(&mut self) {
        self.release();
    }
}

/// Waiting half, cloned into every worker
#[derive(Clone)]
pub struct StartGate {
    receiver: Receiver<()>,
    released: Arc<AtomicBool>,
}

impl StartGate {
    /// Block until the gate is released; returns at once if it already was
    pub fn wait(&self) {
        if self.is_released() {
            return;
        }
        // Nothing is ever sent, so this only returns on disconnect.
        let _ = self.receiver.recv();
    }

    pub fn is_released(&self) -> bool {
        self.released.load(Ordering::Acquire)
    }
}
