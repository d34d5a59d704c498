//! Directory work queue
//!
//! An unbounded MPMC FIFO of directory paths. The enumerator owns the only
//! [`WorkQueueSender`]; workers each hold a [`WorkQueueReceiver`] and claim
//! entries with a non-blocking pop. Every entry is delivered to exactly one
//! receiver.

use crossbeam_channel::{Receiver, Sender, TryRecvError, unbounded};
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Statistics for the work queue
#[derive(Debug, Default)]
pub struct QueueStats {
    /// Total directories enqueued
    pub enqueued: AtomicU64,

    /// Total directories handed to workers
    pub dequeued: AtomicU64,
}

/// Work queue of directories waiting to be processed
pub struct WorkQueue {
    sender: Sender<PathBuf>,
    receiver: Receiver<PathBuf>,
    stats: Arc<QueueStats>,
}

impl WorkQueue {
    /// Create an empty queue
    pub fn new() -> Self {
        let (sender, receiver) = unbounded();
        Self {
            sender,
            receiver,
            stats: Arc::new(QueueStats::default()),
        }
    }

    /// Seed the queue with the root directory
    pub fn seed(&self, root: PathBuf) {
        // Both halves are alive here, so the send cannot fail.
        if self.sender.send(root).is_ok() {
            self.stats.enqueued.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Split into the producer half and a cloneable consumer half
    pub fn split(self) -> (WorkQueueSender, WorkQueueReceiver) {
        let sender = WorkQueueSender {
            sender: self.sender,
            stats: Arc::clone(&self.stats),
        };
        let receiver = WorkQueueReceiver {
            receiver: self.receiver,
            stats: self.stats,
        };
        (sender, receiver)
    }

    /// Get queue statistics
    pub fn stats(&self) -> Arc<QueueStats> {
        Arc::clone(&self.stats)
    }

    /// Get current queue length
    pub fn len(&self) -> usize {
        self.receiver.len()
    }

    /// Check if the queue is empty
    pub fn is_empty(&self) -> bool {
        self.receiver.is_empty()
    }
}

impl Default for WorkQueue {
    fn default() -> Self {
        Self::new()
    }
}

/// Producer handle, owned by the enumerator
pub struct WorkQueueSender {
    sender: Sender<PathBuf>,
    stats: Arc<QueueStats>,
}

impl WorkQueueSender {
    /// Publish a discovered directory
    ///
    /// Returns `false` if every receiver is already gone.
    pub fn push(&self, dir: PathBuf) -> bool {
        match self.sender.send(dir) {
            Ok(()) => {
                self.stats.enqueued.fetch_add(1, Ordering::Relaxed);
                true
            }
            Err(_) => false,
        }
    }

    /// Number of directories pushed so far, seed included
    pub fn enqueued(&self) -> u64 {
        self.stats.enqueued.load(Ordering::Relaxed)
    }
}

/// Consumer handle, one clone per worker
#[derive(Clone)]
pub struct WorkQueueReceiver {
    receiver: Receiver<PathBuf>,
    stats: Arc<QueueStats>,
}

impl WorkQueueReceiver {
    /// Claim the next directory without blocking
    ///
    /// `None` means the queue is drained. Only meaningful once enumeration
    /// has finished, since nothing is added after that point.
    pub fn try_pop(&self) -> Option<PathBuf> {
        match self.receiver.try_recv() {
            Ok(dir) => {
                self.stats.dequeued.fetch_add(1, Ordering::Relaxed);
                Some(dir)
            }
            Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => None,
        }
    }

    /// Directories still waiting
    pub fn len(&self) -> usize {
        self.receiver.len()
    }

    /// Check if the queue is drained
    pub fn is_empty(&self) -> bool {
        self.receiver.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Mutex;
    use std::thread;

    #[test]
    fn test_seed_and_fifo_order() {
        let queue = WorkQueue::new();
        queue.seed(PathBuf::from("/root"));
        assert_eq!(queue.len(), 1);

        let stats = queue.stats();
        let (tx, rx) = queue.split();
        assert!(tx.push(PathBuf::from("/root/a")));
        assert!(tx.push(PathBuf::from("/root/a/b")));
        assert_eq!(tx.enqueued(), 3);

        assert_eq!(rx.try_pop(), Some(PathBuf::from("/root")));
        assert_eq!(rx.try_pop(), Some(PathBuf::from("/root/a")));
        assert_eq!(rx.try_pop(), Some(PathBuf::from("/root/a/b")));
        assert_eq!(rx.try_pop(), None);
        assert_eq!(stats.dequeued.load(Ordering::Relaxed), 3);
    }

    #[test]
    fn test_drained_after_sender_dropped() {
        let (tx, rx) = WorkQueue::new().split();
        tx.push(PathBuf::from("x"));
        drop(tx);
        assert_eq!(rx.try_pop(), Some(PathBuf::from("x")));
        assert_eq!(rx.try_pop(), None);
        assert!(rx.is_empty());
    }

    #[test]
    fn test_each_entry_popped_once() {
        let (tx, rx) = WorkQueue::new().split();
        for i in 0..1000 {
            tx.push(PathBuf::from(format!("dir-{i}")));
        }
        drop(tx);

        let seen = Mutex::new(Vec::new());
        thread::scope(|s| {
            for _ in 0..8 {
                let rx = rx.clone();
                let seen = &seen;
                s.spawn(move || {
                    while let Some(dir) = rx.try_pop() {
                        seen.lock().unwrap().push(dir);
                    }
                });
            }
        });

        let seen = seen.into_inner().unwrap();
        let unique: HashSet<_> = seen.iter().collect();
        assert_eq!(seen.len(), 1000);
        assert_eq!(unique.len(), 1000);
    }
}
