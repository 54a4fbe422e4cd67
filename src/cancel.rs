//! Cancellation and deadlines for ledger calls.

use crate::error::StoreError;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// A cancellation signal with an optional deadline.
///
/// Clones share the same flag, so a clone handed to another thread can
/// cancel a call in progress. Every store call receives one and the
/// settlement loop checks it before each balance update.
#[derive(Debug, Clone, Default)]
pub struct Cancellation {
    cancelled: Arc<AtomicBool>,
    deadline: Option<Instant>,
}

impl Cancellation {
    /// A signal that never fires unless [`cancel`](Self::cancel) is called.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_deadline(deadline: Instant) -> Self {
        Cancellation {
            cancelled: Arc::new(AtomicBool::new(false)),
            deadline: Some(deadline),
        }
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        Self::with_deadline(Instant::now() + timeout)
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Fails if the signal was cancelled or the deadline has passed.
    pub fn check(&self) -> Result<(), StoreError> {
        if self.is_cancelled() {
            return Err(StoreError::Cancelled);
        }
        match self.deadline {
            Some(deadline) if Instant::now() >= deadline => Err(StoreError::DeadlineExceeded),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_signal_passes() {
        assert!(Cancellation::new().check().is_ok());
        assert!(Cancellation::with_timeout(Duration::from_secs(60))
            .check()
            .is_ok());
    }

    #[test]
    fn test_cancel_is_shared_between_clones() {
        let signal = Cancellation::new();
        let handle = signal.clone();
        handle.cancel();

        assert!(signal.is_cancelled());
        assert_eq!(signal.check(), Err(StoreError::Cancelled));
    }

    #[test]
    fn test_expired_deadline_fails() {
        let signal = Cancellation::with_deadline(Instant::now());
        assert_eq!(signal.check(), Err(StoreError::DeadlineExceeded));
    }

    #[test]
    fn test_cancel_wins_over_deadline() {
        let signal = Cancellation::with_timeout(Duration::ZERO);
        signal.cancel();
        assert_eq!(signal.check(), Err(StoreError::Cancelled));
    }
}
