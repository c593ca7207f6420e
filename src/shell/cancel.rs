//! Cancellation of running steps.
//!
//! A [`CancelToken`] is shared between the host and a running step. The host
//! either cancels it explicitly (the build was aborted) or gives it a
//! deadline up front.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Why a step was interrupted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancelReason {
    /// The enclosing build was aborted.
    Aborted,
    /// The host-supplied deadline passed.
    DeadlineExceeded,
}

/// Shared, cloneable cancellation signal.
#[derive(Debug, Clone)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
    deadline: Option<Instant>,
}

impl Default for CancelToken {
    fn default() -> Self {
        Self::new()
    }
}

impl CancelToken {
    /// A token that is only cancelled explicitly.
    pub fn new() -> Self {
        Self {
            cancelled: Arc::new(AtomicBool::new(false)),
            deadline: None,
        }
    }

    /// A token that also fires once `timeout` has elapsed from now.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self::new().expires_after(timeout)
    }

    /// A token sharing this one's abort flag that also fires once `timeout`
    /// has elapsed from now.
    pub fn expires_after(&self, timeout: Duration) -> Self {
        Self {
            cancelled: Arc::clone(&self.cancelled),
            deadline: Some(Instant::now() + timeout),
        }
    }

    /// Signal cancellation to every clone of this token.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    /// Current cancellation state. Explicit cancellation wins over the deadline.
    pub fn reason(&self) -> Option<CancelReason> {
        if self.cancelled.load(Ordering::SeqCst) {
            return Some(CancelReason::Aborted);
        }
        match self.deadline {
            Some(deadline) if Instant::now() >= deadline => Some(CancelReason::DeadlineExceeded),
            _ => None,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.reason().is_some()
    }
}
