//! Run lifecycle state and the cooperative stop flag.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Why a run left the `Running` state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopCause {
    /// The end-of-feed marker appeared; every entry was seen.
    Exhausted,
    /// The configured number of consecutive no-progress scroll cycles
    /// was reached.
    Stalled,
    /// The operator requested a stop.
    UserStop,
    /// An error escaped the per-entry guard.
    Fatal,
}

/// Lifecycle state of the engine session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Idle,
    Running,
    Stopped(StopCause),
}

impl RunState {
    #[must_use]
    pub fn is_running(self) -> bool {
        matches!(self, Self::Running)
    }
}

/// Shared stop request, observed cooperatively by the traversal loop and
/// the detail-ready detector at their yield points. Never preempts an
/// in-flight card scrape.
#[derive(Debug, Clone, Default)]
pub struct StopFlag(Arc<AtomicBool>);

impl StopFlag {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn clear(&self) {
        self.0.store(false, Ordering::SeqCst);
    }

    #[must_use]
    pub fn is_set(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}
