//! Cooperative termination conditions.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Externally visible stop signal polled by both planners.
///
/// Clones share the underlying flag, so any holder (including another
/// thread) may call [`trigger`](TerminationCondition::trigger) to cancel a
/// running solve. An optional deadline makes the condition fire on its own
/// once the wall-clock budget is spent.
#[derive(Clone, Debug)]
pub struct TerminationCondition {
    flag: Arc<AtomicBool>,
    deadline: Option<Instant>,
}

impl TerminationCondition {
    /// Condition that only fires when explicitly triggered
    pub fn never() -> Self {
        Self {
            flag: Arc::new(AtomicBool::new(false)),
            deadline: None,
        }
    }

    /// Condition that fires after the given wall-clock budget
    pub fn after(budget: Duration) -> Self {
        Self {
            flag: Arc::new(AtomicBool::new(false)),
            deadline: Some(Instant::now() + budget),
        }
    }

    /// Derive a condition sharing this one's stop flag but bounded by an
    /// additional budget starting now. Used to give each low-level call its
    /// own wall-clock allowance under the outer condition.
    pub fn with_deadline(&self, budget: Duration) -> Self {
        let local = Instant::now() + budget;
        let deadline = match self.deadline {
            Some(outer) => Some(outer.min(local)),
            None => Some(local),
        };
        Self {
            flag: Arc::clone(&self.flag),
            deadline,
        }
    }

    /// Signal cancellation to every clone of this condition
    pub fn trigger(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    /// True once triggered or past the deadline
    #[inline]
    pub fn is_triggered(&self) -> bool {
        if self.flag.load(Ordering::Relaxed) {
            return true;
        }
        match self.deadline {
            Some(deadline) => Instant::now() >= deadline,
            None => false,
        }
    }
}

impl Default for TerminationCondition {
    fn default() -> Self {
        Self::never()
    }
}
