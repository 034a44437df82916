//! Deferred refresh scheduling
//!
//! Mutations that do not refresh immediately (see
//! [`GraphicDisplay::modify`](crate::GraphicDisplay::modify)) arm a single
//! deadline. Further mutations while it is pending are folded into the same
//! refresh. Time is whatever monotonic millisecond counter the caller has.
//!
//! ```
//! use sh1106::RefreshScheduler;
//!
//! let mut scheduler = RefreshScheduler::new(1000);
//! assert!(scheduler.notify(0));
//! assert!(!scheduler.notify(400)); // coalesced
//! assert!(!scheduler.poll(999));
//! assert!(scheduler.poll(1000));
//! assert!(!scheduler.is_pending());
//! ```

use crate::config::Config;

/// Single-shot, coalescing refresh timer
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RefreshScheduler {
    /// Delay between the first mutation and the refresh
    interval_ms: u32,
    /// Time at which the pending refresh is due
    deadline: Option<u64>,
}

impl RefreshScheduler {
    /// Create a scheduler with a fixed interval
    pub fn new(interval_ms: u32) -> Self {
        Self {
            interval_ms,
            deadline: None,
        }
    }

    /// Create a scheduler for the configured refresh rate
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.refresh_interval_ms())
    }

    /// Get the interval
    pub fn interval_ms(&self) -> u32 {
        self.interval_ms
    }

    /// Record a mutation at `now_ms`
    ///
    /// Returns `true` if this armed a new deadline, `false` if a refresh was
    /// already pending.
    pub fn notify(&mut self, now_ms: u64) -> bool {
        if self.deadline.is_some() {
            return false;
        }
        self.deadline = Some(now_ms.saturating_add(u64::from(self.interval_ms)));
        true
    }

    /// Whether a refresh is pending
    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// Get the pending deadline
    pub fn deadline(&self) -> Option<u64> {
        self.deadline
    }

    /// Returns `true` once when the pending refresh is due, and disarms
    pub fn poll(&mut self, now_ms: u64) -> bool {
        match self.deadline {
            Some(deadline) if now_ms >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }

    /// Drop any pending refresh
    pub fn cancel(&mut self) {
        self.deadline = None;
    }
}
