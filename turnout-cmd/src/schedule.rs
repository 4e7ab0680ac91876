//! Debounced recompute trigger.
//!
//! Each [`Debouncer::trigger`] pushes the deadline out by the delay, so a
//! burst of changes produces one recompute after the burst goes quiet.

use std::time::Duration;
use tokio::time::{sleep_until, Instant};

/// Quiet period before a recompute runs.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

#[derive(Debug)]
pub struct Debouncer {
    delay: Duration,
    deadline: Option<Instant>,
    coalesced: usize,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Debouncer {
            delay,
            deadline: None,
            coalesced: 0,
        }
    }

    /// Request a recompute, replacing any pending one.
    pub fn trigger(&mut self) {
        if self.deadline.is_some() {
            self.coalesced += 1;
        }
        self.deadline = Some(Instant::now() + self.delay);
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// Resolve once the pending deadline passes; never resolves when idle.
    ///
    /// Cancel safe: dropping the future leaves the deadline in place.
    pub async fn wait(&mut self) {
        let Some(deadline) = self.deadline else {
            return std::future::pending().await;
        };
        sleep_until(deadline).await;
        self.deadline = None;
        if self.coalesced > 0 {
            log::debug!("schedule: coalesced {} trigger(s) into one run", self.coalesced);
            self.coalesced = 0;
        }
    }
}

impl Default for Debouncer {
    fn default() -> Self {
        Debouncer::new(DEFAULT_DEBOUNCE)
    }
}
