//! Cancellable one-shot timer
//!
//! Holds at most one pending deadline. Scheduling replaces whatever was pending, and
//! a deadline fires once, on the first poll at or after it.

use std::time::{Duration, Instant};

/// Identifies one scheduled deadline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerHandle(u64);

#[derive(Debug, Clone, Copy)]
struct Pending {
    handle: TimerHandle,
    deadline: Instant,
}

/// A single-slot timer polled by its owner
#[derive(Debug, Default)]
pub struct OneShotTimer {
    pending: Option<Pending>,
    generation: u64,
}

impl OneShotTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule a deadline `duration` after `now`, replacing any pending one
    pub fn schedule(&mut self, now: Instant, duration: Duration) -> TimerHandle {
        self.generation += 1;
        let handle = TimerHandle(self.generation);
        self.pending = Some(Pending {
            handle,
            deadline: now + duration,
        });
        handle
    }

    /// Drop the pending deadline, if any. Returns the handle that was cancelled.
    pub fn cancel(&mut self) -> Option<TimerHandle> {
        self.pending.take().map(|p| p.handle)
    }

    /// Fire the pending deadline if `now` has reached it
    pub fn poll(&mut self, now: Instant) -> Option<TimerHandle> {
        match self.pending {
            Some(p) if now >= p.deadline => {
                self.pending = None;
                Some(p.handle)
            }
            _ => None,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Handle of the pending deadline
    pub fn pending_handle(&self) -> Option<TimerHandle> {
        self.pending.map(|p| p.handle)
    }

    /// Time left before the pending deadline fires
    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        self.pending
            .map(|p| p.deadline.saturating_duration_since(now))
    }
}
