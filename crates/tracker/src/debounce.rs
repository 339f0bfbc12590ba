//! Debounced rescan scheduling.

use std::time::{Duration, Instant};

use lineend_buffer::BufferId;

/// Pending rescan with its due time.
#[derive(Debug, Clone, Copy)]
struct PendingRescan {
    buffer: BufferId,
    due: Instant,
}

/// Coalesces bursts of rescan requests into one rescan per buffer.
///
/// Every `schedule` moves the due time to `now + delay`, so the rescan runs
/// once the buffer has been quiet for `delay`. Only one buffer can have a
/// pending rescan; scheduling another buffer replaces it.
#[derive(Debug)]
pub struct RescanScheduler {
    /// Quiet period before a rescan is due
    delay: Duration,
    pending: Option<PendingRescan>,
}

impl RescanScheduler {
    /// Create a scheduler with the given quiet period.
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    /// Change the quiet period used by later `schedule` calls.
    pub fn set_delay(&mut self, delay: Duration) {
        self.delay = delay;
    }

    /// Schedule (or push back) a rescan of `buffer`.
    pub fn schedule(&mut self, buffer: BufferId) {
        self.schedule_at(buffer, Instant::now());
    }

    /// Schedule relative to an explicit clock reading.
    pub fn schedule_at(&mut self, buffer: BufferId, now: Instant) {
        if let Some(pending) = self.pending {
            if pending.buffer != buffer {
                log::debug!("Rescan of {} superseded by {}", pending.buffer, buffer);
            }
        }
        self.pending = Some(PendingRescan {
            buffer,
            due: now + self.delay,
        });
    }

    /// Buffer with a pending rescan, due or not.
    pub fn pending_buffer(&self) -> Option<BufferId> {
        self.pending.map(|pending| pending.buffer)
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Check if the pending rescan is due at `now`.
    pub fn is_due_at(&self, now: Instant) -> bool {
        self.pending.is_some_and(|pending| pending.due <= now)
    }

    /// Take the pending rescan if it is due.
    pub fn take_due(&mut self) -> Option<BufferId> {
        self.take_due_at(Instant::now())
    }

    /// Take the pending rescan if it is due at `now`.
    pub fn take_due_at(&mut self, now: Instant) -> Option<BufferId> {
        if self.is_due_at(now) {
            self.pending.take().map(|pending| pending.buffer)
        } else {
            None
        }
    }

    /// Cancel any pending rescan.
    pub fn cancel(&mut self) {
        self.pending = None;
    }

    /// Cancel the pending rescan only if it belongs to `buffer`.
    pub fn cancel_for(&mut self, buffer: BufferId) {
        if self.pending_buffer() == Some(buffer) {
            self.pending = None;
        }
    }
}

impl Default for RescanScheduler {
    fn default() -> Self {
        Self::new(Duration::ZERO)
    }
}
