//! Reconnect policy for the collector socket: the backoff schedule and the
//! queue of events waiting for a live connection.

use std::collections::VecDeque;

pub const INITIAL_BACKOFF_SECS: u64 = 1;
pub const MAX_BACKOFF_SECS: u64 = 32;

/// Delay after `current`: doubled, capped at [`MAX_BACKOFF_SECS`].
pub fn next_delay(current: u64) -> u64 {
    current.saturating_mul(2).clamp(INITIAL_BACKOFF_SECS, MAX_BACKOFF_SECS)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Backoff {
    current: u64,
}

impl Default for Backoff {
    fn default() -> Self {
        Self { current: INITIAL_BACKOFF_SECS }
    }
}

impl Backoff {
    /// Seconds to wait before the next attempt; later calls wait longer.
    pub fn next_wait(&mut self) -> u64 {
        let wait = self.current;
        self.current = next_delay(self.current);
        wait
    }

    pub fn reset(&mut self) {
        self.current = INITIAL_BACKOFF_SECS;
    }
}

/// Events not yet written to a socket, oldest first.
#[derive(Debug)]
pub struct Pending<T> {
    queue: VecDeque<T>,
}

impl<T> Default for Pending<T> {
    fn default() -> Self {
        Self { queue: VecDeque::new() }
    }
}

impl<T> Pending<T> {
    pub fn push(&mut self, event: T) {
        self.queue.push_back(event);
    }

    pub fn take_next(&mut self) -> Option<T> {
        self.queue.pop_front()
    }

    /// Put back an event whose send failed so it goes out first next time.
    pub fn requeue_front(&mut self, event: T) {
        self.queue.push_front(event);
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}
