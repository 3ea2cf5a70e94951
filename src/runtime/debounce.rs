//! Last-value-wins debouncing
//!
//! A value pushed into a [`Debouncer`] becomes ready once no newer value has
//! arrived for the configured delay. Pushing again restarts the wait, which
//! replaces clearing and re-arming a timeout.

use std::sync::Arc;

use super::timer::{Clock, SystemClock};

pub struct Debouncer<T> {
    delay_ms: f64,
    clock: Arc<dyn Clock>,
    pending: Option<(T, f64)>,
}

impl<T> Debouncer<T> {
    /// Debouncer on the platform clock
    pub fn new(delay_ms: u64) -> Self {
        Self::with_clock(delay_ms, Arc::new(SystemClock))
    }

    pub fn with_clock(delay_ms: u64, clock: Arc<dyn Clock>) -> Self {
        Self {
            delay_ms: delay_ms as f64,
            clock,
            pending: None,
        }
    }

    pub fn delay_ms(&self) -> u64 {
        self.delay_ms as u64
    }

    /// Replace the pending value and restart the wait.
    pub fn push(&mut self, value: T) {
        self.pending = Some((value, self.clock.now_ms()));
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Milliseconds until the pending value is ready, if any is pending.
    pub fn remaining_ms(&self) -> Option<f64> {
        self.pending
            .as_ref()
            .map(|(_, at)| (at + self.delay_ms - self.clock.now_ms()).max(0.0))
    }

    /// Take the pending value once the delay has elapsed.
    pub fn poll(&mut self) -> Option<T> {
        match self.remaining_ms() {
            Some(remaining) if remaining <= 0.0 => self.pending.take().map(|(value, _)| value),
            _ => None,
        }
    }

    /// Take the pending value immediately.
    pub fn flush(&mut self) -> Option<T> {
        self.pending.take().map(|(value, _)| value)
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }
}
