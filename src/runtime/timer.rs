//! Cross-platform clock
//!
//! Uses `std::time::Instant` on native targets and `js_sys::Date::now()`
//! on `wasm32` targets (where `Instant::now()` panics with
//! "time not implemented on this platform").
//!
//! Debouncing and drawer transitions take time from a [`Clock`] so they can be
//! driven by hand in tests with [`ManualClock`].

use parking_lot::Mutex;
use std::sync::Arc;

/// Milliseconds from some fixed origin
pub trait Clock: Send + Sync {
    fn now_ms(&self) -> f64;
}

// ── Native implementation ───────────────────────────────────────────────────

#[cfg(not(target_arch = "wasm32"))]
mod imp {
    use std::sync::OnceLock;
    use std::time::Instant;

    fn origin() -> Instant {
        static ORIGIN: OnceLock<Instant> = OnceLock::new();
        *ORIGIN.get_or_init(Instant::now)
    }

    pub fn now_ms() -> f64 {
        origin().elapsed().as_secs_f64() * 1000.0
    }
}

// ── WASM implementation ─────────────────────────────────────────────────────

#[cfg(target_arch = "wasm32")]
mod imp {
    pub fn now_ms() -> f64 {
        js_sys::Date::now()
    }
}

/// Wall clock of the current platform
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> f64 {
        imp::now_ms()
    }
}

/// Clock that only moves when told to
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Arc<Mutex<f64>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&self, ms: f64) {
        *self.now.lock() += ms;
    }

    pub fn set(&self, ms: f64) {
        *self.now.lock() = ms;
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> f64 {
        *self.now.lock()
    }
}

/// Stopwatch over the system clock, used to time store round trips.
#[derive(Debug, Clone, Copy)]
pub struct Timer {
    start_ms: f64,
}

impl Timer {
    pub fn now() -> Self {
        Self {
            start_ms: imp::now_ms(),
        }
    }

    pub fn elapsed_ms(&self) -> f64 {
        imp::now_ms() - self.start_ms
    }
}
