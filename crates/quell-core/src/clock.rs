use std::sync::Arc;

use parking_lot::Mutex;
use web_time::{Duration, Instant};

/// Source of "now" for timer deadlines.
pub trait Clock: Send + Sync + 'static {
    fn now(&self) -> Instant;
}

pub struct SystemClock;
impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// A clock you can drive deterministically.
///
/// Clones share the same time, so a test can keep one handle and give the
/// other to a `TimerQueue`.
#[derive(Clone)]
pub struct ManualClock {
    t: Arc<Mutex<Instant>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::starting_at(Instant::now())
    }

    pub fn starting_at(t: Instant) -> Self {
        Self {
            t: Arc::new(Mutex::new(t)),
        }
    }

    pub fn set(&self, t: Instant) {
        let mut cur = self.t.lock();
        // never run backwards
        if t > *cur {
            *cur = t;
        }
    }

    /// Saturates: an advance past the end of `Instant` leaves the clock where it is.
    pub fn advance(&self, by: Duration) {
        let mut cur = self.t.lock();
        if let Some(t) = cur.checked_add(by) {
            *cur = t;
        }
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        *self.t.lock()
    }
}
