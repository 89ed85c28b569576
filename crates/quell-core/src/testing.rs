//! Deterministic time for tests.
//!
//! `FakeTimers` pairs a `ManualClock` with a `TimerQueue`. Advancing time
//! walks the clock from deadline to deadline, so a timer fires "at" its own
//! deadline and anything it schedules inside the window fires too.

use std::rc::Rc;
use std::sync::Arc;

use web_time::{Duration, Instant};

use crate::clock::{Clock, ManualClock};
use crate::timer::{TimerHost, TimerQueue};

/// Upper bound on timers fired by one `advance` or `run_all`, so a
/// self-rescheduling timer can't hang a test.
const FIRE_LIMIT: usize = 10_000;

#[derive(Clone)]
pub struct FakeTimers {
    clock: ManualClock,
    queue: Rc<TimerQueue>,
    start: Instant,
}

impl FakeTimers {
    pub fn new() -> Self {
        let clock = ManualClock::new();
        let start = clock.now();
        let queue = Rc::new(TimerQueue::with_clock(Arc::new(clock.clone())));
        Self {
            clock,
            queue,
            start,
        }
    }

    pub fn host(&self) -> Rc<dyn TimerHost> {
        self.queue.clone()
    }

    pub fn queue(&self) -> &Rc<TimerQueue> {
        &self.queue
    }

    pub fn now(&self) -> Instant {
        self.queue.now()
    }

    /// Virtual time since these timers were created.
    pub fn elapsed(&self) -> Duration {
        self.now().saturating_duration_since(self.start)
    }

    /// Timers still waiting to fire.
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Moves time forward by `by`, firing everything that comes due on the way.
    /// Returns the number of timers fired.
    ///
    /// A step past the end of `Instant` fires every reachable timer and leaves
    /// the clock at the last deadline it passed.
    pub fn advance(&self, by: Duration) -> usize {
        let target = self.now().checked_add(by);
        let mut fired = 0;
        while let Some(deadline) = self.queue.next_deadline() {
            if target.is_some_and(|t| deadline > t) {
                break;
            }
            if fired >= FIRE_LIMIT {
                log::warn!("advance: stopped after {fired} timers");
                break;
            }
            self.clock.set(deadline);
            fired += self.queue.fire_due();
        }
        if let Some(target) = target {
            self.clock.set(target);
        }
        fired
    }

    /// Fires timers until none are left, moving time as needed. Timers whose
    /// delay can't be represented stay pending.
    pub fn run_all(&self) -> usize {
        let mut fired = 0;
        while let Some(deadline) = self.queue.next_deadline() {
            if fired >= FIRE_LIMIT {
                log::warn!(
                    "run_all: stopped after {fired} timers; {} still pending",
                    self.queue.len()
                );
                break;
            }
            self.clock.set(deadline);
            fired += self.queue.fire_due();
        }
        fired
    }
}

impl Default for FakeTimers {
    fn default() -> Self {
        Self::new()
    }
}
