//! # Timers
//!
//! A `TimerHost` is the host loop's delayed-callback facility:
//! `schedule_after` returns a `TimerId`, and `cancel` makes sure that timer
//! never fires. Cancelling a timer that already fired, was already cancelled,
//! or belongs to nobody is a no-op.
//!
//! `TimerQueue` is the single-threaded implementation used by runners and
//! tests. The runner calls `fire_due()` on every loop turn and can sleep until
//! `next_deadline()`. A delay too far out for `Instant` never comes due; that
//! timer stays scheduled until it is cancelled.
//!
//! ```rust
//! use quell_core::*;
//! use std::rc::Rc;
//! use std::sync::Arc;
//! use web_time::Duration;
//!
//! let clock = ManualClock::new();
//! let timers = TimerQueue::with_clock(Arc::new(clock.clone()));
//!
//! let hits = Rc::new(std::cell::Cell::new(0));
//! let h = hits.clone();
//! timers.schedule_after(Duration::from_millis(10), Box::new(move || h.set(h.get() + 1)));
//!
//! clock.advance(Duration::from_millis(10));
//! assert_eq!(timers.fire_due(), 1);
//! assert_eq!(hits.get(), 1);
//! ```

use std::cell::{Cell, RefCell};
use std::sync::Arc;

use slotmap::{SlotMap, new_key_type};
use smallvec::SmallVec;
use web_time::{Duration, Instant};

use crate::clock::{Clock, SystemClock};

new_key_type! {
    /// Handle to a scheduled timer. Stale handles never alias a newer timer.
    pub struct TimerId;
}

pub trait TimerHost {
    fn schedule_after(&self, delay: Duration, callback: Box<dyn FnOnce()>) -> TimerId;
    fn cancel(&self, id: TimerId);
}

struct Pending {
    /// `None` when `now + delay` overflows `Instant`.
    deadline: Option<Instant>,
    seq: u64,
    callback: Box<dyn FnOnce()>,
}

pub struct TimerQueue {
    clock: Arc<dyn Clock>,
    timers: RefCell<SlotMap<TimerId, Pending>>,
    seq: Cell<u64>,
}

impl TimerQueue {
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            timers: RefCell::new(SlotMap::with_key()),
            seq: Cell::new(0),
        }
    }

    pub fn now(&self) -> Instant {
        self.clock.now()
    }

    pub fn len(&self) -> usize {
        self.timers.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.timers.borrow().is_empty()
    }

    pub fn is_scheduled(&self, id: TimerId) -> bool {
        self.timers.borrow().contains_key(id)
    }

    /// Earliest deadline among scheduled timers, if any.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.timers.borrow().values().filter_map(|p| p.deadline).min()
    }

    /// Fires every timer due at the current clock time and returns how many ran.
    ///
    /// Order is deadline first, then scheduling order. Timers scheduled by a
    /// callback during this pass wait for the next call, even with zero delay.
    pub fn fire_due(&self) -> usize {
        let now = self.now();
        let mut due: SmallVec<[(Instant, u64, TimerId); 8]> = self
            .timers
            .borrow()
            .iter()
            .filter_map(|(id, p)| match p.deadline {
                Some(deadline) if deadline <= now => Some((deadline, p.seq, id)),
                _ => None,
            })
            .collect();
        due.sort_unstable_by_key(|&(deadline, seq, _)| (deadline, seq));

        let mut fired = 0;
        for (_, _, id) in due {
            // an earlier callback in this pass may have cancelled it
            let removed = self.timers.borrow_mut().remove(id);
            let Some(pending) = removed else {
                continue;
            };
            (pending.callback)();
            fired += 1;
        }
        fired
    }
}

impl Default for TimerQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl TimerHost for TimerQueue {
    fn schedule_after(&self, delay: Duration, callback: Box<dyn FnOnce()>) -> TimerId {
        let seq = self.seq.get();
        self.seq.set(seq + 1);
        let deadline = self.now().checked_add(delay);
        if deadline.is_none() {
            log::debug!("timer delay {delay:?} is out of range; it will never fire");
        }
        let id = self.timers.borrow_mut().insert(Pending {
            deadline,
            seq,
            callback,
        });
        log::trace!("timer {id:?} scheduled in {delay:?}");
        id
    }

    fn cancel(&self, id: TimerId) {
        // drop the callback outside the borrow; its captures may touch the queue
        let removed = self.timers.borrow_mut().remove(id);
        if removed.is_some() {
            log::trace!("timer {id:?} cancelled");
        }
    }
}
