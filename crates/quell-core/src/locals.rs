//! # Timer host locals
//!
//! Hooks never take a timer host argument. They ask for `timer_host()`, which
//! resolves to the innermost `with_timer_host` override, or to this thread's
//! default `TimerQueue` (system clock) when nothing is installed:
//!
//! ```rust
//! use quell_core::*;
//!
//! let fake = FakeTimers::new();
//! with_timer_host(fake.host(), || {
//!     // hooks composed here schedule on the fake queue
//! });
//! ```
//!
//! Runners that rely on the default must pump `thread_timers().fire_due()`
//! from their event loop.

use std::cell::RefCell;
use std::rc::Rc;

use crate::timer::{TimerHost, TimerQueue};

thread_local! {
    static HOST_STACK: RefCell<Vec<Rc<dyn TimerHost>>> = const { RefCell::new(Vec::new()) };
    static THREAD_TIMERS: Rc<TimerQueue> = Rc::new(TimerQueue::new());
}

/// The per-thread default queue, driven by the system clock.
pub fn thread_timers() -> Rc<TimerQueue> {
    THREAD_TIMERS.with(|t| t.clone())
}

pub fn with_timer_host<R>(host: Rc<dyn TimerHost>, f: impl FnOnce() -> R) -> R {
    // Non-panicking frame guard (ensures pop on unwind)
    struct Guard;
    impl Drop for Guard {
        fn drop(&mut self) {
            HOST_STACK.with(|st| {
                st.borrow_mut().pop();
            });
        }
    }
    HOST_STACK.with(|st| st.borrow_mut().push(host));
    let _guard = Guard;
    f()
}

pub fn timer_host() -> Rc<dyn TimerHost> {
    let top = HOST_STACK.with(|st| st.borrow().last().cloned());
    match top {
        Some(host) => host,
        None => thread_timers(),
    }
}
