use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

use quell_core::{TimerHost, TimerId};
use web_time::Duration;

use crate::spec::DebounceSpec;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DebounceState {
    Idle,
    Pending,
    /// Terminal: nothing will be invoked again.
    Disposed,
}

/// Collapses bursts of `trigger` calls into a single call of the action,
/// made once `delay` has passed without another trigger.
///
/// Only the latest arguments are kept, and the action that runs is the one
/// current when the timer fires, not when it was scheduled. Clones share
/// the same instance; dropping the last one cancels any pending call.
pub struct Debouncer<A: 'static> {
    inner: Rc<Inner<A>>,
}

struct Inner<A> {
    host: Rc<dyn TimerHost>,
    delay: Duration,
    action: RefCell<Rc<dyn Fn(A)>>,
    pending: Cell<Option<TimerId>>,
    disposed: Cell<bool>,
}

impl<A: 'static> Debouncer<A> {
    pub fn new(
        host: Rc<dyn TimerHost>,
        spec: impl Into<DebounceSpec>,
        action: impl Fn(A) + 'static,
    ) -> Self {
        Self::with_action(host, spec.into(), Rc::new(action))
    }

    pub(crate) fn with_action(
        host: Rc<dyn TimerHost>,
        spec: DebounceSpec,
        action: Rc<dyn Fn(A)>,
    ) -> Self {
        Self {
            inner: Rc::new(Inner {
                host,
                delay: spec.delay,
                action: RefCell::new(action),
                pending: Cell::new(None),
                disposed: Cell::new(false),
            }),
        }
    }

    /// Schedules the action with `args`, replacing any pending call.
    pub fn trigger(&self, args: A) {
        let inner = &self.inner;
        if inner.disposed.get() {
            log::debug!("debounce trigger after dispose ignored");
            return;
        }
        if let Some(id) = inner.pending.take() {
            inner.host.cancel(id);
        }

        let weak = Rc::downgrade(inner);
        let id = inner
            .host
            .schedule_after(inner.delay, Box::new(move || Self::fire(&weak, args)));
        inner.pending.set(Some(id));
    }

    fn fire(weak: &Weak<Inner<A>>, args: A) {
        let Some(inner) = weak.upgrade() else {
            return;
        };
        inner.pending.set(None);
        if inner.disposed.get() {
            return;
        }
        // clone out of the slot so the action may replace itself or re-trigger
        let action = inner.action.borrow().clone();
        log::trace!("debounced action firing after {:?}", inner.delay);
        action(args);
    }

    /// Swaps the action without touching a pending timer.
    pub fn update_action(&self, action: impl Fn(A) + 'static) {
        self.replace_action(Rc::new(action));
    }

    pub(crate) fn replace_action(&self, action: Rc<dyn Fn(A)>) {
        if self.inner.disposed.get() {
            log::debug!("debounce action update after dispose ignored");
            return;
        }
        *self.inner.action.borrow_mut() = action;
    }

    /// Cancels any pending call. No invocation happens after this returns.
    pub fn dispose(&self) {
        if self.inner.disposed.replace(true) {
            return;
        }
        self.inner.cancel_pending();
    }

    pub fn state(&self) -> DebounceState {
        if self.inner.disposed.get() {
            DebounceState::Disposed
        } else if self.inner.pending.get().is_some() {
            DebounceState::Pending
        } else {
            DebounceState::Idle
        }
    }

    pub fn is_pending(&self) -> bool {
        self.state() == DebounceState::Pending
    }

    pub fn delay(&self) -> Duration {
        self.inner.delay
    }
}

impl<A> Inner<A> {
    fn cancel_pending(&self) {
        if let Some(id) = self.pending.take() {
            self.host.cancel(id);
        }
    }
}

impl<A> Drop for Inner<A> {
    fn drop(&mut self) {
        self.cancel_pending();
    }
}

impl<A: 'static> Clone for Debouncer<A> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<A: 'static> fmt::Debug for Debouncer<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Debouncer")
            .field("delay", &self.inner.delay)
            .field("state", &self.state())
            .finish()
    }
}
