use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use quell_core::{disposable_effect, on_unmount, remember, timer_host};

use crate::debouncer::{DebounceState, Debouncer};
use crate::spec::DebounceSpec;

/// Trigger handle returned by [`use_debounce`].
///
/// Handles from any composition of the same call site reach the debouncer
/// that is live now; after unmount they do nothing.
pub struct Debounced<A: 'static> {
    slot: Rc<RefCell<Option<Debouncer<A>>>>,
}

impl<A: 'static> Debounced<A> {
    pub fn call(&self, args: A) {
        let current = self.slot.borrow().clone();
        match current {
            Some(debouncer) => debouncer.trigger(args),
            None => log::debug!("debounced call after unmount ignored"),
        }
    }

    pub fn state(&self) -> DebounceState {
        self.slot
            .borrow()
            .as_ref()
            .map_or(DebounceState::Disposed, Debouncer::state)
    }

    pub fn is_pending(&self) -> bool {
        self.state() == DebounceState::Pending
    }

    /// For APIs that take plain callbacks, e.g. a text field's `on_change`.
    pub fn into_callback(self) -> Rc<dyn Fn(A)> {
        Rc::new(move |args| self.call(args))
    }
}

impl<A: 'static> Clone for Debounced<A> {
    fn clone(&self) -> Self {
        Self {
            slot: self.slot.clone(),
        }
    }
}

impl<A: 'static> fmt::Debug for Debounced<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Debounced")
            .field("state", &self.state())
            .finish()
    }
}

/// Debounces `action` for the lifetime of the calling composition.
///
/// - first composition: creates the debouncer on the current `timer_host()`
/// - every composition: hands it this composition's `action`; a pending call
///   keeps its timer and runs whichever action is current when it fires
/// - delay change: the old debouncer is disposed and a new one created
/// - unmount: the debouncer is disposed and nothing fires afterwards
///
/// ```rust
/// use quell_core::*;
/// use quell_debounce::*;
/// use web_time::Duration;
///
/// let timers = FakeTimers::new();
/// let ui = Composition::new().with_timer_host(timers.host());
/// let query = std::rc::Rc::new(std::cell::RefCell::new(String::new()));
///
/// let on_input = ui.compose(|| {
///     let query = query.clone();
///     use_debounce(Duration::from_millis(500), move |text: String| {
///         *query.borrow_mut() = text;
///     })
/// });
///
/// on_input.call("ru".into());
/// on_input.call("rust".into());
/// timers.advance(Duration::from_millis(500));
/// assert_eq!(*query.borrow(), "rust");
/// ```
pub fn use_debounce<A: 'static>(
    spec: impl Into<DebounceSpec>,
    action: impl Fn(A) + 'static,
) -> Debounced<A> {
    let spec = spec.into();
    let action: Rc<dyn Fn(A)> = Rc::new(action);
    let slot = remember(|| RefCell::new(None::<Debouncer<A>>));

    disposable_effect(spec, {
        let slot = slot.clone();
        let action = action.clone();
        move || {
            let debouncer = Debouncer::with_action(timer_host(), spec, action);
            log::debug!("debouncer created with delay {:?}", spec.delay);
            *slot.borrow_mut() = Some(debouncer.clone());
            on_unmount(move || {
                debouncer.dispose();
                let old = slot.borrow_mut().take();
                drop(old);
            })
        }
    });

    let current = slot.borrow().clone();
    if let Some(debouncer) = current {
        debouncer.replace_action(action);
    }

    Debounced { slot }
}
