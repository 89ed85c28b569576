//! Cleanup guards for work that outlives a single composition.
//!
//! A component that starts something with a lifetime of its own, such as a
//! pending timer or a debouncer, hands back a `Dispose` that stops it. The
//! owning `Scope` runs the guard on unmount.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

type Cleanup = Box<dyn FnOnce()>;

/// Shared, run-once teardown.
///
/// Clones point at the same cleanup. Whichever clone runs first wins; the
/// rest find nothing left to do. This lets a scope and a keyed effect both
/// hold the guard for one debouncer without cancelling it twice.
#[derive(Clone)]
pub struct Dispose(Rc<RefCell<Option<Cleanup>>>);

impl Dispose {
    pub fn new(cleanup: impl FnOnce() + 'static) -> Self {
        Self(Rc::new(RefCell::new(Some(Box::new(cleanup)))))
    }

    pub fn run(&self) {
        // the cleanup may cancel timers whose callbacks hold this guard
        let cleanup = self.0.borrow_mut().take();
        if let Some(cleanup) = cleanup {
            cleanup();
        }
    }
}

impl fmt::Debug for Dispose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = if self.0.borrow().is_some() { "armed" } else { "spent" };
        f.debug_tuple("Dispose").field(&state).finish()
    }
}

/// Starts `start` right away. Inside a scope the returned guard is also
/// registered there, so unmounting tears the work down.
pub fn effect<F>(start: F) -> Dispose
where
    F: FnOnce() -> Dispose + 'static,
{
    let guard = start();
    if let Some(scope) = crate::scope::current_scope() {
        let registered = guard.clone();
        scope.add_disposer(move || registered.run());
    }
    guard
}

/// Names the teardown half of an effect: `effect(|| on_unmount(stop))`.
pub fn on_unmount(f: impl FnOnce() + 'static) -> Dispose {
    Dispose::new(f)
}
