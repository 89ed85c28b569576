use std::any::Any;
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use crate::locals::with_timer_host;
use crate::scope::Scope;
use crate::timer::TimerHost;

thread_local! {
    static CURRENT_COMPOSER: RefCell<Option<Rc<RefCell<Composer>>>> = const { RefCell::new(None) };
}

/// Slot storage of one composition.
#[derive(Default)]
pub struct Composer {
    slots: Vec<Box<dyn Any>>,
    // slots consumed by remember calls nested in each slot's initializer
    spans: Vec<usize>,
    cursor: usize,
    keyed_slots: HashMap<String, Box<dyn Any>>,
}

impl Composer {
    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    pub fn keyed_count(&self) -> usize {
        self.keyed_slots.len()
    }
}

fn current_composer() -> Option<Rc<RefCell<Composer>>> {
    CURRENT_COMPOSER.with(|c| c.borrow().clone())
}

struct ComposeGuard {
    prev: Option<Rc<RefCell<Composer>>>,
}

impl ComposeGuard {
    fn begin(composer: Rc<RefCell<Composer>>) -> Self {
        composer.borrow_mut().cursor = 0;
        let prev = CURRENT_COMPOSER.with(|c| c.replace(Some(composer)));
        ComposeGuard { prev }
    }
}

impl Drop for ComposeGuard {
    fn drop(&mut self) {
        let prev = self.prev.take();
        CURRENT_COMPOSER.with(|c| *c.borrow_mut() = prev);
    }
}

/// One mounted component instance.
///
/// The first `compose` is the mount, every later one is an update (a
/// re-render), and `dispose` (or drop) is the unmount:
///
/// ```rust
/// use quell_core::*;
///
/// let ui = Composition::new();
/// let renders = ui.compose(|| {
///     let n = remember_state(|| 0);
///     *n.borrow_mut() += 1;
///     *n.borrow()
/// });
/// assert_eq!(renders, 1);
/// assert_eq!(ui.compose(|| *remember_state(|| 0).borrow()), 1);
/// ui.dispose();
/// ```
pub struct Composition {
    composer: Rc<RefCell<Composer>>,
    scope: Scope,
    timers: Option<Rc<dyn TimerHost>>,
    compositions: Cell<u64>,
}

impl Composition {
    pub fn new() -> Self {
        Self {
            composer: Rc::new(RefCell::new(Composer::default())),
            scope: Scope::new(),
            timers: None,
            compositions: Cell::new(0),
        }
    }

    /// Timer host seen by hooks composed here. Defaults to whatever
    /// `timer_host()` resolves to at compose time.
    pub fn with_timer_host(mut self, host: Rc<dyn TimerHost>) -> Self {
        self.timers = Some(host);
        self
    }

    pub fn compose<R>(&self, content: impl FnOnce() -> R) -> R {
        if self.scope.is_disposed() {
            log::warn!("compose on a disposed composition; effects are cleaned up immediately");
        }
        let _guard = ComposeGuard::begin(self.composer.clone());
        let n = self.compositions.get();
        self.compositions.set(n + 1);
        log::trace!("composition pass {n}");

        let run = move || self.scope.run(content);
        match &self.timers {
            Some(host) => with_timer_host(host.clone(), run),
            None => run(),
        }
    }

    /// Unmount. Runs every registered cleanup, then drops remembered values.
    pub fn dispose(&self) {
        if self.scope.is_disposed() {
            return;
        }
        self.scope.dispose();

        let (slots, keyed) = {
            let mut c = self.composer.borrow_mut();
            c.cursor = 0;
            c.spans.clear();
            (
                std::mem::take(&mut c.slots),
                std::mem::take(&mut c.keyed_slots),
            )
        };
        drop(slots);
        drop(keyed);
    }

    pub fn is_disposed(&self) -> bool {
        self.scope.is_disposed()
    }

    pub fn scope(&self) -> &Scope {
        &self.scope
    }

    pub fn composition_count(&self) -> u64 {
        self.compositions.get()
    }

    pub fn with_composer<R>(&self, f: impl FnOnce(&Composer) -> R) -> R {
        f(&self.composer.borrow())
    }
}

impl Default for Composition {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Composition {
    fn drop(&mut self) {
        self.dispose();
    }
}

/// Slot-based remember (sequential composition only)
pub fn remember<T: 'static>(init: impl FnOnce() -> T) -> Rc<T> {
    let Some(composer) = current_composer() else {
        log::warn!("remember outside of a composition; the value will not persist");
        return Rc::new(init());
    };

    let (cursor, existing) = {
        let mut c = composer.borrow_mut();
        let cursor = c.cursor;
        c.cursor += 1;
        let existing = if cursor < c.slots.len() {
            c.slots[cursor].downcast_ref::<Rc<T>>().cloned()
        } else {
            // reserve the slot so remember calls inside `init` land after it
            c.slots.push(Box::new(()));
            c.spans.push(0);
            None
        };
        if existing.is_some() {
            let nested = c.spans[cursor];
            c.cursor += nested;
        }
        (cursor, existing)
    };
    if let Some(rc) = existing {
        return rc;
    }

    let rc: Rc<T> = Rc::new(init());
    let replaced = {
        let mut c = composer.borrow_mut();
        let nested = c.cursor - cursor - 1;
        c.spans[cursor] = nested;
        std::mem::replace(&mut c.slots[cursor], Box::new(rc.clone()))
    };
    if !replaced.is::<()>() {
        log::warn!(
            "remember: slot {} type changed; replacing. \
             If this is due to conditional composition, prefer remember_with_key.",
            cursor
        );
    }
    rc
}

/// Key-based remember
pub fn remember_with_key<T: 'static>(key: impl Into<String>, init: impl FnOnce() -> T) -> Rc<T> {
    let key = key.into();
    let Some(composer) = current_composer() else {
        log::warn!("remember_with_key('{key}') outside of a composition; the value will not persist");
        return Rc::new(init());
    };

    let existing = composer.borrow().keyed_slots.get(&key).map(|slot| {
        let rc = slot.downcast_ref::<Rc<T>>().cloned();
        if rc.is_none() {
            log::warn!(
                "remember_with_key: key '{}' reused with a different type; replacing.",
                key
            );
        }
        rc
    });
    if let Some(Some(rc)) = existing {
        return rc;
    }

    let rc: Rc<T> = Rc::new(init());
    let replaced = composer
        .borrow_mut()
        .keyed_slots
        .insert(key, Box::new(rc.clone()));
    drop(replaced);
    rc
}

pub fn remember_state<T: 'static>(init: impl FnOnce() -> T) -> Rc<RefCell<T>> {
    remember(|| RefCell::new(init()))
}

pub fn remember_state_with_key<T: 'static>(
    key: impl Into<String>,
    init: impl FnOnce() -> T,
) -> Rc<RefCell<T>> {
    remember_with_key(key, || RefCell::new(init()))
}
