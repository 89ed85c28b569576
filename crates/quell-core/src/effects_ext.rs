use crate::{Dispose, current_scope, on_unmount, remember, scoped_effect};
use std::cell::RefCell;

/// Runs `effect` on first composition and whenever `key` changes, running
/// the previous cleanup first. The last cleanup runs on unmount.
pub fn disposable_effect<K: PartialEq + Clone + 'static>(
    key: K,
    effect: impl FnOnce() -> Dispose + 'static,
) {
    // Slot-based; call sites must be composed unconditionally.
    let last_key = remember(|| RefCell::new(None::<K>));
    let cleanup_slot = remember(|| RefCell::new(None::<Dispose>));
    let installed = remember(|| RefCell::new(false));

    // Install a single unmount disposer for this callsite.
    if !*installed.borrow() {
        *installed.borrow_mut() = true;
        let cleanup_slot = cleanup_slot.clone();
        scoped_effect(move || {
            on_unmount(move || {
                let d = cleanup_slot.borrow_mut().take();
                if let Some(d) = d {
                    d.run();
                }
            })
        });
    }

    let changed = last_key.borrow().as_ref() != Some(&key);
    if changed {
        *last_key.borrow_mut() = Some(key);

        let previous = cleanup_slot.borrow_mut().take();
        if let Some(d) = previous {
            d.run();
        }

        let d = effect();
        if current_scope().is_some_and(|scope| scope.is_disposed()) {
            // composed after unmount: nothing will ever clean this up
            d.run();
        } else {
            *cleanup_slot.borrow_mut() = Some(d);
        }
    }
}
