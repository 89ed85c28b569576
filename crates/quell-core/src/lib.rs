//! # Lifecycles, Effects, and Timers
//!
//! `quell-core` is the host side of Quell's hooks. It does not draw anything;
//! it provides the three things a hook needs from its surroundings:
//!
//! - `Composition` — a mounted component: `compose` renders (first call is
//!   the mount), `dispose` unmounts.
//! - `remember*` — lifecycle‑aware storage bound to a composition.
//! - `TimerHost` — cancellable delayed callbacks, driven by the host loop.
//!
//! ## Remembered state
//!
//! ```rust
//! use quell_core::*;
//!
//! let ui = Composition::new();
//! for _ in 0..3 {
//!     ui.compose(|| {
//!         let clicks = remember_state(|| 0);
//!         *clicks.borrow_mut() += 1;
//!     });
//! }
//! assert_eq!(ui.compose(|| *remember_state(|| 0).borrow()), 3);
//! ```
//!
//! - `remember` and `remember_state` are order‑based: the Nth call in a
//!   composition always refers to the Nth stored value.
//! - `remember_with_key` and `remember_state_with_key` are key‑based and more
//!   stable across conditional branches.
//!
//! ## Effects and cleanup
//!
//! ```rust
//! use quell_core::*;
//!
//! let ui = Composition::new();
//! ui.compose(|| {
//!     scoped_effect(|| {
//!         log::info!("mounted");
//!         on_unmount(|| log::info!("unmounted"))
//!     });
//! });
//! ui.dispose(); // logs "unmounted"
//! ```
//!
//! - `effect` runs once when called and returns a `Dispose` guard that also
//!   runs when the current scope is torn down.
//! - `scoped_effect` is wired to the current `Scope`.
//! - `disposable_effect` re-runs (cleaning up first) whenever its key changes.
//!
//! ## Timers
//!
//! Long‑running work (debounces, polling) schedules on `timer_host()` and
//! cancels in an unmount cleanup, so nothing fires after the UI that owns it
//! disappears. Tests swap in `FakeTimers` to control time.

pub mod clock;
pub mod effects;
pub mod effects_ext;
pub mod locals;
pub mod prelude;
pub mod runtime;
pub mod scope;
pub mod testing;
pub mod timer;


pub use clock::*;
pub use effects::*;
pub use effects_ext::*;
pub use locals::*;
pub use runtime::*;
pub use scope::*;
pub use testing::*;
pub use timer::*;
