//! # Debounce
//!
//! Collapse a burst of calls into one call after things go quiet. Every
//! trigger restarts the wait; when `delay` passes with no new trigger, the
//! action runs once with the last arguments.
//!
//! Inside a composition use [`use_debounce`]; it follows the composition's
//! lifecycle and never fires after unmount:
//!
//! ```rust
//! use quell_core::*;
//! use quell_debounce::*;
//!
//! fn search_field(results: std::rc::Rc<std::cell::RefCell<Vec<String>>>) -> Debounced<String> {
//!     use_debounce(DebounceSpec::fast(), move |query: String| {
//!         results.borrow_mut().push(query);
//!     })
//! }
//! ```
//!
//! Outside of one, build a [`Debouncer`] on any `TimerHost` and call
//! `dispose` when its owner goes away:
//!
//! ```rust
//! use quell_core::*;
//! use quell_debounce::*;
//!
//! let timers = FakeTimers::new();
//! let saves = std::rc::Rc::new(std::cell::Cell::new(0));
//! let s = saves.clone();
//! let autosave = Debouncer::new(timers.host(), DebounceSpec::slow(), move |()| s.set(s.get() + 1));
//!
//! for _ in 0..10 {
//!     autosave.trigger(());
//! }
//! timers.run_all();
//! assert_eq!(saves.get(), 1);
//! autosave.dispose();
//! ```
//!
//! Several arguments are passed as a tuple, no arguments as `()`.

pub mod debouncer;
pub mod error;
pub mod hook;
pub mod prelude;
pub mod spec;

#[cfg(test)]
mod tests;

pub use debouncer::*;
pub use error::*;
pub use hook::*;
pub use spec::*;
