pub use crate::debouncer::{DebounceState, Debouncer};
pub use crate::error::DebounceError;
pub use crate::hook::{Debounced, use_debounce};
pub use crate::spec::DebounceSpec;
pub use quell_core::prelude::*;
