pub use crate::clock::{Clock, ManualClock, SystemClock};
pub use crate::effects::{Dispose, effect, on_unmount};
pub use crate::effects_ext::disposable_effect;
pub use crate::locals::{thread_timers, timer_host, with_timer_host};
pub use crate::runtime::{
    Composition, remember, remember_state, remember_state_with_key, remember_with_key,
};
pub use crate::scope::{Scope, current_scope, scoped_effect};
pub use crate::testing::FakeTimers;
pub use crate::timer::{TimerHost, TimerId, TimerQueue};
