use std::cell::{Cell, RefCell};
use std::rc::Rc;

use quell_core::{Composition, FakeTimers, remember_state};
use web_time::Duration;

use crate::*;

fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

type Calls<T> = Rc<RefCell<Vec<T>>>;

fn recording<T: 'static>() -> (Calls<T>, impl Fn(T) + 'static) {
    let calls: Calls<T> = Rc::new(RefCell::new(Vec::new()));
    let c = calls.clone();
    (calls, move |v: T| c.borrow_mut().push(v))
}

#[test]
fn test_no_immediate_call() {
    let timers = FakeTimers::new();
    let (calls, action) = recording::<&str>();
    let d = Debouncer::new(timers.host(), ms(500), action);

    d.trigger("a");
    assert!(calls.borrow().is_empty());
    timers.advance(ms(499));
    assert!(calls.borrow().is_empty());
    assert_eq!(d.state(), DebounceState::Pending);
}

#[test]
fn test_fires_once_after_delay() {
    let timers = FakeTimers::new();
    let (calls, action) = recording::<String>();
    let d = Debouncer::new(timers.host(), ms(500), action);

    d.trigger("hello".to_string());
    assert_eq!(timers.advance(ms(500)), 1);
    assert_eq!(*calls.borrow(), vec!["hello".to_string()]);
    assert_eq!(d.state(), DebounceState::Idle);

    timers.run_all();
    assert_eq!(calls.borrow().len(), 1);
}

#[test]
fn test_resets_timer_on_rapid_calls() {
    let timers = FakeTimers::new();
    let (calls, action) = recording::<&str>();
    let d = Debouncer::new(timers.host(), ms(500), action);

    d.trigger("a");
    timers.advance(ms(300));
    d.trigger("ab");
    timers.advance(ms(300));
    d.trigger("abc");

    // last call at t=600
    timers.advance(ms(300));
    assert!(calls.borrow().is_empty());
    timers.advance(ms(100));
    assert!(calls.borrow().is_empty());
    // t=1100
    timers.advance(ms(100));
    assert_eq!(*calls.borrow(), vec!["abc"]);
    assert_eq!(timers.elapsed(), ms(1100));

    timers.run_all();
    assert_eq!(*calls.borrow(), vec!["abc"]);
}

#[test]
fn test_only_one_timer_pending() {
    let timers = FakeTimers::new();
    let (_calls, action) = recording::<u32>();
    let d = Debouncer::new(timers.host(), ms(50), action);

    for i in 0..20 {
        d.trigger(i);
        assert_eq!(timers.pending(), 1);
    }
}

#[test]
fn test_latest_action_wins() {
    let timers = FakeTimers::new();
    let (old_calls, old_action) = recording::<u8>();
    let (new_calls, new_action) = recording::<u8>();
    let d = Debouncer::new(timers.host(), ms(200), old_action);

    d.trigger(1);
    timers.advance(ms(150));
    d.update_action(new_action);
    // replacing the action does not restart the wait
    timers.advance(ms(50));

    assert!(old_calls.borrow().is_empty());
    assert_eq!(*new_calls.borrow(), vec![1]);
}

#[test]
fn test_dispose_cancels_pending_call() {
    let timers = FakeTimers::new();
    let (calls, action) = recording::<&str>();
    let d = Debouncer::new(timers.host(), ms(500), action);

    d.trigger("abc");
    d.dispose();
    assert_eq!(timers.pending(), 0);
    timers.run_all();

    assert!(calls.borrow().is_empty());
    assert_eq!(d.state(), DebounceState::Disposed);
}

#[test]
fn test_dispose_is_idempotent() {
    let timers = FakeTimers::new();
    let (calls, action) = recording::<()>();
    let d = Debouncer::new(timers.host(), ms(10), action);

    d.dispose();
    d.dispose();
    d.trigger(());
    d.update_action(|()| panic!("must not run"));
    timers.run_all();

    assert!(calls.borrow().is_empty());
    assert_eq!(timers.pending(), 0);
}

#[test]
fn test_instances_are_independent() {
    let timers = FakeTimers::new();
    let (calls, action) = recording::<(char, u32)>();
    let action = Rc::new(action);
    let a1 = action.clone();
    let a2 = action.clone();
    let left = Debouncer::new(timers.host(), ms(100), move |n: u32| a1(('l', n)));
    let right = Debouncer::new(timers.host(), ms(100), move |n: u32| a2(('r', n)));

    left.trigger(1);
    timers.advance(ms(60));
    right.trigger(1);
    timers.advance(ms(40));
    // right's trigger did not reset left
    assert_eq!(*calls.borrow(), vec![('l', 1)]);

    left.trigger(2);
    left.dispose();
    timers.advance(ms(60));
    assert_eq!(*calls.borrow(), vec![('l', 1), ('r', 1)]);
    assert_eq!(right.state(), DebounceState::Idle);
}

#[test]
fn test_zero_delay_is_never_synchronous() {
    let timers = FakeTimers::new();
    let (calls, action) = recording::<i32>();
    let d = Debouncer::new(timers.host(), DebounceSpec::immediate(), action);

    d.trigger(1);
    d.trigger(2);
    assert!(calls.borrow().is_empty());

    assert_eq!(timers.queue().fire_due(), 1);
    assert_eq!(*calls.borrow(), vec![2]);
}

#[test]
fn test_unreachable_delay_stays_pending() {
    let timers = FakeTimers::new();
    let (calls, action) = recording::<i32>();
    let d = Debouncer::new(timers.host(), Duration::MAX, action);

    d.trigger(1);
    assert_eq!(d.state(), DebounceState::Pending);
    assert_eq!(timers.run_all(), 0);
    assert_eq!(timers.advance(Duration::MAX), 0);
    assert!(calls.borrow().is_empty());
    assert_eq!(d.state(), DebounceState::Pending);

    d.dispose();
    assert_eq!(timers.pending(), 0);
}

#[test]
fn test_huge_secs_delay_is_accepted_and_never_fires() {
    let timers = FakeTimers::new();
    let (calls, action) = recording::<()>();
    let spec = DebounceSpec::from_secs_f64(1.5e19).expect("fits in a Duration");
    let d = Debouncer::new(timers.host(), spec, action);

    d.trigger(());
    d.trigger(());
    assert_eq!(timers.pending(), 1);
    timers.run_all();
    assert!(calls.borrow().is_empty());
    assert!(d.is_pending());
}

#[test]
fn test_dropping_last_handle_cancels() {
    let timers = FakeTimers::new();
    let (calls, action) = recording::<i32>();
    {
        let d = Debouncer::new(timers.host(), ms(10), action);
        let d2 = d.clone();
        d2.trigger(7);
        drop(d);
        assert!(d2.is_pending());
    }
    assert_eq!(timers.pending(), 0);
    timers.run_all();
    assert!(calls.borrow().is_empty());
}

#[test]
fn test_action_can_retrigger_itself() {
    let timers = FakeTimers::new();
    let seen = Rc::new(RefCell::new(Vec::new()));
    let slot: Rc<RefCell<Option<Debouncer<u32>>>> = Rc::new(RefCell::new(None));

    let (s, me) = (seen.clone(), slot.clone());
    let d = Debouncer::new(timers.host(), ms(100), move |n: u32| {
        s.borrow_mut().push(n);
        if n < 3 {
            let this = me.borrow().clone();
            if let Some(this) = this {
                this.trigger(n + 1);
            }
        }
    });
    *slot.borrow_mut() = Some(d.clone());

    d.trigger(1);
    timers.run_all();
    assert_eq!(*seen.borrow(), vec![1, 2, 3]);
    assert_eq!(timers.elapsed(), ms(300));

    // break the self-reference cycle
    slot.borrow_mut().take();
}

#[test]
fn test_action_panic_leaves_debouncer_usable() {
    let timers = FakeTimers::new();
    let (calls, action) = recording::<bool>();
    let d = Debouncer::new(timers.host(), ms(10), move |explode: bool| {
        if explode {
            panic!("boom");
        }
        action(explode)
    });

    d.trigger(true);
    let unwound = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| timers.run_all()));
    assert!(unwound.is_err());
    assert_eq!(d.state(), DebounceState::Idle);

    d.trigger(false);
    timers.run_all();
    assert_eq!(*calls.borrow(), vec![false]);
}

#[test]
fn test_spec_rejects_bad_delays() {
    assert_eq!(
        DebounceSpec::from_millis(250),
        Ok(DebounceSpec::new(ms(250)))
    );
    assert_eq!(DebounceSpec::from_millis(0), Ok(DebounceSpec::immediate()));
    assert_eq!(
        DebounceSpec::from_millis(-1),
        Err(DebounceError::NegativeDelay(-1))
    );
    assert!(matches!(
        DebounceSpec::from_secs_f64(f64::NAN),
        Err(DebounceError::InvalidDelay(_))
    ));
    assert!(DebounceSpec::from_secs_f64(f64::INFINITY).is_err());
    assert!(DebounceSpec::from_secs_f64(-0.5).is_err());
    assert_eq!(DebounceSpec::from_secs_f64(0.5), Ok(DebounceSpec::new(ms(500))));
    assert_eq!(DebounceSpec::default().delay, ms(300));
}

#[test]
fn test_error_messages() {
    assert_eq!(
        DebounceError::NegativeDelay(-20).to_string(),
        "debounce delay must not be negative, got -20 ms"
    );
}

#[cfg(feature = "serde")]
#[test]
fn test_spec_serde() {
    let spec = DebounceSpec::fast();
    let json = serde_json::to_string(&spec).unwrap();
    let back: DebounceSpec = serde_json::from_str(&json).unwrap();
    assert_eq!(back, spec);
}

// Hook: a tiny "component" that shows the latest debounced value.
struct SearchBox {
    on_input: Debounced<String>,
    shown: Rc<RefCell<String>>,
}

fn search_box(delay: Duration, renders: &Cell<u32>) -> SearchBox {
    renders.set(renders.get() + 1);
    let shown = remember_state(String::new);
    let on_input = use_debounce(delay, {
        let shown = shown.clone();
        move |text: String| *shown.borrow_mut() = text
    });
    SearchBox { on_input, shown }
}

#[test]
fn test_hook_does_not_call_immediately() {
    let timers = FakeTimers::new();
    let ui = Composition::new().with_timer_host(timers.host());
    let renders = Cell::new(0);

    let view = ui.compose(|| search_box(ms(500), &renders));
    view.on_input.call("a".into());
    assert_eq!(*view.shown.borrow(), "");
}

#[test]
fn test_hook_calls_after_delay() {
    let timers = FakeTimers::new();
    let ui = Composition::new().with_timer_host(timers.host());
    let renders = Cell::new(0);

    let view = ui.compose(|| search_box(ms(500), &renders));
    view.on_input.call("hello".into());
    timers.advance(ms(500));
    assert_eq!(*view.shown.borrow(), "hello");
}

#[test]
fn test_hook_resets_on_rapid_input_across_renders() {
    let timers = FakeTimers::new();
    let ui = Composition::new().with_timer_host(timers.host());
    let renders = Cell::new(0);

    // each keystroke re-renders and types through the freshest handle
    for text in ["a", "ab", "abc"] {
        let view = ui.compose(|| search_box(ms(500), &renders));
        view.on_input.call(text.into());
        if text != "abc" {
            timers.advance(ms(300));
        }
    }
    let view = ui.compose(|| search_box(ms(500), &renders));

    timers.advance(ms(400));
    assert_eq!(*view.shown.borrow(), "");
    timers.advance(ms(100));
    assert_eq!(*view.shown.borrow(), "abc");
    assert_eq!(renders.get(), 4);
}

#[test]
fn test_hook_uses_action_from_latest_render() {
    let timers = FakeTimers::new();
    let ui = Composition::new().with_timer_host(timers.host());
    let log = Rc::new(RefCell::new(Vec::new()));

    let render = |generation: u32| {
        let log = log.clone();
        ui.compose(move || {
            use_debounce(ms(100), move |x: u32| log.borrow_mut().push((generation, x)))
        })
    };

    let first = render(1);
    first.call(42);
    timers.advance(ms(50));
    render(2);
    timers.advance(ms(50));

    assert_eq!(*log.borrow(), vec![(2, 42)]);
}

#[test]
fn test_hook_unmount_cancels() {
    let timers = FakeTimers::new();
    let ui = Composition::new().with_timer_host(timers.host());
    let renders = Cell::new(0);

    let view = ui.compose(|| search_box(ms(500), &renders));
    view.on_input.call("abc".into());
    assert!(view.on_input.is_pending());

    ui.dispose();
    timers.run_all();
    assert_eq!(*view.shown.borrow(), "");
    assert_eq!(view.on_input.state(), DebounceState::Disposed);

    // late calls from stale handles are quiet no-ops
    view.on_input.call("late".into());
    timers.run_all();
    assert_eq!(*view.shown.borrow(), "");
    assert_eq!(timers.pending(), 0);
}

#[test]
fn test_hook_delay_change_recreates() {
    let timers = FakeTimers::new();
    let ui = Composition::new().with_timer_host(timers.host());
    let renders = Cell::new(0);

    let slow = ui.compose(|| search_box(ms(500), &renders));
    slow.on_input.call("first".into());

    let fast = ui.compose(|| search_box(ms(100), &renders));
    // the old wait was cancelled together with the old debouncer
    assert_eq!(timers.pending(), 0);

    // the handle from the earlier render reaches the new debouncer
    slow.on_input.call("second".into());
    timers.advance(ms(100));
    assert_eq!(*fast.shown.borrow(), "second");
}

#[test]
fn test_hook_instances_are_independent() {
    let timers = FakeTimers::new();
    let left = Composition::new().with_timer_host(timers.host());
    let right = Composition::new().with_timer_host(timers.host());
    let renders = Cell::new(0);

    let l = left.compose(|| search_box(ms(200), &renders));
    let r = right.compose(|| search_box(ms(200), &renders));

    l.on_input.call("left".into());
    timers.advance(ms(150));
    r.on_input.call("right".into());
    right.dispose();
    timers.advance(ms(50));

    assert_eq!(*l.shown.borrow(), "left");
    assert_eq!(*r.shown.borrow(), "");
}

#[test]
fn test_hook_as_plain_callback() {
    let timers = FakeTimers::new();
    let ui = Composition::new().with_timer_host(timers.host());
    let renders = Cell::new(0);

    let view = ui.compose(|| search_box(ms(20), &renders));
    let on_change: Rc<dyn Fn(String)> = view.on_input.clone().into_callback();
    on_change("x".into());
    on_change("xy".into());
    timers.run_all();
    assert_eq!(*view.shown.borrow(), "xy");
}
