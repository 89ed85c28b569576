use std::cell::{Cell, RefCell};
use std::rc::Rc;

use anyhow::Context;
use quell_core::prelude::*;
use quell_debounce::{DebounceSpec, Debounced, use_debounce};
use web_time::{Duration, Instant};

const CATALOG: &[&str] = &[
    "rust", "rustup", "rustc", "rust-analyzer", "ruby", "runit", "russh",
];

/// Typing script: (ms since start, field contents).
const KEYSTROKES: &[(u64, &str)] = &[
    (0, "r"),
    (90, "ru"),
    (170, "rus"),
    (260, "rust"),
    (900, "rust-"),
    (1000, "rust-a"),
];

struct SearchView {
    on_input: Debounced<String>,
    results: Rc<RefCell<Vec<&'static str>>>,
}

fn search_box(spec: DebounceSpec) -> SearchView {
    let results = remember_state(Vec::new);
    let searches = remember(|| Cell::new(0u32));

    let on_input = use_debounce(spec, {
        let results = results.clone();
        move |query: String| {
            searches.set(searches.get() + 1);
            let hits: Vec<&'static str> = CATALOG
                .iter()
                .copied()
                .filter(|name| name.starts_with(query.as_str()))
                .collect();
            log::info!("search #{} for {query:?}: {hits:?}", searches.get());
            *results.borrow_mut() = hits;
        }
    });

    SearchView { on_input, results }
}

fn debounce_spec_from_env() -> anyhow::Result<DebounceSpec> {
    match std::env::var("SEARCH_DEBOUNCE_MS") {
        Ok(raw) => {
            let ms: i64 = raw
                .trim()
                .parse()
                .with_context(|| format!("SEARCH_DEBOUNCE_MS is not an integer: {raw:?}"))?;
            DebounceSpec::from_millis(ms).context("invalid SEARCH_DEBOUNCE_MS")
        }
        Err(std::env::VarError::NotPresent) => Ok(DebounceSpec::default()),
        Err(e) => Err(e).context("reading SEARCH_DEBOUNCE_MS"),
    }
}

/// Pumps the timer queue until `until`, sleeping between deadlines.
fn run_until(timers: &TimerQueue, until: Instant) {
    loop {
        timers.fire_due();
        let now = timers.now();
        if now >= until {
            break;
        }
        let wake = timers.next_deadline().map_or(until, |d| d.min(until));
        std::thread::sleep(wake.saturating_duration_since(now));
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let spec = debounce_spec_from_env()?;
    log::info!("debouncing search input by {:?}", spec.delay);

    let timers = thread_timers();
    let ui = Composition::new();
    let start = timers.now();

    for &(at, text) in KEYSTROKES {
        run_until(&timers, start + Duration::from_millis(at));
        // every keystroke re-renders the field, like a real text input would
        let view = ui.compose(|| search_box(spec));
        log::info!("typed {text:?}");
        view.on_input.call(text.to_string());
    }

    // The last keystroke is still waiting; unmount before it settles.
    let view = ui.compose(|| search_box(spec));
    let pending = view.on_input.is_pending();
    ui.dispose();
    let settle = timers.now().checked_add(spec.delay.saturating_mul(2));
    run_until(&timers, settle.unwrap_or_else(|| timers.now()));

    log::info!(
        "unmounted with a search pending: {pending}; final results {:?}",
        view.results.borrow()
    );
    Ok(())
}
