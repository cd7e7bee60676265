use crate::state::SearchDebouncer;
use crate::util::now_ms;
use leptos::prelude::*;
use wasm_bindgen::JsCast;

/// Wrap `on_commit` so it only sees the search text once typing has paused
/// for the debounce quiet period. Returns the callback to feed raw input to.
pub(crate) fn use_debounced_search(on_commit: Callback<String>) -> Callback<String> {
    let debouncer = StoredValue::new(SearchDebouncer::default());
    let timer_id: StoredValue<Option<i32>> = StoredValue::new(None);

    on_cleanup(move || {
        debouncer.try_update_value(|d| d.cancel());
        if let (Some(win), Some(Some(tid))) = (web_sys::window(), timer_id.try_get_value()) {
            win.clear_timeout_with_handle(tid);
        }
    });

    Callback::new(move |raw: String| {
        let Some(win) = web_sys::window() else {
            return;
        };

        let quiet_ms = debouncer.with_value(|d| d.quiet_ms());
        let Some(due_ms) = debouncer.try_update_value(|d| d.input(raw, now_ms())) else {
            return;
        };

        if let Some(tid) = timer_id.get_value() {
            win.clear_timeout_with_handle(tid);
        }

        // Polled at the scheduled due time rather than the wall clock: a timer
        // that fires a millisecond early must still commit, and a newer
        // keystroke has moved the due time past this one.
        let cb = wasm_bindgen::closure::Closure::once_into_js(move || {
            let committed = debouncer.try_update_value(|d| d.poll(due_ms)).flatten();
            if let Some(term) = committed {
                tracing::debug!(term = %term, "search committed");
                on_commit.run(term);
            }
        });

        let tid = win
            .set_timeout_with_callback_and_timeout_and_arguments_0(
                cb.as_ref().unchecked_ref(),
                quiet_ms as i32,
            )
            .ok();
        timer_id.set_value(tid);
    })
}
