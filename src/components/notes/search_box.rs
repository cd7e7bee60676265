use crate::components::ui::Input;
use leptos::prelude::*;

/// Free-text search field. Reports every keystroke; debouncing is up to
/// the caller.
#[component]
pub fn SearchBox(#[prop(into)] on_search: Callback<String>) -> impl IntoView {
    let text = RwSignal::new(String::new());

    view! {
        <Input
            r#type="search"
            placeholder="Search notes"
            class="max-w-xs"
            bind_value=text
            on_change=Callback::new(move |value: String| {
                text.set(value.clone());
                on_search.run(value);
            })
        />
    }
}
