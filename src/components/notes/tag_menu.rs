use crate::models::{NoteTag, TagFilter};
use leptos::prelude::*;
use strum::IntoEnumIterator;

fn tag_href(tag: Option<NoteTag>) -> String {
    format!(
        "/notes/filter/{}",
        urlencoding::encode(&TagFilter::to_slug(tag))
    )
}

/// Sidebar of tag filters. "All" plus one link per tag.
#[component]
pub(crate) fn TagMenu(#[prop(into)] active: Signal<Option<NoteTag>>) -> impl IntoView {
    let entries: Vec<Option<NoteTag>> = std::iter::once(None)
        .chain(NoteTag::iter().map(Some))
        .collect();

    view! {
        <nav data-name="TagMenu" aria-label="Tags" class="flex flex-col gap-1">
            {entries
                .into_iter()
                .map(|tag| {
                    let is_active = move || active.get() == tag;
                    view! {
                        <a
                            href=tag_href(tag)
                            aria-current=move || if is_active() { "page" } else { "false" }
                            class=move || {
                                if is_active() {
                                    "rounded-md px-3 py-1.5 text-sm font-medium bg-accent text-accent-foreground"
                                } else {
                                    "rounded-md px-3 py-1.5 text-sm hover:bg-accent/60"
                                }
                            }
                        >
                            {TagFilter::to_slug(tag)}
                        </a>
                    }
                })
                .collect_view()}
        </nav>
    }
}
