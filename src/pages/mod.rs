use crate::api::{ApiClient, NotesService};
use crate::cache::{NotesCache, NotesKey};
use crate::components::hooks::use_debounced_search;
use crate::components::notes::{
    Modal, NoteFormView, NoteList, Pagination, SearchBox, TagMenu,
};
use crate::components::ui::{Button, Spinner};
use crate::models::{NoteTag, TagFilter};
use crate::notify::NoticeLedger;
use crate::state::{AppContext, NotesFilter, NotesQuery, NotesView};
use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::hooks::use_params;
use leptos_router::params::Params;

#[derive(Params, PartialEq, Clone, Debug)]
pub struct NotesRouteParams {
    pub tag: Option<String>,
}

fn load_notes(cache: NotesCache, client: ApiClient, key: NotesKey) {
    spawn_local(async move {
        // Failures are recorded on the cache entry and surface through the view.
        let _ = cache
            .fetch(key, |k| async move { client.list_notes(&k).await })
            .await;
    });
}

/// `/notes/filter/:tag`: tag sidebar, search, paginated list and the create
/// dialog.
#[component]
pub fn NotesPage() -> impl IntoView {
    let app = expect_context::<AppContext>().0;
    let params = use_params::<NotesRouteParams>();

    // Params are reactive; an unknown or missing slug means no tag filter.
    let tag = Memo::new(move |_| {
        params
            .get()
            .ok()
            .and_then(|p| p.tag)
            .and_then(|slug| TagFilter::from_slug(&slug))
    });

    let filter: RwSignal<NotesFilter> = RwSignal::new(NotesFilter::for_tag(tag.get_untracked()));
    let view_state: RwSignal<NotesView> = RwSignal::new(NotesView::default());
    let modal_open: RwSignal<bool> = RwSignal::new(false);

    // Bumped by the cache on every entry change so the query effect re-reads it.
    let revision: RwSignal<u64> = RwSignal::new(0);
    let query = StoredValue::new(NotesQuery::default());
    let ledger = StoredValue::new(NoticeLedger::default());

    let subscription = app.notes_cache.subscribe(move || {
        revision.try_update(|r| *r += 1);
    });
    {
        let cache = app.notes_cache.clone();
        on_cleanup(move || cache.unsubscribe(subscription));
    }

    // Route entry and tag switches: move the filter (tag and page together)
    // and warm the tag's first page.
    {
        let cache = app.notes_cache.clone();
        let client = app.api_client.clone();
        Effect::new(move |prev: Option<Option<NoteTag>>| {
            let current = tag.get();
            if filter.with_untracked(|f| f.tag != current) {
                filter.update(|f| {
                    f.set_tag(current);
                });
            }
            if prev != Some(current) {
                tracing::debug!(tag = %TagFilter::to_slug(current), "notes route entered");
                let cache = cache.clone();
                let client = client.clone();
                spawn_local(async move {
                    cache
                        .prefetch(NotesKey::first_page(current), |k| async move {
                            client.list_notes(&k).await
                        })
                        .await;
                });
            }
            current
        });
    }

    {
        let app = app.clone();
        Effect::new(move |_| {
            revision.track();
            let key = filter.with(NotesFilter::key);
            if query.with_value(|q| q.active_key() != Some(&key)) {
                tracing::debug!(?key, "notes key activated");
            }

            let Some(obs) = query.try_update_value(|q| q.observe(&app.notes_cache, key.clone()))
            else {
                return;
            };

            if let Some(notice) = ledger.try_update_value(|l| l.observe(obs.view.settled)).flatten()
            {
                app.toast(notice);
            }
            view_state.set(obs.view);

            if obs.needs_fetch {
                load_notes(app.notes_cache.clone(), app.api_client.clone(), key);
            }
        });
    }

    let on_search = use_debounced_search(Callback::new(move |term: String| {
        filter.update(|f| f.commit_search(term));
    }));

    let on_page_change = Callback::new(move |page: u32| {
        let total = view_state.with_untracked(|v| v.total_pages());
        filter.update(|f| f.set_page(page, total));
    });

    let close_modal = Callback::new(move |_: ()| modal_open.set(false));

    let notes = Signal::derive(move || view_state.with(|v| v.notes().to_vec()));
    let total_pages = Signal::derive(move || view_state.with(|v| v.total_pages()));
    let current_page = Signal::derive(move || filter.with(|f| f.page));

    view! {
        <div class="mx-auto flex min-h-screen max-w-6xl gap-6 px-4 py-6">
            <aside class="w-40 shrink-0">
                <TagMenu active=tag />
            </aside>

            <main class="flex min-w-0 flex-1 flex-col gap-4">
                <div class="flex flex-wrap items-center justify-between gap-3">
                    <SearchBox on_search=on_search />
                    <Show when=move || view_state.with(|v| v.show_pagination())>
                        <Pagination
                            total_pages=total_pages
                            current_page=current_page
                            on_page_change=on_page_change
                        />
                    </Show>
                    <Button on:click=move |_| modal_open.set(true)>"Create note +"</Button>
                </div>

                <Show when=move || view_state.with(|v| v.is_loading)>
                    <div class="flex items-center gap-2 text-sm text-muted-foreground">
                        <Spinner />
                        "Loading, please wait..."
                    </div>
                </Show>

                <Show when=move || view_state.with(|v| v.data.is_none() && v.error.is_some())>
                    <p class="text-sm text-destructive">"Could not load notes."</p>
                </Show>

                <div class=move || {
                    if view_state.with(|v| v.is_placeholder) { "opacity-60 transition-opacity" } else { "transition-opacity" }
                }>
                    <Show when=move || !notes.with(|n| n.is_empty())>
                        <NoteList notes=notes />
                    </Show>
                </div>
            </main>

            <Show when=move || modal_open.get()>
                <Modal on_close=close_modal>
                    <NoteFormView on_close=close_modal />
                </Modal>
            </Show>
        </div>
    }
}
