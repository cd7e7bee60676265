use crate::components::ui::{Button, ButtonVariant, FieldError, Input, Label, Spinner, Textarea};
use crate::form::{create_and_invalidate, Field, NoteForm};
use crate::models::NoteTag;
use crate::notify::Notice;
use crate::state::AppContext;
use leptos::prelude::*;
use leptos::task::spawn_local;
use strum::IntoEnumIterator;

const FIELD_CLASS: &str = "flex flex-col gap-1.5";
const SELECT_CLASS: &str = "border-input h-9 w-full rounded-md border bg-transparent px-3 text-sm shadow-xs outline-none focus-visible:ring-2 focus-visible:ring-ring/50 aria-invalid:border-destructive";

/// Values offered by the tag select, in display order.
fn tag_options() -> Vec<String> {
    NoteTag::iter().map(|tag| tag.to_string()).collect()
}

/// Create-note form. Closes itself through `on_close` after a successful
/// create; a failed create keeps the typed values and raises a toast.
#[component]
pub fn NoteFormView(#[prop(into)] on_close: Callback<()>) -> impl IntoView {
    let app = expect_context::<AppContext>().0;
    let form = RwSignal::new(NoteForm::default());

    let value = move |field: Field| {
        Signal::derive(move || {
            form.with(|f| match field {
                Field::Title => f.values.title.clone(),
                Field::Content => f.values.content.clone(),
                Field::Tag => f.values.tag.clone(),
            })
        })
    };
    let error = move |field: Field| {
        Signal::derive(move || {
            form.with(|f| f.visible_error(field).map(|e| e.to_string()))
        })
    };
    let invalid = move |field: Field| {
        Signal::derive(move || form.with(|f| f.visible_error(field).is_some()))
    };
    let setter = move |field: Field| {
        Callback::new(move |v: String| form.update(|f| f.set(field, v)))
    };
    let toucher = move |field: Field| Callback::new(move |_: ()| form.update(|f| f.touch(field)));

    let submitting = Signal::derive(move || form.with(|f| f.submitting));

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();

        let mut started = None;
        form.update(|f| started = Some(f.begin_submit()));
        let req = match started {
            Some(Ok(req)) => req,
            _ => return,
        };

        let app = app.clone();
        spawn_local(async move {
            let created = create_and_invalidate(&app.api_client, &app.notes_cache, req).await;
            let ok = created.is_ok();
            form.try_update(|f| f.finish_submit(ok));
            if ok {
                on_close.run(());
            } else {
                app.toast(Notice::CreateFailed);
            }
        });
    };

    view! {
        <form data-name="NoteForm" class="flex flex-col gap-4" on:submit=on_submit>
            <h2 class="text-lg font-semibold">"New note"</h2>

            <div class=FIELD_CLASS>
                <Label html_for="note-title">"Title"</Label>
                <Input
                    id="note-title"
                    name="title"
                    bind_value=value(Field::Title)
                    invalid=invalid(Field::Title)
                    disabled=submitting
                    on_change=setter(Field::Title)
                    on_blur=toucher(Field::Title)
                />
                <FieldError message=error(Field::Title) />
            </div>

            <div class=FIELD_CLASS>
                <Label html_for="note-content">"Content"</Label>
                <Textarea
                    id="note-content"
                    name="content"
                    rows=8
                    bind_value=value(Field::Content)
                    invalid=invalid(Field::Content)
                    disabled=submitting
                    on_change=setter(Field::Content)
                    on_blur=toucher(Field::Content)
                />
                <FieldError message=error(Field::Content) />
            </div>

            <div class=FIELD_CLASS>
                <Label html_for="note-tag">"Tag"</Label>
                <select
                    id="note-tag"
                    name="tag"
                    class=SELECT_CLASS
                    disabled=move || submitting.get()
                    aria-invalid=move || form.with(|f| f.visible_error(Field::Tag).is_some()).to_string()
                    prop:value=move || form.with(|f| f.values.tag.clone())
                    on:change=move |ev| {
                        let v = event_target_value(&ev);
                        form.update(|f| f.set(Field::Tag, v));
                    }
                    on:blur=move |_| form.update(|f| f.touch(Field::Tag))
                >
                    {tag_options()
                        .into_iter()
                        .map(|name| {
                            let label = name.clone();
                            view! { <option value=name>{label}</option> }
                        })
                        .collect_view()}
                </select>
                <FieldError message=error(Field::Tag) />
            </div>

            <div class="flex justify-end gap-2">
                <Button
                    variant=ButtonVariant::Outline
                    on:click=move |ev| {
                        // Buttons default to submit inside a form.
                        ev.prevent_default();
                        form.update(|f| f.reset());
                        on_close.run(());
                    }
                >
                    "Cancel"
                </Button>
                <Button attr:disabled=move || !form.with(|f| f.can_submit())>
                    <Show when=move || submitting.get()>
                        <Spinner />
                    </Show>
                    "Create note"
                </Button>
            </div>
        </form>
    }
}
