use crate::components::ui::{Card, CardContent, CardFooter, CardHeader, CardTitle};
use crate::models::Note;
use crate::util::short_date;
use leptos::prelude::*;

#[component]
pub(crate) fn NoteList(#[prop(into)] notes: Signal<Vec<Note>>) -> impl IntoView {
    view! {
        <ul data-name="NoteList" class="grid gap-4 sm:grid-cols-2 lg:grid-cols-3">
            <For each=move || notes.get() key=|note| note.id.clone() let:note>
                <li>
                    <NoteCard note=note />
                </li>
            </For>
        </ul>
    }
}

#[component]
fn NoteCard(note: Note) -> impl IntoView {
    let date = short_date(&note.created_at).to_string();

    view! {
        <Card class="h-full">
            <CardHeader>
                <CardTitle class="break-words">{note.title}</CardTitle>
            </CardHeader>
            <CardContent class="flex-1 whitespace-pre-wrap text-sm text-muted-foreground">
                {note.content}
            </CardContent>
            <CardFooter>
                <span class="rounded-full bg-accent px-2 py-0.5 text-xs font-medium">
                    {note.tag.to_string()}
                </span>
                <time class="text-xs text-muted-foreground" datetime=note.created_at.clone()>
                    {date}
                </time>
            </CardFooter>
        </Card>
    }
}
