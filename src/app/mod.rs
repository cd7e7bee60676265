use crate::api::EnvConfig;
use crate::components::notes::ToastStack;
use crate::models::ALL_TAGS_SLUG;
use crate::pages::NotesPage;
use crate::state::{AppContext, AppState};
use leptos::prelude::*;
use leptos_router::components::{Redirect, Route, Router, Routes};
use leptos_router::path;

#[component]
pub(crate) fn App(config: EnvConfig) -> impl IntoView {
    provide_context(AppContext(AppState::new(&config)));

    let home = format!("/notes/filter/{ALL_TAGS_SLUG}");

    view! {
        <Router>
            <Routes fallback=|| view! { <div class="px-4 py-8 text-xs text-muted-foreground">"Not found"</div> }>
                <Route path=path!("notes/filter/:tag") view=NotesPage />
                <Route path=path!("") view=move || view! { <Redirect path=home.clone() /> } />
            </Routes>
        </Router>
        <ToastStack />
    }
}
