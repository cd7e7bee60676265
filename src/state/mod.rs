pub(crate) mod filter;
pub(crate) mod notes_query;
pub(crate) mod search;

pub(crate) use filter::NotesFilter;
pub(crate) use notes_query::{NotesQuery, NotesView, Outcome, SettledAttempt};
pub(crate) use search::SearchDebouncer;

use crate::api::{ApiClient, EnvConfig};
use crate::cache::NotesCache;
use crate::notify::{Notice, Toaster, TOAST_TTL_MS};
use leptos::prelude::*;
use std::time::Duration;

#[derive(Clone)]
pub(crate) struct AppState {
    pub api_client: ApiClient,

    /// Shared list cache. Every screen reads it; the create form also
    /// invalidates it.
    pub notes_cache: NotesCache,

    pub toaster: RwSignal<Toaster>,
}

impl AppState {
    pub fn new(config: &EnvConfig) -> Self {
        Self {
            api_client: ApiClient::from_config(config),
            notes_cache: NotesCache::new(),
            toaster: RwSignal::new(Toaster::default()),
        }
    }

    /// Show `notice` and schedule its removal.
    pub fn toast(&self, notice: Notice) {
        let mut id = 0;
        self.toaster.update(|t| id = t.push(notice));

        let toaster = self.toaster;
        set_timeout(
            move || {
                toaster.try_update(|t| t.dismiss(id));
            },
            Duration::from_millis(TOAST_TTL_MS),
        );
    }
}

#[derive(Clone)]
pub(crate) struct AppContext(pub AppState);
