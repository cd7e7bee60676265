use crate::api::ApiError;
use crate::cache::{NotesCache, NotesKey, QueryPhase};
use crate::models::{Note, NotePage};

/// How a finished list attempt turned out.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Outcome {
    Found,
    Empty,
    Failed,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct SettledAttempt {
    pub attempt: u64,
    pub outcome: Outcome,
}

/// Everything the list screen renders from.
#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct NotesView {
    pub data: Option<NotePage>,
    /// `data` belongs to a previously active key and is shown while the
    /// current key loads.
    pub is_placeholder: bool,
    /// Nothing has ever loaded for this screen and a request is pending.
    pub is_loading: bool,
    pub is_fetching: bool,
    pub error: Option<ApiError>,
    pub settled: Option<SettledAttempt>,
}

impl NotesView {
    pub(crate) fn notes(&self) -> &[Note] {
        self.data.as_ref().map(|d| d.notes.as_slice()).unwrap_or(&[])
    }

    pub(crate) fn total_pages(&self) -> u32 {
        self.data.as_ref().map(|d| d.total_pages).unwrap_or(0)
    }

    pub(crate) fn show_pagination(&self) -> bool {
        self.total_pages() > 1
    }
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Observation {
    pub view: NotesView,
    pub needs_fetch: bool,
}

/// Observer of the one list query a screen currently shows.
#[derive(Clone, Debug, Default)]
pub(crate) struct NotesQuery {
    active: Option<NotesKey>,
    last_success: Option<(NotesKey, NotePage)>,
}

impl NotesQuery {
    pub(crate) fn active_key(&self) -> Option<&NotesKey> {
        self.active.as_ref()
    }

    /// Read the cache for `key` and derive the view.
    ///
    /// `needs_fetch` is set for a never-fetched or invalidated entry, and
    /// for a failed one at the moment its key becomes active. A failure
    /// is not refetched again until the key changes or is invalidated.
    pub(crate) fn observe(&mut self, cache: &NotesCache, key: NotesKey) -> Observation {
        let activated = self.active.as_ref() != Some(&key);
        let snap = cache.snapshot(&key);

        let needs_fetch = match snap.phase() {
            QueryPhase::Idle => true,
            QueryPhase::Fetching | QueryPhase::Success => snap.is_stale,
            QueryPhase::Error => activated || snap.is_stale,
        };

        if let Some(data) = &snap.data {
            self.last_success = Some((key.clone(), data.clone()));
        }

        let (data, is_placeholder) = match &snap.data {
            Some(d) => (Some(d.clone()), false),
            None => match &self.last_success {
                Some((prev, d)) if prev != &key => (Some(d.clone()), true),
                _ => (None, false),
            },
        };

        // A retry of a failed key with nothing to show is loading again; the
        // old error stays hidden until the new attempt settles.
        let retrying = snap.is_fetching && snap.data.is_none();
        let error = if retrying { None } else { snap.error.clone() };
        let is_loading = data.is_none() && error.is_none();

        let settled = if !snap.is_fetching && snap.attempt > 0 {
            let outcome = if snap.error.is_some() {
                Outcome::Failed
            } else if snap.data.as_ref().is_some_and(NotePage::is_empty) {
                Outcome::Empty
            } else {
                Outcome::Found
            };
            Some(SettledAttempt {
                attempt: snap.attempt,
                outcome,
            })
        } else {
            None
        };

        self.active = Some(key);

        Observation {
            view: NotesView {
                data,
                is_placeholder,
                is_loading,
                is_fetching: snap.is_fetching,
                error,
                settled,
            },
            needs_fetch,
        }
    }
}
