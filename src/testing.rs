//! In-memory stand-in for the remote notes backend, used by unit tests.

use crate::api::{ApiError, ApiResult, NotesService};
use crate::cache::NotesKey;
use crate::models::{CreateNoteRequest, Note, NotePage};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

pub(crate) struct MockNotesService {
    notes: Mutex<Vec<Note>>,
    per_page: usize,
    fail_creates: bool,
    list_calls: AtomicUsize,
    create_calls: AtomicUsize,
}

impl Default for MockNotesService {
    fn default() -> Self {
        Self {
            notes: Mutex::new(Vec::new()),
            per_page: 12,
            fail_creates: false,
            list_calls: AtomicUsize::new(0),
            create_calls: AtomicUsize::new(0),
        }
    }
}

impl MockNotesService {
    pub(crate) fn failing_creates(mut self) -> Self {
        self.fail_creates = true;
        self
    }

    pub(crate) fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    pub(crate) fn create_calls(&self) -> usize {
        self.create_calls.load(Ordering::SeqCst)
    }

    /// Owned-key form, convenient as a cache fetcher.
    pub(crate) async fn list_notes_owned(&self, key: NotesKey) -> ApiResult<NotePage> {
        self.list_notes(&key).await
    }
}

impl NotesService for MockNotesService {
    async fn list_notes(&self, key: &NotesKey) -> ApiResult<NotePage> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);

        let needle = key.search.to_lowercase();
        let notes = self.notes.lock().map_err(|e| ApiError::Network(e.to_string()))?;
        let matching: Vec<Note> = notes
            .iter()
            .filter(|n| key.tag.map_or(true, |t| n.tag == t))
            .filter(|n| {
                needle.is_empty()
                    || n.title.to_lowercase().contains(&needle)
                    || n.content.to_lowercase().contains(&needle)
            })
            .cloned()
            .collect();

        let total_pages = matching.len().div_ceil(self.per_page) as u32;
        let start = (key.page.max(1) as usize - 1) * self.per_page;
        Ok(NotePage {
            notes: matching.into_iter().skip(start).take(self.per_page).collect(),
            total_pages,
        })
    }

    async fn create_note(&self, req: &CreateNoteRequest) -> ApiResult<Note> {
        let n = self.create_calls.fetch_add(1, Ordering::SeqCst) + 1;
        if self.fail_creates {
            return Err(ApiError::Http {
                status: 500,
                body: "internal error".to_string(),
                context: "Create note failed",
            });
        }

        let note = Note {
            id: format!("note-{n}"),
            title: req.title.clone(),
            content: req.content.clone(),
            tag: req.tag,
            created_at: "2025-01-01T00:00:00.000Z".to_string(),
            updated_at: "2025-01-01T00:00:00.000Z".to_string(),
        };
        let mut notes = self.notes.lock().map_err(|e| ApiError::Network(e.to_string()))?;
        notes.insert(0, note.clone());
        Ok(note)
    }
}
