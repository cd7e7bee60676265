use crate::cache::CacheKey;
use crate::models::NoteTag;

pub(crate) const NOTES_NAMESPACE: &str = "notes";

/// Cache address of one list request: `["notes", page, search, tag]`.
///
/// Equality is component-wise; an absent tag never equals a present one.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub(crate) struct NotesKey {
    pub page: u32,
    pub search: String,
    pub tag: Option<NoteTag>,
}

impl NotesKey {
    pub(crate) fn new(page: u32, search: impl Into<String>, tag: Option<NoteTag>) -> Self {
        Self {
            page: page.max(1),
            search: search.into(),
            tag,
        }
    }

    /// Key the notes page warms on entry: first page, no search text.
    pub(crate) fn first_page(tag: Option<NoteTag>) -> Self {
        Self::new(1, "", tag)
    }
}

impl CacheKey for NotesKey {
    fn namespace(&self) -> &'static str {
        NOTES_NAMESPACE
    }
}
