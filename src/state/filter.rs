use crate::cache::NotesKey;
use crate::models::NoteTag;

/// Tag, page and committed search term of the notes list.
///
/// The tag mirrors the route. Keeping it here lets a tag switch and its
/// page reset land in one update, so no key is ever composed from the new
/// tag and the old page.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct NotesFilter {
    pub tag: Option<NoteTag>,
    pub page: u32,
    pub search: String,
}

impl Default for NotesFilter {
    fn default() -> Self {
        Self::for_tag(None)
    }
}

impl NotesFilter {
    pub(crate) fn for_tag(tag: Option<NoteTag>) -> Self {
        Self {
            tag,
            page: 1,
            search: String::new(),
        }
    }

    /// Follow the route's tag. A different tag goes back to page 1 and keeps
    /// the search term. Returns whether anything changed.
    pub(crate) fn set_tag(&mut self, tag: Option<NoteTag>) -> bool {
        if self.tag == tag {
            return false;
        }
        self.tag = tag;
        self.page = 1;
        true
    }

    /// Apply a debounced search commit. Always goes back to page 1, even
    /// when the term is unchanged: the old page may not exist in the new
    /// result set.
    pub(crate) fn commit_search(&mut self, term: impl Into<String>) {
        self.search = term.into();
        self.page = 1;
    }

    /// Jump to `page`, clamped to `[1, total_pages]`.
    pub(crate) fn set_page(&mut self, page: u32, total_pages: u32) {
        self.page = page.clamp(1, total_pages.max(1));
    }

    pub(crate) fn key(&self) -> NotesKey {
        NotesKey::new(self.page, self.search.clone(), self.tag)
    }
}
