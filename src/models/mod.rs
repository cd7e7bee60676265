use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};

/// The closed set of categories a note can carry.
///
/// The backend stores the tag as its display name, so `Display`/`FromStr`
/// and the serde representation all use the variant name verbatim.
#[derive(
    Serialize,
    Deserialize,
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    Display,
    EnumString,
    EnumIter,
    AsRefStr,
)]
pub(crate) enum NoteTag {
    #[default]
    Todo,
    Work,
    Personal,
    Meeting,
    Shopping,
}

/// Route slug that disables tag filtering.
pub(crate) const ALL_TAGS_SLUG: &str = "All";

pub(crate) struct TagFilter;

impl TagFilter {
    /// Map a `/notes/filter/:tag` segment to a tag filter.
    ///
    /// `All`, empty and unrecognized slugs all mean "no filter": the client
    /// never sends a tag outside the closed set.
    pub(crate) fn from_slug(slug: &str) -> Option<NoteTag> {
        let slug = slug.trim();
        if slug.is_empty() || slug == ALL_TAGS_SLUG {
            return None;
        }

        match slug.parse::<NoteTag>() {
            Ok(tag) => Some(tag),
            Err(_) => {
                tracing::warn!(slug, "unknown tag slug, showing all notes");
                None
            }
        }
    }

    pub(crate) fn to_slug(tag: Option<NoteTag>) -> String {
        match tag {
            Some(t) => t.to_string(),
            None => ALL_TAGS_SLUG.to_string(),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Note {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub content: String,
    pub tag: NoteTag,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
}

/// One page of the remote list endpoint for a given (page, search, tag).
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub(crate) struct NotePage {
    #[serde(default)]
    pub notes: Vec<Note>,
    #[serde(default)]
    pub total_pages: u32,
}

impl NotePage {
    pub(crate) fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub(crate) struct CreateNoteRequest {
    pub title: String,
    pub content: String,
    pub tag: NoteTag,
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_tag_set_is_closed_and_ordered() {
        let tags: Vec<String> = NoteTag::iter().map(|t| t.to_string()).collect();
        assert_eq!(tags, vec!["Todo", "Work", "Personal", "Meeting", "Shopping"]);
        assert!("Urgent".parse::<NoteTag>().is_err());
        assert!("todo".parse::<NoteTag>().is_err());
    }

    #[test]
    fn test_tag_filter_from_slug() {
        assert_eq!(TagFilter::from_slug("All"), None);
        assert_eq!(TagFilter::from_slug(""), None);
        assert_eq!(TagFilter::from_slug("Work"), Some(NoteTag::Work));
        assert_eq!(TagFilter::from_slug("Nope"), None);
        assert_eq!(TagFilter::to_slug(None), "All");
        assert_eq!(TagFilter::to_slug(Some(NoteTag::Meeting)), "Meeting");
    }

    #[test]
    fn test_note_page_contract_deserialize() {
        let json = r#"{
            "notes": [{
                "id": "65ca67e7ae7f10c88b598384",
                "title": "Buy groceries",
                "content": "",
                "tag": "Shopping",
                "createdAt": "2024-02-12T18:46:31.622Z",
                "updatedAt": "2024-02-12T18:46:31.622Z"
            }],
            "totalPages": 3
        }"#;
        let page: NotePage = serde_json::from_str(json).expect("note page should parse");
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.notes[0].tag, NoteTag::Shopping);
        assert_eq!(page.notes[0].created_at, "2024-02-12T18:46:31.622Z");
    }

    #[test]
    fn test_note_with_unknown_tag_is_rejected() {
        let json = r#"{"id": "1", "title": "x", "content": "", "tag": "Urgent"}"#;
        assert!(serde_json::from_str::<Note>(json).is_err());
    }

    #[test]
    fn test_create_request_serializes_tag_name() {
        let req = CreateNoteRequest {
            title: "Standup".to_string(),
            content: "daily".to_string(),
            tag: NoteTag::Meeting,
        };
        let v = serde_json::to_value(req).expect("should serialize");
        assert_eq!(v["tag"], "Meeting");
        assert_eq!(v["title"], "Standup");
    }
}
