use crate::api::{ApiResult, NotesService};
use crate::cache::{NotesCache, NOTES_NAMESPACE};
use crate::models::{CreateNoteRequest, Note, NoteTag};
use std::collections::HashSet;
use thiserror::Error;

pub(crate) const TITLE_MIN_CHARS: usize = 3;
pub(crate) const TITLE_MAX_CHARS: usize = 50;
pub(crate) const CONTENT_MAX_CHARS: usize = 500;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) enum Field {
    Title,
    Content,
    Tag,
}

/// Inline, per-field validation failure. Never sent to the backend.
#[derive(Error, Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum FormError {
    #[error("Title is required")]
    TitleRequired,
    #[error("Title is too short")]
    TitleTooShort,
    #[error("Title is too long")]
    TitleTooLong,
    #[error("Content is too long")]
    ContentTooLong,
    #[error("Tag is required")]
    TagRequired,
    #[error("Invalid tag")]
    TagInvalid,
}

impl FormError {
    pub(crate) fn field(self) -> Field {
        match self {
            FormError::TitleRequired | FormError::TitleTooShort | FormError::TitleTooLong => {
                Field::Title
            }
            FormError::ContentTooLong => Field::Content,
            FormError::TagRequired | FormError::TagInvalid => Field::Tag,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct FormErrors(Vec<FormError>);

impl FormErrors {
    pub(crate) fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub(crate) fn for_field(&self, field: Field) -> Option<FormError> {
        self.0.iter().copied().find(|e| e.field() == field)
    }
}

/// Raw field values as typed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct NoteDraft {
    pub title: String,
    pub content: String,
    pub tag: String,
}

impl Default for NoteDraft {
    fn default() -> Self {
        Self {
            title: String::new(),
            content: String::new(),
            tag: NoteTag::default().to_string(),
        }
    }
}

type Validator = fn(&NoteDraft) -> Option<FormError>;

/// Run in order; each field reports at most one error.
const VALIDATORS: &[Validator] = &[validate_title, validate_content, validate_tag];

fn validate_title(d: &NoteDraft) -> Option<FormError> {
    let len = d.title.trim().chars().count();
    if len == 0 {
        Some(FormError::TitleRequired)
    } else if len < TITLE_MIN_CHARS {
        Some(FormError::TitleTooShort)
    } else if len > TITLE_MAX_CHARS {
        Some(FormError::TitleTooLong)
    } else {
        None
    }
}

fn validate_content(d: &NoteDraft) -> Option<FormError> {
    (d.content.trim().chars().count() > CONTENT_MAX_CHARS).then_some(FormError::ContentTooLong)
}

fn validate_tag(d: &NoteDraft) -> Option<FormError> {
    let tag = d.tag.trim();
    if tag.is_empty() {
        Some(FormError::TagRequired)
    } else if tag.parse::<NoteTag>().is_err() {
        Some(FormError::TagInvalid)
    } else {
        None
    }
}

impl NoteDraft {
    pub(crate) fn validate(&self) -> FormErrors {
        FormErrors(VALIDATORS.iter().filter_map(|v| v(self)).collect())
    }

    /// Trimmed request, or every validation failure.
    pub(crate) fn to_request(&self) -> Result<CreateNoteRequest, FormErrors> {
        let errors = self.validate();
        if !errors.is_empty() {
            return Err(errors);
        }

        let tag = self
            .tag
            .trim()
            .parse::<NoteTag>()
            .map_err(|_| FormErrors(vec![FormError::TagInvalid]))?;

        Ok(CreateNoteRequest {
            title: self.title.trim().to_string(),
            content: self.content.trim().to_string(),
            tag,
        })
    }
}

/// The create-note dialog's state.
#[derive(Clone, Debug, Default)]
pub(crate) struct NoteForm {
    pub values: NoteDraft,
    touched: HashSet<Field>,
    pub submitting: bool,
}

impl NoteForm {
    pub(crate) fn set(&mut self, field: Field, value: String) {
        match field {
            Field::Title => self.values.title = value,
            Field::Content => self.values.content = value,
            Field::Tag => self.values.tag = value,
        }
        self.touched.insert(field);
    }

    pub(crate) fn touch(&mut self, field: Field) {
        self.touched.insert(field);
    }

    /// Error to render next to `field`; hidden until the field is touched.
    pub(crate) fn visible_error(&self, field: Field) -> Option<FormError> {
        if !self.touched.contains(&field) {
            return None;
        }
        self.values.validate().for_field(field)
    }

    pub(crate) fn can_submit(&self) -> bool {
        !self.submitting && self.values.validate().is_empty()
    }

    /// Start a submission. Fails without side effects other than revealing
    /// every field's error.
    pub(crate) fn begin_submit(&mut self) -> Result<CreateNoteRequest, FormErrors> {
        self.touched.extend([Field::Title, Field::Content, Field::Tag]);
        if self.submitting {
            tracing::debug!("submit ignored, already submitting");
            return Err(FormErrors::default());
        }

        let req = self.values.to_request()?;
        self.submitting = true;
        Ok(req)
    }

    /// Settle a submission: success clears the form, failure keeps what the
    /// user typed so they can retry.
    pub(crate) fn finish_submit(&mut self, succeeded: bool) {
        if succeeded {
            *self = Self::default();
        } else {
            self.submitting = false;
        }
    }

    pub(crate) fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Create the note, then mark every cached list stale before returning so
/// the caller closes the dialog only after invalidation happened. The new
/// note shows up once the active list refetches.
pub(crate) async fn create_and_invalidate<S: NotesService>(
    service: &S,
    cache: &NotesCache,
    req: CreateNoteRequest,
) -> ApiResult<Note> {
    let note = match service.create_note(&req).await {
        Ok(note) => note,
        Err(e) => {
            tracing::warn!(error = %e, "create note failed");
            return Err(e);
        }
    };

    let invalidated = cache.invalidate_namespace(NOTES_NAMESPACE);
    tracing::debug!(note_id = %note.id, invalidated, "notes cache invalidated after create");
    Ok(note)
}
