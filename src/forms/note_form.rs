use serde::Deserialize;

use super::{too_long, FormErrors, Validated, REQUIRED};
use crate::entity::{Note, NoteDraft, SLUG_MAX_LENGTH, TITLE_MAX_LENGTH};
use crate::error::Result;
use crate::slug::{is_valid_slug, slug_for_title};
use crate::storage::SqliteStore;

/// Suffix appended to a slug that another note already uses
pub const WARNING: &str = " - such slug already exists, choose a unique value!";

const INVALID_SLUG: &str =
    "Enter a valid \u{201c}slug\u{201d} consisting of letters, numbers, underscores or hyphens.";
const UNSLUGGABLE_TITLE: &str = "Cannot build a slug from this title, please enter one.";

/// Submitted fields of the add and edit pages
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct NoteForm {
    pub title: String,
    pub text: String,
    pub slug: String,
}

impl NoteForm {
    /// Prefill the form from an existing note
    pub fn from_note(note: &Note) -> Self {
        Self {
            title: note.title.clone(),
            text: note.text.clone(),
            slug: note.slug.clone(),
        }
    }

    /// Validate the form.
    ///
    /// `instance` is the id of the note being edited; its own slug does not
    /// count as taken. An empty slug is derived from the title.
    pub fn validate(&self, store: &SqliteStore, instance: Option<i64>) -> Result<Validated<NoteDraft>> {
        let mut errors = FormErrors::new();

        let title = self.title.trim();
        let text = self.text.trim();
        let submitted_slug = self.slug.trim();

        let title_len = title.chars().count();
        if title.is_empty() {
            errors.add("title", REQUIRED);
        } else if title_len > TITLE_MAX_LENGTH {
            errors.add("title", too_long(TITLE_MAX_LENGTH, title_len));
        }

        if text.is_empty() {
            errors.add("text", REQUIRED);
        }

        let slug = if submitted_slug.is_empty() {
            if title.is_empty() {
                None
            } else {
                let derived = slug_for_title(title);
                if derived.is_empty() {
                    errors.add("slug", UNSLUGGABLE_TITLE);
                    None
                } else {
                    Some(derived)
                }
            }
        } else {
            let slug_len = submitted_slug.chars().count();
            if slug_len > SLUG_MAX_LENGTH {
                errors.add("slug", too_long(SLUG_MAX_LENGTH, slug_len));
                None
            } else if !is_valid_slug(submitted_slug) {
                errors.add("slug", INVALID_SLUG);
                None
            } else {
                Some(submitted_slug.to_string())
            }
        };

        if let Some(slug) = &slug {
            if store.slug_in_use(slug, instance)? {
                tracing::debug!(slug = %slug, "slug already taken");
                errors.add("slug", format!("{}{}", slug, WARNING));
            }
        }

        Ok(errors.into_validated(NoteDraft {
            title: title.to_string(),
            text: text.to_string(),
            slug: slug.unwrap_or_default(),
        }))
    }
}
