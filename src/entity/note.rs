// src/entity/note.rs
use serde::{Deserialize, Serialize};

/// Maximum length of a note title, in characters
pub const TITLE_MAX_LENGTH: usize = 100;

/// Maximum length of a note slug, in characters
pub const SLUG_MAX_LENGTH: usize = 100;

/// A personal note owned by exactly one user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub id: i64,
    pub title: String,
    pub text: String,
    /// Globally unique, URL-safe identifier
    pub slug: String,
    /// Id of the authoring user
    pub author: i64,
}

/// Validated field values, ready to be written to the store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteDraft {
    pub title: String,
    pub text: String,
    pub slug: String,
}

impl NoteDraft {
    pub fn new(title: impl Into<String>, text: impl Into<String>, slug: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            text: text.into(),
            slug: slug.into(),
        }
    }
}
