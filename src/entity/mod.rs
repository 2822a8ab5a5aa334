mod note;
mod user;

pub use note::{Note, NoteDraft, SLUG_MAX_LENGTH, TITLE_MAX_LENGTH};
pub use user::{User, USERNAME_MAX_LENGTH};
