// src/entity/user.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Maximum length of a username, in characters
pub const USERNAME_MAX_LENGTH: usize = 150;

/// An account that can sign in and author notes.
///
/// The password hash lives only in the store and is never carried here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub date_joined: DateTime<Utc>,
}
