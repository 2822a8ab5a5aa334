pub mod auth;
pub mod cli;
pub mod config;
pub mod entity;
pub mod error;
pub mod forms;
pub mod slug;
pub mod storage;
pub mod web;

pub use config::Config;
pub use error::{NoteboxError, Result};
pub use storage::SqliteStore;
pub use web::{router, AppState};
