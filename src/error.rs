use thiserror::Error;

#[derive(Error, Debug)]
pub enum NoteboxError {
    #[error("Note not found: {0}")]
    NoteNotFound(String),

    #[error("Slug already in use: {0}")]
    SlugTaken(String),

    #[error("Username already in use: {0}")]
    UsernameTaken(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, NoteboxError>;
