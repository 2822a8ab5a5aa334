use std::path::{Path, PathBuf};

use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};
use rusqlite::{params, Connection, ErrorCode, OptionalExtension, Row};

use crate::entity::{Note, NoteDraft, User};
use crate::error::{NoteboxError, Result};

/// SQLite-backed store for users, notes and login sessions
pub struct SqliteStore {
    conn: Connection,
    path: Option<PathBuf>,
}

impl SqliteStore {
    /// Open or create the database at `path`
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let conn = Connection::open(path)?;

        let store = Self {
            conn,
            path: Some(path.to_path_buf()),
        };
        store.init_schema()?;
        Ok(store)
    }

    /// Open a private in-memory database
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self { conn, path: None };
        store.init_schema()?;
        Ok(store)
    }

    /// Location of the database file, `None` when in memory
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Initialize the database schema
    fn init_schema(&self) -> Result<()> {
        self.conn.execute_batch(
            "
            PRAGMA foreign_keys = ON;

            CREATE TABLE IF NOT EXISTS users (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                username TEXT NOT NULL UNIQUE,
                password_hash TEXT NOT NULL,
                date_joined TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS notes (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                title TEXT NOT NULL,
                text TEXT NOT NULL,
                slug TEXT NOT NULL UNIQUE,
                author_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE
            );

            CREATE INDEX IF NOT EXISTS idx_notes_author ON notes(author_id);

            CREATE TABLE IF NOT EXISTS sessions (
                token_hash TEXT PRIMARY KEY,
                user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                expires_at TEXT NOT NULL
            );
            ",
        )?;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Users
    // ------------------------------------------------------------------

    /// Insert a new user. Fails with `UsernameTaken` if the name exists.
    pub fn create_user(&self, username: &str, password_hash: &str) -> Result<User> {
        let date_joined = Utc::now().trunc_subsecs(6);
        self.conn
            .execute(
                "INSERT INTO users (username, password_hash, date_joined) VALUES (?1, ?2, ?3)",
                params![username, password_hash, timestamp(date_joined)],
            )
            .map_err(|e| map_unique_violation(e, || NoteboxError::UsernameTaken(username.to_string())))?;

        tracing::debug!(username, "user created");
        Ok(User {
            id: self.conn.last_insert_rowid(),
            username: username.to_string(),
            date_joined,
        })
    }

    /// Get a user together with their stored password hash
    pub fn find_credentials(&self, username: &str) -> Result<Option<(User, String)>> {
        let found = self
            .conn
            .query_row(
                "SELECT id, username, date_joined, password_hash FROM users WHERE username = ?1",
                [username],
                |row| Ok((user_from_row(row)?, row.get::<_, String>(3)?)),
            )
            .optional()?;
        Ok(found)
    }

    /// Whether a username is already registered
    pub fn username_exists(&self, username: &str) -> Result<bool> {
        let exists: bool = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM users WHERE username = ?1)",
            [username],
            |row| row.get(0),
        )?;
        Ok(exists)
    }

    /// All users, oldest first
    pub fn list_users(&self) -> Result<Vec<User>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, username, date_joined FROM users ORDER BY id")?;

        let users = stmt
            .query_map([], user_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(users)
    }

    // ------------------------------------------------------------------
    // Notes
    // ------------------------------------------------------------------

    /// Insert a note for `author`. Fails with `SlugTaken` on a duplicate slug.
    pub fn create_note(&self, author: i64, draft: &NoteDraft) -> Result<Note> {
        self.conn
            .execute(
                "INSERT INTO notes (title, text, slug, author_id) VALUES (?1, ?2, ?3, ?4)",
                params![draft.title, draft.text, draft.slug, author],
            )
            .map_err(|e| map_unique_violation(e, || NoteboxError::SlugTaken(draft.slug.clone())))?;

        Ok(Note {
            id: self.conn.last_insert_rowid(),
            title: draft.title.clone(),
            text: draft.text.clone(),
            slug: draft.slug.clone(),
            author,
        })
    }

    /// Look up a note by slug, visible only to its author
    pub fn note_for_author(&self, slug: &str, author: i64) -> Result<Option<Note>> {
        let note = self
            .conn
            .query_row(
                "SELECT id, title, text, slug, author_id FROM notes
                 WHERE slug = ?1 AND author_id = ?2",
                params![slug, author],
                note_from_row,
            )
            .optional()?;
        Ok(note)
    }

    /// Get a note by id, regardless of author
    pub fn get_note(&self, id: i64) -> Result<Option<Note>> {
        let note = self
            .conn
            .query_row(
                "SELECT id, title, text, slug, author_id FROM notes WHERE id = ?1",
                [id],
                note_from_row,
            )
            .optional()?;
        Ok(note)
    }

    /// Notes written by `author`, in creation order
    pub fn list_notes_for_author(&self, author: i64) -> Result<Vec<Note>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, title, text, slug, author_id FROM notes
             WHERE author_id = ?1 ORDER BY id",
        )?;

        let notes = stmt
            .query_map([author], note_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(notes)
    }

    /// Whether `slug` belongs to any note other than `exclude`
    pub fn slug_in_use(&self, slug: &str, exclude: Option<i64>) -> Result<bool> {
        let exists: bool = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM notes WHERE slug = ?1 AND id IS NOT ?2)",
            params![slug, exclude],
            |row| row.get(0),
        )?;
        Ok(exists)
    }

    /// Overwrite a note's fields. Only the author's own note is touched.
    pub fn update_note(&self, id: i64, author: i64, draft: &NoteDraft) -> Result<Note> {
        let changed = self
            .conn
            .execute(
                "UPDATE notes SET title = ?1, text = ?2, slug = ?3
                 WHERE id = ?4 AND author_id = ?5",
                params![draft.title, draft.text, draft.slug, id, author],
            )
            .map_err(|e| map_unique_violation(e, || NoteboxError::SlugTaken(draft.slug.clone())))?;

        if changed == 0 {
            return Err(NoteboxError::NoteNotFound(id.to_string()));
        }

        Ok(Note {
            id,
            title: draft.title.clone(),
            text: draft.text.clone(),
            slug: draft.slug.clone(),
            author,
        })
    }

    /// Delete the author's note. Returns false if nothing matched.
    pub fn delete_note(&self, id: i64, author: i64) -> Result<bool> {
        let removed = self.conn.execute(
            "DELETE FROM notes WHERE id = ?1 AND author_id = ?2",
            params![id, author],
        )?;
        Ok(removed > 0)
    }

    /// Total number of notes across all users
    pub fn count_notes(&self) -> Result<usize> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM notes", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    /// Number of notes written by `author`
    pub fn count_notes_for_author(&self, author: i64) -> Result<usize> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM notes WHERE author_id = ?1",
            [author],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }

    // ------------------------------------------------------------------
    // Sessions
    // ------------------------------------------------------------------

    /// Record a login session keyed by the hash of its token
    pub fn insert_session(
        &self,
        token_hash: &str,
        user_id: i64,
        expires_at: DateTime<Utc>,
    ) -> Result<()> {
        self.conn.execute(
            "INSERT INTO sessions (token_hash, user_id, expires_at) VALUES (?1, ?2, ?3)",
            params![token_hash, user_id, timestamp(expires_at)],
        )?;
        Ok(())
    }

    /// The user owning an unexpired session
    pub fn session_user(&self, token_hash: &str, now: DateTime<Utc>) -> Result<Option<User>> {
        let user = self
            .conn
            .query_row(
                "SELECT u.id, u.username, u.date_joined
                 FROM sessions s JOIN users u ON u.id = s.user_id
                 WHERE s.token_hash = ?1 AND s.expires_at > ?2",
                params![token_hash, timestamp(now)],
                user_from_row,
            )
            .optional()?;
        Ok(user)
    }

    /// Forget a session. Unknown tokens are ignored.
    pub fn delete_session(&self, token_hash: &str) -> Result<()> {
        self.conn
            .execute("DELETE FROM sessions WHERE token_hash = ?1", [token_hash])?;
        Ok(())
    }

    /// Drop sessions that expired before `now`, returning how many were removed
    pub fn purge_expired_sessions(&self, now: DateTime<Utc>) -> Result<usize> {
        let removed = self.conn.execute(
            "DELETE FROM sessions WHERE expires_at <= ?1",
            [timestamp(now)],
        )?;
        Ok(removed)
    }
}

/// Fixed-width UTC timestamp, so that text comparison orders chronologically
fn timestamp(dt: DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn user_from_row(row: &Row<'_>) -> rusqlite::Result<User> {
    let joined: String = row.get(2)?;
    let date_joined = DateTime::parse_from_rfc3339(&joined)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(2, rusqlite::types::Type::Text, Box::new(e))
        })?;

    Ok(User {
        id: row.get(0)?,
        username: row.get(1)?,
        date_joined,
    })
}

fn note_from_row(row: &Row<'_>) -> rusqlite::Result<Note> {
    Ok(Note {
        id: row.get(0)?,
        title: row.get(1)?,
        text: row.get(2)?,
        slug: row.get(3)?,
        author: row.get(4)?,
    })
}

/// Turn a UNIQUE constraint failure into a domain error, anything else into `Storage`
fn map_unique_violation(e: rusqlite::Error, on_conflict: impl FnOnce() -> NoteboxError) -> NoteboxError {
    match &e {
        rusqlite::Error::SqliteFailure(err, _) if err.code == ErrorCode::ConstraintViolation => {
            on_conflict()
        }
        _ => e.into(),
    }
}

impl From<rusqlite::Error> for NoteboxError {
    fn from(e: rusqlite::Error) -> Self {
        NoteboxError::Storage(format!("SQLite error: {}", e))
    }
}
