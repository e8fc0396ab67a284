//! SQLite entity store for users and notes.
//!
//! A single [`Store`] owns the connection behind a mutex; every public
//! operation takes the lock for the duration of one statement. Slug and
//! username uniqueness are enforced by `UNIQUE` constraints in the schema,
//! so writes that bypass form validation still fail hard instead of
//! silently overwriting.

pub mod models;

pub use models::{NewNote, Note, NoteUpdate, User};

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, ErrorCode, OptionalExtension, Row};
use std::sync::{Mutex, MutexGuard};
use uuid::Uuid;

/// Errors surfaced by the store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A note with this slug already exists (UNIQUE constraint on notes.slug).
    #[error("a note with slug '{0}' already exists")]
    DuplicateSlug(String),

    /// A user with this username already exists (UNIQUE constraint on users.username).
    #[error("a user named '{0}' already exists")]
    DuplicateUsername(String),

    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// Entity store backed by SQLite.
pub struct Store {
    conn: Mutex<Connection>,
}

impl Store {
    /// Open (or create) the database at `path` and ensure the schema exists.
    ///
    /// `:memory:` yields a volatile store, used by the test suite.
    pub fn open(path: &str) -> Result<Self, StoreError> {
        let conn = if path == ":memory:" {
            Connection::open_in_memory()?
        } else {
            Connection::open(path)?
        };
        conn.pragma_update(None, "journal_mode", "wal")?;
        conn.pragma_update(None, "foreign_keys", "on")?;
        conn.pragma_update(None, "busy_timeout", 5_000)?;
        init_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Open a fresh in-memory store.
    pub fn in_memory() -> Result<Self, StoreError> {
        Self::open(":memory:")
    }

    fn lock(&self) -> MutexGuard<'_, Connection> {
        // Poisoning only happens if another thread panicked mid-statement;
        // at that point the process is going down anyway.
        self.conn.lock().expect("store mutex poisoned")
    }

    // ========================================================================
    // Users
    // ========================================================================

    /// Insert a new user. The password must already be hashed.
    pub fn create_user(&self, username: &str, password_hash: &str) -> Result<User, StoreError> {
        let user = User {
            id: Uuid::new_v4(),
            username: username.to_string(),
            password_hash: password_hash.to_string(),
            created_at: Utc::now(),
        };

        let conn = self.lock();
        conn.execute(
            "INSERT INTO users (id, username, password_hash, created_at) VALUES (?1, ?2, ?3, ?4)",
            params![
                user.id.to_string(),
                user.username,
                user.password_hash,
                user.created_at.to_rfc3339(),
            ],
        )
        .map_err(|e| classify_constraint(e, username, ""))?;

        Ok(user)
    }

    /// Look up a user by username (the login identifier).
    pub fn user_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        let conn = self.lock();
        let user = conn
            .query_row(
                "SELECT id, username, password_hash, created_at FROM users WHERE username = ?1",
                params![username],
                user_from_row,
            )
            .optional()?;
        Ok(user)
    }

    /// Look up a user by id.
    pub fn user_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        let conn = self.lock();
        let user = conn
            .query_row(
                "SELECT id, username, password_hash, created_at FROM users WHERE id = ?1",
                params![id.to_string()],
                user_from_row,
            )
            .optional()?;
        Ok(user)
    }

    // ========================================================================
    // Notes
    // ========================================================================

    /// Insert a new note. Fails with [`StoreError::DuplicateSlug`] if the
    /// slug is already taken by any note.
    pub fn create_note(&self, new: NewNote) -> Result<Note, StoreError> {
        let now = Utc::now();
        let note = Note {
            id: Uuid::new_v4(),
            title: new.title,
            body: new.body,
            slug: new.slug,
            author_id: new.author_id,
            created_at: now,
            updated_at: now,
        };

        let conn = self.lock();
        conn.execute(
            "INSERT INTO notes (id, title, body, slug, author_id, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                note.id.to_string(),
                note.title,
                note.body,
                note.slug,
                note.author_id.to_string(),
                note.created_at.to_rfc3339(),
                note.updated_at.to_rfc3339(),
            ],
        )
        .map_err(|e| classify_constraint(e, "", &note.slug))?;

        Ok(note)
    }

    /// Fetch a single note by slug.
    pub fn note_by_slug(&self, slug: &str) -> Result<Option<Note>, StoreError> {
        let conn = self.lock();
        let note = conn
            .query_row(
                "SELECT id, title, body, slug, author_id, created_at, updated_at
                 FROM notes WHERE slug = ?1",
                params![slug],
                note_from_row,
            )
            .optional()?;
        Ok(note)
    }

    /// All notes owned by `author_id`, oldest first.
    pub fn notes_by_author(&self, author_id: Uuid) -> Result<Vec<Note>, StoreError> {
        let conn = self.lock();
        let mut stmt = conn.prepare(
            "SELECT id, title, body, slug, author_id, created_at, updated_at
             FROM notes WHERE author_id = ?1 ORDER BY created_at, id",
        )?;
        let notes = stmt
            .query_map(params![author_id.to_string()], note_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(notes)
    }

    /// Update title, body, and slug of an existing note.
    ///
    /// Returns the updated note, or `None` if no note has this id.
    pub fn update_note(&self, id: Uuid, update: NoteUpdate) -> Result<Option<Note>, StoreError> {
        let updated_at = Utc::now();
        let changed = {
            let conn = self.lock();
            conn.execute(
                "UPDATE notes SET title = ?1, body = ?2, slug = ?3, updated_at = ?4 WHERE id = ?5",
                params![
                    update.title,
                    update.body,
                    update.slug,
                    updated_at.to_rfc3339(),
                    id.to_string(),
                ],
            )
            .map_err(|e| classify_constraint(e, "", &update.slug))?
        };

        if changed == 0 {
            return Ok(None);
        }
        self.note_by_id(id)
    }

    /// Delete a note by id. Returns true if a row was removed.
    pub fn delete_note(&self, id: Uuid) -> Result<bool, StoreError> {
        let conn = self.lock();
        let changed = conn.execute("DELETE FROM notes WHERE id = ?1", params![id.to_string()])?;
        Ok(changed > 0)
    }

    /// Total number of notes across all users.
    pub fn count_notes(&self) -> Result<i64, StoreError> {
        let conn = self.lock();
        let count = conn.query_row("SELECT COUNT(*) FROM notes", [], |row| row.get(0))?;
        Ok(count)
    }

    /// Whether `slug` is already used by a note other than `exclude`.
    pub fn slug_taken(&self, slug: &str, exclude: Option<Uuid>) -> Result<bool, StoreError> {
        let conn = self.lock();
        let count: i64 = match exclude {
            Some(id) => conn.query_row(
                "SELECT COUNT(*) FROM notes WHERE slug = ?1 AND id != ?2",
                params![slug, id.to_string()],
                |row| row.get(0),
            )?,
            None => conn.query_row(
                "SELECT COUNT(*) FROM notes WHERE slug = ?1",
                params![slug],
                |row| row.get(0),
            )?,
        };
        Ok(count > 0)
    }

    fn note_by_id(&self, id: Uuid) -> Result<Option<Note>, StoreError> {
        let conn = self.lock();
        let note = conn
            .query_row(
                "SELECT id, title, body, slug, author_id, created_at, updated_at
                 FROM notes WHERE id = ?1",
                params![id.to_string()],
                note_from_row,
            )
            .optional()?;
        Ok(note)
    }
}

// ============================================================================
// Schema
// ============================================================================

fn init_schema(conn: &Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS users (
            id            TEXT PRIMARY KEY,
            username      TEXT NOT NULL UNIQUE,
            password_hash TEXT NOT NULL,
            created_at    TEXT NOT NULL
        );
        CREATE TABLE IF NOT EXISTS notes (
            id         TEXT PRIMARY KEY,
            title      TEXT NOT NULL,
            body       TEXT NOT NULL,
            slug       TEXT NOT NULL UNIQUE,
            author_id  TEXT NOT NULL REFERENCES users(id),
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_notes_author ON notes(author_id);",
    )
}

// ============================================================================
// Row mapping
// ============================================================================

fn parse_uuid(idx: usize, value: String) -> Result<Uuid, rusqlite::Error> {
    value.parse().map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
    })
}

fn parse_timestamp(idx: usize, value: String) -> Result<DateTime<Utc>, rusqlite::Error> {
    DateTime::parse_from_rfc3339(&value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
        })
}

fn user_from_row(row: &Row<'_>) -> Result<User, rusqlite::Error> {
    Ok(User {
        id: parse_uuid(0, row.get(0)?)?,
        username: row.get(1)?,
        password_hash: row.get(2)?,
        created_at: parse_timestamp(3, row.get(3)?)?,
    })
}

fn note_from_row(row: &Row<'_>) -> Result<Note, rusqlite::Error> {
    Ok(Note {
        id: parse_uuid(0, row.get(0)?)?,
        title: row.get(1)?,
        body: row.get(2)?,
        slug: row.get(3)?,
        author_id: parse_uuid(4, row.get(4)?)?,
        created_at: parse_timestamp(5, row.get(5)?)?,
        updated_at: parse_timestamp(6, row.get(6)?)?,
    })
}

/// Map a UNIQUE constraint violation to the matching domain error.
///
/// SQLite reports the violated column in the error message
/// (e.g. "UNIQUE constraint failed: notes.slug").
fn classify_constraint(err: rusqlite::Error, username: &str, slug: &str) -> StoreError {
    if let rusqlite::Error::SqliteFailure(ref failure, Some(ref msg)) = err {
        if failure.code == ErrorCode::ConstraintViolation {
            if msg.contains("notes.slug") {
                return StoreError::DuplicateSlug(slug.to_string());
            }
            if msg.contains("users.username") {
                return StoreError::DuplicateUsername(username.to_string());
            }
        }
    }
    StoreError::Sqlite(err)
}

// ============================================================================
// Tests
// ============================================================================
