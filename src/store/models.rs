//! Entity row types for the SQLite store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A registered user. Owns zero or more notes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    /// Bcrypt hash. Never leaves the store layer except for verification.
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// A personal text note, addressed by a globally unique slug.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Note {
    pub id: Uuid,
    pub title: String,
    pub body: String,
    pub slug: String,
    pub author_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Field values for creating a note.
#[derive(Debug, Clone)]
pub struct NewNote {
    pub title: String,
    pub body: String,
    pub slug: String,
    pub author_id: Uuid,
}

/// Field values for updating a note in place.
#[derive(Debug, Clone)]
pub struct NoteUpdate {
    pub title: String,
    pub body: String,
    pub slug: String,
}
