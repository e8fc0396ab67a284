//! Note domain rules: slug derivation and form validation.

pub mod forms;
pub mod slug;

pub use forms::{NoteForm, WARNING};
pub use slug::{slugify, SLUG_MAX_LEN};
