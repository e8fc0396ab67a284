//! Note form parsing and validation.
//!
//! The add and edit pages submit the same three fields. Validation
//! normalizes them into a [`CleanedNote`] or collects per-field errors
//! for re-rendering the form. A duplicate slug is a *validation* error
//! here; only writes that bypass the form hit the storage constraint.

use crate::notes::slug::{slugify, SLUG_MAX_LEN};
use crate::store::{Store, StoreError};
use serde::Deserialize;
use uuid::Uuid;

/// Fixed suffix appended to the offending slug in the duplicate-slug
/// validation message.
pub const WARNING: &str = " is already taken, choose a unique slug!";

/// Raw form fields as submitted by the add/edit pages.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NoteForm {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub slug: String,
}

/// Normalized, validated note fields ready for the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanedNote {
    pub title: String,
    pub body: String,
    pub slug: String,
}

/// Per-field validation errors, in submission order.
#[derive(Debug, Clone, Default)]
pub struct FormErrors {
    errors: Vec<(&'static str, String)>,
}

impl FormErrors {
    pub fn push(&mut self, field: &'static str, message: impl Into<String>) {
        self.errors.push((field, message.into()));
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// First error message for `field`, if any.
    pub fn get(&self, field: &str) -> Option<&str> {
        self.errors
            .iter()
            .find(|(f, _)| *f == field)
            .map(|(_, m)| m.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.errors.iter().map(|(f, m)| (*f, m.as_str()))
    }
}

/// Outcome of form validation.
#[derive(Debug)]
pub enum Validation {
    Valid(CleanedNote),
    Invalid(FormErrors),
}

/// Message for a slug already used by another note.
pub fn duplicate_slug_message(slug: &str) -> String {
    format!("{}{}", slug, WARNING)
}

impl NoteForm {
    /// Validate the submitted fields against the slug policy.
    ///
    /// `editing` carries the id of the note being updated so its own slug
    /// does not count as a duplicate. Store failures propagate; validation
    /// failures come back as [`Validation::Invalid`].
    pub fn validate(
        &self,
        store: &Store,
        editing: Option<Uuid>,
    ) -> Result<Validation, StoreError> {
        let mut errors = FormErrors::default();

        let title = self.title.trim().to_string();
        if title.is_empty() {
            errors.push("title", "Title is required.");
        }

        let submitted = self.slug.trim();
        let slug = if submitted.is_empty() {
            let derived = slugify(&title);
            if derived.is_empty() && !title.is_empty() {
                errors.push("title", "A slug could not be derived from this title; provide one explicitly.");
            }
            derived
        } else {
            if submitted.len() > SLUG_MAX_LEN {
                errors.push(
                    "slug",
                    format!("Slug must be at most {} characters.", SLUG_MAX_LEN),
                );
            }
            if !is_valid_slug(submitted) {
                errors.push(
                    "slug",
                    "Slug may only contain letters, numbers, hyphens, and underscores.",
                );
            }
            submitted.to_string()
        };

        if !slug.is_empty() && errors.get("slug").is_none() && store.slug_taken(&slug, editing)? {
            errors.push("slug", duplicate_slug_message(&slug));
        }

        if errors.is_empty() {
            Ok(Validation::Valid(CleanedNote {
                title,
                body: self.body.clone(),
                slug,
            }))
        } else {
            Ok(Validation::Invalid(errors))
        }
    }
}

fn is_valid_slug(slug: &str) -> bool {
    slug.chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

// ============================================================================
// Tests
// ============================================================================
