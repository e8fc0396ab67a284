//! Note route handlers: list, add, detail, edit, delete, success.
//!
//! Every handler here sits behind `require_auth`. Object-scoped handlers
//! resolve the note through [`owned_note`], which answers the same 404
//! whether the slug is missing or belongs to someone else.

use crate::auth::extractor::AuthUser;
use crate::notes::forms::{duplicate_slug_message, FormErrors, NoteForm, Validation};
use crate::store::{NewNote, Note, NoteUpdate, StoreError};
use crate::web::handlers::{AppError, AppState};
use crate::web::pages;
use axum::{
    extract::{Form, Path, State},
    response::{Html, IntoResponse, Redirect, Response},
};

/// Confirmation page shown after every successful mutation.
pub const SUCCESS_URL: &str = "/notes/success";

/// Resolve `slug` to a note owned by `user`.
///
/// A missing slug and a foreign note produce the identical error, so the
/// response never leaks whether another user's note exists.
fn owned_note(state: &AppState, user: &AuthUser, slug: &str) -> Result<Note, AppError> {
    let not_found = || AppError::NotFound(format!("No note found for '{}'", slug));
    let note = state.store.note_by_slug(slug)?.ok_or_else(not_found)?;
    if note.author_id != user.user_id {
        return Err(not_found());
    }
    Ok(note)
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /notes - the current user's notes, oldest first.
pub async fn list(State(state): State<AppState>, user: AuthUser) -> Result<Html<String>, AppError> {
    let notes = state.store.notes_by_author(user.user_id)?;
    Ok(Html(pages::note_list_page(&notes)))
}

/// GET /notes/add - empty creation form.
pub async fn add_form(_user: AuthUser) -> Html<String> {
    Html(pages::note_form_page(
        "Add a note",
        "/notes/add",
        &NoteForm::default(),
        &FormErrors::default(),
    ))
}

/// POST /notes/add - validate and create, then redirect to success.
///
/// Validation failures re-render the form (200) with field errors and
/// create nothing.
pub async fn add_submit(
    State(state): State<AppState>,
    user: AuthUser,
    Form(form): Form<NoteForm>,
) -> Result<Response, AppError> {
    let render_invalid =
        |errors: &FormErrors| Html(pages::note_form_page("Add a note", "/notes/add", &form, errors)).into_response();

    let cleaned = match form.validate(&state.store, None)? {
        Validation::Valid(cleaned) => cleaned,
        Validation::Invalid(errors) => return Ok(render_invalid(&errors)),
    };

    let created = state.store.create_note(NewNote {
        title: cleaned.title,
        body: cleaned.body,
        slug: cleaned.slug,
        author_id: user.user_id,
    });

    match created {
        Ok(note) => {
            tracing::info!(slug = %note.slug, author = %user.username, "Note created");
            Ok(Redirect::to(SUCCESS_URL).into_response())
        }
        // Lost a race with a concurrent insert of the same slug
        Err(StoreError::DuplicateSlug(slug)) => {
            let mut errors = FormErrors::default();
            errors.push("slug", duplicate_slug_message(&slug));
            Ok(render_invalid(&errors))
        }
        Err(e) => Err(e.into()),
    }
}

/// GET /notes/{slug} - render a single owned note.
pub async fn detail(
    State(state): State<AppState>,
    user: AuthUser,
    Path(slug): Path<String>,
) -> Result<Html<String>, AppError> {
    let note = owned_note(&state, &user, &slug)?;
    Ok(Html(pages::note_detail_page(&note)))
}

/// GET /notes/{slug}/edit - form pre-filled with the note's current values.
pub async fn edit_form(
    State(state): State<AppState>,
    user: AuthUser,
    Path(slug): Path<String>,
) -> Result<Html<String>, AppError> {
    let note = owned_note(&state, &user, &slug)?;
    let form = NoteForm {
        title: note.title.clone(),
        body: note.body.clone(),
        slug: note.slug.clone(),
    };
    Ok(Html(pages::note_form_page(
        "Edit note",
        &format!("/notes/{}/edit", note.slug),
        &form,
        &FormErrors::default(),
    )))
}

/// POST /notes/{slug}/edit - validate and update in place, then redirect.
pub async fn edit_submit(
    State(state): State<AppState>,
    user: AuthUser,
    Path(slug): Path<String>,
    Form(form): Form<NoteForm>,
) -> Result<Response, AppError> {
    let note = owned_note(&state, &user, &slug)?;

    let action = format!("/notes/{}/edit", note.slug);
    let render_invalid =
        |errors: &FormErrors| Html(pages::note_form_page("Edit note", &action, &form, errors)).into_response();

    let cleaned = match form.validate(&state.store, Some(note.id))? {
        Validation::Valid(cleaned) => cleaned,
        Validation::Invalid(errors) => return Ok(render_invalid(&errors)),
    };

    let updated = state.store.update_note(
        note.id,
        NoteUpdate {
            title: cleaned.title,
            body: cleaned.body,
            slug: cleaned.slug,
        },
    );

    match updated {
        Ok(Some(note)) => {
            tracing::info!(slug = %note.slug, author = %user.username, "Note updated");
            Ok(Redirect::to(SUCCESS_URL).into_response())
        }
        Ok(None) => Err(AppError::NotFound(format!("No note found for '{}'", slug))),
        Err(StoreError::DuplicateSlug(slug)) => {
            let mut errors = FormErrors::default();
            errors.push("slug", duplicate_slug_message(&slug));
            Ok(render_invalid(&errors))
        }
        Err(e) => Err(e.into()),
    }
}

/// POST /notes/{slug}/delete - remove an owned note, then redirect.
pub async fn delete(
    State(state): State<AppState>,
    user: AuthUser,
    Path(slug): Path<String>,
) -> Result<Response, AppError> {
    let note = owned_note(&state, &user, &slug)?;
    state.store.delete_note(note.id)?;
    tracing::info!(slug = %note.slug, author = %user.username, "Note deleted");
    Ok(Redirect::to(SUCCESS_URL).into_response())
}

/// GET /notes/success - static confirmation page.
pub async fn success(_user: AuthUser) -> Html<String> {
    Html(pages::success_page())
}
