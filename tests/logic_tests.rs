//! Business rule tests: creation, editing, deletion, and the slug policy.

mod common;

use axum::http::StatusCode;
use common::{
    assert_redirects_to_success, body_string, TestApp, NOTE_SLUG, NOTE_TEXT, NOTE_TITLE,
};
use notekeeper::notes::{slugify, WARNING};
use notekeeper::store::{NewNote, StoreError};

const NEW_TITLE: &str = "Updated grocery run";
const NEW_TEXT: &str = "Milk, eggs, coffee, and cake";
const NEW_SLUG: &str = "new-slug";

#[tokio::test]
async fn test_author_can_create_note() {
    let app = TestApp::new();
    let author = app.create_user("author");
    let session = app.session_for(&author);
    let before = app.store.count_notes().unwrap();

    let resp = app
        .post_form(
            "/notes/add",
            &[("title", NOTE_TITLE), ("body", NOTE_TEXT), ("slug", NEW_SLUG)],
            Some(&session),
        )
        .await;

    assert_redirects_to_success(&resp);
    assert_eq!(app.store.count_notes().unwrap(), before + 1);

    let note = app.store.note_by_slug(NEW_SLUG).unwrap().unwrap();
    assert_eq!(note.title, NOTE_TITLE);
    assert_eq!(note.body, NOTE_TEXT);
    assert_eq!(note.author_id, author.id);
}

#[tokio::test]
async fn test_anonymous_cannot_create_note() {
    let app = TestApp::new();
    let before = app.store.count_notes().unwrap();

    let resp = app
        .post_form(
            "/notes/add",
            &[("title", NOTE_TITLE), ("body", NOTE_TEXT), ("slug", NEW_SLUG)],
            None,
        )
        .await;

    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(app.store.count_notes().unwrap(), before);
}

#[tokio::test]
async fn test_non_author_cannot_edit_note() {
    let app = TestApp::new();
    let author = app.create_user("author");
    let intruder = app.create_user("intruder");
    let note = app.create_note(&author, NOTE_TITLE, NOTE_TEXT, NOTE_SLUG);

    let resp = app
        .post_form(
            &format!("/notes/{}/edit", NOTE_SLUG),
            &[("title", NEW_TITLE), ("body", NEW_TEXT), ("slug", NOTE_SLUG)],
            Some(&app.session_for(&intruder)),
        )
        .await;

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let unchanged = app.store.note_by_slug(NOTE_SLUG).unwrap().unwrap();
    assert_eq!(unchanged.title, note.title);
    assert_eq!(unchanged.body, note.body);
    assert_eq!(unchanged.author_id, note.author_id);
}

#[tokio::test]
async fn test_non_author_cannot_delete_note() {
    let app = TestApp::new();
    let author = app.create_user("author");
    let intruder = app.create_user("intruder");
    app.create_note(&author, NOTE_TITLE, NOTE_TEXT, NOTE_SLUG);
    let before = app.store.count_notes().unwrap();

    let resp = app
        .post_form(
            &format!("/notes/{}/delete", NOTE_SLUG),
            &[],
            Some(&app.session_for(&intruder)),
        )
        .await;

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_eq!(app.store.count_notes().unwrap(), before);
}

#[tokio::test]
async fn test_author_can_edit_note() {
    let app = TestApp::new();
    let author = app.create_user("author");
    app.create_note(&author, NOTE_TITLE, NOTE_TEXT, NOTE_SLUG);

    let resp = app
        .post_form(
            &format!("/notes/{}/edit", NOTE_SLUG),
            &[("title", NEW_TITLE), ("body", NEW_TEXT), ("slug", NOTE_SLUG)],
            Some(&app.session_for(&author)),
        )
        .await;

    assert_redirects_to_success(&resp);

    let note = app.store.note_by_slug(NOTE_SLUG).unwrap().unwrap();
    assert_eq!(note.title, NEW_TITLE);
    assert_eq!(note.body, NEW_TEXT);
}

#[tokio::test]
async fn test_author_can_change_slug() {
    let app = TestApp::new();
    let author = app.create_user("author");
    app.create_note(&author, NOTE_TITLE, NOTE_TEXT, NOTE_SLUG);

    let resp = app
        .post_form(
            &format!("/notes/{}/edit", NOTE_SLUG),
            &[("title", NOTE_TITLE), ("body", NOTE_TEXT), ("slug", NEW_SLUG)],
            Some(&app.session_for(&author)),
        )
        .await;

    assert_redirects_to_success(&resp);
    assert!(app.store.note_by_slug(NOTE_SLUG).unwrap().is_none());
    assert!(app.store.note_by_slug(NEW_SLUG).unwrap().is_some());
}

#[tokio::test]
async fn test_author_can_delete_note() {
    let app = TestApp::new();
    let author = app.create_user("author");
    app.create_note(&author, NOTE_TITLE, NOTE_TEXT, NOTE_SLUG);
    let before = app.store.count_notes().unwrap();

    let resp = app
        .post_form(
            &format!("/notes/{}/delete", NOTE_SLUG),
            &[],
            Some(&app.session_for(&author)),
        )
        .await;

    assert_redirects_to_success(&resp);
    assert_eq!(app.store.count_notes().unwrap(), before - 1);
}

#[tokio::test]
async fn test_duplicate_slug_rejected_with_warning() {
    let app = TestApp::new();
    let author = app.create_user("author");
    app.create_note(&author, NOTE_TITLE, NOTE_TEXT, NOTE_SLUG);
    let before = app.store.count_notes().unwrap();

    let resp = app
        .post_form(
            "/notes/add",
            &[("title", NEW_TITLE), ("body", NEW_TEXT), ("slug", NOTE_SLUG)],
            Some(&app.session_for(&author)),
        )
        .await;

    // Validation failure re-renders the form, nothing is created
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_string(resp).await;
    assert!(
        body.contains(&format!("{}{}", NOTE_SLUG, WARNING)),
        "form error should be the slug plus the fixed warning suffix"
    );
    assert_eq!(app.store.count_notes().unwrap(), before);
}

#[tokio::test]
async fn test_edit_to_duplicate_slug_rejected() {
    let app = TestApp::new();
    let author = app.create_user("author");
    app.create_note(&author, NOTE_TITLE, NOTE_TEXT, NOTE_SLUG);
    app.create_note(&author, "Other note", "Other text", "other-note");

    let resp = app
        .post_form(
            "/notes/other-note/edit",
            &[("title", "Other note"), ("body", "Other text"), ("slug", NOTE_SLUG)],
            Some(&app.session_for(&author)),
        )
        .await;

    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_string(resp).await;
    assert!(body.contains(&format!("{}{}", NOTE_SLUG, WARNING)));

    // Both notes keep their slugs
    assert!(app.store.note_by_slug("other-note").unwrap().is_some());
    assert!(app.store.note_by_slug(NOTE_SLUG).unwrap().is_some());
}

#[tokio::test]
async fn test_editing_note_keeping_own_slug_succeeds() {
    let app = TestApp::new();
    let author = app.create_user("author");
    app.create_note(&author, NOTE_TITLE, NOTE_TEXT, NOTE_SLUG);

    // Resubmitting a note's own slug must not count as a duplicate
    let resp = app
        .post_form(
            &format!("/notes/{}/edit", NOTE_SLUG),
            &[("title", NEW_TITLE), ("body", NOTE_TEXT), ("slug", NOTE_SLUG)],
            Some(&app.session_for(&author)),
        )
        .await;

    assert_redirects_to_success(&resp);
}

#[tokio::test]
async fn test_empty_slug_derived_from_title() {
    let app = TestApp::new();
    let author = app.create_user("author");
    let session = app.session_for(&author);
    let before = app.store.count_notes().unwrap();

    let resp = app
        .post_form(
            "/notes/add",
            &[("title", NOTE_TITLE), ("body", NOTE_TEXT), ("slug", "")],
            Some(&session),
        )
        .await;

    assert_redirects_to_success(&resp);
    assert_eq!(app.store.count_notes().unwrap(), before + 1);

    let expected = slugify(NOTE_TITLE);
    let note = app.store.note_by_slug(&expected).unwrap().unwrap();
    assert_eq!(note.slug, expected);
    assert_eq!(note.title, NOTE_TITLE);
}

#[tokio::test]
async fn test_store_level_duplicate_slug_is_integrity_error() {
    let app = TestApp::new();
    let author = app.create_user("author");
    app.create_note(&author, NOTE_TITLE, NOTE_TEXT, NOTE_SLUG);
    let before = app.store.count_notes().unwrap();

    // Bypassing form validation hits the UNIQUE constraint directly
    let err = app
        .store
        .create_note(NewNote {
            title: "Bypassing the form".into(),
            body: "Straight to the store".into(),
            slug: NOTE_SLUG.into(),
            author_id: author.id,
        })
        .unwrap_err();

    assert!(matches!(err, StoreError::DuplicateSlug(ref s) if s == NOTE_SLUG));
    assert_eq!(app.store.count_notes().unwrap(), before);
}
