//! Shared fixtures for the integration tests.
//!
//! Builds the real router over an in-memory SQLite store and drives it
//! with `tower::ServiceExt::oneshot` - no network, no running server.

#![allow(dead_code)]

use axum::body::Body;
use axum::http::{header, Request, Response, StatusCode};
use axum::Router;
use notekeeper::auth::jwt::encode_jwt;
use notekeeper::store::{NewNote, Note, Store, User};
use notekeeper::web::handlers::ServerState;
use notekeeper::web::routes::create_router;
use notekeeper::AuthConfig;
use std::sync::Arc;
use tower::ServiceExt; // for `oneshot`

pub const TEST_SECRET: &str = "test-secret-key-minimum-32-chars!!";

pub const NOTE_TITLE: &str = "Grocery run";
pub const NOTE_TEXT: &str = "Milk, eggs, coffee";
pub const NOTE_SLUG: &str = "grocery-run";

pub struct TestApp {
    pub router: Router,
    pub store: Arc<Store>,
}

impl TestApp {
    pub fn new() -> Self {
        let store = Arc::new(Store::in_memory().expect("in-memory store"));
        let state = Arc::new(ServerState {
            store: store.clone(),
            auth: AuthConfig {
                jwt_secret: TEST_SECRET.to_string(),
                jwt_expiry_secs: 3600,
                bcrypt_cost: 4, // low cost for fast tests
            },
        });
        Self {
            router: create_router(state),
            store,
        }
    }

    /// Register a user directly in the store.
    pub fn create_user(&self, username: &str) -> User {
        let hash = bcrypt::hash("password123", 4).expect("bcrypt hash");
        self.store.create_user(username, &hash).expect("create user")
    }

    /// Seed a note owned by `author`.
    pub fn create_note(&self, author: &User, title: &str, body: &str, slug: &str) -> Note {
        self.store
            .create_note(NewNote {
                title: title.to_string(),
                body: body.to_string(),
                slug: slug.to_string(),
                author_id: author.id,
            })
            .expect("create note")
    }

    /// Session cookie value for `user`, as sent by a logged-in browser.
    pub fn session_for(&self, user: &User) -> String {
        let token = encode_jwt(user.id, &user.username, TEST_SECRET, 3600).expect("encode jwt");
        format!("session={}", token)
    }

    pub async fn get(&self, path: &str, cookie: Option<&str>) -> Response<Body> {
        let mut builder = Request::builder().uri(path);
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        let req = builder.body(Body::empty()).expect("request");
        self.router.clone().oneshot(req).await.expect("response")
    }

    pub async fn post_form(
        &self,
        path: &str,
        fields: &[(&str, &str)],
        cookie: Option<&str>,
    ) -> Response<Body> {
        let mut builder = Request::builder()
            .method("POST")
            .uri(path)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        let req = builder.body(Body::from(form_body(fields))).expect("request");
        self.router.clone().oneshot(req).await.expect("response")
    }
}

/// Encode form fields as application/x-www-form-urlencoded.
pub fn form_body(fields: &[(&str, &str)]) -> String {
    fields
        .iter()
        .map(|(k, v)| format!("{}={}", k, urlencoding::encode(v)))
        .collect::<Vec<_>>()
        .join("&")
}

/// Read the full response body as a UTF-8 string.
pub async fn body_string(resp: Response<Body>) -> String {
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .expect("body");
    String::from_utf8(bytes.to_vec()).expect("utf-8 body")
}

/// The `Location` header of a redirect response.
pub fn location(resp: &Response<Body>) -> String {
    resp.headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

/// Expected login redirect target for a protected URL.
pub fn login_redirect_for(url: &str) -> String {
    format!("/auth/login?next={}", urlencoding::encode(url))
}

/// Assert a mutating POST landed on the success page.
pub fn assert_redirects_to_success(resp: &Response<Body>) {
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(resp), "/notes/success");
}
