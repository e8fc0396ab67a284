//! Route definitions.

use super::handlers::{self, AppState};
use super::{auth_handlers, note_handlers};
use crate::auth::middleware::require_auth;
use axum::{
    middleware::from_fn_with_state,
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

/// Create the application router.
///
/// Everything under `/notes` requires a session; anonymous requests are
/// redirected to the login page with a `next` parameter.
pub fn create_router(state: AppState) -> Router {
    let protected = Router::new()
        .route("/notes", get(note_handlers::list))
        .route(
            "/notes/add",
            get(note_handlers::add_form).post(note_handlers::add_submit),
        )
        .route("/notes/success", get(note_handlers::success))
        .route("/notes/{slug}", get(note_handlers::detail))
        .route(
            "/notes/{slug}/edit",
            get(note_handlers::edit_form).post(note_handlers::edit_submit),
        )
        .route("/notes/{slug}/delete", post(note_handlers::delete))
        .layer(from_fn_with_state(state.clone(), require_auth));

    Router::new()
        // Public pages
        .route("/", get(handlers::home))
        .route(
            "/auth/login",
            get(auth_handlers::login_form).post(auth_handlers::login),
        )
        .route("/auth/logout", get(auth_handlers::logout))
        .route(
            "/auth/signup",
            get(auth_handlers::signup_form).post(auth_handlers::signup),
        )
        .merge(protected)
        // Middleware
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
