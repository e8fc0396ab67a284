//! Auth middleware for Axum routes.
//!
//! Validates the session token and injects [`Claims`] into request
//! extensions. Anonymous or invalid sessions are never rejected with an
//! error status: the browser is redirected to the login page with a
//! `next` parameter pointing back at the original URL.

use crate::auth::jwt::decode_jwt;
use crate::auth::session::extract_session_token;
use crate::web::handlers::AppState;
use axum::{
    extract::{Request, State},
    http::{header, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};

/// Path of the login page, target of anonymous redirects.
pub const LOGIN_URL: &str = "/auth/login";

/// Build the `302 Found` redirect to the login page for `next_url`.
pub fn login_redirect(next_url: &str) -> Response {
    let location = format!("{}?next={}", LOGIN_URL, urlencoding::encode(next_url));
    (StatusCode::FOUND, [(header::LOCATION, location)]).into_response()
}

/// Middleware that requires a logged-in user.
///
/// # Behavior
/// 1. Extract the session token (cookie or Bearer header) - redirect to
///    login if missing
/// 2. Validate the JWT with the configured secret - redirect if invalid
///    or expired
/// 3. Inject `Claims` into request extensions for downstream handlers
pub async fn require_auth(State(state): State<AppState>, mut req: Request, next: Next) -> Response {
    let original_url = req
        .uri()
        .path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| req.uri().path().to_string());

    let token = match extract_session_token(req.headers()) {
        Some(t) => t,
        None => return login_redirect(&original_url),
    };

    let claims = match decode_jwt(&token, &state.auth.jwt_secret) {
        Ok(c) => c,
        Err(e) => {
            tracing::debug!("Rejecting session token: {}", e);
            return login_redirect(&original_url);
        }
    };

    req.extensions_mut().insert(claims);
    next.run(req).await
}

// ============================================================================
// Tests
// ============================================================================
