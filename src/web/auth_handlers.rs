//! Authentication route handlers - login, logout, signup.
//!
//! Endpoints:
//! - `GET  /auth/login`  - login form (public)
//! - `POST /auth/login`  - verify credentials, set session cookie, redirect
//! - `GET  /auth/logout` - clear the cookie, confirmation page
//! - `GET  /auth/signup` - registration form (public)
//! - `POST /auth/signup` - create the account, log in, redirect

use crate::auth::jwt::encode_jwt;
use crate::auth::session::{build_clear_cookie, build_session_cookie};
use crate::store::{StoreError, User};
use crate::web::handlers::{AppError, AppState};
use crate::web::pages;
use axum::{
    extract::{Form, Query, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
};
use serde::Deserialize;

/// Where to send the user after login/signup when no `next` was requested.
const DEFAULT_AFTER_LOGIN: &str = "/notes";

// ============================================================================
// Request types
// ============================================================================

#[derive(Debug, Default, Deserialize)]
pub struct NextQuery {
    pub next: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    pub next: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SignupForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

// ============================================================================
// Helpers
// ============================================================================

/// Only follow same-site relative `next` targets. Anything else (absolute
/// URLs, protocol-relative `//host`) falls back to the default to avoid
/// open redirects.
fn safe_next(next: Option<&str>) -> &str {
    match next {
        Some(url) if url.starts_with('/') && !url.starts_with("//") => url,
        _ => DEFAULT_AFTER_LOGIN,
    }
}

/// Issue the session cookie for `user` and redirect (303) to `next`.
fn login_and_redirect(state: &AppState, user: &User, next: Option<&str>) -> Result<Response, AppError> {
    let token = encode_jwt(
        user.id,
        &user.username,
        &state.auth.jwt_secret,
        state.auth.jwt_expiry_secs,
    )
    .map_err(AppError::Internal)?;
    let cookie = build_session_cookie(&token, state.auth.jwt_expiry_secs);
    let location = header::HeaderValue::from_str(safe_next(next))
        .map_err(|e| AppError::BadRequest(format!("Invalid redirect target: {}", e)))?;

    Ok((
        StatusCode::SEE_OTHER,
        [(header::SET_COOKIE, cookie), (header::LOCATION, location)],
    )
        .into_response())
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /auth/login - render the login form.
pub async fn login_form(Query(query): Query<NextQuery>) -> Html<String> {
    Html(pages::login_page("", query.next.as_deref(), None))
}

/// POST /auth/login - verify credentials and open a session.
///
/// Security: the error message never reveals whether the username exists.
pub async fn login(
    State(state): State<AppState>,
    Form(form): Form<LoginForm>,
) -> Result<Response, AppError> {
    let invalid_credentials = || {
        Html(pages::login_page(
            &form.username,
            form.next.as_deref(),
            Some("Invalid username or password."),
        ))
        .into_response()
    };

    let user = match state.store.user_by_username(form.username.trim())? {
        Some(u) => u,
        None => return Ok(invalid_credentials()),
    };

    let password_ok = bcrypt::verify(&form.password, &user.password_hash).unwrap_or(false);
    if !password_ok {
        return Ok(invalid_credentials());
    }

    tracing::info!(username = %user.username, "User logged in");
    login_and_redirect(&state, &user, form.next.as_deref())
}

/// GET /auth/logout - clear the session cookie and confirm.
pub async fn logout() -> Response {
    (
        StatusCode::OK,
        [(header::SET_COOKIE, build_clear_cookie())],
        Html(pages::logout_page()),
    )
        .into_response()
}

/// GET /auth/signup - render the registration form.
pub async fn signup_form() -> Html<String> {
    Html(pages::signup_page("", None))
}

/// POST /auth/signup - create an account and log the user in.
pub async fn signup(
    State(state): State<AppState>,
    Form(form): Form<SignupForm>,
) -> Result<Response, AppError> {
    let username = form.username.trim().to_string();

    let reject = |message: &str| Html(pages::signup_page(&username, Some(message))).into_response();

    if username.is_empty() || username.len() > 64 {
        return Ok(reject("Username must be between 1 and 64 characters."));
    }
    if !username
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Ok(reject(
            "Username may only contain letters, numbers, hyphens, and underscores.",
        ));
    }
    if form.password.len() < 8 {
        return Ok(reject("Password must be at least 8 characters."));
    }

    let password_hash = bcrypt::hash(&form.password, state.auth.bcrypt_cost)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to hash password: {}", e)))?;

    let user = match state.store.create_user(&username, &password_hash) {
        Ok(u) => u,
        Err(StoreError::DuplicateUsername(_)) => {
            return Ok(reject("That username is already taken."));
        }
        Err(e) => return Err(e.into()),
    };

    tracing::info!(username = %user.username, "New user registered");
    login_and_redirect(&state, &user, None)
}
