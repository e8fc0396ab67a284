//! Session cookie helpers.
//!
//! The session token (a JWT) travels in a cookie:
//! `session=<jwt>; HttpOnly; SameSite=Lax; Path=/; Max-Age=<expiry>`
//! - `HttpOnly`: not accessible via JavaScript (XSS protection)
//! - `SameSite=Lax`: not sent on cross-site POST (CSRF protection)
//! - `Path=/`: sent for every route
//!
//! An `Authorization: Bearer <jwt>` header is accepted as an alternative
//! carrier for non-browser clients.

use axum::http::{header, HeaderMap, HeaderValue};

/// Cookie name for the session token.
pub const SESSION_COOKIE_NAME: &str = "session";

/// Build the `Set-Cookie` header value for a fresh session.
pub fn build_session_cookie(token: &str, max_age_secs: u64) -> HeaderValue {
    let cookie = format!(
        "{}={}; HttpOnly; SameSite=Lax; Path=/; Max-Age={}",
        SESSION_COOKIE_NAME, token, max_age_secs
    );
    // JWTs are base64url + dots, always valid ASCII
    HeaderValue::from_str(&cookie).expect("cookie value is valid ASCII")
}

/// Build a `Set-Cookie` header that clears the session cookie.
///
/// Used by logout to remove the cookie from the browser.
pub fn build_clear_cookie() -> HeaderValue {
    let cookie = format!(
        "{}=; HttpOnly; SameSite=Lax; Path=/; Max-Age=0",
        SESSION_COOKIE_NAME
    );
    HeaderValue::from_str(&cookie).expect("cookie value is valid ASCII")
}

/// Extract the session token from request headers.
///
/// Checks the `session` cookie first, then falls back to an
/// `Authorization: Bearer` header.
pub fn extract_session_token(headers: &HeaderMap) -> Option<String> {
    if let Some(cookie_header) = headers.get(header::COOKIE).and_then(|v| v.to_str().ok()) {
        if let Some(token) = token_from_cookie_header(cookie_header) {
            return Some(token);
        }
    }

    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .filter(|t| !t.is_empty())
        .map(|t| t.to_string())
}

/// Find `session=<value>` inside a `Cookie` header value.
fn token_from_cookie_header(cookie_header: &str) -> Option<String> {
    for part in cookie_header.split(';') {
        let trimmed = part.trim();
        if let Some(value) = trimmed.strip_prefix(&format!("{}=", SESSION_COOKIE_NAME)) {
            let token = value.trim();
            if !token.is_empty() {
                return Some(token.to_string());
            }
        }
    }
    None
}

// ============================================================================
// Tests
// ============================================================================
