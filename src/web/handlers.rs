//! Shared server state, the application error type, and the public pages.

use crate::store::{Store, StoreError};
use crate::web::pages;
use crate::AuthConfig;
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse},
};
use std::sync::Arc;

/// Shared server state
pub struct ServerState {
    pub store: Arc<Store>,
    pub auth: AuthConfig,
}

/// Shared application state handle
pub type AppState = Arc<ServerState>;

// ============================================================================
// Error type
// ============================================================================

/// Application-level error mapped to an HTTP response.
///
/// Ownership violations deliberately use `NotFound`: a non-owner must not
/// be able to tell a protected note from a missing one.
#[derive(Debug)]
pub enum AppError {
    Internal(anyhow::Error),
    NotFound(String),
    BadRequest(String),
    Unauthorized(String),
    Conflict(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:#}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Something went wrong".to_string(),
                )
            }
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg),
        };

        (status, Html(pages::error_page(status, &message))).into_response()
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err)
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            // Only reachable when a write bypasses form validation
            StoreError::DuplicateSlug(_) | StoreError::DuplicateUsername(_) => {
                AppError::Conflict(err.to_string())
            }
            StoreError::Sqlite(_) => AppError::Internal(anyhow::Error::new(err)),
        }
    }
}

// ============================================================================
// Public pages
// ============================================================================

/// GET / - public landing page.
pub async fn home() -> Html<String> {
    Html(pages::home_page())
}

// ============================================================================
// Tests
// ============================================================================
