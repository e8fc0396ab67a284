//! AuthUser extractor for Axum handlers.
//!
//! Extracts the authenticated user's identity from request extensions
//! (populated by the `require_auth` middleware).

use crate::auth::jwt::Claims;
use crate::web::handlers::{AppError, AppState};
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use uuid::Uuid;

/// Authenticated user identity extracted from JWT claims.
///
/// Use this as a handler parameter on routes behind `require_auth`:
///
/// ```rust,ignore
/// async fn my_handler(user: AuthUser) -> impl IntoResponse {
///     format!("Hello, {}!", user.username)
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: Uuid,
    pub username: String,
}

impl AuthUser {
    /// Create from JWT claims
    fn from_claims(claims: &Claims) -> Result<Self, AppError> {
        let user_id: Uuid = claims
            .sub
            .parse()
            .map_err(|_| AppError::Unauthorized("Invalid user ID in token".to_string()))?;

        Ok(Self {
            user_id,
            username: claims.username.clone(),
        })
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    fn from_request_parts(
        parts: &mut Parts,
        _state: &AppState,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        async {
            let claims = parts.extensions.get::<Claims>().ok_or_else(|| {
                AppError::Unauthorized("Authentication required".to_string())
            })?;

            Self::from_claims(claims)
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_user_from_valid_claims() {
        let user_id = Uuid::new_v4();
        let claims = Claims {
            sub: user_id.to_string(),
            username: "alice".to_string(),
            iat: 0,
            exp: 0,
        };

        let user = AuthUser::from_claims(&claims).unwrap();
        assert_eq!(user.user_id, user_id);
        assert_eq!(user.username, "alice");
    }

    #[test]
    fn test_auth_user_from_invalid_uuid() {
        let claims = Claims {
            sub: "not-a-uuid".to_string(),
            username: "alice".to_string(),
            iat: 0,
            exp: 0,
        };

        let result = AuthUser::from_claims(&claims);
        assert!(result.is_err());
    }
}
