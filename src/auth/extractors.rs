use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use tracing::warn;

use crate::{
    auth::{
        jwt::JwtKeys,
        policy::has_role,
        repo_types::{User, UserRole},
        services::{current_user, NOT_AUTHENTICATED},
    },
    error::{ApiError, ApiResult},
    state::AppState,
};

/// The authenticated account behind a bearer token.
pub struct AuthUser(pub User);

impl AuthUser {
    /// Rejects the request unless the account's role is in `allowed`.
    pub fn authorize(&self, allowed: &[UserRole]) -> ApiResult<&User> {
        if has_role(self.0.role, allowed) {
            Ok(&self.0)
        } else {
            warn!(user_id = %self.0.id, role = %self.0.role, "role not allowed");
            Err(ApiError::Unauthorized(format!(
                "User role {} is not authorized to access this route",
                self.0.role
            )))
        }
    }
}

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        // Expect "Bearer <token>"
        let token = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .and_then(|h| h.strip_prefix("Bearer ").or_else(|| h.strip_prefix("bearer ")))
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| ApiError::Unauthenticated(NOT_AUTHENTICATED.into()))?;

        let keys = JwtKeys::from_ref(state);
        let user = current_user(state.users.as_ref(), &keys, token).await?;
        Ok(AuthUser(user))
    }
}
