use axum::{
    extract::{FromRequestParts, FromRef},
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
};
use crate::state::AppState;
use crate::error::AppError;
use std::sync::Arc;
use tracing::Span;

/// Identity carried by a verified bearer token.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: String,
    pub tenant_id: String,
}

impl AuthUser {
    /// Verifies the `Authorization: Bearer` header and records the identity
    /// on the request span.
    pub fn from_headers(state: &AppState, headers: &HeaderMap) -> Result<Self, AppError> {
        let token = headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .ok_or(AppError::Unauthorized)?;

        let claims = state.token_service.verify(token)?;
        let user = AuthUser {
            user_id: claims.sub,
            tenant_id: claims.tenant_id,
        };

        Span::current().record("tenant_id", user.tenant_id.as_str());
        Span::current().record("user_id", user.user_id.as_str());

        Ok(user)
    }
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    Arc<AppState>: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        // Already verified by the auth middleware on protected groups.
        if let Some(user) = parts.extensions.get::<AuthUser>() {
            return Ok(user.clone());
        }

        let app_state = <Arc<AppState> as FromRef<S>>::from_ref(state);
        AuthUser::from_headers(&app_state, &parts.headers)
    }
}
