use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::dtos::requests::CreateUserRequest;
use crate::api::extractors::auth::AuthUser;
use std::sync::Arc;
use crate::api::extractors::json::ApiJson;
use crate::error::AppError;

pub async fn create_user(
    State(state): State<Arc<AppState>>,
    admin: AuthUser,
    ApiJson(payload): ApiJson<CreateUserRequest>,
) -> Result<impl IntoResponse, AppError> {
    let created = state
        .users
        .create_user(
            &admin.user_id,
            &admin.tenant_id,
            &payload.username,
            &payload.password,
            payload.role.as_deref(),
        )
        .await?;

    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn list_users(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
) -> Result<impl IntoResponse, AppError> {
    let users = state.users.list(&user.tenant_id).await?;
    Ok(Json(users))
}
