use axum::{extract::State, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::dtos::requests::UpdateModulesRequest;
use crate::api::extractors::auth::AuthUser;
use std::sync::Arc;
use crate::api::extractors::json::ApiJson;
use crate::error::AppError;

pub async fn get_current_tenant(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
) -> Result<impl IntoResponse, AppError> {
    let tenant = state.tenants.current(&user.tenant_id).await?;
    Ok(Json(tenant))
}

pub async fn update_modules(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    ApiJson(payload): ApiJson<UpdateModulesRequest>,
) -> Result<impl IntoResponse, AppError> {
    let tenant = state
        .tenants
        .update_modules(&user.user_id, &user.tenant_id, payload.enabled_entities)
        .await?;
    Ok(Json(tenant))
}
