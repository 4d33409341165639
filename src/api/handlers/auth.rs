use axum::{extract::State, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::dtos::requests::LoginRequest;
use std::sync::Arc;
use crate::api::extractors::json::ApiJson;
use crate::error::AppError;

pub async fn login(
    State(state): State<Arc<AppState>>,
    ApiJson(payload): ApiJson<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    let response = state.users.login(&payload.username, &payload.password).await?;
    Ok(Json(response))
}
