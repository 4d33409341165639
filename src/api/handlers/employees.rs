use axum::{extract::{State, Path}, http::StatusCode, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::dtos::responses::MessageResponse;
use crate::api::extractors::auth::AuthUser;
use serde_json::{Map, Value};
use std::sync::Arc;
use crate::api::extractors::json::ApiJson;
use crate::error::AppError;

pub async fn create_employee(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    ApiJson(payload): ApiJson<Map<String, Value>>,
) -> Result<impl IntoResponse, AppError> {
    let employee = state.employees.create(&user.tenant_id, &payload).await?;
    Ok((StatusCode::CREATED, Json(employee)))
}

pub async fn list_employees(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
) -> Result<impl IntoResponse, AppError> {
    let employees = state.employees.list(&user.tenant_id).await?;
    Ok(Json(employees))
}

pub async fn get_employee(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let employee = state.employees.get(&user.tenant_id, &id).await?;
    Ok(Json(employee))
}

pub async fn update_employee(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(id): Path<String>,
    ApiJson(payload): ApiJson<Map<String, Value>>,
) -> Result<impl IntoResponse, AppError> {
    state.employees.update(&user.tenant_id, &id, payload).await?;
    Ok(Json(MessageResponse::new("Employee updated successfully")))
}

pub async fn delete_employee(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    state.employees.delete(&user.tenant_id, &id).await?;
    Ok(Json(MessageResponse::new("Employee deleted successfully")))
}
