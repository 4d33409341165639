//! Handlers shared by every reference entity route group. The group's kind
//! arrives as a request extension set by the router.

use axum::{extract::{State, Path}, http::StatusCode, response::IntoResponse, Extension, Json};
use crate::state::AppState;
use crate::api::dtos::responses::MessageResponse;
use crate::api::extractors::auth::AuthUser;
use crate::domain::models::entity::{EntityKind, NewEntity};
use serde_json::{Map, Value};
use std::sync::Arc;
use crate::api::extractors::json::ApiJson;
use crate::error::AppError;

fn capitalized(label: &str) -> String {
    let mut chars = label.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

pub async fn create_entity(
    State(state): State<Arc<AppState>>,
    Extension(kind): Extension<EntityKind>,
    user: AuthUser,
    ApiJson(payload): ApiJson<Map<String, Value>>,
) -> Result<impl IntoResponse, AppError> {
    let entity = NewEntity::from_payload(kind, &payload)?;
    let created = state.entities.create(kind, &user.tenant_id, entity).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn list_entities(
    State(state): State<Arc<AppState>>,
    Extension(kind): Extension<EntityKind>,
    user: AuthUser,
) -> Result<impl IntoResponse, AppError> {
    let entities = state.entities.list_by_tenant(kind, &user.tenant_id).await?;
    Ok(Json(entities))
}

pub async fn get_entity(
    State(state): State<Arc<AppState>>,
    Extension(kind): Extension<EntityKind>,
    user: AuthUser,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let entity = state.entities.get_by_id(kind, &user.tenant_id, &id).await?;
    Ok(Json(entity))
}

pub async fn update_entity(
    State(state): State<Arc<AppState>>,
    Extension(kind): Extension<EntityKind>,
    user: AuthUser,
    Path(id): Path<String>,
    ApiJson(payload): ApiJson<Map<String, Value>>,
) -> Result<impl IntoResponse, AppError> {
    state.entities.update(kind, &user.tenant_id, &id, payload).await?;
    Ok(Json(MessageResponse::new(format!("{} updated successfully", capitalized(kind.label())))))
}

pub async fn delete_entity(
    State(state): State<Arc<AppState>>,
    Extension(kind): Extension<EntityKind>,
    user: AuthUser,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    state.entities.delete(kind, &user.tenant_id, &id).await?;
    Ok(Json(MessageResponse::new(format!("{} deleted successfully", capitalized(kind.label())))))
}
