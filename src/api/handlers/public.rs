use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::dtos::{requests::SignupRequest, responses::SignupResponse};
use std::sync::Arc;
use crate::api::extractors::json::ApiJson;
use crate::error::AppError;
use tracing::info;

pub async fn signup(
    State(state): State<Arc<AppState>>,
    ApiJson(payload): ApiJson<SignupRequest>,
) -> Result<impl IntoResponse, AppError> {
    let (tenant, admin) = state
        .tenants
        .signup(&payload.company_name, &payload.username, &payload.password)
        .await?;

    info!("Tenant created: {}", tenant.id);

    Ok((
        StatusCode::CREATED,
        Json(SignupResponse {
            message: "Account created successfully. Please log in.".to_string(),
            tenant_id: tenant.id,
            admin_user_id: admin.id,
        }),
    ))
}
