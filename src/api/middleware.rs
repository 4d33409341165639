use std::sync::Arc;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use tracing::{debug, warn};

use crate::api::extractors::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

/// Rejects requests without a valid bearer token and hands the verified
/// identity to everything downstream.
pub async fn require_auth(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let user = AuthUser::from_headers(&state, request.headers())?;
    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}

/// State for [`require_module`]: which module a route group belongs to.
#[derive(Clone)]
pub struct ModuleGate {
    pub state: Arc<AppState>,
    pub module: &'static str,
}

impl ModuleGate {
    pub fn new(state: Arc<AppState>, module: &'static str) -> Self {
        Self { state, module }
    }
}

/// Lets the request through only if the caller's tenant has the group's
/// module enabled. Must run inside [`require_auth`].
pub async fn require_module(
    State(gate): State<ModuleGate>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let tenant_id = request
        .extensions()
        .get::<AuthUser>()
        .map(|user| user.tenant_id.clone())
        .ok_or(AppError::Unauthorized)?;

    if !gate.state.permissions.is_enabled(&tenant_id, gate.module).await? {
        warn!(tenant_id = %tenant_id, module = gate.module, "Module not enabled for tenant");
        return Err(AppError::Forbidden(
            "Access to this feature is not enabled for your account.".into(),
        ));
    }

    debug!(module = gate.module, "Module gate passed");
    Ok(next.run(request).await)
}
