use axum::{
    body::Body,
    extract::Request,
    middleware,
    routing::{get, post, put},
    Extension, Router,
};
use std::sync::Arc;
use std::time::Duration;
use crate::state::AppState;
use crate::api::handlers::{health, public, auth, tenant, users, employees, entities};
use crate::api::middleware::{require_auth, require_module, ModuleGate};
use crate::domain::models::entity::EntityKind;
use crate::domain::models::tenant::EMPLOYEES_MODULE;
use tower_http::{
    trace::TraceLayer,
    classify::ServerErrorsFailureClass,
};
use tracing::{info_span, Span, error, info};
use uuid::Uuid;

pub fn create_router(state: Arc<AppState>) -> Router {
    let mut api = Router::new()
        // Tenant
        .route("/tenant", get(tenant::get_current_tenant))
        .route("/tenant/modules", put(tenant::update_modules))

        // Users
        .route("/users", post(users::create_user).get(users::list_users))

        // Employees
        .merge(employee_routes(&state));

    // Reference entities, one gated group per kind
    for kind in EntityKind::all() {
        api = api.merge(entity_routes(&state, kind));
    }

    let api = api.layer(middleware::from_fn_with_state(state.clone(), require_auth));

    Router::new()
        .route("/health", get(health::health_check))

        // Public
        .route("/public/signup", post(public::signup))
        .route("/auth/login", post(auth::login))

        .nest("/api/v1", api)

        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<Body>| {
                    let request_id = Uuid::new_v4().to_string();
                    info_span!(
                        "http_request",
                        request_id = %request_id,
                        method = ?request.method(),
                        uri = ?request.uri(),
                        version = ?request.version(),
                        tenant_id = tracing::field::Empty,
                        user_id = tracing::field::Empty,
                    )
                })
                .on_request(|request: &Request<Body>, _span: &Span| {
                    info!("started processing request: {} {}", request.method(), request.uri().path());
                })
                .on_response(|response: &axum::http::Response<Body>, latency: Duration, _span: &Span| {
                    info!(
                        status = response.status().as_u16(),
                        latency_ms = latency.as_millis(),
                        "finished processing request"
                    );
                })
                .on_failure(|error: ServerErrorsFailureClass, _latency: Duration, _span: &Span| {
                    error!("request failed: {:?}", error);
                })
        )
        .with_state(state)
}

fn employee_routes(state: &Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route("/employees", post(employees::create_employee).get(employees::list_employees))
        .route(
            "/employees/{id}",
            get(employees::get_employee).put(employees::update_employee).delete(employees::delete_employee),
        )
        .route_layer(middleware::from_fn_with_state(
            ModuleGate::new(state.clone(), EMPLOYEES_MODULE),
            require_module,
        ))
}

/// All five operations of `kind`, mounted under its slug and gated by it.
fn entity_routes(state: &Arc<AppState>, kind: EntityKind) -> Router<Arc<AppState>> {
    let collection_path = format!("/{}", kind.slug());
    let item_path = format!("/{}/{{id}}", kind.slug());

    Router::new()
        .route(&collection_path, post(entities::create_entity).get(entities::list_entities))
        .route(
            &item_path,
            get(entities::get_entity).put(entities::update_entity).delete(entities::delete_entity),
        )
        .route_layer(middleware::from_fn_with_state(
            ModuleGate::new(state.clone(), kind.slug()),
            require_module,
        ))
        .layer(Extension(kind))
}
