use onboarding_backend::{
    api::router::create_router,
    state::AppState,
    config::Config,
    domain::ports::DocumentStore,
    infra::repositories::sqlite_document_store::SqliteDocumentStore,
    infra::security::argon2_hasher::Argon2Hasher,
};
use sqlx::{sqlite::{SqliteConnectOptions, SqlitePoolOptions}, Pool, Sqlite};
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;
use axum::{
    body::Body,
    http::{Request, header},
    response::Response,
    Router,
};
use std::str::FromStr;
use tower::ServiceExt;
use serde_json::{json, Value};

#[allow(dead_code)]
pub struct TestApp {
    pub router: Router,
    pub pool: Pool<Sqlite>,
    pub db_filename: String,
    pub state: Arc<AppState>,
}

#[allow(dead_code)]
pub struct SignedUp {
    pub tenant_id: String,
    pub admin_id: String,
    pub token: String,
}

pub fn test_config(db_url: &str) -> Config {
    Config {
        database_url: db_url.to_string(),
        port: 0,
        jwt_secret_key: "test-secret".to_string(),
        auth_issuer: "test-issuer".to_string(),
        token_ttl: Duration::from_secs(3600),
        store_timeout: Duration::from_secs(5),
    }
}

#[allow(dead_code)]
impl TestApp {
    pub async fn new() -> Self {
        Self::with_store(|store| store).await
    }

    /// Builds the app over a store produced by `wrap`, so tests can inject
    /// failures around the real SQLite store.
    pub async fn with_store<F>(wrap: F) -> Self
    where
        F: FnOnce(Arc<dyn DocumentStore>) -> Arc<dyn DocumentStore>,
    {
        let db_filename = format!("test_{}.db", Uuid::new_v4());
        let db_url = format!("sqlite://{}?mode=rwc", db_filename);

        let connection_options = SqliteConnectOptions::from_str(&db_url)
            .unwrap()
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .connect_with(connection_options)
            .await
            .expect("Failed to connect to test db");

        sqlx::migrate!("./migrations/sqlite")
            .run(&pool)
            .await
            .expect("Failed to migrate test db");

        let store = wrap(Arc::new(SqliteDocumentStore::new(pool.clone())));
        let state = Arc::new(AppState::new(test_config(&db_url), store, Arc::new(Argon2Hasher::new())));
        let router = create_router(state.clone());

        Self {
            router,
            pool,
            db_filename,
            state,
        }
    }

    pub async fn send(&self, method: &str, uri: &str, token: Option<&str>, body: Option<Value>) -> Response {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        self.router.clone().oneshot(request).await.unwrap()
    }

    /// Sends `body` verbatim as a JSON request, for payloads `json!` cannot express.
    pub async fn send_raw(&self, method: &str, uri: &str, token: Option<&str>, body: &str) -> Response {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let request = builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        self.router.clone().oneshot(request).await.unwrap()
    }

    pub async fn login(&self, username: &str, password: &str) -> String {
        let response = self
            .send("POST", "/auth/login", None, Some(json!({ "username": username, "password": password })))
            .await;
        if !response.status().is_success() {
            panic!("Login failed in test helper: status {}", response.status());
        }
        let body = parse_body(response).await;
        body["token"].as_str().expect("No token in body").to_string()
    }

    /// Signs up a tenant and logs its admin in.
    pub async fn signup(&self, company: &str, username: &str, password: &str) -> SignedUp {
        let response = self
            .send(
                "POST",
                "/public/signup",
                None,
                Some(json!({ "companyName": company, "username": username, "password": password })),
            )
            .await;
        if !response.status().is_success() {
            panic!("Signup failed in test helper: status {}", response.status());
        }
        let body = parse_body(response).await;
        let token = self.login(username, password).await;

        SignedUp {
            tenant_id: body["tenantId"].as_str().unwrap().to_string(),
            admin_id: body["adminUserId"].as_str().unwrap().to_string(),
            token,
        }
    }

    pub async fn set_modules(&self, token: &str, modules: &[&str]) {
        let response = self
            .send("PUT", "/api/v1/tenant/modules", Some(token), Some(json!({ "enabledEntities": modules })))
            .await;
        if !response.status().is_success() {
            panic!("Module update failed in test helper: status {}", response.status());
        }
    }

    pub async fn count_documents(&self, collection: &str) -> i64 {
        sqlx::query_scalar("SELECT COUNT(*) FROM documents WHERE collection = ?")
            .bind(collection)
            .fetch_one(&self.pool)
            .await
            .unwrap()
    }
}

#[allow(dead_code)]
pub async fn parse_body(response: Response) -> Value {
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    if bytes.is_empty() {
        panic!("Response body is empty. Status: {}", status);
    }
    match serde_json::from_slice(&bytes) {
        Ok(v) => v,
        Err(e) => panic!("Failed to parse JSON: {:?}. Status: {}. Body: {:?}", e, status, String::from_utf8_lossy(&bytes))
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.db_filename);
    }
}
