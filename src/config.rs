use std::env;
use std::time::Duration;

#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub jwt_secret_key: String,
    pub auth_issuer: String,
    pub token_ttl: Duration,
    pub store_timeout: Duration,
}

impl Config {
    pub fn from_env() -> Self {
        let token_ttl_hours: u64 = env::var("TOKEN_TTL_HOURS")
            .unwrap_or_else(|_| "24".to_string())
            .parse()
            .expect("TOKEN_TTL_HOURS must be a number");
        let store_timeout_ms: u64 = env::var("STORE_TIMEOUT_MS")
            .unwrap_or_else(|_| "5000".to_string())
            .parse()
            .expect("STORE_TIMEOUT_MS must be a number");

        Self {
            database_url: env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://onboarding.db".to_string()),
            port: env::var("PORT").unwrap_or_else(|_| "8080".to_string()).parse().expect("PORT must be a number"),
            jwt_secret_key: env::var("JWT_SECRET_KEY").expect("JWT_SECRET_KEY must be set"),
            auth_issuer: env::var("AUTH_ISSUER").unwrap_or_else(|_| "onboarding-backend".to_string()),
            token_ttl: Duration::from_secs(token_ttl_hours * 3600),
            store_timeout: Duration::from_millis(store_timeout_ms),
        }
    }
}
