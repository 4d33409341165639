use std::time::Duration;

use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use tracing::{debug, error};
use uuid::Uuid;

use crate::config::Config;
use crate::domain::models::auth::Claims;
use crate::error::AppError;

pub const TOKEN_AUDIENCE: &str = "onboarding-api";

/// Issues and verifies the HS256 bearer tokens that carry a user's identity
/// and tenant.
pub struct TokenService {
    issuer: String,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl TokenService {
    pub fn new(config: &Config) -> Self {
        let secret = config.jwt_secret_key.as_bytes();
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_audience(&[TOKEN_AUDIENCE]);
        validation.set_issuer(&[config.auth_issuer.as_str()]);

        Self {
            issuer: config.auth_issuer.clone(),
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
        }
    }

    pub fn issue(&self, user_id: &str, tenant_id: &str, ttl: Duration) -> Result<String, AppError> {
        let now = Utc::now().timestamp() as usize;
        let claims = Claims {
            iss: self.issuer.clone(),
            sub: user_id.to_string(),
            aud: TOKEN_AUDIENCE.to_string(),
            exp: now + ttl.as_secs() as usize,
            iat: now,
            jti: Uuid::new_v4().to_string(),
            tenant_id: tenant_id.to_string(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key).map_err(|e| {
            error!("JWT encoding failed: {}", e);
            AppError::Internal
        })
    }

    /// Any decoding, signature, expiry, audience or issuer failure is `Unauthorized`.
    pub fn verify(&self, token: &str) -> Result<Claims, AppError> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| {
                debug!("Rejected bearer token: {}", e);
                AppError::Unauthorized
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(secret: &str, issuer: &str) -> Config {
        Config {
            database_url: "sqlite::memory:".into(),
            port: 0,
            jwt_secret_key: secret.into(),
            auth_issuer: issuer.into(),
            token_ttl: Duration::from_secs(3600),
            store_timeout: Duration::from_secs(1),
        }
    }

    #[test]
    fn issued_tokens_verify() {
        let service = TokenService::new(&config("secret", "onboarding-backend"));
        let token = service.issue("u1", "t1", Duration::from_secs(3600)).unwrap();
        let claims = service.verify(&token).unwrap();
        assert_eq!(claims.sub, "u1");
        assert_eq!(claims.tenant_id, "t1");
        assert_eq!(claims.aud, TOKEN_AUDIENCE);
    }

    #[test]
    fn foreign_secret_or_issuer_is_rejected() {
        let issuer = TokenService::new(&config("secret", "onboarding-backend"));
        let token = issuer.issue("u1", "t1", Duration::from_secs(3600)).unwrap();

        let other_secret = TokenService::new(&config("other", "onboarding-backend"));
        assert!(matches!(other_secret.verify(&token), Err(AppError::Unauthorized)));

        let other_issuer = TokenService::new(&config("secret", "someone-else"));
        assert!(matches!(other_issuer.verify(&token), Err(AppError::Unauthorized)));
    }

    #[test]
    fn expired_tokens_are_rejected() {
        let service = TokenService::new(&config("secret", "onboarding-backend"));
        // Past the default 60 second leeway.
        let issued_at = Utc::now().timestamp() as usize - 3600;
        let claims = Claims {
            iss: "onboarding-backend".into(),
            sub: "u1".into(),
            aud: TOKEN_AUDIENCE.into(),
            exp: issued_at + 3600 - 120,
            iat: issued_at,
            jti: Uuid::new_v4().to_string(),
            tenant_id: "t1".into(),
        };
        let token = encode(&Header::new(Algorithm::HS256), &claims, &service.encoding_key).unwrap();
        assert!(matches!(service.verify(&token), Err(AppError::Unauthorized)));

        let fresh = service.issue("u1", "t1", Duration::from_secs(60)).unwrap();
        assert!(service.verify(&fresh).is_ok());
    }

    #[test]
    fn garbage_is_rejected() {
        let service = TokenService::new(&config("secret", "onboarding-backend"));
        assert!(matches!(service.verify("not.a.token"), Err(AppError::Unauthorized)));
    }
}
