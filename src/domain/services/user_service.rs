use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use crate::domain::models::auth::{LoginResponse, TenantProfile, UserProfile};
use crate::domain::models::document::Filter;
use crate::domain::models::user::{Role, User};
use crate::domain::ports::{CredentialHasher, DocumentStore};
use crate::error::AppError;
use super::auth_service::TokenService;
use super::permissions::PermissionResolver;
use super::scoped::{with_deadline, TenantCollection};

pub const USERS_COLLECTION: &str = "users";

pub struct UserService {
    store: Arc<dyn DocumentStore>,
    users: TenantCollection,
    deadline: Duration,
    hasher: Arc<dyn CredentialHasher>,
    tokens: Arc<TokenService>,
    permissions: Arc<PermissionResolver>,
    token_ttl: Duration,
}

impl UserService {
    pub fn new(
        store: Arc<dyn DocumentStore>,
        deadline: Duration,
        hasher: Arc<dyn CredentialHasher>,
        tokens: Arc<TokenService>,
        permissions: Arc<PermissionResolver>,
        token_ttl: Duration,
    ) -> Self {
        Self {
            users: TenantCollection::new(store.clone(), USERS_COLLECTION, deadline),
            store,
            deadline,
            hasher,
            tokens,
            permissions,
            token_ttl,
        }
    }

    /// Hashes the password and stores a new user. A taken username surfaces
    /// as the store's unique violation.
    pub async fn insert_user(&self, tenant_id: &str, username: &str, password: &str, role: Role) -> Result<User, AppError> {
        let hash = self.hasher.hash(password)?;
        let user = User::new(tenant_id.to_string(), username.to_string(), hash, role);
        self.users.insert(tenant_id, user.to_document()?).await?;
        Ok(user)
    }

    pub async fn find(&self, tenant_id: &str, user_id: &str) -> Result<Option<User>, AppError> {
        self.users
            .get(tenant_id, user_id)
            .await?
            .map(User::from_document)
            .transpose()
    }

    /// Role is read from the store, never from the token.
    pub async fn require_admin(&self, tenant_id: &str, user_id: &str) -> Result<User, AppError> {
        match self.find(tenant_id, user_id).await? {
            Some(user) if user.is_admin() => Ok(user),
            Some(_) => Err(AppError::Forbidden("Only admins can perform this action.".into())),
            None => Err(AppError::Unauthorized),
        }
    }

    pub async fn login(&self, username: &str, password: &str) -> Result<LoginResponse, AppError> {
        // Stored usernames are trimmed on the way in.
        let username = username.trim();
        // Usernames are unique across tenants, so this lookup is the one
        // query that is not tenant-scoped.
        let filter = Filter::new().eq("username", username);
        let doc = with_deadline(self.deadline, self.store.find_one(USERS_COLLECTION, &filter)).await?;

        let user = match doc {
            Some(doc) => User::from_document(doc)?,
            None => {
                warn!(username, "Login for unknown username");
                return Err(AppError::Unauthorized);
            }
        };
        if !self.hasher.verify(password, &user.password_hash) {
            warn!(user_id = %user.id, "Login with wrong password");
            return Err(AppError::Unauthorized);
        }

        let tenant = self.permissions.load_tenant(&user.tenant_id).await?;
        let token = self.tokens.issue(&user.id, &tenant.id, self.token_ttl)?;
        info!(user_id = %user.id, tenant_id = %tenant.id, "User logged in");

        Ok(LoginResponse {
            token,
            user: UserProfile {
                id: user.id,
                username: user.username,
                role: user.role,
            },
            tenant: TenantProfile {
                id: tenant.id,
                name: tenant.name,
                enabled_entities: tenant.enabled_entities,
            },
        })
    }

    pub async fn create_user(
        &self,
        actor_id: &str,
        tenant_id: &str,
        username: &str,
        password: &str,
        role: Option<&str>,
    ) -> Result<User, AppError> {
        self.require_admin(tenant_id, actor_id).await?;

        let username = username.trim();
        if username.is_empty() || password.is_empty() {
            return Err(AppError::Validation("username and password are required".into()));
        }
        let role = match role {
            None => Role::Member,
            Some(raw) => Role::parse(raw)
                .ok_or_else(|| AppError::Validation(format!("unknown role: {raw}")))?,
        };

        let user = self.insert_user(tenant_id, username, password, role).await.map_err(|e| {
            if e.is_unique_violation() {
                AppError::Conflict("username already exists".into())
            } else {
                e
            }
        })?;
        info!(user_id = %user.id, actor_id, "Created user");
        Ok(user)
    }

    pub async fn list(&self, tenant_id: &str) -> Result<Vec<User>, AppError> {
        self.users
            .list(tenant_id)
            .await?
            .into_iter()
            .map(User::from_document)
            .collect()
    }
}
