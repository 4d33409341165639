use std::sync::Arc;
use std::time::Duration;

use serde_json::{Map, Value};
use tracing::{error, info, warn};

use crate::domain::models::document::{Document, Filter};
use crate::domain::models::tenant::{is_known_module, Tenant};
use crate::domain::models::user::{Role, User};
use crate::domain::ports::DocumentStore;
use crate::error::AppError;
use super::permissions::{PermissionResolver, TENANTS_COLLECTION};
use super::scoped::with_deadline;
use super::user_service::UserService;

pub struct TenantService {
    store: Arc<dyn DocumentStore>,
    deadline: Duration,
    permissions: Arc<PermissionResolver>,
    users: Arc<UserService>,
}

impl TenantService {
    pub fn new(
        store: Arc<dyn DocumentStore>,
        deadline: Duration,
        permissions: Arc<PermissionResolver>,
        users: Arc<UserService>,
    ) -> Self {
        Self { store, deadline, permissions, users }
    }

    /// Creates a tenant and its first admin. If the admin cannot be created
    /// the tenant is deleted again.
    pub async fn signup(&self, company_name: &str, username: &str, password: &str) -> Result<(Tenant, User), AppError> {
        let company_name = company_name.trim();
        let username = username.trim();
        if company_name.is_empty() || username.is_empty() || password.is_empty() {
            return Err(AppError::Validation("companyName, username and password are required".into()));
        }

        let tenant = Tenant::new(company_name.to_string());
        let doc = Document::from_model(&tenant)?;
        with_deadline(self.deadline, self.store.insert(TENANTS_COLLECTION, &doc)).await?;

        let admin = match self.users.insert_user(&tenant.id, username, password, Role::Admin).await {
            Ok(admin) => admin,
            Err(e) => return Err(self.compensate(&tenant.id, e).await),
        };

        info!(tenant_id = %tenant.id, admin_id = %admin.id, "Tenant signed up");
        Ok((tenant, admin))
    }

    async fn compensate(&self, tenant_id: &str, cause: AppError) -> AppError {
        warn!(tenant_id, error = %cause, "Admin creation failed, removing tenant");
        let filter = Filter::new().id(tenant_id);
        match with_deadline(self.deadline, self.store.delete_one(TENANTS_COLLECTION, &filter)).await {
            Ok(_) if cause.is_unique_violation() => AppError::Conflict("username already exists".into()),
            Ok(_) => cause,
            Err(delete_err) => {
                error!(tenant_id, error = %delete_err, "Compensating tenant delete failed; tenant is orphaned");
                AppError::InternalWithMsg(format!("signup failed and tenant {tenant_id} could not be removed"))
            }
        }
    }

    pub async fn current(&self, tenant_id: &str) -> Result<Tenant, AppError> {
        self.permissions.load_tenant(tenant_id).await
    }

    /// Replaces the tenant's module list. Admin only.
    pub async fn update_modules(&self, actor_id: &str, tenant_id: &str, modules: Vec<String>) -> Result<Tenant, AppError> {
        self.users.require_admin(tenant_id, actor_id).await?;

        let unknown: Vec<&str> = modules
            .iter()
            .map(String::as_str)
            .filter(|slug| !is_known_module(slug))
            .collect();
        if !unknown.is_empty() {
            return Err(AppError::Validation(format!("unknown module(s): {}", unknown.join(", "))));
        }

        let mut enabled: Vec<String> = Vec::with_capacity(modules.len());
        for slug in modules {
            if !enabled.contains(&slug) {
                enabled.push(slug);
            }
        }

        let mut partial = Map::new();
        partial.insert("enabledEntities".into(), Value::from(enabled));
        let filter = Filter::new().id(tenant_id);
        let matched = with_deadline(self.deadline, self.store.update_one(TENANTS_COLLECTION, &filter, &partial)).await?;
        if matched == 0 {
            error!(tenant_id, "Authenticated tenant vanished during module update");
            return Err(AppError::InternalWithMsg(format!("tenant {tenant_id} could not be updated")));
        }

        info!(tenant_id, actor_id, "Updated tenant modules");
        self.permissions.load_tenant(tenant_id).await
    }
}
