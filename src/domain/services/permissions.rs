use std::sync::Arc;
use std::time::Duration;

use tracing::error;

use crate::domain::models::document::Filter;
use crate::domain::models::tenant::Tenant;
use crate::domain::ports::DocumentStore;
use crate::error::AppError;
use super::scoped::with_deadline;

pub const TENANTS_COLLECTION: &str = "tenants";

/// Answers "is module X enabled for tenant T" from the tenant record.
/// The record is read on every call; nothing is cached.
pub struct PermissionResolver {
    store: Arc<dyn DocumentStore>,
    deadline: Duration,
}

impl PermissionResolver {
    pub fn new(store: Arc<dyn DocumentStore>, deadline: Duration) -> Self {
        Self { store, deadline }
    }

    /// A tenant that cannot be loaded is an internal error, never a denial.
    pub async fn load_tenant(&self, tenant_id: &str) -> Result<Tenant, AppError> {
        let filter = Filter::new().id(tenant_id);
        let doc = with_deadline(self.deadline, self.store.find_one(TENANTS_COLLECTION, &filter))
            .await?
            .ok_or_else(|| {
                error!(tenant_id, "Authenticated tenant has no tenant record");
                AppError::InternalWithMsg(format!("tenant {tenant_id} could not be loaded"))
            })?;
        doc.into_model()
    }

    pub async fn enabled_modules(&self, tenant_id: &str) -> Result<Vec<String>, AppError> {
        Ok(self.load_tenant(tenant_id).await?.enabled_entities)
    }

    pub async fn is_enabled(&self, tenant_id: &str, slug: &str) -> Result<bool, AppError> {
        Ok(self.load_tenant(tenant_id).await?.has_module(slug))
    }
}
