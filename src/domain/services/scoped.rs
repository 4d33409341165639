use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use serde_json::{Map, Value};
use uuid::Uuid;

use crate::domain::models::document::{Document, Filter};
use crate::domain::ports::DocumentStore;
use crate::error::AppError;

/// Bounds a single store call.
pub async fn with_deadline<T>(
    deadline: Duration,
    call: impl Future<Output = Result<T, AppError>>,
) -> Result<T, AppError> {
    tokio::time::timeout(deadline, call)
        .await
        .map_err(|_| AppError::StoreTimeout)?
}

/// Ids are UUIDs; anything else can never match and is reported as absent.
pub fn is_well_formed_id(id: &str) -> bool {
    Uuid::parse_str(id).is_ok()
}

/// A tenant-owned collection. Every query built here carries the tenant
/// condition, so no result can include another tenant's documents.
#[derive(Clone)]
pub struct TenantCollection {
    store: Arc<dyn DocumentStore>,
    collection: &'static str,
    deadline: Duration,
}

impl TenantCollection {
    pub fn new(store: Arc<dyn DocumentStore>, collection: &'static str, deadline: Duration) -> Self {
        Self { store, collection, deadline }
    }

    pub async fn insert(&self, tenant_id: &str, mut doc: Document) -> Result<Document, AppError> {
        doc.tenant_id = Some(tenant_id.to_string());
        with_deadline(self.deadline, self.store.insert(self.collection, &doc)).await?;
        Ok(doc)
    }

    pub async fn list(&self, tenant_id: &str) -> Result<Vec<Document>, AppError> {
        with_deadline(self.deadline, self.store.find_many(self.collection, &Filter::scoped(tenant_id))).await
    }

    /// `None` for malformed, absent and foreign ids alike.
    pub async fn get(&self, tenant_id: &str, id: &str) -> Result<Option<Document>, AppError> {
        if !is_well_formed_id(id) {
            return Ok(None);
        }
        let filter = Filter::scoped(tenant_id).id(id);
        with_deadline(self.deadline, self.store.find_one(self.collection, &filter)).await
    }

    /// Returns whether a document matched.
    pub async fn update(&self, tenant_id: &str, id: &str, partial: &Map<String, Value>) -> Result<bool, AppError> {
        if !is_well_formed_id(id) {
            return Ok(false);
        }
        let filter = Filter::scoped(tenant_id).id(id);
        let matched = with_deadline(self.deadline, self.store.update_one(self.collection, &filter, partial)).await?;
        Ok(matched > 0)
    }

    /// Returns whether a document was removed.
    pub async fn delete(&self, tenant_id: &str, id: &str) -> Result<bool, AppError> {
        if !is_well_formed_id(id) {
            return Ok(false);
        }
        let filter = Filter::scoped(tenant_id).id(id);
        let deleted = with_deadline(self.deadline, self.store.delete_one(self.collection, &filter)).await?;
        Ok(deleted > 0)
    }
}

/// Drops keys a caller may never change on an existing document.
pub fn strip_identity(partial: &mut Map<String, Value>) {
    for key in ["id", "_id", "tenantId"] {
        partial.remove(key);
    }
}
