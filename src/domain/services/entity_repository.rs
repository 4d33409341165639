//! Uniform CRUD over every reference entity kind.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use serde_json::{Map, Value};
use tracing::{debug, info};
use uuid::Uuid;

use crate::domain::models::entity::{EntityKind, NewEntity, ReferenceEntity};
use crate::domain::ports::DocumentStore;
use crate::error::AppError;
use super::scoped::{strip_identity, TenantCollection};

pub struct EntityRepository {
    collections: HashMap<EntityKind, TenantCollection>,
}

impl EntityRepository {
    pub fn new(store: Arc<dyn DocumentStore>, deadline: Duration) -> Self {
        let collections = EntityKind::all()
            .map(|kind| (kind, TenantCollection::new(store.clone(), kind.collection(), deadline)))
            .collect();
        Self { collections }
    }

    fn collection(&self, kind: EntityKind) -> &TenantCollection {
        // Populated for every kind in `new`.
        &self.collections[&kind]
    }

    fn not_found(kind: EntityKind) -> AppError {
        AppError::NotFound(format!("{} not found", kind.label()))
    }

    pub async fn create(&self, kind: EntityKind, tenant_id: &str, entity: NewEntity) -> Result<ReferenceEntity, AppError> {
        if entity.attributes.kind() != kind {
            return Err(AppError::Validation(format!("payload is not a {}", kind.label())));
        }
        let entity = ReferenceEntity::new(tenant_id.to_string(), entity);
        let doc = entity.to_document()?;
        self.check_attribute_references(kind, tenant_id, &doc.body).await?;
        let doc = self.collection(kind).insert(tenant_id, doc).await?;
        info!(kind = kind.slug(), id = %doc.id, "Created {}", kind.label());
        Ok(entity)
    }

    pub async fn list_by_tenant(&self, kind: EntityKind, tenant_id: &str) -> Result<Vec<ReferenceEntity>, AppError> {
        self.collection(kind)
            .list(tenant_id)
            .await?
            .into_iter()
            .map(|doc| ReferenceEntity::from_document(kind, doc))
            .collect()
    }

    pub async fn get_by_id(&self, kind: EntityKind, tenant_id: &str, id: &str) -> Result<ReferenceEntity, AppError> {
        let doc = self
            .collection(kind)
            .get(tenant_id, id)
            .await?
            .ok_or_else(|| Self::not_found(kind))?;
        ReferenceEntity::from_document(kind, doc)
    }

    pub async fn exists(&self, kind: EntityKind, tenant_id: &str, id: &str) -> Result<bool, AppError> {
        Ok(self.collection(kind).get(tenant_id, id).await?.is_some())
    }

    pub async fn update(
        &self,
        kind: EntityKind,
        tenant_id: &str,
        id: &str,
        mut partial: Map<String, Value>,
    ) -> Result<(), AppError> {
        strip_identity(&mut partial);
        validate_patch(kind, &partial)?;
        self.check_attribute_references(kind, tenant_id, &partial).await?;

        if !self.collection(kind).update(tenant_id, id, &partial).await? {
            debug!(kind = kind.slug(), id, "Update matched nothing");
            return Err(Self::not_found(kind));
        }
        info!(kind = kind.slug(), id, "Updated {}", kind.label());
        Ok(())
    }

    /// Attribute fields that point at another entity must hold the id of one
    /// owned by the same tenant. Absent fields are not checked.
    async fn check_attribute_references(
        &self,
        kind: EntityKind,
        tenant_id: &str,
        fields: &Map<String, Value>,
    ) -> Result<(), AppError> {
        for &(field, target) in kind.spec().attribute_references {
            let Some(value) = fields.get(field) else { continue };
            let id = match value.as_str().map(Uuid::parse_str) {
                Some(Ok(id)) => id.to_string(),
                _ => return Err(AppError::Validation(format!("Invalid format for {field}"))),
            };
            if !self.exists(target, tenant_id, &id).await? {
                debug!(kind = kind.slug(), field, id = %id, "Attribute references an unknown entity");
                return Err(AppError::Validation(format!(
                    "{field} does not reference an existing {}",
                    target.label()
                )));
            }
        }
        Ok(())
    }

    pub async fn delete(&self, kind: EntityKind, tenant_id: &str, id: &str) -> Result<(), AppError> {
        if !self.collection(kind).delete(tenant_id, id).await? {
            return Err(Self::not_found(kind));
        }
        info!(kind = kind.slug(), id, "Deleted {}", kind.label());
        Ok(())
    }
}

/// Only `name` and the kind's own attributes may change, and only to
/// strings. `name` stays non-empty.
fn validate_patch(kind: EntityKind, partial: &Map<String, Value>) -> Result<(), AppError> {
    if partial.is_empty() {
        return Err(AppError::Validation("no updatable fields supplied".into()));
    }

    let attribute_fields = kind.spec().attribute_fields;
    let mut unknown: Vec<&str> = partial
        .keys()
        .map(String::as_str)
        .filter(|key| *key != "name" && !attribute_fields.contains(key))
        .collect();
    if !unknown.is_empty() {
        unknown.sort_unstable();
        return Err(AppError::Validation(format!(
            "unknown field(s) for {}: {}",
            kind.label(),
            unknown.join(", ")
        )));
    }

    for (key, value) in partial {
        match (key.as_str(), value) {
            ("name", Value::String(name)) if !name.trim().is_empty() => {}
            ("name", _) => return Err(AppError::Validation("name must be a non-empty string".into())),
            (_, Value::String(_)) => {}
            (field, _) => return Err(AppError::Validation(format!("{field} must be a string"))),
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn patch(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn patch_accepts_kind_fields() {
        assert!(validate_patch(EntityKind::Location, &patch(json!({ "postalCode": "94107" }))).is_ok());
        assert!(validate_patch(EntityKind::OnboardingBuddy, &patch(json!({ "teamId": "platform" }))).is_ok());
    }

    #[test]
    fn patch_rejects_foreign_fields() {
        let err = validate_patch(EntityKind::Team, &patch(json!({ "code": "X", "address": "Y" }))).unwrap_err();
        match err {
            AppError::Validation(msg) => assert!(msg.contains("address, code"), "{msg}"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn patch_rejects_blank_name_and_empty_patch() {
        assert!(validate_patch(EntityKind::Team, &patch(json!({ "name": "  " }))).is_err());
        assert!(validate_patch(EntityKind::Team, &Map::new()).is_err());
        assert!(validate_patch(EntityKind::CostCenter, &patch(json!({ "code": 7 }))).is_err());
        assert!(validate_patch(EntityKind::Location, &patch(json!({ "address": null }))).is_err());
    }
}
