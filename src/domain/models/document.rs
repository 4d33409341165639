use serde::{de::DeserializeOwned, Serialize};
use serde_json::{Map, Value};

use crate::error::AppError;

/// A stored document. `id` and `tenant_id` live outside the JSON body so the
/// store can index and filter on them directly.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub id: String,
    pub tenant_id: Option<String>,
    pub body: Map<String, Value>,
}

impl Document {
    pub fn new(id: String, tenant_id: Option<String>, body: Map<String, Value>) -> Self {
        Self { id, tenant_id, body }
    }

    /// Serializes `model` and moves its `id` / `tenantId` keys out of the body.
    pub fn from_model<T: Serialize>(model: &T) -> Result<Self, AppError> {
        let mut body = match serde_json::to_value(model) {
            Ok(Value::Object(map)) => map,
            Ok(_) => return Err(AppError::InternalWithMsg("model did not serialize to an object".into())),
            Err(e) => return Err(AppError::InternalWithMsg(format!("encode failed: {e}"))),
        };
        let id = match body.remove("id") {
            Some(Value::String(id)) => id,
            _ => return Err(AppError::InternalWithMsg("model has no string id".into())),
        };
        let tenant_id = match body.remove("tenantId") {
            Some(Value::String(t)) => Some(t),
            _ => None,
        };
        Ok(Self { id, tenant_id, body })
    }

    /// Inverse of [`Document::from_model`].
    pub fn into_model<T: DeserializeOwned>(self) -> Result<T, AppError> {
        let mut body = self.body;
        body.insert("id".into(), Value::String(self.id));
        if let Some(tenant_id) = self.tenant_id {
            body.insert("tenantId".into(), Value::String(tenant_id));
        }
        serde_json::from_value(Value::Object(body))
            .map_err(|e| AppError::InternalWithMsg(format!("decode failed: {e}")))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    Id(String),
    Tenant(String),
    /// Equality on a top-level string field of the body.
    Field(String, String),
}

/// Conjunction of equality conditions.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    conditions: Vec<Condition>,
}

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Filter used by every tenant-owned collection.
    pub fn scoped(tenant_id: &str) -> Self {
        Self::new().tenant(tenant_id)
    }

    pub fn id(mut self, id: &str) -> Self {
        self.conditions.push(Condition::Id(id.to_string()));
        self
    }

    pub fn tenant(mut self, tenant_id: &str) -> Self {
        self.conditions.push(Condition::Tenant(tenant_id.to_string()));
        self
    }

    pub fn eq(mut self, field: &str, value: &str) -> Self {
        self.conditions.push(Condition::Field(field.to_string(), value.to_string()));
        self
    }

    pub fn conditions(&self) -> &[Condition] {
        &self.conditions
    }
}
