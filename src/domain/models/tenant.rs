use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};

use super::entity::KINDS;

/// Module slug that gates the employee routes.
pub const EMPLOYEES_MODULE: &str = "employees";

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TenantStatus {
    Active,
    Suspended,
    Trial,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Tenant {
    pub id: String,
    pub name: String,
    pub status: TenantStatus,
    pub created_at: DateTime<Utc>,
    /// Ordered module slugs, e.g. "locations", "cost-centers".
    pub enabled_entities: Vec<String>,
}

impl Tenant {
    pub fn new(name: String) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name,
            status: TenantStatus::Active,
            created_at: Utc::now(),
            enabled_entities: known_modules().map(str::to_string).collect(),
        }
    }

    pub fn has_module(&self, slug: &str) -> bool {
        self.enabled_entities.iter().any(|enabled| enabled == slug)
    }
}

/// The fixed module vocabulary: employees plus one slug per reference kind.
pub fn known_modules() -> impl Iterator<Item = &'static str> {
    std::iter::once(EMPLOYEES_MODULE).chain(KINDS.iter().map(|spec| spec.slug))
}

pub fn is_known_module(slug: &str) -> bool {
    known_modules().any(|known| known == slug)
}
