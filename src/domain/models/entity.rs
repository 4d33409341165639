//! Reference entities: the ten lookup types an employee can point at.
//!
//! Every kind is described by one row of [`KINDS`]. Routing, collection names,
//! module gating and employee field requiredness all read that table.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::error::AppError;
use super::document::Document;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EntityKind {
    Location,
    Department,
    Manager,
    JobRole,
    EmploymentType,
    Team,
    CostCenter,
    HardwareAsset,
    OnboardingBuddy,
    AccessLevel,
}

pub struct KindSpec {
    pub kind: EntityKind,
    /// Module slug; also the route segment under `/api/v1`.
    pub slug: &'static str,
    pub collection: &'static str,
    /// Employee field that references this kind.
    pub reference_field: &'static str,
    pub label: &'static str,
    pub attribute_fields: &'static [&'static str],
    /// Attribute fields holding the id of another entity in the same tenant.
    pub attribute_references: &'static [(&'static str, EntityKind)],
}

pub const KINDS: [KindSpec; 10] = [
    KindSpec {
        kind: EntityKind::Location,
        slug: "locations",
        collection: "locations",
        reference_field: "locationId",
        label: "location",
        attribute_fields: &["address", "postalCode"],
        attribute_references: &[],
    },
    KindSpec {
        kind: EntityKind::Department,
        slug: "departments",
        collection: "departments",
        reference_field: "departmentId",
        label: "department",
        attribute_fields: &["head"],
        attribute_references: &[],
    },
    KindSpec {
        kind: EntityKind::Manager,
        slug: "managers",
        collection: "managers",
        reference_field: "managerId",
        label: "manager",
        attribute_fields: &["email"],
        attribute_references: &[],
    },
    KindSpec {
        kind: EntityKind::JobRole,
        slug: "job-roles",
        collection: "job_roles",
        reference_field: "jobRoleId",
        label: "job role",
        attribute_fields: &["description"],
        attribute_references: &[],
    },
    KindSpec {
        kind: EntityKind::EmploymentType,
        slug: "employment-types",
        collection: "employment_types",
        reference_field: "employmentTypeId",
        label: "employment type",
        attribute_fields: &[],
        attribute_references: &[],
    },
    KindSpec {
        kind: EntityKind::Team,
        slug: "teams",
        collection: "teams",
        reference_field: "teamId",
        label: "team",
        attribute_fields: &[],
        attribute_references: &[],
    },
    KindSpec {
        kind: EntityKind::CostCenter,
        slug: "cost-centers",
        collection: "cost_centers",
        reference_field: "costCenterId",
        label: "cost center",
        attribute_fields: &["code"],
        attribute_references: &[],
    },
    KindSpec {
        kind: EntityKind::HardwareAsset,
        slug: "hardware-assets",
        collection: "hardware_assets",
        reference_field: "hardwareAssetId",
        label: "hardware asset",
        attribute_fields: &["modelNumber"],
        attribute_references: &[],
    },
    KindSpec {
        kind: EntityKind::OnboardingBuddy,
        slug: "onboarding-buddies",
        collection: "onboarding_buddies",
        reference_field: "onboardingBuddyId",
        label: "onboarding buddy",
        attribute_fields: &["teamId"],
        attribute_references: &[("teamId", EntityKind::Team)],
    },
    KindSpec {
        kind: EntityKind::AccessLevel,
        slug: "access-levels",
        collection: "access_levels",
        reference_field: "accessLevelId",
        label: "access level",
        attribute_fields: &[],
        attribute_references: &[],
    },
];

impl EntityKind {
    pub fn all() -> impl Iterator<Item = EntityKind> {
        KINDS.iter().map(|spec| spec.kind)
    }

    pub fn spec(self) -> &'static KindSpec {
        // KINDS is declared in variant order.
        &KINDS[self as usize]
    }

    pub fn slug(self) -> &'static str {
        self.spec().slug
    }

    pub fn collection(self) -> &'static str {
        self.spec().collection
    }

    pub fn reference_field(self) -> &'static str {
        self.spec().reference_field
    }

    pub fn label(self) -> &'static str {
        self.spec().label
    }

    /// Per-kind attribute decoding.
    pub fn decode_attributes(self, body: &Map<String, Value>) -> Result<EntityAttributes, serde_json::Error> {
        let value = Value::Object(body.clone());
        Ok(match self {
            EntityKind::Location => EntityAttributes::Location(serde_json::from_value(value)?),
            EntityKind::Department => EntityAttributes::Department(serde_json::from_value(value)?),
            EntityKind::Manager => EntityAttributes::Manager(serde_json::from_value(value)?),
            EntityKind::JobRole => EntityAttributes::JobRole(serde_json::from_value(value)?),
            EntityKind::EmploymentType => EntityAttributes::EmploymentType(serde_json::from_value(value)?),
            EntityKind::Team => EntityAttributes::Team(serde_json::from_value(value)?),
            EntityKind::CostCenter => EntityAttributes::CostCenter(serde_json::from_value(value)?),
            EntityKind::HardwareAsset => EntityAttributes::HardwareAsset(serde_json::from_value(value)?),
            EntityKind::OnboardingBuddy => EntityAttributes::OnboardingBuddy(serde_json::from_value(value)?),
            EntityKind::AccessLevel => EntityAttributes::AccessLevel(serde_json::from_value(value)?),
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LocationFields {
    pub address: String,
    pub postal_code: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DepartmentFields {
    /// Name of the department head.
    pub head: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ManagerFields {
    pub email: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JobRoleFields {
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EmploymentTypeFields {}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TeamFields {}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CostCenterFields {
    /// Accounting code, e.g. "ENG-101".
    pub code: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HardwareAssetFields {
    pub model_number: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OnboardingBuddyFields {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub team_id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AccessLevelFields {}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum EntityAttributes {
    Location(LocationFields),
    Department(DepartmentFields),
    Manager(ManagerFields),
    JobRole(JobRoleFields),
    EmploymentType(EmploymentTypeFields),
    Team(TeamFields),
    CostCenter(CostCenterFields),
    HardwareAsset(HardwareAssetFields),
    OnboardingBuddy(OnboardingBuddyFields),
    AccessLevel(AccessLevelFields),
}

impl EntityAttributes {
    pub fn kind(&self) -> EntityKind {
        match self {
            EntityAttributes::Location(_) => EntityKind::Location,
            EntityAttributes::Department(_) => EntityKind::Department,
            EntityAttributes::Manager(_) => EntityKind::Manager,
            EntityAttributes::JobRole(_) => EntityKind::JobRole,
            EntityAttributes::EmploymentType(_) => EntityKind::EmploymentType,
            EntityAttributes::Team(_) => EntityKind::Team,
            EntityAttributes::CostCenter(_) => EntityKind::CostCenter,
            EntityAttributes::HardwareAsset(_) => EntityKind::HardwareAsset,
            EntityAttributes::OnboardingBuddy(_) => EntityKind::OnboardingBuddy,
            EntityAttributes::AccessLevel(_) => EntityKind::AccessLevel,
        }
    }
}

/// Caller input for `create`: everything except identity and ownership.
#[derive(Debug, Clone, PartialEq)]
pub struct NewEntity {
    pub name: String,
    pub attributes: EntityAttributes,
}

impl NewEntity {
    /// Builds a new entity of `kind` from a loosely typed payload. Any `id` or
    /// `tenantId` the caller sent is ignored.
    pub fn from_payload(kind: EntityKind, payload: &Map<String, Value>) -> Result<Self, AppError> {
        let name = match payload.get("name") {
            Some(Value::String(name)) if !name.trim().is_empty() => name.clone(),
            _ => return Err(AppError::Validation("name is required".into())),
        };
        let attributes = kind
            .decode_attributes(payload)
            .map_err(|e| AppError::Validation(format!("invalid {} payload: {e}", kind.label())))?;
        Ok(Self { name, attributes })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReferenceEntity {
    pub id: String,
    pub tenant_id: String,
    pub name: String,
    #[serde(flatten)]
    pub attributes: EntityAttributes,
}

impl ReferenceEntity {
    pub fn new(tenant_id: String, entity: NewEntity) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            tenant_id,
            name: entity.name,
            attributes: entity.attributes,
        }
    }

    pub fn to_document(&self) -> Result<Document, AppError> {
        Document::from_model(self)
    }

    pub fn from_document(kind: EntityKind, doc: Document) -> Result<Self, AppError> {
        let tenant_id = doc
            .tenant_id
            .ok_or_else(|| AppError::InternalWithMsg(format!("{} {} has no tenant", kind.label(), doc.id)))?;
        let name = doc.body.get("name").and_then(Value::as_str).unwrap_or_default().to_string();
        let attributes = kind
            .decode_attributes(&doc.body)
            .map_err(|e| AppError::InternalWithMsg(format!("corrupt {} {}: {e}", kind.label(), doc.id)))?;
        Ok(Self { id: doc.id, tenant_id, name, attributes })
    }
}
