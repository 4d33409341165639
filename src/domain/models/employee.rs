use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};

use super::entity::EntityKind;

/// One optional reference per entity kind.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeReferences {
    pub location_id: Option<Uuid>,
    pub department_id: Option<Uuid>,
    pub manager_id: Option<Uuid>,
    pub job_role_id: Option<Uuid>,
    pub employment_type_id: Option<Uuid>,
    pub team_id: Option<Uuid>,
    pub cost_center_id: Option<Uuid>,
    pub hardware_asset_id: Option<Uuid>,
    pub onboarding_buddy_id: Option<Uuid>,
    pub access_level_id: Option<Uuid>,
}

impl EmployeeReferences {
    pub fn get(&self, kind: EntityKind) -> Option<Uuid> {
        match kind {
            EntityKind::Location => self.location_id,
            EntityKind::Department => self.department_id,
            EntityKind::Manager => self.manager_id,
            EntityKind::JobRole => self.job_role_id,
            EntityKind::EmploymentType => self.employment_type_id,
            EntityKind::Team => self.team_id,
            EntityKind::CostCenter => self.cost_center_id,
            EntityKind::HardwareAsset => self.hardware_asset_id,
            EntityKind::OnboardingBuddy => self.onboarding_buddy_id,
            EntityKind::AccessLevel => self.access_level_id,
        }
    }

    pub fn set(&mut self, kind: EntityKind, id: Uuid) {
        let slot = match kind {
            EntityKind::Location => &mut self.location_id,
            EntityKind::Department => &mut self.department_id,
            EntityKind::Manager => &mut self.manager_id,
            EntityKind::JobRole => &mut self.job_role_id,
            EntityKind::EmploymentType => &mut self.employment_type_id,
            EntityKind::Team => &mut self.team_id,
            EntityKind::CostCenter => &mut self.cost_center_id,
            EntityKind::HardwareAsset => &mut self.hardware_asset_id,
            EntityKind::OnboardingBuddy => &mut self.onboarding_buddy_id,
            EntityKind::AccessLevel => &mut self.access_level_id,
        };
        *slot = Some(id);
    }

    pub fn iter(&self) -> impl Iterator<Item = (EntityKind, Uuid)> + '_ {
        EntityKind::all().filter_map(|kind| self.get(kind).map(|id| (kind, id)))
    }
}

/// Validated employee input, before it is bound to a tenant.
#[derive(Debug, Clone, PartialEq)]
pub struct EmployeeDraft {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: String,
    pub onboarding_date: DateTime<Utc>,
    pub references: EmployeeReferences,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    pub id: String,
    pub tenant_id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: String,
    pub onboarding_date: DateTime<Utc>,
    #[serde(flatten)]
    pub references: EmployeeReferences,
}

impl Employee {
    pub fn new(tenant_id: String, draft: EmployeeDraft) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            tenant_id,
            first_name: draft.first_name,
            last_name: draft.last_name,
            email: draft.email,
            phone_number: draft.phone_number,
            onboarding_date: draft.onboarding_date,
            references: draft.references,
        }
    }
}
