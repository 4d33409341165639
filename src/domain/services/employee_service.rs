use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use serde_json::{Map, Value};
use tracing::{debug, info};

use crate::domain::models::document::Document;
use crate::domain::models::employee::Employee;
use crate::domain::models::entity::{EntityKind, KINDS};
use crate::domain::ports::DocumentStore;
use crate::error::AppError;
use super::employee_validator::{validate_employee_patch, validate_new_employee};
use super::entity_repository::EntityRepository;
use super::permissions::PermissionResolver;
use super::scoped::{strip_identity, TenantCollection};

pub const EMPLOYEES_COLLECTION: &str = "employees";

pub struct EmployeeService {
    employees: TenantCollection,
    permissions: Arc<PermissionResolver>,
    entities: Arc<EntityRepository>,
}

impl EmployeeService {
    pub fn new(
        store: Arc<dyn DocumentStore>,
        deadline: Duration,
        permissions: Arc<PermissionResolver>,
        entities: Arc<EntityRepository>,
    ) -> Self {
        Self {
            employees: TenantCollection::new(store, EMPLOYEES_COLLECTION, deadline),
            permissions,
            entities,
        }
    }

    fn not_found() -> AppError {
        AppError::NotFound("employee not found".into())
    }

    /// Referenced entities must exist in the caller's tenant.
    async fn ensure_reference(&self, kind: EntityKind, tenant_id: &str, id: &str) -> Result<(), AppError> {
        if self.entities.exists(kind, tenant_id, id).await? {
            return Ok(());
        }
        debug!(kind = kind.slug(), id, "Employee references an unknown entity");
        Err(AppError::Validation(format!(
            "{} does not reference an existing {}",
            kind.reference_field(),
            kind.label()
        )))
    }

    pub async fn create(&self, tenant_id: &str, payload: &Map<String, Value>) -> Result<Employee, AppError> {
        let modules = self.permissions.enabled_modules(tenant_id).await?;
        let draft = validate_new_employee(payload, &modules, Utc::now())?;

        for (kind, id) in draft.references.iter() {
            self.ensure_reference(kind, tenant_id, &id.to_string()).await?;
        }

        let employee = Employee::new(tenant_id.to_string(), draft);
        self.employees.insert(tenant_id, Document::from_model(&employee)?).await?;
        info!(id = %employee.id, "Created employee");
        Ok(employee)
    }

    pub async fn list(&self, tenant_id: &str) -> Result<Vec<Employee>, AppError> {
        self.employees
            .list(tenant_id)
            .await?
            .into_iter()
            .map(Document::into_model)
            .collect()
    }

    pub async fn get(&self, tenant_id: &str, id: &str) -> Result<Employee, AppError> {
        self.employees
            .get(tenant_id, id)
            .await?
            .ok_or_else(Self::not_found)?
            .into_model()
    }

    pub async fn update(
        &self,
        tenant_id: &str,
        id: &str,
        mut partial: Map<String, Value>,
    ) -> Result<(), AppError> {
        strip_identity(&mut partial);
        let modules = self.permissions.enabled_modules(tenant_id).await?;
        validate_employee_patch(&mut partial, &modules)?;

        for spec in KINDS.iter() {
            if let Some(Value::String(reference)) = partial.get(spec.reference_field) {
                self.ensure_reference(spec.kind, tenant_id, reference).await?;
            }
        }

        if !self.employees.update(tenant_id, id, &partial).await? {
            return Err(Self::not_found());
        }
        info!(id, "Updated employee");
        Ok(())
    }

    pub async fn delete(&self, tenant_id: &str, id: &str) -> Result<(), AppError> {
        if !self.employees.delete(tenant_id, id).await? {
            return Err(Self::not_found());
        }
        info!(id, "Deleted employee");
        Ok(())
    }
}
