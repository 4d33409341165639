//! Tenant-driven employee validation.
//!
//! Which reference fields are mandatory depends on the modules the tenant has
//! enabled; the mapping lives in the entity kind table. Missing fields are
//! collected and reported together. Type coercion runs only afterwards and
//! stops at the first bad field.

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::domain::models::employee::{EmployeeDraft, EmployeeReferences};
use crate::domain::models::entity::{EntityKind, KINDS};
use crate::error::AppError;

pub const BASE_REQUIRED_FIELDS: [&str; 3] = ["firstName", "lastName", "email"];

/// Kinds whose reference field is mandatory for a tenant with these modules,
/// in table order.
pub fn required_kinds(enabled_modules: &[String]) -> Vec<EntityKind> {
    KINDS
        .iter()
        .filter(|spec| enabled_modules.iter().any(|m| m == spec.slug))
        .map(|spec| spec.kind)
        .collect()
}

pub fn required_fields(enabled_modules: &[String]) -> Vec<&'static str> {
    BASE_REQUIRED_FIELDS
        .into_iter()
        .chain(required_kinds(enabled_modules).into_iter().map(EntityKind::reference_field))
        .collect()
}

fn is_blank(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.trim().is_empty(),
        Some(_) => false,
    }
}

/// Every required field that is absent, null or blank.
pub fn missing_fields(payload: &Map<String, Value>, enabled_modules: &[String]) -> Vec<String> {
    required_fields(enabled_modules)
        .into_iter()
        .filter(|field| is_blank(payload.get(*field)))
        .map(str::to_string)
        .collect()
}

fn string_field(payload: &Map<String, Value>, field: &str) -> Result<Option<String>, AppError> {
    match payload.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(_) => Err(AppError::Validation(format!("{field} must be a string"))),
    }
}

pub fn parse_onboarding_date(value: &Value) -> Result<DateTime<Utc>, AppError> {
    let raw = value
        .as_str()
        .ok_or_else(|| AppError::Validation("onboardingDate must be a string".into()))?;
    DateTime::parse_from_rfc3339(raw)
        .map(|date| date.with_timezone(&Utc))
        .map_err(|_| {
            AppError::Validation(
                "Invalid onboarding date format. Use RFC3339 format (e.g. 2006-01-02T15:04:05Z)".into(),
            )
        })
}

/// Blank references count as absent; anything else must be a UUID string.
pub fn parse_reference(kind: EntityKind, value: Option<&Value>) -> Result<Option<Uuid>, AppError> {
    if is_blank(value) {
        return Ok(None);
    }
    let field = kind.reference_field();
    value
        .and_then(Value::as_str)
        .and_then(|raw| Uuid::parse_str(raw.trim()).ok())
        .map(Some)
        .ok_or_else(|| AppError::Validation(format!("Invalid format for {field}")))
}

/// Full create-time validation. `now` is the request time used when no
/// onboarding date is supplied.
pub fn validate_new_employee(
    payload: &Map<String, Value>,
    enabled_modules: &[String],
    now: DateTime<Utc>,
) -> Result<EmployeeDraft, AppError> {
    let missing = missing_fields(payload, enabled_modules);
    if !missing.is_empty() {
        return Err(AppError::MissingFields(missing));
    }

    let first_name = string_field(payload, "firstName")?.unwrap_or_default();
    let last_name = string_field(payload, "lastName")?.unwrap_or_default();
    let email = string_field(payload, "email")?.unwrap_or_default();
    let phone_number = string_field(payload, "phoneNumber")?.unwrap_or_default();

    let onboarding_date = match payload.get("onboardingDate") {
        None | Some(Value::Null) => now,
        Some(value) => parse_onboarding_date(value)?,
    };

    let mut references = EmployeeReferences::default();
    for kind in EntityKind::all() {
        if let Some(id) = parse_reference(kind, payload.get(kind.reference_field()))? {
            references.set(kind, id);
        }
    }

    Ok(EmployeeDraft {
        first_name,
        last_name,
        email,
        phone_number,
        onboarding_date,
        references,
    })
}

const EMPLOYEE_TEXT_FIELDS: [&str; 4] = ["firstName", "lastName", "email", "phoneNumber"];

/// Validates and normalizes a partial employee update in place.
///
/// Fields the tenant currently requires cannot be blanked; reference ids and
/// the onboarding date are coerced the same way as on create.
pub fn validate_employee_patch(
    partial: &mut Map<String, Value>,
    enabled_modules: &[String],
) -> Result<(), AppError> {
    if partial.is_empty() {
        return Err(AppError::Validation("no updatable fields supplied".into()));
    }

    let required = required_fields(enabled_modules);
    let blanked: Vec<String> = required
        .iter()
        .filter(|field| partial.contains_key(**field) && is_blank(partial.get(**field)))
        .map(|field| field.to_string())
        .collect();
    if !blanked.is_empty() {
        return Err(AppError::MissingFields(blanked));
    }

    let mut unknown = Vec::new();
    for (key, value) in partial.iter_mut() {
        if EMPLOYEE_TEXT_FIELDS.contains(&key.as_str()) {
            if !value.is_string() {
                return Err(AppError::Validation(format!("{key} must be a string")));
            }
        } else if key.as_str() == "onboardingDate" {
            *value = Value::String(parse_onboarding_date(value)?.to_rfc3339());
        } else if let Some(spec) = KINDS.iter().find(|spec| spec.reference_field == key.as_str()) {
            *value = match parse_reference(spec.kind, Some(&*value))? {
                Some(id) => Value::String(id.to_string()),
                None => Value::Null,
            };
        } else {
            unknown.push(key.clone());
        }
    }
    if !unknown.is_empty() {
        unknown.sort();
        return Err(AppError::Validation(format!("unknown employee field(s): {}", unknown.join(", "))));
    }
    Ok(())
}
