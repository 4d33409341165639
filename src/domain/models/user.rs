use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};

use crate::error::AppError;
use super::document::Document;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Member,
}

impl Role {
    pub fn parse(role: &str) -> Option<Role> {
        match role {
            "admin" => Some(Role::Admin),
            "member" => Some(Role::Member),
            _ => None,
        }
    }
}

#[derive(Debug, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub tenant_id: String,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

/// Storage shape; unlike [`User`] it keeps the hash.
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UserRecord {
    id: String,
    tenant_id: String,
    username: String,
    password_hash: String,
    role: Role,
    created_at: DateTime<Utc>,
}

impl User {
    pub fn new(tenant_id: String, username: String, password_hash: String, role: Role) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            tenant_id,
            username,
            password_hash,
            role,
            created_at: Utc::now(),
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    pub fn to_document(&self) -> Result<Document, AppError> {
        Document::from_model(&UserRecord {
            id: self.id.clone(),
            tenant_id: self.tenant_id.clone(),
            username: self.username.clone(),
            password_hash: self.password_hash.clone(),
            role: self.role,
            created_at: self.created_at,
        })
    }

    pub fn from_document(doc: Document) -> Result<Self, AppError> {
        let record: UserRecord = doc.into_model()?;
        Ok(Self {
            id: record.id,
            tenant_id: record.tenant_id,
            username: record.username,
            password_hash: record.password_hash,
            role: record.role,
            created_at: record.created_at,
        })
    }
}
