use crate::domain::models::document::{Document, Filter};
use crate::error::AppError;
use async_trait::async_trait;
use serde_json::{Map, Value};

/// Collection-oriented persistence. Tenant-owned collections are always
/// queried with a tenant condition in the filter.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn insert(&self, collection: &str, doc: &Document) -> Result<String, AppError>;
    async fn find_one(&self, collection: &str, filter: &Filter) -> Result<Option<Document>, AppError>;
    async fn find_many(&self, collection: &str, filter: &Filter) -> Result<Vec<Document>, AppError>;
    /// Shallow-merges `partial` into the first matching document. Returns the matched count.
    async fn update_one(&self, collection: &str, filter: &Filter, partial: &Map<String, Value>) -> Result<u64, AppError>;
    /// Returns the deleted count.
    async fn delete_one(&self, collection: &str, filter: &Filter) -> Result<u64, AppError>;
    async fn close(&self);
}

pub trait CredentialHasher: Send + Sync {
    fn hash(&self, plaintext: &str) -> Result<String, AppError>;
    fn verify(&self, plaintext: &str, hash: &str) -> bool;
}
