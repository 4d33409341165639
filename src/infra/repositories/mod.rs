pub mod sqlite_document_store;
pub mod postgres_document_store;

use serde_json::{Map, Value};
use sqlx::types::Json;

use crate::domain::models::document::Document;

/// Row shape shared by both backends.
#[derive(sqlx::FromRow)]
pub(crate) struct DocumentRow {
    id: String,
    tenant_id: Option<String>,
    body: Json<Map<String, Value>>,
}

impl From<DocumentRow> for Document {
    fn from(row: DocumentRow) -> Self {
        Document::new(row.id, row.tenant_id, row.body.0)
    }
}
