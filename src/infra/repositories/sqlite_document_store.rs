use crate::domain::models::document::{Condition, Document, Filter};
use crate::domain::ports::DocumentStore;
use crate::error::AppError;
use async_trait::async_trait;
use serde_json::{Map, Value};
use sqlx::types::Json;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};

use super::DocumentRow;

pub struct SqliteDocumentStore {
    pool: SqlitePool,
}

impl SqliteDocumentStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

fn push_where(qb: &mut QueryBuilder<'_, Sqlite>, collection: &str, filter: &Filter) {
    qb.push(" WHERE collection = ").push_bind(collection.to_string());
    for condition in filter.conditions() {
        match condition {
            Condition::Id(id) => {
                qb.push(" AND id = ").push_bind(id.clone());
            }
            Condition::Tenant(tenant_id) => {
                qb.push(" AND tenant_id = ").push_bind(tenant_id.clone());
            }
            Condition::Field(field, value) => {
                qb.push(" AND json_extract(body, ")
                    .push_bind(format!("$.\"{field}\""))
                    .push(") = ")
                    .push_bind(value.clone());
            }
        }
    }
}

/// `seq = (first matching row)`, so single-document writes touch at most one row.
fn push_first_match(qb: &mut QueryBuilder<'_, Sqlite>, collection: &str, filter: &Filter) {
    qb.push(" WHERE seq = (SELECT seq FROM documents");
    push_where(qb, collection, filter);
    qb.push(" ORDER BY seq LIMIT 1)");
}

#[async_trait]
impl DocumentStore for SqliteDocumentStore {
    async fn insert(&self, collection: &str, doc: &Document) -> Result<String, AppError> {
        sqlx::query("INSERT INTO documents (collection, id, tenant_id, body) VALUES (?, ?, ?, ?)")
            .bind(collection)
            .bind(&doc.id)
            .bind(&doc.tenant_id)
            .bind(Json(&doc.body))
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;
        Ok(doc.id.clone())
    }

    async fn find_one(&self, collection: &str, filter: &Filter) -> Result<Option<Document>, AppError> {
        let mut qb = QueryBuilder::new("SELECT id, tenant_id, body FROM documents");
        push_where(&mut qb, collection, filter);
        qb.push(" ORDER BY seq LIMIT 1");

        let row = qb
            .build_query_as::<DocumentRow>()
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)?;
        Ok(row.map(Document::from))
    }

    async fn find_many(&self, collection: &str, filter: &Filter) -> Result<Vec<Document>, AppError> {
        let mut qb = QueryBuilder::new("SELECT id, tenant_id, body FROM documents");
        push_where(&mut qb, collection, filter);
        qb.push(" ORDER BY seq");

        let rows = qb
            .build_query_as::<DocumentRow>()
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)?;
        Ok(rows.into_iter().map(Document::from).collect())
    }

    async fn update_one(&self, collection: &str, filter: &Filter, partial: &Map<String, Value>) -> Result<u64, AppError> {
        // json_set keeps explicit nulls, unlike json_patch.
        let mut qb = QueryBuilder::new("UPDATE documents SET body = json_set(body");
        for (key, value) in partial {
            qb.push(", ")
                .push_bind(format!("$.\"{key}\""))
                .push(", json(")
                .push_bind(value.to_string())
                .push(")");
        }
        qb.push(")");
        push_first_match(&mut qb, collection, filter);

        let result = qb.build().execute(&self.pool).await.map_err(AppError::Database)?;
        Ok(result.rows_affected())
    }

    async fn delete_one(&self, collection: &str, filter: &Filter) -> Result<u64, AppError> {
        let mut qb = QueryBuilder::new("DELETE FROM documents");
        push_first_match(&mut qb, collection, filter);

        let result = qb.build().execute(&self.pool).await.map_err(AppError::Database)?;
        Ok(result.rows_affected())
    }

    async fn close(&self) {
        self.pool.close().await;
    }
}
