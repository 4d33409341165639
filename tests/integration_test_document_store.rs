mod common;

use common::TestApp;
use onboarding_backend::{
    domain::models::document::{Document, Filter},
    domain::models::entity::{EntityKind, NewEntity},
    domain::ports::DocumentStore,
    error::AppError,
};
use serde_json::{json, Map, Value};
use uuid::Uuid;

fn object(value: Value) -> Map<String, Value> {
    value.as_object().cloned().unwrap()
}

#[tokio::test]
async fn test_repository_scopes_every_operation() {
    let app = TestApp::new().await;
    let repo = &app.state.entities;

    let payload = object(json!({ "name": "Backend", "description": "APIs" }));
    let entity = NewEntity::from_payload(EntityKind::JobRole, &payload).unwrap();
    let created = repo.create(EntityKind::JobRole, "tenant-a", entity).await.unwrap();

    let fetched = repo.get_by_id(EntityKind::JobRole, "tenant-a", &created.id).await.unwrap();
    assert_eq!(fetched, created);

    let err = repo.get_by_id(EntityKind::JobRole, "tenant-b", &created.id).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(msg) if msg == "job role not found"));

    // Same id under another kind is a different collection
    let err = repo.get_by_id(EntityKind::Team, "tenant-a", &created.id).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));

    assert!(repo.list_by_tenant(EntityKind::JobRole, "tenant-b").await.unwrap().is_empty());
    assert_eq!(repo.list_by_tenant(EntityKind::JobRole, "tenant-a").await.unwrap().len(), 1);

    let err = repo
        .update(EntityKind::JobRole, "tenant-b", &created.id, object(json!({ "name": "X" })))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
    let err = repo
        .update(EntityKind::JobRole, "tenant-a", &Uuid::new_v4().to_string(), object(json!({ "name": "X" })))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));

    repo.update(EntityKind::JobRole, "tenant-a", &created.id, object(json!({ "description": "Services" })))
        .await
        .unwrap();
    let updated = repo.get_by_id(EntityKind::JobRole, "tenant-a", &created.id).await.unwrap();
    assert_eq!(updated.name, "Backend");
    assert_eq!(serde_json::to_value(&updated).unwrap()["description"], "Services");

    assert!(matches!(
        repo.delete(EntityKind::JobRole, "tenant-b", &created.id).await,
        Err(AppError::NotFound(_))
    ));
    repo.delete(EntityKind::JobRole, "tenant-a", &created.id).await.unwrap();
    assert!(matches!(
        repo.delete(EntityKind::JobRole, "tenant-a", &created.id).await,
        Err(AppError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_store_filters_and_merges() {
    let app = TestApp::new().await;
    let store = &app.state.store;

    let doc = Document::new("d1".into(), Some("t1".into()), object(json!({ "username": "zoe", "role": "member" })));
    assert_eq!(store.insert("users", &doc).await.unwrap(), "d1");

    let found = store.find_one("users", &Filter::new().eq("username", "zoe")).await.unwrap();
    assert_eq!(found, Some(doc.clone()));
    assert!(store.find_one("users", &Filter::new().eq("username", "zed")).await.unwrap().is_none());
    assert!(store.find_one("tenants", &Filter::new().id("d1")).await.unwrap().is_none());

    let matched = store
        .update_one("users", &Filter::scoped("t1").id("d1"), &object(json!({ "role": "admin", "note": null })))
        .await
        .unwrap();
    assert_eq!(matched, 1);
    let merged = store.find_one("users", &Filter::new().id("d1")).await.unwrap().unwrap();
    assert_eq!(merged.body["username"], "zoe");
    assert_eq!(merged.body["role"], "admin");
    assert_eq!(merged.body["note"], Value::Null);

    let matched = store
        .update_one("users", &Filter::scoped("t2").id("d1"), &object(json!({ "role": "member" })))
        .await
        .unwrap();
    assert_eq!(matched, 0);

    // Username uniqueness is enforced by the store
    let dup = Document::new("d2".into(), Some("t2".into()), object(json!({ "username": "zoe" })));
    let err = store.insert("users", &dup).await.unwrap_err();
    assert!(err.is_unique_violation());

    assert_eq!(store.delete_one("users", &Filter::scoped("t1").id("d1")).await.unwrap(), 1);
    assert_eq!(store.delete_one("users", &Filter::scoped("t1").id("d1")).await.unwrap(), 0);
}

#[tokio::test]
async fn test_unknown_tenant_is_internal_not_forbidden() {
    let app = TestApp::new().await;
    let err = app.state.permissions.is_enabled("no-such-tenant", "locations").await.unwrap_err();
    assert!(matches!(err, AppError::InternalWithMsg(_)));
}
