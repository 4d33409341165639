mod common;

use axum::http::StatusCode;
use chrono::{DateTime, Utc};
use common::{parse_body, TestApp};
use serde_json::json;

#[tokio::test]
async fn test_missing_reference_fields_are_reported_together() {
    let app = TestApp::new().await;
    let acme = app.signup("Acme", "alice", "pw-alice").await;
    app.set_modules(&acme.token, &["employees", "locations", "departments"]).await;

    let response = app
        .send(
            "POST",
            "/api/v1/employees",
            Some(&acme.token),
            Some(json!({ "firstName": "Ada", "lastName": "Lovelace", "email": "ada@example.com" })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = parse_body(response).await;
    assert_eq!(body["error"], "Missing required fields for your plan");
    assert_eq!(body["missing_fields"], json!(["locationId", "departmentId"]));
    assert_eq!(app.count_documents("employees").await, 0);
}

#[tokio::test]
async fn test_defaults_without_reference_modules() {
    let app = TestApp::new().await;
    let acme = app.signup("Acme", "alice", "pw-alice").await;
    app.set_modules(&acme.token, &["employees"]).await;

    let before = Utc::now();
    let response = app
        .send(
            "POST",
            "/api/v1/employees",
            Some(&acme.token),
            Some(json!({ "firstName": "Ada", "lastName": "Lovelace", "email": "ada@example.com" })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = parse_body(response).await;
    assert_eq!(body["phoneNumber"], "");
    assert_eq!(body["tenantId"], acme.tenant_id.as_str());
    assert!(body["locationId"].is_null());

    let onboarding: DateTime<Utc> = body["onboardingDate"].as_str().unwrap().parse().unwrap();
    assert!(onboarding >= before - chrono::Duration::seconds(1));
    assert!(onboarding <= Utc::now() + chrono::Duration::seconds(1));
}

#[tokio::test]
async fn test_coercion_errors() {
    let app = TestApp::new().await;
    let acme = app.signup("Acme", "alice", "pw-alice").await;
    app.set_modules(&acme.token, &["employees"]).await;

    let response = app
        .send(
            "POST",
            "/api/v1/employees",
            Some(&acme.token),
            Some(json!({ "firstName": "A", "lastName": "B", "email": "e@x.io", "locationId": "not-a-uuid" })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(parse_body(response).await["error"], "Invalid format for locationId");

    let response = app
        .send(
            "POST",
            "/api/v1/employees",
            Some(&acme.token),
            Some(json!({ "firstName": "A", "lastName": "B", "email": "e@x.io", "onboardingDate": "next monday" })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_references_must_belong_to_the_tenant() {
    let app = TestApp::new().await;
    let acme = app.signup("Acme", "alice", "pw-alice").await;
    let globex = app.signup("Globex", "bob", "pw-bob").await;

    let foreign = parse_body(
        app.send("POST", "/api/v1/locations", Some(&globex.token), Some(json!({ "name": "Globex HQ" }))).await,
    )
    .await;

    app.set_modules(&acme.token, &["employees", "locations"]).await;
    let response = app
        .send(
            "POST",
            "/api/v1/employees",
            Some(&acme.token),
            Some(json!({
                "firstName": "A", "lastName": "B", "email": "e@x.io",
                "locationId": foreign["id"].as_str().unwrap()
            })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(app.count_documents("employees").await, 0);
}

#[tokio::test]
async fn test_employee_lifecycle() {
    let app = TestApp::new().await;
    let acme = app.signup("Acme", "alice", "pw-alice").await;
    app.set_modules(&acme.token, &["employees", "locations"]).await;

    let location = parse_body(
        app.send("POST", "/api/v1/locations", Some(&acme.token), Some(json!({ "name": "HQ" }))).await,
    )
    .await;
    let location_id = location["id"].as_str().unwrap().to_string();

    let response = app
        .send(
            "POST",
            "/api/v1/employees",
            Some(&acme.token),
            Some(json!({
                "firstName": "Ada", "lastName": "Lovelace", "email": "ada@example.com",
                "phoneNumber": "555-0100",
                "onboardingDate": "2025-06-02T08:30:00Z",
                "locationId": location_id.clone()
            })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let employee = parse_body(response).await;
    let id = employee["id"].as_str().unwrap().to_string();
    assert_eq!(employee["locationId"], location_id.as_str());

    let list = parse_body(app.send("GET", "/api/v1/employees", Some(&acme.token), None).await).await;
    assert_eq!(list.as_array().unwrap().len(), 1);

    // Update
    let response = app
        .send("PUT", &format!("/api/v1/employees/{}", id), Some(&acme.token), Some(json!({ "phoneNumber": "555-0199" })))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(parse_body(response).await["message"], "Employee updated successfully");

    let fetched = parse_body(app.send("GET", &format!("/api/v1/employees/{}", id), Some(&acme.token), None).await).await;
    assert_eq!(fetched["phoneNumber"], "555-0199");
    assert_eq!(fetched["firstName"], "Ada");
    assert_eq!(fetched["locationId"], location_id.as_str());

    // A required reference cannot be cleared
    let response = app
        .send("PUT", &format!("/api/v1/employees/{}", id), Some(&acme.token), Some(json!({ "locationId": "" })))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(parse_body(response).await["missing_fields"], json!(["locationId"]));

    // Delete
    let response = app.send("DELETE", &format!("/api/v1/employees/{}", id), Some(&acme.token), None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let response = app.send("GET", &format!("/api/v1/employees/{}", id), Some(&acme.token), None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(parse_body(response).await["error"], "employee not found");
}

#[tokio::test]
async fn test_employee_routes_are_gated() {
    let app = TestApp::new().await;
    let acme = app.signup("Acme", "alice", "pw-alice").await;
    app.set_modules(&acme.token, &["locations"]).await;

    let response = app.send("GET", "/api/v1/employees", Some(&acme.token), None).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(
        parse_body(response).await["error"],
        "Access to this feature is not enabled for your account."
    );
}

#[tokio::test]
async fn test_employees_are_isolated_between_tenants() {
    let app = TestApp::new().await;
    let acme = app.signup("Acme", "alice", "pw-alice").await;
    let globex = app.signup("Globex", "bob", "pw-bob").await;
    app.set_modules(&acme.token, &["employees"]).await;
    app.set_modules(&globex.token, &["employees"]).await;

    let employee = parse_body(
        app.send(
            "POST",
            "/api/v1/employees",
            Some(&acme.token),
            Some(json!({ "firstName": "Ada", "lastName": "Lovelace", "email": "ada@example.com" })),
        )
        .await,
    )
    .await;
    let id = employee["id"].as_str().unwrap().to_string();
    let uri = format!("/api/v1/employees/{}", id);

    let list = parse_body(app.send("GET", "/api/v1/employees", Some(&globex.token), None).await).await;
    assert_eq!(list, json!([]));

    let response = app.send("GET", &uri, Some(&globex.token), None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app
        .send("PUT", &uri, Some(&globex.token), Some(json!({ "phoneNumber": "555-0666" })))
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app.send("DELETE", &uri, Some(&globex.token), None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // Still intact for its owner
    let response = app.send("GET", &uri, Some(&acme.token), None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let fetched = parse_body(response).await;
    assert_eq!(fetched["phoneNumber"], "");
    assert_eq!(fetched["tenantId"], acme.tenant_id.as_str());
    assert_eq!(app.count_documents("employees").await, 1);
}
