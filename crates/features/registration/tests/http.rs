use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use axum::response::Response;
use serde_json::{Value, json};
use tempfile::TempDir;
use tower::ServiceExt;
use waitlist_database::Database;
use waitlist_domain::validation::RegistrationSchema;
use waitlist_registration::{
    MIGRATIONS, Registrar, Registrations, RegistrationsInner, SurrealStore, router,
};
use waitlist_spreadsheet::{Spreadsheet, XLSX_MIME};

async fn state() -> (Registrations, TempDir) {
    let database = Database::builder()
        .url("mem://")
        .session("waitlist", "http")
        .migrations(MIGRATIONS)
        .init()
        .await
        .expect("in-memory database");
    let tmp = tempfile::tempdir().expect("tempdir");
    let sheet = Spreadsheet::builder().dir(tmp.path().join("exports")).open().await;
    let registrar = Registrar::new(SurrealStore::new(database), sheet, RegistrationSchema::new());

    (Registrations::new(RegistrationsInner { registrar }), tmp)
}

async fn app() -> (Router, TempDir) {
    let (slice, tmp) = state().await;
    let (router, _api) = router::<()>(slice).split_for_parts();
    (router, tmp)
}

async fn send(app: &Router, request: Request<Body>) -> Response {
    app.clone().oneshot(request).await.expect("response")
}

async fn json_body(response: Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.expect("body");
    serde_json::from_slice(&bytes).expect("json body")
}

fn post(body: impl Into<Body>) -> Request<Body> {
    Request::post("/api/register")
        .header(header::CONTENT_TYPE, "application/json")
        .body(body.into())
        .expect("request")
}

fn get(uri: &str) -> Request<Body> {
    Request::get(uri).body(Body::empty()).expect("request")
}

fn valid(email: &str) -> String {
    json!({
        "fullName": "Alan Turing",
        "age": 41,
        "email": email,
        "country": "GB",
        "state": "England",
        "industry": "Research",
    })
    .to_string()
}

#[tokio::test]
async fn register_returns_created_receipt() {
    let (app, _tmp) = app().await;

    let response = send(&app, post(valid("Alan@Example.com"))).await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = json_body(response).await;
    assert_eq!(body["message"], "Registration successful");
    assert_eq!(body["user"]["fullName"], "Alan Turing");
    assert_eq!(body["user"]["email"], "alan@example.com");
    assert_eq!(body["user"]["id"].as_str().map(str::len), Some(12));
    assert!(body["user"]["createdAt"].is_string());
}

#[tokio::test]
async fn malformed_json_is_rejected() {
    let (app, _tmp) = app().await;

    let response = send(&app, post("{ not json")).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(response).await, json!({ "error": "Invalid JSON body" }));
}

#[tokio::test]
async fn validation_failure_lists_details() {
    let (app, _tmp) = app().await;

    let response = send(&app, post(json!({ "fullName": "Alan Turing", "age": "old" }).to_string())).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert_eq!(body["error"], "Validation failed");
    let details = body["details"].as_array().expect("details");
    assert!(details.contains(&json!({ "field": "age", "message": "Age must be a number" })));
    assert!(details.contains(&json!({ "field": "email", "message": "Email is required" })));
}

#[tokio::test]
async fn duplicate_email_conflicts() {
    let (app, _tmp) = app().await;
    assert_eq!(send(&app, post(valid("alan@example.com"))).await.status(), StatusCode::CREATED);

    let response = send(&app, post(valid("ALAN@example.com"))).await;

    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(json_body(response).await, json!({ "error": "User with this email already exists" }));
}

#[tokio::test]
async fn list_returns_users() {
    let (app, _tmp) = app().await;
    send(&app, post(valid("alan@example.com"))).await;

    let response = send(&app, get("/api/register")).await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    let users = body["users"].as_array().expect("users");
    assert_eq!(users.len(), 1);
    assert_eq!(users[0]["email"], "alan@example.com");
    assert_eq!(users[0]["age"], 41);
    assert_eq!(users[0]["country"], "GB");
    assert!(users[0]["updatedAt"].is_string());
}

#[tokio::test]
async fn download_is_not_found_until_first_registration() {
    let (app, _tmp) = app().await;

    let response = send(&app, get("/api/export-excel")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(json_body(response).await, json!({ "error": "Excel file not found." }));

    send(&app, post(valid("alan@example.com"))).await;
    let response = send(&app, get("/api/export-excel")).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], XLSX_MIME);
    assert_eq!(
        response.headers()[header::CONTENT_DISPOSITION],
        "attachment; filename=\"registrations.xlsx\""
    );
    let bytes = to_bytes(response.into_body(), usize::MAX).await.expect("body");
    assert!(bytes.starts_with(b"PK"));
}

#[tokio::test]
async fn on_demand_export_works_without_a_file() {
    let (app, _tmp) = app().await;

    let response = send(&app, get("/api/excel-export")).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], XLSX_MIME);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.expect("body");
    assert!(bytes.starts_with(b"PK"));
}

#[tokio::test]
async fn reference_data_is_served() {
    let (app, _tmp) = app().await;

    let countries = json_body(send(&app, get("/api/reference/countries")).await).await;
    let countries = countries.as_array().expect("countries");
    assert_eq!(countries.len(), 11);
    assert_eq!(countries[0]["code"], "US");
    assert!(countries[0]["states"].as_array().is_some_and(|s| s.len() > 1));

    let industries = json_body(send(&app, get("/api/reference/industries")).await).await;
    assert_eq!(industries.as_array().map(Vec::len), Some(19));
}

#[tokio::test]
async fn openapi_documents_every_route() {
    let (slice, _tmp) = state().await;
    let (_, api) = router::<()>(slice).split_for_parts();

    for path in [
        "/api/register",
        "/api/export-excel",
        "/api/excel-export",
        "/api/reference/countries",
        "/api/reference/industries",
    ] {
        assert!(api.paths.paths.contains_key(path), "missing {path}");
    }
}
