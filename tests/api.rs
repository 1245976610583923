//! End-to-end HTTP tests driving the full router over in-memory repositories.

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Method, Request, StatusCode, header};
use finance_tracker::AppState;
use finance_tracker::api::routes::create_router;
use finance_tracker::config::JwtConfig;
use finance_tracker::repositories::Repositories;
use serde_json::{Value, json};
use tower::ServiceExt;

fn app() -> Router {
    let jwt = JwtConfig {
        secret: "integration-test-secret-0123456789abcdef".to_string(),
        ..JwtConfig::default()
    };
    create_router(AppState::from_repositories(Repositories::in_memory(), jwt), true)
}

async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

/// Registers a user and returns `(id, token)`.
async fn register_and_login(app: &Router, email: &str) -> (i64, String) {
    let (status, user) = send(
        app,
        Method::POST,
        "/api/users/me",
        None,
        Some(json!({
            "firstName": "Test",
            "lastName": "User",
            "email": email,
            "password": "s3cret-pass"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{user}");

    let (status, body) = send(
        app,
        Method::POST,
        "/api/auth",
        None,
        Some(json!({ "login": email, "password": "s3cret-pass" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");

    let token = body["token"].as_str().unwrap().to_string();
    (user["id"].as_i64().unwrap(), token)
}

fn savings_account() -> Value {
    json!({
        "initialAmount": 1000,
        "financialInstitution": "Nubank",
        "description": "Savings",
        "accountType": "SAVING_ACCOUNT",
        "color": "#820AD1",
        "icon": "piggy-bank"
    })
}

async fn create_account(app: &Router, token: &str) -> i64 {
    let (status, account) = send(
        app,
        Method::POST,
        "/api/users/me/accounts",
        Some(token),
        Some(savings_account()),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{account}");
    account["id"].as_i64().unwrap()
}

#[tokio::test]
async fn test_registration_and_login() {
    let app = app();
    let (id, token) = register_and_login(&app, "ada@example.com").await;

    let (status, me) = send(&app, Method::GET, "/api/users/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["id"], id);
    assert_eq!(me["email"], "ada@example.com");
    assert!(me.get("password").is_none());
}

#[tokio::test]
async fn test_duplicate_email_is_precondition_failed() {
    let app = app();
    register_and_login(&app, "dup@example.com").await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/users/me",
        None,
        Some(json!({
            "firstName": "Other",
            "lastName": "Person",
            "email": "dup@example.com",
            "password": "another-pass"
        })),
    )
    .await;

    assert_eq!(status, StatusCode::PRECONDITION_FAILED);
    assert_eq!(body["status"], 412);
    assert_eq!(body["error"], "Precondition Failed");
    assert_eq!(body["path"], "/api/users/me");
}

#[tokio::test]
async fn test_wrong_password_is_unauthorized() {
    let app = app();
    register_and_login(&app, "grace@example.com").await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/auth",
        None,
        Some(json!({ "login": "grace@example.com", "password": "nope" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Invalid login or password");
}

#[tokio::test]
async fn test_protected_routes_require_a_token() {
    let app = app();

    let (status, body) = send(&app, Method::GET, "/api/users/me/accounts", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["status"], 401);
    assert_eq!(body["path"], "/api/users/me/accounts");
    assert!(body["requestId"].is_string());

    let (status, _) = send(&app, Method::GET, "/api/users/me", Some("not.a.jwt"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_account_lifecycle() {
    let app = app();
    let (_, token) = register_and_login(&app, "owner@example.com").await;

    let (status, account) = send(
        &app,
        Method::POST,
        "/api/users/me/accounts",
        Some(&token),
        Some(savings_account()),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(account["archived"], false);
    assert_eq!(account["accountType"], "SAVING_ACCOUNT");
    let uri = format!("/api/users/me/accounts/{}", account["id"]);

    let (status, body) = send(&app, Method::DELETE, &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::PRECONDITION_FAILED);
    assert_eq!(body["message"], "Cannot delete account. Archive it first.");

    let (status, archived) =
        send(&app, Method::POST, &format!("{uri}/archive"), Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(archived["archived"], true);

    let (status, body) = send(&app, Method::DELETE, &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(body, Value::Null);

    let (status, _) = send(&app, Method::GET, &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_other_users_resources_are_not_found() {
    let app = app();
    let (owner_id, owner) = register_and_login(&app, "owner@example.com").await;
    let (_, intruder) = register_and_login(&app, "intruder@example.com").await;
    let account_id = create_account(&app, &owner).await;
    let uri = format!("/api/users/me/accounts/{account_id}");

    let (status, _) = send(&app, Method::GET, &uri, Some(&intruder), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = send(
        &app,
        Method::PUT,
        &uri,
        Some(&intruder),
        Some(json!({ "description": "mine now" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = send(&app, Method::POST, &format!("{uri}/archive"), Some(&intruder), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, page) = send(&app, Method::GET, "/api/users/me/accounts", Some(&intruder), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["pagination"]["totalItems"], 0);

    let (status, _) = send(
        &app,
        Method::GET,
        &format!("/api/users/me/{owner_id}"),
        Some(&intruder),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, card) = send(
        &app,
        Method::POST,
        "/api/users/me/credit-cards",
        Some(&intruder),
        Some(json!({
            "limit": 2500,
            "description": "Sneaky",
            "brand": "VISA",
            "closingDay": 1,
            "dueDate": 8,
            "accountId": account_id
        })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND, "{card}");

    let (status, account) = send(&app, Method::GET, &uri, Some(&owner), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(account["description"], "Savings");
}

#[tokio::test]
async fn test_validation_errors_are_listed_per_field() {
    let app = app();
    let (_, token) = register_and_login(&app, "v@example.com").await;

    let mut body = savings_account();
    body["initialAmount"] = json!(0);
    body["description"] = json!("  ");
    let (status, errors) = send(&app, Method::POST, "/api/users/me/accounts", Some(&token), Some(body)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let fields: Vec<&str> = errors
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["field"].as_str().unwrap())
        .collect();
    assert_eq!(fields, vec!["description", "initialAmount"]);
}

#[tokio::test]
async fn test_values_wider_than_columns_are_bad_request() {
    let app = app();
    let (_, token) = register_and_login(&app, "wide@example.com").await;

    let mut body = savings_account();
    body["color"] = json!("c".repeat(40));
    body["initialAmount"] = json!("1e23");
    let (status, errors) = send(&app, Method::POST, "/api/users/me/accounts", Some(&token), Some(body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(errors[0]["field"], "color");
    assert_eq!(errors[1]["field"], "initialAmount");

    let (status, errors) = send(
        &app,
        Method::POST,
        "/api/users/me/categories",
        Some(&token),
        Some(json!({ "name": "n".repeat(150), "type": "EXPENSE" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(errors[0]["field"], "name");
}

#[tokio::test]
async fn test_malformed_json_is_bad_request() {
    let app = app();
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/auth")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["error"], "Bad Request");
}

#[tokio::test]
async fn test_pagination() {
    let app = app();
    let (_, token) = register_and_login(&app, "pages@example.com").await;
    for _ in 0..3 {
        create_account(&app, &token).await;
    }

    let (status, page) = send(
        &app,
        Method::GET,
        "/api/users/me/accounts?page=1&pageSize=2",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["data"].as_array().unwrap().len(), 2);
    assert_eq!(page["pagination"]["totalItems"], 3);
    assert_eq!(page["pagination"]["totalPages"], 2);
    assert_eq!(page["pagination"]["hasNext"], true);
    let first = page["data"][0]["id"].as_i64().unwrap();
    let second = page["data"][1]["id"].as_i64().unwrap();
    assert!(first < second);

    let (status, _) = send(
        &app,
        Method::GET,
        "/api/users/me/accounts?pageSize=500",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_category_rules() {
    let app = app();
    let (_, token) = register_and_login(&app, "cat@example.com").await;

    let (status, category) = send(
        &app,
        Method::POST,
        "/api/users/me/categories",
        Some(&token),
        Some(json!({ "name": "Groceries", "type": "EXPENSE", "color": "#00FF00", "icon": "cart" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(category["type"], "EXPENSE");

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/users/me/categories",
        Some(&token),
        Some(json!({ "name": "Groceries", "type": "INCOME" })),
    )
    .await;
    assert_eq!(status, StatusCode::PRECONDITION_FAILED);

    let uri = format!("/api/users/me/categories/{}", category["id"]);
    let (status, replaced) = send(
        &app,
        Method::PUT,
        &uri,
        Some(&token),
        Some(json!({ "name": "Food", "type": "EXPENSE" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(replaced["name"], "Food");
    assert_eq!(replaced["color"], Value::Null);

    let (status, _) = send(&app, Method::DELETE, &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn test_credit_card_lifecycle() {
    let app = app();
    let (_, token) = register_and_login(&app, "card@example.com").await;
    let account_id = create_account(&app, &token).await;

    let (status, card) = send(
        &app,
        Method::POST,
        "/api/users/me/credit-cards",
        Some(&token),
        Some(json!({
            "limit": "3000.00",
            "description": "Platinum",
            "brand": "MASTERCARD",
            "closingDay": 3,
            "dueDate": 10,
            "accountId": account_id
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{card}");
    assert_eq!(card["archived"], false);
    assert!(card.get("limit").is_some());
    let uri = format!("/api/users/me/credit-cards/{}", card["id"]);

    let (status, body) = send(&app, Method::DELETE, &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::PRECONDITION_FAILED);
    assert_eq!(body["message"], "Cannot delete credit card. Archive it first.");

    let (status, _) = send(&app, Method::POST, &format!("{uri}/archive"), Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = send(&app, Method::DELETE, &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn test_deleting_user_revokes_its_token() {
    let app = app();
    let (id, token) = register_and_login(&app, "leaving@example.com").await;

    let (status, _) = send(&app, Method::DELETE, &format!("/api/users/me/{id}"), Some(&token), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(&app, Method::GET, "/api/users/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_unknown_route_has_json_error_body() {
    let app = app();
    let (status, body) = send(&app, Method::GET, "/api/nowhere", None, None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["status"], 404);
    assert_eq!(body["path"], "/api/nowhere");
}

#[tokio::test]
async fn test_openapi_document_is_served() {
    let app = app();
    let (status, doc) = send(&app, Method::GET, "/api-docs/openapi.json", None, None).await;

    assert_eq!(status, StatusCode::OK);
    assert!(doc["paths"].get("/api/users/me/accounts").is_some());
}
