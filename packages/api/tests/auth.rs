mod common;

use api::UserRepository;
use axum::http::{Method, StatusCode};
use common::TestApp;
use serde_json::json;

#[tokio::test]
async fn test_register_validation() {
    let app = TestApp::new();
    let cases = [
        json!({ "email": "nope", "password": "password1", "name": "A" }),
        json!({ "email": "a@example.com", "password": "short", "name": "A" }),
        json!({ "email": "a@example.com", "password": "password1", "name": "  " }),
    ];
    for body in cases {
        let reply = app
            .send(Method::POST, "/api/auth/register", None, Some(body))
            .await;
        assert_eq!(reply.status, StatusCode::BAD_REQUEST);
    }
}

#[tokio::test]
async fn test_register_and_fetch_user() {
    let app = TestApp::new();
    let reply = app
        .send(
            Method::POST,
            "/api/auth/register",
            None,
            Some(json!({ "email": " Ada@Example.com ", "password": "password1", "name": "Ada" })),
        )
        .await;
    assert_eq!(reply.status, StatusCode::CREATED);
    assert_eq!(reply.body["user"]["email"], "ada@example.com");
    assert_eq!(reply.body["user"]["displayName"], "Ada");
    assert!(reply.body["user"].get("passwordHash").is_none());
    let cookie = reply.cookie.unwrap();

    let reply = app
        .send(Method::GET, "/api/auth/user", Some(&cookie), None)
        .await;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.body["user"]["emailConfirmed"], false);

    let reply = app
        .send(
            Method::POST,
            "/api/auth/register",
            None,
            Some(json!({ "email": "ada@example.com", "password": "password2", "name": "Other" })),
        )
        .await;
    assert_eq!(reply.status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_login_and_logout() {
    let app = TestApp::new();
    app.sign_up("ada@example.com").await;

    let reply = app
        .send(
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({ "email": "ada@example.com", "password": "wrong-password" })),
        )
        .await;
    assert_eq!(reply.status, StatusCode::UNAUTHORIZED);
    assert_eq!(reply.body["message"], "Invalid email or password");

    let reply = app
        .send(
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({ "email": "nobody@example.com", "password": "password1" })),
        )
        .await;
    assert_eq!(reply.status, StatusCode::UNAUTHORIZED);

    let reply = app
        .send(
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({ "email": "ADA@example.com", "password": "password1" })),
        )
        .await;
    assert_eq!(reply.status, StatusCode::OK);
    let cookie = reply.cookie.unwrap();

    let reply = app
        .send(Method::GET, "/api/documents", Some(&cookie), None)
        .await;
    assert_eq!(reply.status, StatusCode::OK);

    let reply = app
        .send(Method::POST, "/api/auth/logout", Some(&cookie), None)
        .await;
    assert_eq!(reply.status, StatusCode::NO_CONTENT);

    let reply = app
        .send(Method::GET, "/api/auth/user", Some(&cookie), None)
        .await;
    assert_eq!(reply.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_user_endpoint_without_session() {
    let app = TestApp::new();
    let reply = app.send(Method::GET, "/api/auth/user", None, None).await;
    assert_eq!(reply.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_deleted_user_loses_identity() {
    let app = TestApp::new();
    let cookie = app.sign_up("ada@example.com").await;
    let user = app
        .users
        .find_by_email("ada@example.com")
        .await
        .unwrap()
        .unwrap();
    app.users.remove(user.id).await;

    let reply = app
        .send(Method::GET, "/api/auth/user", Some(&cookie), None)
        .await;
    assert_eq!(reply.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_sync_user() {
    let app = TestApp::new();
    let reply = app
        .send(
            Method::POST,
            "/api/auth/sync-user",
            None,
            Some(json!({ "displayName": "Ada" })),
        )
        .await;
    assert_eq!(reply.status, StatusCode::UNAUTHORIZED);

    let cookie = app.sign_up("ada@example.com").await;
    let reply = app
        .send(
            Method::POST,
            "/api/auth/sync-user",
            Some(&cookie),
            Some(json!({ "displayName": "Ada Lovelace", "emailConfirmed": true })),
        )
        .await;
    assert_eq!(reply.status, StatusCode::OK);

    let reply = app
        .send(Method::GET, "/api/auth/user", Some(&cookie), None)
        .await;
    assert_eq!(reply.body["user"]["displayName"], "Ada Lovelace");
    assert_eq!(reply.body["user"]["emailConfirmed"], true);
}
