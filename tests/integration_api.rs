//! API Integration Tests
//!
//! Drive the full router (guard middleware included) with oneshot
//! requests against the in-memory store.

use axum::{
    body::Body,
    http::{Request, StatusCode},
    response::Response,
    Router,
};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::util::ServiceExt;

mod common;

async fn json_body(response: Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Create an account through the API, returning (account, token).
async fn create_account(app: &Router, first: &str, last: &str) -> (Value, String) {
    let req = Request::builder()
        .method("POST")
        .uri("/account")
        .header("content-type", "application/json")
        .body(Body::from(
            json!({"firstName": first, "lastName": last}).to_string(),
        ))
        .unwrap();

    let response = app.clone().oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED, "account creation failed");

    let body = json_body(response).await;
    let token = body["token"].as_str().unwrap().to_string();
    (body["account"].clone(), token)
}

fn get_account_request(id: &str, token: Option<&str>) -> Request<Body> {
    let builder = Request::builder()
        .method("GET")
        .uri(format!("/account/{}", id));
    let builder = match token {
        Some(token) => builder.header("x-jwt-token", token),
        None => builder,
    };
    builder.body(Body::empty()).unwrap()
}

#[tokio::test]
async fn test_create_account_returns_account_and_token() {
    let app = common::test_app();

    let (account, token) = create_account(&app, "Alice", "Smith").await;

    assert_eq!(account["id"], 1);
    assert_eq!(account["firstName"], "Alice");
    assert_eq!(account["lastName"], "Smith");
    assert_eq!(account["balance"], 0);
    assert!(account["number"].is_i64());

    // The token's payload must carry the account number under the
    // compatible claim name.
    use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
    let payload_b64 = token.split('.').nth(1).unwrap();
    let payload: Value =
        serde_json::from_slice(&URL_SAFE_NO_PAD.decode(payload_b64).unwrap()).unwrap();
    assert_eq!(payload["accountNumber"], account["number"]);
}

#[tokio::test]
async fn test_create_account_rejects_empty_names() {
    let app = common::test_app();

    let req = Request::builder()
        .method("POST")
        .uri("/account")
        .header("content-type", "application/json")
        .body(Body::from(json!({"firstName": "", "lastName": "Smith"}).to_string()))
        .unwrap();

    let response = app.oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = json_body(response).await;
    assert_eq!(body["error_code"], "invalid_request");
}

#[tokio::test]
async fn test_list_accounts() {
    let app = common::test_app();

    create_account(&app, "Alice", "Smith").await;
    create_account(&app, "Bob", "Jones").await;

    let req = Request::builder()
        .method("GET")
        .uri("/account")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    let accounts = body.as_array().unwrap();
    assert_eq!(accounts.len(), 2);
    assert_eq!(accounts[0]["id"], 1);
    assert_eq!(accounts[1]["id"], 2);
}

#[tokio::test]
async fn test_get_account_with_valid_token_allowed() {
    let app = common::test_app();

    let (account, token) = create_account(&app, "Alice", "Smith").await;
    let id = account["id"].to_string();

    let response = app
        .oneshot(get_account_request(&id, Some(&token)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["id"], account["id"]);
    assert_eq!(body["number"], account["number"]);
}

#[tokio::test]
async fn test_get_other_account_with_own_token_denied() {
    let app = common::test_app();

    let (_account_a, token_a) = create_account(&app, "Alice", "Smith").await;
    let (account_b, _token_b) = create_account(&app, "Bob", "Jones").await;
    let id_b = account_b["id"].to_string();

    let response = app
        .oneshot(get_account_request(&id_b, Some(&token_a)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let body = json_body(response).await;
    assert_eq!(body["error_code"], "account_number_mismatch");
}

#[tokio::test]
async fn test_get_account_without_token_denied() {
    let app = common::test_app();

    let (account, _token) = create_account(&app, "Alice", "Smith").await;
    let id = account["id"].to_string();

    let response = app.oneshot(get_account_request(&id, None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let body = json_body(response).await;
    assert_eq!(body["error_code"], "permission_denied");
}

#[tokio::test]
async fn test_get_account_with_garbage_token_denied() {
    let app = common::test_app();

    let (account, _token) = create_account(&app, "Alice", "Smith").await;
    let id = account["id"].to_string();

    let response = app
        .oneshot(get_account_request(&id, Some("not-a-jwt")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let body = json_body(response).await;
    assert_eq!(body["error_code"], "permission_denied");
}

#[tokio::test]
async fn test_get_unknown_account_id_denied() {
    let app = common::test_app();

    let (_account, token) = create_account(&app, "Alice", "Smith").await;

    // The id resolves to no stored account; the guard fails closed with
    // a denial, not a not-found.
    let response = app
        .oneshot(get_account_request("999", Some(&token)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let body = json_body(response).await;
    assert_eq!(body["error_code"], "permission_denied");
}

#[tokio::test]
async fn test_get_account_non_integer_id_denied() {
    let app = common::test_app();

    let (_account, token) = create_account(&app, "Alice", "Smith").await;

    let response = app
        .oneshot(get_account_request("abc", Some(&token)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let body = json_body(response).await;
    assert_eq!(body["error_code"], "permission_denied");
}

#[tokio::test]
async fn test_delete_account_flow() {
    let app = common::test_app();

    let (account, token) = create_account(&app, "Alice", "Smith").await;
    let id = account["id"].to_string();

    let req = Request::builder()
        .method("DELETE")
        .uri(format!("/account/{}", id))
        .header("x-jwt-token", &token)
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["deleted"], account["id"]);

    // The account is gone; the same token now denies at the lookup step.
    let response = app
        .oneshot(get_account_request(&id, Some(&token)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_delete_without_token_never_reaches_handler() {
    let app = common::test_app();

    let (account, token) = create_account(&app, "Alice", "Smith").await;
    let id = account["id"].to_string();

    let req = Request::builder()
        .method("DELETE")
        .uri(format!("/account/{}", id))
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // Denial short-circuits: the account must still exist.
    let response = app
        .oneshot(get_account_request(&id, Some(&token)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_transfer_echoes_request() {
    let app = common::test_app();

    let req = Request::builder()
        .method("POST")
        .uri("/transfer")
        .header("content-type", "application/json")
        .body(Body::from(json!({"toAccount": 498081, "amount": 100}).to_string()))
        .unwrap();

    let response = app.oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["toAccount"], 498081);
    assert_eq!(body["amount"], 100);
}
