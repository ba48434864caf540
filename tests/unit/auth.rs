use axum::http::StatusCode;
use tower::ServiceExt;

use super::{empty, json_body, offline_app, request, request_id};

#[tokio::test]
async fn price_range_requires_bearer_token() {
    let (_, app, sink) = offline_app();

    let response = app
        .oneshot(empty(request("GET", "/api/v1/books/price-range?min=10&max=20")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    request_id(&response);

    let records = sink.records();
    assert_eq!(records[0].status_code, 500);
    assert!(records[0].error.as_deref().unwrap().contains("Missing bearer token"));
}

#[tokio::test]
async fn price_range_rejects_refresh_tokens() {
    let (state, app, _) = offline_app();
    let refresh = state.auth_service.generate_refresh_token("alice", 1).unwrap();

    let response = app
        .oneshot(empty(
            request("GET", "/api/v1/books/price-range?min=10&max=20")
                .header("authorization", format!("Bearer {}", refresh)),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn inverted_price_range_is_bad_request() {
    let (state, app, _) = offline_app();
    let access = state.auth_service.generate_access_token("alice", 1).unwrap();

    let response = app
        .oneshot(empty(
            request("GET", "/api/v1/books/price-range?min=30&max=20")
                .header("authorization", format!("Bearer {}", access)),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn refresh_issues_new_access_token() {
    let (state, app, _) = offline_app();
    let refresh = state.auth_service.generate_refresh_token("alice", 42).unwrap();

    let response = app
        .oneshot(empty(
            request("POST", "/auth/refresh").header("authorization", format!("Bearer {}", refresh)),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["data"]["token_type"], "bearer");
    assert_eq!(body["data"]["expires_in"], 1200);

    let token = body["data"]["access_token"].as_str().unwrap();
    let claims = state
        .auth_service
        .verify_token(token, bookscraper::middleware::auth::TokenKind::Access)
        .unwrap();
    assert_eq!(claims.sub, "alice");
    assert_eq!(claims.id, 42);
}

#[tokio::test]
async fn refresh_with_access_token_is_unauthorized() {
    let (state, app, _) = offline_app();
    let access = state.auth_service.generate_access_token("alice", 42).unwrap();

    let response = app
        .oneshot(empty(
            request("POST", "/auth/refresh").header("authorization", format!("Bearer {}", access)),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn garbage_token_is_unauthorized() {
    let (_, app, _) = offline_app();

    let response = app
        .oneshot(empty(
            request("POST", "/auth/refresh").header("authorization", "Bearer not.a.jwt"),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
