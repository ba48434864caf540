use axum::{body::Body, http::StatusCode};
use tower::ServiceExt;

use super::{empty, json_body, offline_app, request, request_id};

#[tokio::test]
async fn root_echoes_trace_id_in_meta() {
    let (_, app, _) = offline_app();

    let response = app
        .oneshot(empty(request("GET", "/").header("x-request-id", "root-1")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(request_id(&response), "root-1");

    let body = json_body(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["meta"]["request_id"], "root-1");
}

#[tokio::test]
async fn health_reports_unavailable_database() {
    let (_, app, sink) = offline_app();

    let response = app
        .oneshot(empty(request("GET", "/api/v1/health")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let id = request_id(&response);

    let body = json_body(response).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["meta"]["request_id"], id.as_str());

    let records = sink.records();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].status_code, 503);
    assert!(records[0].error.is_none());
}

#[tokio::test]
async fn database_failure_is_logged_as_handler_failure() {
    let (_, app, sink) = offline_app();

    let response = app
        .oneshot(empty(request("GET", "/api/v1/books")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    request_id(&response);

    let records = sink.records();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].status_code, 500);
    assert!(records[0].error.as_deref().unwrap().starts_with("Pool error"));
}

#[tokio::test]
async fn prediction_scores_without_database() {
    let (_, app, sink) = offline_app();

    let response = app
        .oneshot(
            request("POST", "/api/v1/ml/predictions")
                .header("content-type", "application/json")
                .body(Body::from(
                    r#"{"price": 12.5, "rating": 5, "availability": 1, "category": "Poetry"}"#,
                ))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["data"]["score"], 0.85);
    assert_eq!(body["data"]["recommended"], true);
    assert_eq!(sink.records()[0].status_code, 200);
}

#[tokio::test]
async fn invalid_prediction_input_is_rejected() {
    let (_, app, sink) = offline_app();

    let response = app
        .oneshot(
            request("POST", "/api/v1/ml/predictions")
                .header("content-type", "application/json")
                .body(Body::from(
                    r#"{"price": -1.0, "rating": 9, "availability": 1, "category": "Poetry"}"#,
                ))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let records = sink.records();
    assert_eq!(records[0].status_code, 500);
    let error = records[0].error.as_deref().unwrap();
    assert!(error.contains("price"));
    assert!(error.contains("rating"));
}

#[tokio::test]
async fn invalid_user_payload_never_reaches_database() {
    let (_, app, _) = offline_app();

    let response = app
        .oneshot(
            request("POST", "/auth")
                .header("content-type", "application/json")
                .body(Body::from(
                    r#"{"username": "x", "email": "not-an-email", "first_name": "A", "last_name": "B", "password": "short"}"#,
                ))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = json_body(response).await;
    let message = body["message"].as_str().unwrap();
    assert!(message.contains("email"));
    assert!(message.contains("password"));
    assert!(message.contains("username"));
}

#[tokio::test]
async fn unknown_route_keeps_request_id() {
    let (_, app, sink) = offline_app();

    let response = app
        .oneshot(empty(request("GET", "/api/v1/nope").header("x-request-id", "lost-1")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(request_id(&response), "lost-1");

    let records = sink.records();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].status_code, 404);
}

#[tokio::test]
async fn metrics_endpoint_serves_text_format() {
    let (_, app, _) = offline_app();

    let response = app
        .oneshot(empty(request("GET", "/metrics")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response.headers()["content-type"].to_str().unwrap();
    assert!(content_type.starts_with("text/plain; version=0.0.4"));
}

#[tokio::test]
async fn top_rated_limit_is_checked_before_database() {
    let (_, app, _) = offline_app();

    let response = app
        .oneshot(empty(request("GET", "/api/v1/books/top-rated?limit=0")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn malformed_parameters_are_logged_as_failures() {
    let cases = [
        ("GET", "/api/v1/books/top-rated?limit=0", "Limit"),
        ("GET", "/api/v1/books/top-rated?limit=abc", "Invalid query string"),
        ("GET", "/api/v1/books/abc", "Invalid path parameter"),
        ("DELETE", "/auth/abc", "Invalid path parameter"),
    ];

    for (method, uri, expected) in cases {
        let (_, app, sink) = offline_app();

        let response = app.oneshot(empty(request(method, uri))).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{} {}", method, uri);
        request_id(&response);

        let records = sink.records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].status_code, 500, "{} {}", method, uri);
        let error = records[0].error.as_deref().unwrap();
        assert!(error.contains(expected), "{} {}: {}", method, uri, error);
    }
}

#[tokio::test]
async fn login_without_form_body_is_logged_as_failure() {
    let (_, app, sink) = offline_app();

    let response = app
        .oneshot(
            request("POST", "/auth/login")
                .header("content-type", "application/json")
                .body(Body::from(r#"{"username": "anny"}"#))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let records = sink.records();
    assert_eq!(records[0].status_code, 500);
    assert!(records[0].error.as_deref().unwrap().contains("Invalid form body"));
}
