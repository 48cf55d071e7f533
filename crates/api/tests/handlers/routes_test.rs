//! Router-level tests for requests that are answered before the database
//! is reached.

use axum::http::{HeaderName, HeaderValue, StatusCode};
use axum_test::TestServer;
use pretty_assertions::assert_eq;
use rstest::rstest;
use salon_api::{build_router, middleware::auth::USER_ID_HEADER};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::test_utils::{build_state, test_config};

fn server() -> TestServer {
    let app = build_router(build_state(), &test_config()).unwrap();
    TestServer::new(app).unwrap()
}

#[tokio::test]
async fn test_health_check() {
    let server = server();
    let response = server.get("/health").await;

    response.assert_status_ok();
    assert_eq!(response.json::<Value>(), json!({"status": "ok"}));
}

#[tokio::test]
async fn test_version() {
    let server = server();
    let response = server.get("/version").await;

    response.assert_status_ok();
    let body = response.json::<Value>();
    assert_eq!(body["name"], "salon-api");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
}

#[rstest]
#[case("/api/admin/users")]
#[case("/api/admin/stats")]
#[case("/api/admin/appointments")]
#[case("/api/barber/appointments")]
#[case("/api/barber/schedule")]
#[case("/api/client/appointments")]
#[tokio::test]
async fn test_gated_routes_require_session(#[case] path: &str) {
    let server = server();
    let response = server.get(path).await;

    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
    assert_eq!(response.json::<Value>()["error"], "Authentication error: Not signed in");
}

#[tokio::test]
async fn test_gated_routes_reject_malformed_session() {
    let server = server();
    let response = server
        .delete(&format!("/api/client/appointments/{}", Uuid::new_v4()))
        .add_header(
            HeaderName::from_static(USER_ID_HEADER),
            HeaderValue::from_static("not-a-uuid"),
        )
        .await;

    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_available_slots_requires_date() {
    let server = server();
    let response = server
        .get(&format!("/api/barbers/{}/available-slots", Uuid::new_v4()))
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["error"], "Validation error: date is required");
}

#[tokio::test]
async fn test_available_slots_rejects_bad_date() {
    let server = server();
    let response = server
        .get(&format!("/api/barbers/{}/available-slots", Uuid::new_v4()))
        .add_query_param("date", "04/03/2024")
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_available_slots_rejects_durations_longer_than_a_day() {
    let server = server();
    for duration in ["1441", "4294967295"] {
        let response = server
            .get(&format!("/api/barbers/{}/available-slots", Uuid::new_v4()))
            .add_query_param("date", "2024-03-04")
            .add_query_param("duration", duration)
            .await;

        assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            response.json::<Value>()["error"],
            "Validation error: Service duration must not exceed 1440 minutes"
        );
    }
}

#[tokio::test]
async fn test_login_requires_credentials() {
    let server = server();
    let response = server
        .post("/api/auth/login")
        .json(&json!({"email": "", "password": ""}))
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_malformed_body_is_a_validation_error() {
    let server = server();
    let response = server
        .post("/api/auth/login")
        .json(&json!({"email": "ana@example.com"}))
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let message = response.json::<Value>()["error"].as_str().unwrap().to_string();
    assert!(message.starts_with("Validation error:"), "{message}");
}
