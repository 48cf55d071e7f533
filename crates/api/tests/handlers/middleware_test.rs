use axum::{body::to_bytes, http::StatusCode, response::Response};
use pretty_assertions::assert_eq;
use rstest::rstest;
use salon_api::middleware::error_handling::map_error;
use salon_core::errors::SalonError;
use serde_json::Value;

async fn body_json(response: Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[rstest]
#[case(SalonError::NotFound("Barber not found".into()), StatusCode::NOT_FOUND)]
#[case(SalonError::Validation("date is required".into()), StatusCode::BAD_REQUEST)]
#[case(SalonError::SchedulingConflict("Slot already booked".into()), StatusCode::CONFLICT)]
#[case(SalonError::TooLateToCancel("1 hour left".into()), StatusCode::BAD_REQUEST)]
#[case(
    SalonError::InvalidTransition { from: "completed".into(), to: "pending".into() },
    StatusCode::CONFLICT
)]
#[case(SalonError::Authentication("Not signed in".into()), StatusCode::UNAUTHORIZED)]
#[case(SalonError::Authorization("Admins only".into()), StatusCode::FORBIDDEN)]
#[case(SalonError::Database(eyre::eyre!("connection reset")), StatusCode::INTERNAL_SERVER_ERROR)]
#[tokio::test]
async fn test_error_status_mapping(#[case] error: SalonError, #[case] expected: StatusCode) {
    let response = map_error(error);
    assert_eq!(response.status(), expected);
}

#[tokio::test]
async fn test_error_body_carries_message() {
    let response = map_error(SalonError::SchedulingConflict(
        "Slot already booked: 2024-03-04 10:00-10:30".to_string(),
    ));

    let body = body_json(response).await;
    assert_eq!(
        body["error"],
        "Scheduling conflict: Slot already booked: 2024-03-04 10:00-10:30"
    );
}

#[tokio::test]
async fn test_server_errors_hide_details() {
    let response = map_error(SalonError::Database(eyre::eyre!(
        "password authentication failed for user postgres"
    )));

    let body = body_json(response).await;
    assert_eq!(body["error"], "Database error");

    let response = map_error(SalonError::Internal(Box::new(std::io::Error::new(
        std::io::ErrorKind::Other,
        "disk full",
    ))));
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_json(response).await;
    assert_eq!(body["error"], "Internal server error");
}
