use chrono::{Duration, NaiveDateTime};
use mockall::predicate;
use salon_core::{
    booking::client_cancellation,
    errors::SalonError,
    models::appointment::{Appointment, AppointmentStatus},
};
use tokio_test::{assert_err, assert_ok};
use uuid::Uuid;

use crate::test_utils::{db_appointment, monday, t, TestContext};

// Mirrors the client cancellation handler over the mock repositories
async fn cancel_wrapper(
    ctx: &TestContext,
    client_id: Uuid,
    appointment_id: Uuid,
    now: NaiveDateTime,
) -> Result<AppointmentStatus, SalonError> {
    let current = ctx
        .appointment_repo
        .get_appointment_by_id(appointment_id)
        .await?
        .ok_or_else(|| SalonError::NotFound(format!("Appointment {} not found", appointment_id)))?;
    let current = Appointment::try_from(current)?;

    if current.client_id != client_id {
        return Err(SalonError::Authorization(
            "You can only cancel your own appointments".to_string(),
        ));
    }
    client_cancellation(current.status, current.starts_at(), now)
}

fn context_with(client_id: Uuid, status: AppointmentStatus) -> (TestContext, Uuid) {
    let mut ctx = TestContext::new();
    let row = db_appointment(client_id, monday(), t(14, 0), t(14, 30), status);
    let id = row.id;
    ctx.appointment_repo
        .expect_get_appointment_by_id()
        .with(predicate::eq(id))
        .returning(move |_| Ok(Some(row.clone())));
    (ctx, id)
}

fn start() -> NaiveDateTime {
    monday().and_time(t(14, 0))
}

#[tokio::test]
async fn test_cancel_three_hours_ahead() {
    let client_id = Uuid::new_v4();
    let (ctx, id) = context_with(client_id, AppointmentStatus::Pending);

    let status = assert_ok!(cancel_wrapper(&ctx, client_id, id, start() - Duration::hours(3)).await);

    assert_eq!(status, AppointmentStatus::Canceled);
}

#[tokio::test]
async fn test_cancel_one_hour_ahead_is_too_late() {
    let client_id = Uuid::new_v4();
    let (ctx, id) = context_with(client_id, AppointmentStatus::Confirmed);

    let result = cancel_wrapper(&ctx, client_id, id, start() - Duration::hours(1)).await;

    assert!(matches!(result, Err(SalonError::TooLateToCancel(_))));
}

#[tokio::test]
async fn test_cancel_exactly_at_cutoff() {
    let client_id = Uuid::new_v4();
    let (ctx, id) = context_with(client_id, AppointmentStatus::Pending);

    assert_ok!(cancel_wrapper(&ctx, client_id, id, start() - Duration::hours(2)).await);
    assert_err!(
        cancel_wrapper(&ctx, client_id, id, start() - Duration::hours(2) + Duration::minutes(1)).await
    );
}

#[tokio::test]
async fn test_cancel_someone_elses_appointment() {
    let (ctx, id) = context_with(Uuid::new_v4(), AppointmentStatus::Pending);

    let result = cancel_wrapper(&ctx, Uuid::new_v4(), id, start() - Duration::hours(5)).await;

    assert!(matches!(result, Err(SalonError::Authorization(_))));
}

#[tokio::test]
async fn test_cancel_completed_appointment() {
    let client_id = Uuid::new_v4();
    let (ctx, id) = context_with(client_id, AppointmentStatus::Completed);

    let result = cancel_wrapper(&ctx, client_id, id, start() - Duration::days(2)).await;

    assert!(matches!(result, Err(SalonError::InvalidTransition { .. })));
}

#[tokio::test]
async fn test_cancel_unknown_appointment() {
    let mut ctx = TestContext::new();
    ctx.appointment_repo
        .expect_get_appointment_by_id()
        .returning(|_| Ok(None));

    let result = cancel_wrapper(&ctx, Uuid::new_v4(), Uuid::new_v4(), start()).await;

    assert!(matches!(result, Err(SalonError::NotFound(_))));
}

#[tokio::test]
async fn test_stored_status_must_be_known() {
    let client_id = Uuid::new_v4();
    let mut ctx = TestContext::new();
    let mut row = db_appointment(client_id, monday(), t(14, 0), t(14, 30), AppointmentStatus::Pending);
    row.status = "no-show".to_string();
    let id = row.id;
    ctx.appointment_repo
        .expect_get_appointment_by_id()
        .returning(move |_| Ok(Some(row.clone())));

    let result = cancel_wrapper(&ctx, client_id, id, start() - Duration::hours(5)).await;

    assert!(matches!(result, Err(SalonError::Validation(_))));
}
