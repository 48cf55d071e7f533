use chrono::{NaiveDate, NaiveDateTime};
use mockall::predicate;
use pretty_assertions::assert_eq;
use salon_api::handlers::availability::{slots_for, SlotsQuery};
use salon_core::{
    errors::SalonError,
    models::service::Service,
    time::{Interval, DEFAULT_SERVICE_DURATION_MINUTES},
};
use serde_json::json;
use uuid::Uuid;

use crate::test_utils::{db_barber, db_service, monday, t, weekday_hours, TestContext};

// Mirrors the available-slots handler over the mock repositories
async fn available_slots_wrapper(
    ctx: &TestContext,
    barber_id: Uuid,
    query: SlotsQuery,
    now: NaiveDateTime,
) -> Result<Vec<String>, SalonError> {
    let date = query.target_date()?;

    let barber = ctx
        .barber_repo
        .get_barber_by_id(barber_id)
        .await?
        .ok_or_else(|| SalonError::NotFound(format!("Barber with ID {} not found", barber_id)))?;

    let duration = match (query.duration, query.service_id) {
        (Some(minutes), _) => minutes,
        (None, Some(service_id)) => {
            let service = ctx
                .service_repo
                .get_service_by_id(service_id)
                .await?
                .ok_or_else(|| SalonError::NotFound(format!("Service {} not found", service_id)))?;
            Service::try_from(service)?.duration_minutes
        }
        (None, None) => DEFAULT_SERVICE_DURATION_MINUTES,
    };

    let booked = ctx.appointment_repo.get_active_intervals(barber_id, date).await?;
    slots_for(&barber.schedule(), date, duration, &booked, now)
}

fn query(date: &str) -> SlotsQuery {
    SlotsQuery {
        date: Some(date.to_string()),
        ..Default::default()
    }
}

fn last_week() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 2, 26).unwrap().and_time(t(8, 0))
}

#[tokio::test]
async fn test_open_monday_without_bookings() {
    let mut ctx = TestContext::new();
    let barber_id = Uuid::new_v4();

    ctx.barber_repo
        .expect_get_barber_by_id()
        .with(predicate::eq(barber_id))
        .times(1)
        .returning(move |id| Ok(Some(db_barber(id, weekday_hours()))));
    ctx.appointment_repo
        .expect_get_active_intervals()
        .with(predicate::eq(barber_id), predicate::eq(monday()))
        .times(1)
        .returning(|_, _| Ok(vec![]));

    let slots = available_slots_wrapper(&ctx, barber_id, query("2024-03-04"), last_week())
        .await
        .unwrap();

    assert_eq!(slots.len(), 35);
    assert_eq!(&slots[..3], ["09:00", "09:15", "09:30"]);
    assert_eq!(slots.last().map(String::as_str), Some("17:30"));
    assert!(!slots.contains(&"17:45".to_string()));
}

#[tokio::test]
async fn test_booked_interval_is_skipped() {
    let mut ctx = TestContext::new();
    let barber_id = Uuid::new_v4();

    ctx.barber_repo
        .expect_get_barber_by_id()
        .returning(move |id| Ok(Some(db_barber(id, weekday_hours()))));
    ctx.appointment_repo
        .expect_get_active_intervals()
        .returning(|_, _| Ok(vec![Interval::from_times(t(10, 0), t(10, 30))]));

    let slots = available_slots_wrapper(&ctx, barber_id, query("2024-03-04"), last_week())
        .await
        .unwrap();

    assert!(slots.contains(&"09:30".to_string()));
    assert!(!slots.contains(&"09:45".to_string()));
    assert!(!slots.contains(&"10:00".to_string()));
    assert!(!slots.contains(&"10:15".to_string()));
    assert!(slots.contains(&"10:30".to_string()));
}

#[tokio::test]
async fn test_duration_comes_from_service() {
    let mut ctx = TestContext::new();
    let barber_id = Uuid::new_v4();
    let service_id = Uuid::new_v4();

    ctx.barber_repo
        .expect_get_barber_by_id()
        .returning(move |id| Ok(Some(db_barber(id, weekday_hours()))));
    ctx.service_repo
        .expect_get_service_by_id()
        .with(predicate::eq(service_id))
        .times(1)
        .returning(|id| Ok(Some(db_service(id, 90))));
    ctx.appointment_repo
        .expect_get_active_intervals()
        .returning(|_, _| Ok(vec![]));

    let query = SlotsQuery {
        date: Some("2024-03-04".to_string()),
        duration: None,
        service_id: Some(service_id),
    };
    let slots = available_slots_wrapper(&ctx, barber_id, query, last_week())
        .await
        .unwrap();

    assert_eq!(slots.last().map(String::as_str), Some("16:30"));
}

#[tokio::test]
async fn test_explicit_duration_wins_over_service() {
    let mut ctx = TestContext::new();
    let barber_id = Uuid::new_v4();

    ctx.barber_repo
        .expect_get_barber_by_id()
        .returning(move |id| Ok(Some(db_barber(id, weekday_hours()))));
    ctx.service_repo.expect_get_service_by_id().times(0);
    ctx.appointment_repo
        .expect_get_active_intervals()
        .returning(|_, _| Ok(vec![]));

    let query = SlotsQuery {
        date: Some("2024-03-04".to_string()),
        duration: Some(60),
        service_id: Some(Uuid::new_v4()),
    };
    let slots = available_slots_wrapper(&ctx, barber_id, query, last_week())
        .await
        .unwrap();

    assert_eq!(slots.last().map(String::as_str), Some("17:00"));
}

#[tokio::test]
async fn test_sunday_is_closed() {
    let mut ctx = TestContext::new();
    let barber_id = Uuid::new_v4();

    ctx.barber_repo
        .expect_get_barber_by_id()
        .returning(move |id| Ok(Some(db_barber(id, weekday_hours()))));
    ctx.appointment_repo
        .expect_get_active_intervals()
        .returning(|_, _| Ok(vec![]));

    let slots = available_slots_wrapper(&ctx, barber_id, query("2024-03-10"), last_week())
        .await
        .unwrap();

    assert!(slots.is_empty());
}

#[tokio::test]
async fn test_blocked_day_is_closed() {
    let mut ctx = TestContext::new();
    let barber_id = Uuid::new_v4();

    ctx.barber_repo.expect_get_barber_by_id().returning(move |id| {
        let mut barber = db_barber(id, weekday_hours());
        barber.blocked_days = json!(["2024-03-04"]);
        Ok(Some(barber))
    });
    ctx.appointment_repo
        .expect_get_active_intervals()
        .returning(|_, _| Ok(vec![]));

    let slots = available_slots_wrapper(&ctx, barber_id, query("2024-03-04"), last_week())
        .await
        .unwrap();

    assert!(slots.is_empty());
}

#[tokio::test]
async fn test_unreadable_hours_fail_closed() {
    let mut ctx = TestContext::new();
    let barber_id = Uuid::new_v4();

    ctx.barber_repo
        .expect_get_barber_by_id()
        .returning(move |id| Ok(Some(db_barber(id, json!("9 to 5")))));
    ctx.appointment_repo
        .expect_get_active_intervals()
        .returning(|_, _| Ok(vec![]));

    let slots = available_slots_wrapper(&ctx, barber_id, query("2024-03-04"), last_week())
        .await
        .unwrap();

    assert!(slots.is_empty());
}

#[tokio::test]
async fn test_today_skips_started_slots() {
    let mut ctx = TestContext::new();
    let barber_id = Uuid::new_v4();

    ctx.barber_repo
        .expect_get_barber_by_id()
        .returning(move |id| Ok(Some(db_barber(id, weekday_hours()))));
    ctx.appointment_repo
        .expect_get_active_intervals()
        .returning(|_, _| Ok(vec![]));

    let now = monday().and_time(t(16, 45));
    let slots = available_slots_wrapper(&ctx, barber_id, query("2024-03-04"), now)
        .await
        .unwrap();

    assert_eq!(slots, ["17:00", "17:15", "17:30"]);
}

#[tokio::test]
async fn test_unknown_barber() {
    let mut ctx = TestContext::new();

    ctx.barber_repo
        .expect_get_barber_by_id()
        .returning(|_| Ok(None));
    ctx.appointment_repo.expect_get_active_intervals().times(0);

    let result =
        available_slots_wrapper(&ctx, Uuid::new_v4(), query("2024-03-04"), last_week()).await;

    assert!(matches!(result, Err(SalonError::NotFound(_))));
}

#[tokio::test]
async fn test_missing_date() {
    let ctx = TestContext::new();

    let result =
        available_slots_wrapper(&ctx, Uuid::new_v4(), SlotsQuery::default(), last_week()).await;

    assert!(matches!(result, Err(SalonError::Validation(_))));
}

#[tokio::test]
async fn test_repeated_queries_agree() {
    let mut ctx = TestContext::new();
    let barber_id = Uuid::new_v4();

    ctx.barber_repo
        .expect_get_barber_by_id()
        .times(2)
        .returning(move |id| Ok(Some(db_barber(id, weekday_hours()))));
    ctx.appointment_repo
        .expect_get_active_intervals()
        .times(2)
        .returning(|_, _| Ok(vec![Interval::from_times(t(12, 0), t(13, 0))]));

    let first = available_slots_wrapper(&ctx, barber_id, query("2024-03-04"), last_week())
        .await
        .unwrap();
    let second = available_slots_wrapper(&ctx, barber_id, query("2024-03-04"), last_week())
        .await
        .unwrap();

    assert_eq!(first, second);
}
