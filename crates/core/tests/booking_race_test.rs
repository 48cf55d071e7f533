//! Two clients racing for the same slot through a store that serializes
//! writers per barber, the way the repository layer does with its row lock.

use std::{
    collections::HashMap,
    sync::{Arc, Barrier, Mutex},
    thread,
};

use chrono::{NaiveDate, NaiveTime};
use salon_core::{
    booking::validate_no_overlap,
    errors::{SalonError, SalonResult},
    models::appointment::ProposedSlot,
    time::Interval,
};
use uuid::Uuid;

#[derive(Default)]
struct Store {
    booked: Mutex<HashMap<(Uuid, NaiveDate), Vec<Interval>>>,
}

impl Store {
    fn book(&self, slot: &ProposedSlot) -> SalonResult<()> {
        let mut booked = self.booked.lock().unwrap();
        let day = booked.entry((slot.barber_id, slot.date)).or_default();
        validate_no_overlap(slot, day)?;
        day.push(slot.interval());
        Ok(())
    }
}

fn t(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap()
}

#[test]
fn test_exactly_one_of_two_identical_bookings_wins() {
    let store = Arc::new(Store::default());
    let barrier = Arc::new(Barrier::new(2));
    let slot = ProposedSlot::new(
        Uuid::new_v4(),
        NaiveDate::from_ymd_opt(2024, 3, 4).unwrap(),
        t(10, 0),
        t(10, 30),
    )
    .unwrap();

    let handles: Vec<_> = (0..2)
        .map(|_| {
            let store = Arc::clone(&store);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                store.book(&slot)
            })
        })
        .collect();

    let outcomes: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();

    assert_eq!(outcomes.iter().filter(|r| r.is_ok()).count(), 1);
    assert!(outcomes
        .iter()
        .any(|r| matches!(r, Err(SalonError::SchedulingConflict(_)))));
}

#[test]
fn test_adjacent_bookings_both_win() {
    let store = Store::default();
    let barber_id = Uuid::new_v4();
    let date = NaiveDate::from_ymd_opt(2024, 3, 4).unwrap();

    let first = ProposedSlot::new(barber_id, date, t(10, 0), t(10, 30)).unwrap();
    let second = ProposedSlot::new(barber_id, date, t(10, 30), t(11, 0)).unwrap();
    let other_barber = ProposedSlot::new(Uuid::new_v4(), date, t(10, 0), t(10, 30)).unwrap();

    assert!(store.book(&first).is_ok());
    assert!(store.book(&second).is_ok());
    assert!(store.book(&other_barber).is_ok());
    assert!(matches!(store.book(&first), Err(SalonError::SchedulingConflict(_))));
}
