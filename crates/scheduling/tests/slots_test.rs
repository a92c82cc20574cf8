mod common;

use chrono::NaiveDate;
use common::{at, day, TestContext};
use medisched_core::{
    errors::ScheduleError,
    models::{appointment::AppointmentStatus, doctor::WorkingHours, principal::Principal},
};
use medisched_scheduling::slots::Slot;
use pretty_assertions::assert_eq;
use rstest::rstest;
use uuid::Uuid;

#[rstest]
#[case(9, 17)]
#[case(0, 23)]
#[case(8, 9)]
#[case(13, 20)]
#[tokio::test]
async fn test_empty_day_offers_every_working_hour(#[case] start: u32, #[case] end: u32) {
    let ctx = TestContext::with_hours(Some(WorkingHours::new(start, end).unwrap())).await;

    let slots = ctx.slots(day()).await;

    assert_eq!(slots.len() as u32, end - start + 1);
    assert_eq!(slots.first().unwrap(), &format!("{:02}:00-{:02}:00", start, start + 1));
    assert_eq!(slots.last().unwrap(), &format!("{:02}:00-{:02}:00", end, end + 1));
}

#[tokio::test]
async fn test_default_doctor_day() {
    let ctx = TestContext::new().await;

    assert_eq!(
        ctx.slots(day()).await,
        vec![
            "09:00-10:00",
            "10:00-11:00",
            "11:00-12:00",
            "12:00-13:00",
            "13:00-14:00",
            "14:00-15:00",
            "15:00-16:00",
            "16:00-17:00",
            "17:00-18:00",
        ]
    );
}

#[rstest]
#[case(9)]
#[case(12)]
#[case(17)]
#[tokio::test]
async fn test_booking_removes_exactly_its_hour(#[case] hour: u32) {
    let ctx = TestContext::new().await;
    let before = ctx.slots(day()).await;

    ctx.book(ctx.p1, at(hour, 0)).await;
    let after = ctx.slots(day()).await;

    let removed: Vec<_> = before.iter().filter(|s| !after.contains(s)).cloned().collect();
    assert_eq!(removed, vec![Slot { hour }.to_string()]);
    assert_eq!(after.len(), before.len() - 1);
}

#[tokio::test]
async fn test_removal_uses_start_hour_not_occupied_window() {
    let ctx = TestContext::new().await;

    // 10:45 blocks bookings until 11:45 but only the 10:00 slot disappears
    ctx.book(ctx.p1, at(10, 45)).await;
    let slots = ctx.slots(day()).await;

    assert!(!slots.contains(&"10:00-11:00".to_string()));
    assert!(slots.contains(&"11:00-12:00".to_string()));
    assert_eq!(slots.len(), 8);
}

#[tokio::test]
async fn test_bookings_after_last_slot_start_are_ignored() {
    let ctx = TestContext::new().await;

    ctx.book(ctx.p1, at(17, 30)).await;

    assert!(ctx.slots(day()).await.contains(&"17:00-18:00".to_string()));
}

#[tokio::test]
async fn test_other_days_are_unaffected() {
    let ctx = TestContext::new().await;
    ctx.book(ctx.p1, at(10, 0)).await;

    let next_day = NaiveDate::from_ymd_opt(2025, 6, 11).unwrap();
    assert_eq!(ctx.slots(next_day).await.len(), 9);
}

#[tokio::test]
async fn test_fully_booked_day_is_empty() {
    let ctx = TestContext::with_hours(Some(WorkingHours::new(9, 11).unwrap())).await;

    // Back-to-back hours are closer than the conflict window allows, so
    // they go straight into the store.
    for hour in 9..=11 {
        ctx.seed(ctx.p1, at(hour, 0)).await;
    }

    assert!(ctx.slots(day()).await.is_empty());
}

#[tokio::test]
async fn test_cancelled_and_completed_do_not_occupy() {
    let ctx = TestContext::new().await;
    let cancelled = ctx.book(ctx.p1, at(10, 0)).await;
    let completed = ctx.book(ctx.p2, at(14, 0)).await;

    ctx.scheduler
        .appointments
        .cancel_appointment(&Principal::Patient(ctx.p1), cancelled)
        .await
        .unwrap();
    ctx.scheduler
        .appointments
        .change_status(&Principal::Doctor(ctx.doctor_id), completed, AppointmentStatus::Completed)
        .await
        .unwrap();

    assert_eq!(ctx.slots(day()).await.len(), 9);
}

#[tokio::test]
async fn test_unknown_doctor_is_not_found() {
    let ctx = TestContext::new().await;

    let err = ctx
        .scheduler
        .slots
        .available_slots(Uuid::new_v4(), day())
        .await
        .unwrap_err();

    assert!(matches!(err, ScheduleError::NotFound(_)));
}

#[test]
fn test_slot_formatting() {
    assert_eq!(Slot { hour: 9 }.to_string(), "09:00-10:00");
    assert_eq!(Slot { hour: 23 }.to_string(), "23:00-24:00");
}
