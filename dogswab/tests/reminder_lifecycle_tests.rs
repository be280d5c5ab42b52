use std::sync::Arc;
use std::time::Duration as StdDuration;

use chrono::{Duration, Utc};
use pretty_assertions::assert_eq;

use dogswab::engine::ReminderEngine;
use dogswab::error::Result;
use dogswab::models::{NewReminder, ReminderStatus, ReminderType};
use dogswab::notify::{InAppChannel, Notification, NotificationChannel, NotificationDispatcher};
use dogswab::persistence::{InMemoryRepository, ReminderRepository};

/// Primary channel whose permission prompt is always denied, so every
/// delivery lands in the observable in-app fallback.
struct DeniedChannel;

impl NotificationChannel for DeniedChannel {
    fn name(&self) -> &'static str {
        "denied"
    }

    fn request_permission(&self) -> bool {
        false
    }

    fn deliver(&self, _notification: &Notification) -> Result<()> {
        panic!("denied channel must never receive a delivery");
    }
}

fn test_engine() -> ReminderEngine {
    let dispatcher = Arc::new(NotificationDispatcher::new(
        Arc::new(DeniedChannel),
        Arc::new(InAppChannel::new()),
    ));
    ReminderEngine::new(dispatcher)
}

fn new_reminder(title: &str, offset_ms: i64) -> NewReminder {
    NewReminder {
        title: title.to_string(),
        message: format!("Time for {title}"),
        pet_id: Some("pet-1".to_string()),
        scheduled_for: Utc::now() + Duration::milliseconds(offset_ms),
        reminder_type: ReminderType::Medication,
    }
}

#[tokio::test]
async fn test_full_lifecycle_schedule_fire_snooze_complete() {
    let engine = test_engine();

    let id = engine
        .schedule_reminder(new_reminder("Evening medication", 100))
        .unwrap();
    assert_eq!(engine.get(&id).unwrap().status, ReminderStatus::Pending);
    assert_eq!(engine.armed_timers(), 1);

    // Timer fires and the reminder moves to sent with one delivery.
    tokio::time::sleep(StdDuration::from_millis(400)).await;
    assert_eq!(engine.get(&id).unwrap().status, ReminderStatus::Sent);
    assert_eq!(engine.in_app_notifications().len(), 1);
    assert_eq!(engine.armed_timers(), 0);

    // Snooze pushes it back to pending with a fresh timer.
    engine.snooze_reminder(&id, Some(30));
    let snoozed = engine.get(&id).unwrap();
    assert_eq!(snoozed.status, ReminderStatus::Pending);
    assert!(snoozed.scheduled_for > Utc::now() + Duration::minutes(29));
    assert_eq!(engine.armed_timers(), 1);

    // Completing a snoozed reminder cancels the timer for good.
    engine.mark_completed(&id);
    assert_eq!(engine.get(&id).unwrap().status, ReminderStatus::Completed);
    assert_eq!(engine.armed_timers(), 0);

    tokio::time::sleep(StdDuration::from_millis(200)).await;
    assert_eq!(engine.in_app_notifications().len(), 1, "no second delivery");
}

#[tokio::test]
async fn test_dismissed_reminder_never_fires() {
    let engine = test_engine();

    let id = engine
        .schedule_reminder(new_reminder("Walk", 150))
        .unwrap();
    engine.dismiss_reminder(&id);

    tokio::time::sleep(StdDuration::from_millis(400)).await;
    assert_eq!(engine.get(&id).unwrap().status, ReminderStatus::Dismissed);
    assert!(engine.in_app_notifications().is_empty());
}

#[tokio::test]
async fn test_past_due_reminder_fires_immediately() {
    let engine = test_engine();

    let id = engine
        .schedule_reminder(new_reminder("Missed dose", -60_000))
        .unwrap();

    assert_eq!(engine.get(&id).unwrap().status, ReminderStatus::Sent);
    assert_eq!(engine.in_app_notifications().len(), 1);
}

#[tokio::test]
async fn test_restart_restores_and_rearms_persisted_reminders() {
    let repository = Arc::new(InMemoryRepository::new());

    // First process lifetime: schedule two reminders, resolve one.
    {
        let dispatcher = Arc::new(NotificationDispatcher::new(
            Arc::new(DeniedChannel),
            Arc::new(InAppChannel::new()),
        ));
        let engine = ReminderEngine::with_repository(dispatcher, repository.clone());
        engine.restore().unwrap();

        let done = engine
            .schedule_reminder(new_reminder("Morning feed", 60_000))
            .unwrap();
        engine
            .schedule_reminder(new_reminder("Evening feed", 120_000))
            .unwrap();
        engine.mark_completed(&done);
    }

    assert_eq!(repository.load().unwrap().len(), 2);

    // Second process lifetime: the pending reminder comes back armed.
    let dispatcher = Arc::new(NotificationDispatcher::new(
        Arc::new(DeniedChannel),
        Arc::new(InAppChannel::new()),
    ));
    let engine = ReminderEngine::with_repository(dispatcher, repository);
    let restored = engine.restore().unwrap();

    assert_eq!(restored, 2);
    assert_eq!(engine.reminders().len(), 2);
    assert_eq!(engine.pending_reminders().len(), 1);
    assert_eq!(engine.armed_timers(), 1);
}

#[tokio::test]
async fn test_store_subscription_sees_every_mutation() {
    let engine = test_engine();

    let seen = Arc::new(std::sync::Mutex::new(Vec::new()));
    let sink = seen.clone();
    let _subscription = engine.subscribe(move |reminders| {
        let statuses: Vec<ReminderStatus> = reminders.iter().map(|r| r.status).collect();
        sink.lock().unwrap().push(statuses);
    });

    let id = engine
        .schedule_reminder(new_reminder("Brush teeth", 60_000))
        .unwrap();
    engine.mark_completed(&id);

    let seen = seen.lock().unwrap();
    assert_eq!(
        *seen,
        vec![
            vec![ReminderStatus::Pending],
            vec![ReminderStatus::Completed]
        ]
    );
}

#[tokio::test]
async fn test_restore_fires_reminders_that_elapsed_while_down() {
    // A reminder that came due while no process was running.
    let overdue = dogswab::models::Reminder::new(new_reminder("Missed while down", -60_000));
    let id = overdue.id.clone();
    let repository = Arc::new(InMemoryRepository::with_reminders(vec![overdue]));

    let dispatcher = Arc::new(NotificationDispatcher::new(
        Arc::new(DeniedChannel),
        Arc::new(InAppChannel::new()),
    ));
    let engine = ReminderEngine::with_repository(dispatcher, repository);
    engine.restore().unwrap();

    assert_eq!(engine.get(&id).unwrap().status, ReminderStatus::Sent);
    assert_eq!(engine.in_app_notifications().len(), 1);
    assert_eq!(engine.run_sweep(), 0, "nothing left overdue after restore");
}
