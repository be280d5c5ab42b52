use std::sync::Arc;

use chrono::{Duration, Utc};
use pretty_assertions::assert_eq;

use dogswab::engine::ReminderEngine;
use dogswab::models::{ReminderStatus, ReminderType};
use dogswab::notify::{InAppChannel, LogChannel, NotificationDispatcher};

fn test_engine() -> ReminderEngine {
    let dispatcher = Arc::new(NotificationDispatcher::new(
        Arc::new(LogChannel),
        Arc::new(InAppChannel::new()),
    ));
    ReminderEngine::new(dispatcher)
}

#[tokio::test]
async fn test_ai_response_becomes_scheduled_reminders() {
    let engine = test_engine();
    let response = "Rex seems fine. Give his medication in 2 hours, \
                    and follow up with the vet in 1 day if the cough persists.";

    let suggestions = engine.parse_response_for_reminders(response, Some("pet-1"));
    assert_eq!(suggestions.len(), 2);
    assert_eq!(suggestions[0].reminder_type, ReminderType::Medication);
    assert_eq!(suggestions[0].time_in_minutes, 120);
    assert_eq!(suggestions[1].reminder_type, ReminderType::VetFollowup);
    assert_eq!(suggestions[1].time_in_minutes, 1440);

    // Confirming each suggestion creates an armed pending reminder.
    let before = Utc::now();
    for suggestion in &suggestions {
        engine
            .schedule_suggestion(suggestion, Some("pet-1".to_string()))
            .unwrap();
    }

    let reminders = engine.reminders();
    assert_eq!(reminders.len(), 2);
    assert_eq!(engine.armed_timers(), 2);

    // List order is by target time, so medication comes first.
    assert_eq!(reminders[0].title, "Medication Reminder");
    assert_eq!(reminders[0].status, ReminderStatus::Pending);
    assert_eq!(reminders[0].pet_id.as_deref(), Some("pet-1"));
    assert!(reminders[0].scheduled_for >= before + Duration::minutes(120));
    assert!(reminders[1].scheduled_for >= before + Duration::minutes(1440));
}

#[tokio::test]
async fn test_unconfirmed_suggestions_schedule_nothing() {
    let engine = test_engine();

    let suggestions =
        engine.parse_response_for_reminders("Check on the incision in 30 minutes", None);
    assert_eq!(suggestions.len(), 1);

    assert!(engine.reminders().is_empty());
    assert_eq!(engine.armed_timers(), 0);
}

#[tokio::test]
async fn test_chatty_response_without_instructions_yields_nothing() {
    let engine = test_engine();

    let suggestions = engine.parse_response_for_reminders(
        "Great news! The test results came back clean and Rex is in excellent shape.",
        Some("pet-1"),
    );
    assert!(suggestions.is_empty());
}
