use chrono::{DateTime, Utc};
use nanoid::nanoid;
use serde::{Deserialize, Serialize};

/// Category of care activity a reminder relates to.
///
/// Wire format: snake_case string (e.g. `"checkup"`, `"vet_followup"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ReminderType {
    Checkup,
    Medication,
    Feeding,
    Exercise,
    VetFollowup,
    #[default]
    General,
}

/// Lifecycle state of a reminder.
///
/// Valid transitions: `pending → sent → {completed | dismissed}`, plus
/// `pending → {completed | dismissed}` for direct user action before the timer
/// fires, and `{pending, sent} → pending` via snooze. Terminal states are
/// never left.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReminderStatus {
    Pending,
    Sent,
    Completed,
    Dismissed,
}

impl ReminderStatus {
    /// A reminder still awaiting user resolution (pending or sent).
    pub fn is_open(&self) -> bool {
        matches!(self, Self::Pending | Self::Sent)
    }
}

impl std::fmt::Display for ReminderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Sent => write!(f, "sent"),
            Self::Completed => write!(f, "completed"),
            Self::Dismissed => write!(f, "dismissed"),
        }
    }
}

/// A scheduled user-facing alert.
///
/// `id`, `title`, `message`, `reminder_type` and `created_at` are immutable
/// after creation. `scheduled_for` is rewritten only by snooze. `pet_id` is a
/// weak reference: deleting the pet does not cascade to its reminders.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reminder {
    pub id: String,
    pub title: String,
    pub message: String,
    pub pet_id: Option<String>,
    pub scheduled_for: DateTime<Utc>,
    #[serde(rename = "type")]
    pub reminder_type: ReminderType,
    pub status: ReminderStatus,
    pub created_at: DateTime<Utc>,
}

/// Input for creating a reminder through the lifecycle API.
#[derive(Debug, Clone, Deserialize)]
pub struct NewReminder {
    pub title: String,
    pub message: String,
    pub pet_id: Option<String>,
    pub scheduled_for: DateTime<Utc>,
    #[serde(default, rename = "type")]
    pub reminder_type: ReminderType,
}

impl Reminder {
    pub fn new(new: NewReminder) -> Self {
        Self {
            id: nanoid!(),
            title: new.title,
            message: new.message,
            pet_id: new.pet_id,
            scheduled_for: new.scheduled_for,
            reminder_type: new.reminder_type,
            status: ReminderStatus::Pending,
            created_at: Utc::now(),
        }
    }

    /// A pending reminder whose target time has already passed.
    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        self.status == ReminderStatus::Pending && self.scheduled_for <= now
    }
}

/// Ephemeral reminder candidate extracted from free-text AI responses.
///
/// Not persisted; becomes zero or more reminders once the user confirms.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReminderSuggestion {
    pub title: String,
    pub message: String,
    pub time_in_minutes: i64,
    #[serde(rename = "type")]
    pub reminder_type: ReminderType,
}
