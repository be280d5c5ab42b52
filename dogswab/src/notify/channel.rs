use std::sync::Mutex;

use serde::Serialize;

use crate::error::Result;

/// Payload handed to a delivery channel when a reminder fires.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub reminder_id: String,
    pub title: String,
    pub message: String,
}

/// A delivery channel for fired reminders (OS push, in-app banner, ...).
///
/// Channels report user interaction (complete/snooze) by calling back into
/// the lifecycle API; the engine itself is fire-and-forget.
pub trait NotificationChannel: Send + Sync {
    fn name(&self) -> &'static str;

    /// Negotiate delivery permission with the underlying platform.
    ///
    /// Called at most once per process; the dispatcher caches the answer.
    fn request_permission(&self) -> bool {
        true
    }

    fn deliver(&self, notification: &Notification) -> Result<()>;
}

/// Channel that only writes to the log. Stands in for OS push notifications
/// in headless deployments.
pub struct LogChannel;

impl NotificationChannel for LogChannel {
    fn name(&self) -> &'static str {
        "log"
    }

    fn deliver(&self, notification: &Notification) -> Result<()> {
        tracing::info!(
            reminder_id = %notification.reminder_id,
            title = %notification.title,
            "reminder notification"
        );
        Ok(())
    }
}

/// In-app banner channel. Buffers deliveries so the application surface can
/// drain and display them; requires no platform permission.
#[derive(Default)]
pub struct InAppChannel {
    delivered: Mutex<Vec<Notification>>,
}

impl InAppChannel {
    pub fn new() -> Self {
        Self::default()
    }

    /// All notifications delivered so far, oldest first.
    pub fn delivered(&self) -> Vec<Notification> {
        self.delivered
            .lock()
            .expect("in-app channel lock poisoned")
            .clone()
    }

    /// Remove and return buffered notifications.
    pub fn drain(&self) -> Vec<Notification> {
        std::mem::take(
            &mut *self
                .delivered
                .lock()
                .expect("in-app channel lock poisoned"),
        )
    }
}

impl NotificationChannel for InAppChannel {
    fn name(&self) -> &'static str {
        "in_app"
    }

    fn deliver(&self, notification: &Notification) -> Result<()> {
        tracing::debug!(
            reminder_id = %notification.reminder_id,
            "buffering in-app notification"
        );
        self.delivered
            .lock()
            .expect("in-app channel lock poisoned")
            .push(notification.clone());
        Ok(())
    }
}
