use std::sync::{Arc, Mutex};

use super::channel::{InAppChannel, Notification, NotificationChannel};

/// Routes fired reminders to a delivery channel.
///
/// The primary channel is used when platform permission was granted; the
/// in-app channel is the fallback on denial or delivery failure, so a firing
/// reminder is never silently dropped.
pub struct NotificationDispatcher {
    primary: Arc<dyn NotificationChannel>,
    fallback: Arc<InAppChannel>,
    /// Cached permission state. `None` until first negotiated.
    permission: Mutex<Option<bool>>,
}

impl NotificationDispatcher {
    pub fn new(primary: Arc<dyn NotificationChannel>, fallback: Arc<InAppChannel>) -> Self {
        Self {
            primary,
            fallback,
            permission: Mutex::new(None),
        }
    }

    /// Negotiate notification permission with the primary channel.
    ///
    /// Idempotent: a previous answer (including denial) is cached and the
    /// platform is not re-prompted.
    pub fn request_permission(&self) -> bool {
        let mut cached = self.permission.lock().expect("permission lock poisoned");
        match *cached {
            Some(granted) => granted,
            None => {
                let granted = self.primary.request_permission();
                tracing::info!(
                    channel = self.primary.name(),
                    granted,
                    "notification permission negotiated"
                );
                *cached = Some(granted);
                granted
            }
        }
    }

    pub fn dispatch(&self, notification: &Notification) {
        if self.request_permission() {
            match self.primary.deliver(notification) {
                Ok(()) => return,
                Err(e) => {
                    tracing::warn!(
                        channel = self.primary.name(),
                        error = %e,
                        reminder_id = %notification.reminder_id,
                        "primary delivery failed, falling back to in-app channel"
                    );
                }
            }
        }
        if let Err(e) = self.fallback.deliver(notification) {
            tracing::error!(
                error = %e,
                reminder_id = %notification.reminder_id,
                "in-app fallback delivery failed"
            );
        }
    }

    pub fn fallback(&self) -> &Arc<InAppChannel> {
        &self.fallback
    }
}
