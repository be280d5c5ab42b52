use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::Utc;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::models::{Reminder, ReminderStatus};
use crate::notify::{Notification, NotificationDispatcher};
use crate::store::ReminderStore;

/// Arms one-shot timers for pending reminders and drives the
/// `pending → sent` transition when they elapse.
///
/// Invariant: at most one armed timer per reminder id. Every terminal or
/// snooze transition must cancel the armed timer first so a stale fire can
/// never follow a state change.
#[derive(Clone)]
pub struct ReminderScheduler {
    inner: Arc<SchedulerInner>,
}

struct SchedulerInner {
    store: Arc<ReminderStore>,
    dispatcher: Arc<NotificationDispatcher>,
    timers: Mutex<HashMap<String, JoinHandle<()>>>,
}

impl ReminderScheduler {
    pub fn new(store: Arc<ReminderStore>, dispatcher: Arc<NotificationDispatcher>) -> Self {
        Self {
            inner: Arc::new(SchedulerInner {
                store,
                dispatcher,
                timers: Mutex::new(HashMap::new()),
            }),
        }
    }

    /// Arm a one-shot timer for the reminder, replacing any existing timer.
    ///
    /// A reminder whose target time has already passed fires synchronously
    /// within this call.
    pub fn arm(&self, reminder: &Reminder) {
        self.cancel(&reminder.id);

        let now = Utc::now();
        if reminder.scheduled_for <= now {
            debug!(reminder_id = %reminder.id, "target time already passed, firing immediately");
            self.fire(&reminder.id);
            return;
        }

        let delay = (reminder.scheduled_for - now)
            .to_std()
            .unwrap_or_default();
        debug!(
            reminder_id = %reminder.id,
            delay_secs = delay.as_secs(),
            "armed reminder timer"
        );

        let scheduler = self.clone();
        let id = reminder.id.clone();
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            scheduler.inner.timers.lock().expect("timer lock poisoned").remove(&id);
            scheduler.fire(&id);
        });
        self.inner
            .timers
            .lock()
            .expect("timer lock poisoned")
            .insert(reminder.id.clone(), handle);
    }

    /// Abort the armed timer for the id, if any. No-op for unknown ids.
    pub fn cancel(&self, id: &str) {
        if let Some(handle) = self
            .inner
            .timers
            .lock()
            .expect("timer lock poisoned")
            .remove(id)
        {
            handle.abort();
            debug!(reminder_id = %id, "canceled armed timer");
        }
    }

    pub fn is_armed(&self, id: &str) -> bool {
        self.inner
            .timers
            .lock()
            .expect("timer lock poisoned")
            .contains_key(id)
    }

    pub fn armed_count(&self) -> usize {
        self.inner.timers.lock().expect("timer lock poisoned").len()
    }

    /// Fire any overdue pending reminder with no armed timer.
    ///
    /// Poll-based safety net for timers lost to a restart or an unavailable
    /// timer facility. Returns the number of reminders fired.
    pub fn sweep_overdue(&self) -> usize {
        let now = Utc::now();
        let mut fired = 0;
        for reminder in self.inner.store.list() {
            if reminder.is_overdue(now) && !self.is_armed(&reminder.id) {
                self.fire(&reminder.id);
                fired += 1;
            }
        }
        if fired > 0 {
            debug!(fired, "sweep fired overdue reminders");
        }
        fired
    }

    /// `pending → sent` plus delivery. Skips reminders the user already
    /// resolved between arming and elapse.
    ///
    /// The transition is a compare-and-set inside the store lock: a resolution
    /// or a concurrent fire landing first leaves the status alone, and only
    /// the caller whose closure performed the transition delivers.
    fn fire(&self, id: &str) {
        let Some(reminder) = self.inner.store.get(id) else {
            return;
        };
        if reminder.status != ReminderStatus::Pending {
            debug!(
                reminder_id = %id,
                status = %reminder.status,
                "skipping fire for non-pending reminder"
            );
            return;
        }

        let mut notification = None;
        self.inner.store.update(id, |r| {
            if r.status == ReminderStatus::Pending {
                r.status = ReminderStatus::Sent;
                notification = Some(Notification {
                    reminder_id: r.id.clone(),
                    title: r.title.clone(),
                    message: r.message.clone(),
                });
            }
        });
        match notification {
            Some(notification) => self.inner.dispatcher.dispatch(&notification),
            None => debug!(reminder_id = %id, "reminder resolved before fire, skipping delivery"),
        }
    }
}
