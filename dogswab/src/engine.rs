use std::sync::{Arc, Mutex};

use chrono::{Duration, Utc};
use tracing::{debug, info};

use crate::error::{DogswabError, Result};
use crate::extractor::SuggestionExtractor;
use crate::models::{NewReminder, Reminder, ReminderStatus, ReminderSuggestion};
use crate::notify::{Notification, NotificationDispatcher};
use crate::persistence::ReminderRepository;
use crate::scheduler::ReminderScheduler;
use crate::store::{ReminderStore, Subscription};

pub const DEFAULT_SNOOZE_MINUTES: i64 = 10;

/// The single integration surface for reminders: composes the store, the
/// scheduler, the extractor and the notification dispatcher.
///
/// All mutations on unknown ids are silent no-ops; the engine contains its
/// failures rather than propagating them to callers.
pub struct ReminderEngine {
    store: Arc<ReminderStore>,
    scheduler: ReminderScheduler,
    dispatcher: Arc<NotificationDispatcher>,
    extractor: SuggestionExtractor,
    repository: Option<Arc<dyn ReminderRepository>>,
    persist_guard: Mutex<Option<Subscription>>,
}

impl ReminderEngine {
    pub fn new(dispatcher: Arc<NotificationDispatcher>) -> Self {
        let store = ReminderStore::new();
        let scheduler = ReminderScheduler::new(store.clone(), dispatcher.clone());
        Self {
            store,
            scheduler,
            dispatcher,
            extractor: SuggestionExtractor::new(),
            repository: None,
            persist_guard: Mutex::new(None),
        }
    }

    pub fn with_repository(
        dispatcher: Arc<NotificationDispatcher>,
        repository: Arc<dyn ReminderRepository>,
    ) -> Self {
        let mut engine = Self::new(dispatcher);
        engine.repository = Some(repository);
        engine
    }

    /// Load the persisted snapshot, re-arm timers for pending reminders and
    /// fire any whose target time elapsed while the process was down. Must be
    /// called before new reminders are scheduled. Returns the restored count.
    pub fn restore(&self) -> Result<usize> {
        let Some(repository) = &self.repository else {
            self.attach_persistence();
            return Ok(0);
        };

        let reminders = repository.load()?;
        let count = reminders.len();
        for reminder in &reminders {
            self.store.add(reminder.clone());
        }
        // Subscribe before arming: overdue reminders fire inside arm, and that
        // transition must reach the snapshot or the next restart fires it again.
        self.attach_persistence();
        for reminder in &reminders {
            if reminder.status == ReminderStatus::Pending {
                // Overdue reminders fire synchronously inside arm.
                self.scheduler.arm(reminder);
            }
        }
        if count > 0 {
            info!(count, "restored persisted reminders");
        }
        Ok(count)
    }

    /// Persist a snapshot after every store mutation from here on.
    fn attach_persistence(&self) {
        let Some(repository) = &self.repository else {
            return;
        };
        let repository = repository.clone();
        let subscription = self.store.subscribe(move |reminders| {
            if let Err(e) = repository.save(reminders) {
                tracing::error!(error = %e, "failed to persist reminder snapshot");
            }
        });
        *self
            .persist_guard
            .lock()
            .expect("persistence guard lock poisoned") = Some(subscription);
    }

    /// Create a reminder and arm its timer. Returns the generated id.
    ///
    /// A `scheduled_for` in the past fires within this call.
    pub fn schedule_reminder(&self, new: NewReminder) -> Result<String> {
        if new.title.trim().is_empty() {
            return Err(DogswabError::Validation("reminder title is required".into()));
        }
        if new.message.trim().is_empty() {
            return Err(DogswabError::Validation(
                "reminder message is required".into(),
            ));
        }

        let reminder = Reminder::new(new);
        let id = reminder.id.clone();
        debug!(
            reminder_id = %id,
            scheduled_for = %reminder.scheduled_for,
            "scheduling reminder"
        );
        self.store.add(reminder.clone());
        self.scheduler.arm(&reminder);
        Ok(id)
    }

    /// Turn a confirmed suggestion candidate into a scheduled reminder.
    pub fn schedule_suggestion(
        &self,
        suggestion: &ReminderSuggestion,
        pet_id: Option<String>,
    ) -> Result<String> {
        self.schedule_reminder(NewReminder {
            title: suggestion.title.clone(),
            message: suggestion.message.clone(),
            pet_id,
            scheduled_for: Utc::now() + Duration::minutes(suggestion.time_in_minutes),
            reminder_type: suggestion.reminder_type,
        })
    }

    pub fn mark_completed(&self, id: &str) {
        self.scheduler.cancel(id);
        let found = self.store.update(id, |r| {
            if r.status.is_open() {
                r.status = ReminderStatus::Completed;
            }
        });
        if !found {
            debug!(reminder_id = %id, "ignoring complete for unknown reminder");
        }
    }

    pub fn dismiss_reminder(&self, id: &str) {
        self.scheduler.cancel(id);
        let found = self.store.update(id, |r| {
            if r.status.is_open() {
                r.status = ReminderStatus::Dismissed;
            }
        });
        if !found {
            debug!(reminder_id = %id, "ignoring dismiss for unknown reminder");
        }
    }

    /// Push the reminder back to `pending` with a new target time of now plus
    /// `minutes` (default 10) and arm a replacement timer. Repeated snoozes
    /// each replace the previous timer.
    pub fn snooze_reminder(&self, id: &str, minutes: Option<i64>) {
        let minutes = minutes.unwrap_or(DEFAULT_SNOOZE_MINUTES);
        self.scheduler.cancel(id);

        let mut snoozed: Option<Reminder> = None;
        self.store.update(id, |r| {
            if r.status.is_open() {
                r.scheduled_for = Utc::now() + Duration::minutes(minutes);
                r.status = ReminderStatus::Pending;
                snoozed = Some(r.clone());
            }
        });

        match snoozed {
            Some(reminder) => {
                debug!(reminder_id = %id, minutes, "snoozed reminder");
                self.scheduler.arm(&reminder);
            }
            None => debug!(reminder_id = %id, "ignoring snooze for unknown or resolved reminder"),
        }
    }

    /// All reminders, ordered by `scheduled_for` ascending.
    pub fn reminders(&self) -> Vec<Reminder> {
        self.store.list()
    }

    /// Pending reminders with a future target time.
    pub fn pending_reminders(&self) -> Vec<Reminder> {
        self.store.list_pending()
    }

    pub fn get(&self, id: &str) -> Option<Reminder> {
        self.store.get(id)
    }

    /// Register a change callback; see [`ReminderStore::subscribe`].
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&[Reminder]) + Send + Sync + 'static,
    {
        self.store.subscribe(callback)
    }

    /// Negotiate notification permission with the host platform. Idempotent;
    /// a previous denial is cached and not re-prompted.
    pub fn request_notification_permission(&self) -> bool {
        self.dispatcher.request_permission()
    }

    /// Extract reminder suggestion candidates from an AI chat response.
    pub fn parse_response_for_reminders(
        &self,
        text: &str,
        pet_id: Option<&str>,
    ) -> Vec<ReminderSuggestion> {
        self.extractor.extract(text, pet_id)
    }

    /// Fire overdue pending reminders whose timers were lost; see
    /// [`ReminderScheduler::sweep_overdue`].
    pub fn run_sweep(&self) -> usize {
        self.scheduler.sweep_overdue()
    }

    pub fn armed_timers(&self) -> usize {
        self.scheduler.armed_count()
    }

    /// Notifications delivered through the in-app fallback channel so far.
    pub fn in_app_notifications(&self) -> Vec<Notification> {
        self.dispatcher.fallback().delivered()
    }

    /// Remove and return buffered in-app notifications, for display.
    pub fn drain_in_app_notifications(&self) -> Vec<Notification> {
        self.dispatcher.fallback().drain()
    }
}
