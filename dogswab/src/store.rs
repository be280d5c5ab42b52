use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, Weak};

use chrono::Utc;

use crate::models::{Reminder, ReminderStatus};

type SubscriberFn = dyn Fn(&[Reminder]) + Send + Sync;

/// Handle returned by [`ReminderStore::subscribe`]. Dropping it unregisters
/// the callback.
pub struct Subscription {
    id: u64,
    store: Weak<ReminderStore>,
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(store) = self.store.upgrade() {
            store.remove_subscriber(self.id);
        }
    }
}

/// Canonical in-memory collection of reminders.
///
/// Every mutation synchronously invokes all subscribers, in registration
/// order, with a post-mutation snapshot sorted by `scheduled_for`. Resolved
/// reminders are retained; nothing is ever deleted from the store.
pub struct ReminderStore {
    reminders: Mutex<Vec<Reminder>>,
    subscribers: Mutex<Vec<(u64, Arc<SubscriberFn>)>>,
    next_subscriber_id: AtomicU64,
}

impl ReminderStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            reminders: Mutex::new(Vec::new()),
            subscribers: Mutex::new(Vec::new()),
            next_subscriber_id: AtomicU64::new(0),
        })
    }

    pub fn add(&self, reminder: Reminder) {
        {
            let mut reminders = self.reminders.lock().expect("reminder store lock poisoned");
            reminders.push(reminder);
        }
        self.notify();
    }

    /// Apply a partial mutation to the reminder with the given id.
    ///
    /// Returns `false` without notifying subscribers when the id is unknown.
    /// Unknown-id mutations are deliberately silent; callers may log them.
    pub fn update<F>(&self, id: &str, patch: F) -> bool
    where
        F: FnOnce(&mut Reminder),
    {
        let found = {
            let mut reminders = self.reminders.lock().expect("reminder store lock poisoned");
            match reminders.iter_mut().find(|r| r.id == id) {
                Some(reminder) => {
                    patch(reminder);
                    true
                }
                None => false,
            }
        };
        if found {
            self.notify();
        }
        found
    }

    pub fn get(&self, id: &str) -> Option<Reminder> {
        self.reminders
            .lock()
            .expect("reminder store lock poisoned")
            .iter()
            .find(|r| r.id == id)
            .cloned()
    }

    /// All reminders ordered by `scheduled_for` ascending.
    pub fn list(&self) -> Vec<Reminder> {
        let mut reminders = self
            .reminders
            .lock()
            .expect("reminder store lock poisoned")
            .clone();
        reminders.sort_by_key(|r| r.scheduled_for);
        reminders
    }

    /// Pending reminders whose target time has not yet passed.
    pub fn list_pending(&self) -> Vec<Reminder> {
        let now = Utc::now();
        self.list()
            .into_iter()
            .filter(|r| r.status == ReminderStatus::Pending && r.scheduled_for > now)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.reminders
            .lock()
            .expect("reminder store lock poisoned")
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Register a callback invoked with the full sorted list after every
    /// mutation. The callback stays registered until the returned handle is
    /// dropped.
    pub fn subscribe<F>(self: &Arc<Self>, callback: F) -> Subscription
    where
        F: Fn(&[Reminder]) + Send + Sync + 'static,
    {
        let id = self.next_subscriber_id.fetch_add(1, Ordering::Relaxed);
        self.subscribers
            .lock()
            .expect("subscriber lock poisoned")
            .push((id, Arc::new(callback)));
        Subscription {
            id,
            store: Arc::downgrade(self),
        }
    }

    fn remove_subscriber(&self, id: u64) {
        self.subscribers
            .lock()
            .expect("subscriber lock poisoned")
            .retain(|(sub_id, _)| *sub_id != id);
    }

    fn notify(&self) {
        let snapshot = self.list();
        // Clone the callback list out of the lock so a callback may call back
        // into the store without deadlocking.
        let subscribers: Vec<Arc<SubscriberFn>> = self
            .subscribers
            .lock()
            .expect("subscriber lock poisoned")
            .iter()
            .map(|(_, f)| f.clone())
            .collect();
        for subscriber in subscribers {
            subscriber(&snapshot);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{NewReminder, ReminderType};
    use chrono::Duration;
    use std::sync::atomic::AtomicUsize;

    fn reminder_in(minutes: i64) -> Reminder {
        Reminder::new(NewReminder {
            title: "Checkup".to_string(),
            message: "Check on Rex".to_string(),
            pet_id: None,
            scheduled_for: Utc::now() + Duration::minutes(minutes),
            reminder_type: ReminderType::Checkup,
        })
    }

    #[test]
    fn test_list_sorted_by_scheduled_for() {
        let store = ReminderStore::new();
        let late = reminder_in(60);
        let early = reminder_in(5);
        store.add(late.clone());
        store.add(early.clone());

        let listed = store.list();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].id, early.id);
        assert_eq!(listed[1].id, late.id);
    }

    #[test]
    fn test_list_pending_excludes_sent_and_past() {
        let store = ReminderStore::new();
        let future = reminder_in(30);
        let past = reminder_in(-30);
        let mut sent = reminder_in(45);
        sent.status = ReminderStatus::Sent;
        store.add(future.clone());
        store.add(past);
        store.add(sent);

        let pending = store.list_pending();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].id, future.id);
    }

    #[test]
    fn test_update_unknown_id_is_noop() {
        let store = ReminderStore::new();
        store.add(reminder_in(10));

        let notified = Arc::new(AtomicUsize::new(0));
        let counter = notified.clone();
        let _sub = store.subscribe(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        let found = store.update("missing", |r| r.status = ReminderStatus::Completed);
        assert!(!found);
        assert_eq!(notified.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_subscribers_see_post_mutation_state_in_order() {
        let store = ReminderStore::new();
        let order = Arc::new(Mutex::new(Vec::new()));

        let first = order.clone();
        let _a = store.subscribe(move |reminders| {
            first.lock().unwrap().push(("first", reminders.len()));
        });
        let second = order.clone();
        let _b = store.subscribe(move |reminders| {
            second.lock().unwrap().push(("second", reminders.len()));
        });

        store.add(reminder_in(10));

        let seen = order.lock().unwrap().clone();
        assert_eq!(seen, vec![("first", 1), ("second", 1)]);
    }

    #[test]
    fn test_dropping_subscription_unregisters() {
        let store = ReminderStore::new();
        let count = Arc::new(AtomicUsize::new(0));

        let counter = count.clone();
        let sub = store.subscribe(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        store.add(reminder_in(10));
        assert_eq!(count.load(Ordering::SeqCst), 1);

        drop(sub);
        store.add(reminder_in(20));
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_subscriber_may_read_store_reentrantly() {
        let store = ReminderStore::new();
        let seen = Arc::new(AtomicUsize::new(0));

        let inner = store.clone();
        let counter = seen.clone();
        let _sub = store.subscribe(move |_| {
            counter.store(inner.list().len(), Ordering::SeqCst);
        });

        store.add(reminder_in(10));
        assert_eq!(seen.load(Ordering::SeqCst), 1);
    }
}
