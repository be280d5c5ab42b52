use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;

use crate::error::Result;
use crate::models::Reminder;

/// Durable storage for the full reminder list.
///
/// The engine saves a complete snapshot after every mutation and loads it
/// once on startup to re-arm timers that a restart discarded.
pub trait ReminderRepository: Send + Sync {
    fn load(&self) -> Result<Vec<Reminder>>;
    fn save(&self, reminders: &[Reminder]) -> Result<()>;
}

/// JSON file snapshot of the reminder list.
///
/// Writes go through a temp file rename so a crash mid-write never leaves a
/// truncated snapshot.
pub struct JsonFileRepository {
    path: PathBuf,
}

impl JsonFileRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ReminderRepository for JsonFileRepository {
    fn load(&self) -> Result<Vec<Reminder>> {
        match fs::read_to_string(&self.path) {
            Ok(raw) => Ok(serde_json::from_str(&raw)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(e.into()),
        }
    }

    fn save(&self, reminders: &[Reminder]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let raw = serde_json::to_vec_pretty(reminders)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, raw)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

/// Keeps snapshots in memory only. Used in tests and ephemeral deployments.
#[derive(Default)]
pub struct InMemoryRepository {
    reminders: Mutex<Vec<Reminder>>,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_reminders(reminders: Vec<Reminder>) -> Self {
        Self {
            reminders: Mutex::new(reminders),
        }
    }
}

impl ReminderRepository for InMemoryRepository {
    fn load(&self) -> Result<Vec<Reminder>> {
        Ok(self
            .reminders
            .lock()
            .expect("repository lock poisoned")
            .clone())
    }

    fn save(&self, reminders: &[Reminder]) -> Result<()> {
        *self.reminders.lock().expect("repository lock poisoned") = reminders.to_vec();
        Ok(())
    }
}
