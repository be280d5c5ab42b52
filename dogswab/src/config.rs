use serde::Deserialize;
use std::env;

fn parse_env_or<T: std::str::FromStr>(var: &str, default: T) -> T
where
    T::Err: std::fmt::Display,
{
    match env::var(var) {
        Ok(val) => match val.parse() {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::warn!("Invalid value '{}' for {}: {}. Using default.", val, var, e);
                default
            }
        },
        Err(_) => default,
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub reminders: ReminderConfig,
    pub persistence: PersistenceConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReminderConfig {
    /// Default snooze offset when a snooze request carries no duration.
    pub default_snooze_minutes: i64,
    /// Interval of the overdue-reminder sweep task.
    pub sweep_interval_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PersistenceConfig {
    /// Path of the JSON reminder snapshot. Unset means in-memory only.
    pub path: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: env::var("DOGSWAB_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: parse_env_or("DOGSWAB_PORT", 3000),
            },
            reminders: ReminderConfig {
                default_snooze_minutes: parse_env_or("REMINDER_SNOOZE_MINUTES", 10),
                sweep_interval_secs: parse_env_or("REMINDER_SWEEP_INTERVAL", 60),
            },
            persistence: PersistenceConfig {
                path: env::var("REMINDER_STORE_PATH").ok(),
            },
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::default()
    }
}
