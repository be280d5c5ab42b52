//! Wire types for the v1 reminder API.
//!
//! Reminder and recommendation bodies reuse the model types directly; the
//! DTOs here cover request envelopes and small response wrappers.

use serde::{Deserialize, Serialize};

use crate::models::{Pet, ReminderSuggestion, VetVisit};

#[derive(Debug, Clone, Serialize)]
pub struct ScheduledReminder {
    pub id: String,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct SnoozeRequest {
    /// Snooze duration in minutes; falls back to the configured default.
    #[serde(default)]
    pub minutes: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ParseSuggestionsRequest {
    /// Raw AI chat response text.
    pub text: String,
    #[serde(default)]
    pub pet_id: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SuggestionsResponse {
    pub suggestions: Vec<ReminderSuggestion>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ConfirmSuggestionRequest {
    pub suggestion: ReminderSuggestion,
    #[serde(default)]
    pub pet_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RecommendationsRequest {
    pub pet: Pet,
    #[serde(default)]
    pub vet_history: Vec<VetVisit>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PermissionResponse {
    pub granted: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthData {
    pub status: String,
    pub version: String,
    pub reminders: usize,
    pub armed_timers: usize,
}
