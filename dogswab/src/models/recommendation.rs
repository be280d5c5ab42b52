use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Category of a generated care recommendation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationType {
    VaccinationDue,
    CheckupReminder,
    MedicationRefill,
    HealthTip,
    DietaryAdvice,
    ExerciseSuggestion,
    PreventiveCare,
}

/// Display urgency. Ordered so that sorting ascending puts `High` first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecommendationStatus {
    Active,
    Completed,
    Dismissed,
}

/// A care suggestion derived from a pet record and its vet history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recommendation {
    pub id: String,
    pub pet_id: String,
    pub recommendation_type: RecommendationType,
    pub title: String,
    pub description: String,
    pub priority: Priority,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
    pub status: RecommendationStatus,
    pub generated_at: DateTime<Utc>,
    /// Rule inputs that produced this recommendation, for UI display.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_data: Option<serde_json::Value>,
}
