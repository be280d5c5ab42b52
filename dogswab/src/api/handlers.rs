use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;

use crate::error::{DogswabError, Result};
use crate::models::{NewReminder, Recommendation, Reminder};
use crate::notify::Notification;

use super::dto::{
    ConfirmSuggestionRequest, HealthData, ParseSuggestionsRequest, PermissionResponse,
    RecommendationsRequest, ScheduledReminder, SnoozeRequest, SuggestionsResponse,
};
use super::state::AppState;

/// `GET /api/v1/health`
pub async fn health_check(State(state): State<AppState>) -> Json<HealthData> {
    Json(HealthData {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        reminders: state.engine.reminders().len(),
        armed_timers: state.engine.armed_timers(),
    })
}

/// `POST /api/v1/reminders`
pub async fn schedule_reminder(
    State(state): State<AppState>,
    Json(new): Json<NewReminder>,
) -> Result<(StatusCode, Json<ScheduledReminder>)> {
    let id = state.engine.schedule_reminder(new)?;
    Ok((StatusCode::CREATED, Json(ScheduledReminder { id })))
}

/// `GET /api/v1/reminders`
pub async fn list_reminders(State(state): State<AppState>) -> Json<Vec<Reminder>> {
    Json(state.engine.reminders())
}

/// `GET /api/v1/reminders/pending`
pub async fn pending_reminders(State(state): State<AppState>) -> Json<Vec<Reminder>> {
    Json(state.engine.pending_reminders())
}

/// `GET /api/v1/reminders/{reminderId}`
pub async fn get_reminder(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Reminder>> {
    state
        .engine
        .get(&id)
        .map(Json)
        .ok_or_else(|| DogswabError::NotFound(format!("reminder {id} does not exist")))
}

/// `POST /api/v1/reminders/{reminderId}/complete`
///
/// Unknown ids are a silent no-op, matching the engine contract.
pub async fn complete_reminder(State(state): State<AppState>, Path(id): Path<String>) -> StatusCode {
    state.engine.mark_completed(&id);
    StatusCode::NO_CONTENT
}

/// `POST /api/v1/reminders/{reminderId}/dismiss`
pub async fn dismiss_reminder(State(state): State<AppState>, Path(id): Path<String>) -> StatusCode {
    state.engine.dismiss_reminder(&id);
    StatusCode::NO_CONTENT
}

/// `POST /api/v1/reminders/{reminderId}/snooze`
pub async fn snooze_reminder(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Option<Json<SnoozeRequest>>,
) -> StatusCode {
    let minutes = body
        .and_then(|Json(req)| req.minutes)
        .unwrap_or(state.config.reminders.default_snooze_minutes);
    state.engine.snooze_reminder(&id, Some(minutes));
    StatusCode::NO_CONTENT
}

/// `POST /api/v1/suggestions:parse`
pub async fn parse_suggestions(
    State(state): State<AppState>,
    Json(req): Json<ParseSuggestionsRequest>,
) -> Json<SuggestionsResponse> {
    let suggestions = state
        .engine
        .parse_response_for_reminders(&req.text, req.pet_id.as_deref());
    Json(SuggestionsResponse { suggestions })
}

/// `POST /api/v1/suggestions:confirm`
pub async fn confirm_suggestion(
    State(state): State<AppState>,
    Json(req): Json<ConfirmSuggestionRequest>,
) -> Result<(StatusCode, Json<ScheduledReminder>)> {
    let id = state
        .engine
        .schedule_suggestion(&req.suggestion, req.pet_id)?;
    Ok((StatusCode::CREATED, Json(ScheduledReminder { id })))
}

/// `POST /api/v1/recommendations:generate`
pub async fn generate_recommendations(
    State(state): State<AppState>,
    Json(req): Json<RecommendationsRequest>,
) -> Json<Vec<Recommendation>> {
    Json(state.recommendations.generate(&req.pet, &req.vet_history))
}

/// `POST /api/v1/notifications:drain`
///
/// Removes and returns queued in-app banners for display.
pub async fn drain_notifications(State(state): State<AppState>) -> Json<Vec<Notification>> {
    Json(state.engine.drain_in_app_notifications())
}

/// `POST /api/v1/notifications/permission`
pub async fn request_permission(State(state): State<AppState>) -> Json<PermissionResponse> {
    Json(PermissionResponse {
        granted: state.engine.request_notification_permission(),
    })
}
