use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use super::handlers;
use super::state::AppState;

pub fn create_router(state: AppState) -> Router {
    let reminders = Router::new()
        .route(
            "/",
            get(handlers::list_reminders).post(handlers::schedule_reminder),
        )
        .route("/pending", get(handlers::pending_reminders))
        .route("/{reminderId}", get(handlers::get_reminder))
        .route("/{reminderId}/complete", post(handlers::complete_reminder))
        .route("/{reminderId}/dismiss", post(handlers::dismiss_reminder))
        .route("/{reminderId}/snooze", post(handlers::snooze_reminder));

    Router::new()
        .route("/api/v1/health", get(handlers::health_check))
        .nest("/api/v1/reminders", reminders)
        .route(
            "/api/v1/suggestions:parse",
            post(handlers::parse_suggestions),
        )
        .route(
            "/api/v1/suggestions:confirm",
            post(handlers::confirm_suggestion),
        )
        .route(
            "/api/v1/recommendations:generate",
            post(handlers::generate_recommendations),
        )
        .route(
            "/api/v1/notifications:drain",
            post(handlers::drain_notifications),
        )
        .route(
            "/api/v1/notifications/permission",
            post(handlers::request_permission),
        )
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
