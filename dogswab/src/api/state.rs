use std::sync::Arc;

use crate::config::Config;
use crate::engine::ReminderEngine;
use crate::recommendations::HealthRecommendationEngine;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub engine: Arc<ReminderEngine>,
    pub recommendations: Arc<HealthRecommendationEngine>,
}

impl AppState {
    pub fn new(config: Config, engine: Arc<ReminderEngine>) -> Self {
        Self {
            config: Arc::new(config),
            engine,
            recommendations: Arc::new(HealthRecommendationEngine::new()),
        }
    }
}
