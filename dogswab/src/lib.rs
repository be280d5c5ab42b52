//! Pet health reminder scheduling and care recommendation engine.
//!
//! The heart of the crate is the [`engine::ReminderEngine`]: it owns the
//! reminder store, arms one-shot timers, delivers notifications through a
//! channel abstraction, and extracts reminder suggestions from AI chat
//! responses. [`recommendations::HealthRecommendationEngine`] derives care
//! suggestions from pet records, and [`api`] exposes both over HTTP.

pub mod api;
pub mod config;
pub mod engine;
pub mod error;
pub mod extractor;
pub mod models;
pub mod notify;
pub mod persistence;
pub mod recommendations;
pub mod scheduler;
pub mod store;
