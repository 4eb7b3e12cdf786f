//! HTTP surface of the task list.
//!
//! JSON over REST, one router, shared state holding the task store and the
//! calendar client. All task field names are camelCase on the wire.

pub mod calendar;
pub mod health;
pub mod tasks;

use crate::api::calendar::Calendar;
use crate::db::tasks::Tasks;
use crate::libs::config::CalendarConfig;
use axum::routing::{get, put};
use axum::Router;
use parking_lot::Mutex;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Shared application state.
///
/// The store is guarded by a mutex rather than a pool: a single-user task
/// list sees no meaningful contention, and the store's transactions need
/// exclusive access anyway.
#[derive(Clone)]
pub struct AppState {
    pub tasks: Arc<Mutex<Tasks>>,
    pub calendar: Arc<Calendar>,
}

impl AppState {
    pub fn new(tasks: Tasks, calendar_config: &CalendarConfig) -> Self {
        AppState {
            tasks: Arc::new(Mutex::new(tasks)),
            calendar: Arc::new(Calendar::new(calendar_config)),
        }
    }
}

/// Create the combined router.
///
/// The static `/api/tasks/reorder` route must coexist with the
/// `/api/tasks/{id}` capture; axum prioritizes the static segment.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/api/tasks", get(tasks::list).post(tasks::create))
        .route("/api/tasks/reorder", put(tasks::bulk_reorder))
        .route("/api/tasks/{id}", get(tasks::get_one).put(tasks::update).delete(tasks::remove))
        .route("/api/tasks/{id}/reorder", put(tasks::move_one))
        .route("/api/calendar/events", get(calendar::list_events))
        .layer(TraceLayer::new_for_http())
        // The frontend is served from a different origin.
        .layer(CorsLayer::permissive())
        .with_state(state)
}
