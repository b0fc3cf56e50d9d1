//! Router configuration.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers;
use crate::state::AppState;

/// Build the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/sync", post(handlers::sync))
        .route("/reconcile", post(handlers::reconcile))
        .route("/healthz", get(handlers::healthz))
        .with_state(state)
}
