//! WMTS KVP to RESTful proxy service library.
//!
//! Translates OGC WMTS KVP requests into RESTful paths and forwards them to a
//! RESTful-only tile backend.

pub mod capabilities;
pub mod config;
pub mod forward;
pub mod handlers;
pub mod metrics;
pub mod state;

use std::sync::Arc;

use axum::{extract::Extension, routing::get, Router};
use tower_http::trace::TraceLayer;

use state::AppState;

/// Build the service router.
pub fn router(state: Arc<AppState>) -> Router {
    let logging = state.config.logging;

    let app = Router::new()
        // Health check
        .route("/health", get(handlers::health_handler))
        // Metrics
        .route("/metrics", get(handlers::metrics_handler))
        // Everything else is a (potential) WMTS KVP request
        .fallback(handlers::kvp_handler)
        .layer(Extension(state));

    if logging {
        app.layer(TraceLayer::new_for_http())
    } else {
        app
    }
}
