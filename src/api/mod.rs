//! HTTP API module
//!
//! The control surface of the timer: start/pause/reset, duration updates,
//! audio source selection, and status.

pub mod handlers;
pub mod responses;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{services::PlaybackControl, state::PhaseTimer};
use handlers::*;

/// Shared handler context
#[derive(Clone)]
pub struct ApiContext {
    pub timer: Arc<PhaseTimer>,
    pub playback: Arc<dyn PlaybackControl>,
}

/// Create the HTTP router with all endpoints
pub fn create_router(context: ApiContext) -> Router {
    Router::new()
        .route("/start", post(start_handler))
        .route("/pause", post(pause_handler))
        .route("/reset", post(reset_handler))
        .route("/duration/:phase", post(duration_handler))
        .route("/audio", post(audio_handler))
        .route("/status", get(status_handler))
        .route("/health", get(health_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(context)
}
