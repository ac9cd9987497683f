//! HTTP endpoint handlers

use std::path::PathBuf;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use serde::Deserialize;
use tracing::{error, info, warn};

use super::{
    responses::{ApiResponse, HealthResponse, StatusResponse},
    ApiContext,
};

/// Body of a duration update
#[derive(Debug, Deserialize)]
pub struct DurationRequest {
    pub minutes: u64,
}

/// Body of an audio source selection
#[derive(Debug, Deserialize)]
pub struct AudioRequest {
    pub path: PathBuf,
}

/// Handle POST /start - begin or resume the countdown
pub async fn start_handler(
    State(context): State<ApiContext>,
) -> Result<Json<ApiResponse>, StatusCode> {
    match context.timer.start() {
        Ok(timer) => {
            info!("Start endpoint called");
            Ok(Json(ApiResponse::running("Timer started".to_string(), timer)))
        }
        Err(e) => {
            error!("Failed to start timer: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle POST /pause - stop the countdown and persist the study total
pub async fn pause_handler(
    State(context): State<ApiContext>,
) -> Result<Json<ApiResponse>, StatusCode> {
    match context.timer.pause() {
        Ok(timer) => {
            info!("Pause endpoint called");
            Ok(Json(ApiResponse::paused("Timer paused".to_string(), timer)))
        }
        Err(e) => {
            error!("Failed to pause timer: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle POST /reset - return to an idle study phase and zero the total
pub async fn reset_handler(
    State(context): State<ApiContext>,
) -> Result<Json<ApiResponse>, StatusCode> {
    match context.timer.reset() {
        Ok(timer) => {
            info!("Reset endpoint called");
            Ok(Json(ApiResponse::paused("Timer reset".to_string(), timer)))
        }
        Err(e) => {
            error!("Failed to reset timer: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle POST /duration/:phase - update a phase duration
pub async fn duration_handler(
    State(context): State<ApiContext>,
    Path(phase): Path<String>,
    Json(request): Json<DurationRequest>,
) -> Result<Json<ApiResponse>, StatusCode> {
    let result = match phase.as_str() {
        "study" => context.timer.set_study_duration(request.minutes),
        "break" => context.timer.set_break_duration(request.minutes),
        other => {
            warn!("Unknown phase in duration update: {}", other);
            return Err(StatusCode::NOT_FOUND);
        }
    };

    match result {
        Ok(timer) => {
            info!("{} duration set to {} minutes", phase, request.minutes);
            Ok(Json(ApiResponse::new(
                "updated".to_string(),
                format!("{} duration set to {} minutes", phase, request.minutes),
                timer,
            )))
        }
        Err(e) => {
            warn!("Rejected {} duration update: {}", phase, e);
            Err(StatusCode::UNPROCESSABLE_ENTITY)
        }
    }
}

/// Handle POST /audio - select the audio source to play during study phases
pub async fn audio_handler(
    State(context): State<ApiContext>,
    Json(request): Json<AudioRequest>,
) -> Result<Json<ApiResponse>, StatusCode> {
    let timer = match context.timer.state() {
        Ok(timer) => timer,
        Err(e) => {
            error!("Failed to get timer state: {}", e);
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
    };

    if !tokio::fs::try_exists(&request.path).await.unwrap_or(false) {
        warn!("Audio source {} does not exist", request.path.display());
        return Ok(Json(ApiResponse::error(
            format!("audio source {} does not exist", request.path.display()),
            timer,
        )));
    }

    // A fresh source gets a fresh slate of playback warnings
    context.timer.clear_warnings();
    context.playback.set_source(request.path.clone());

    info!("Audio endpoint called with {}", request.path.display());
    Ok(Json(ApiResponse::new(
        "updated".to_string(),
        format!("audio source set to {}", request.path.display()),
        timer,
    )))
}

/// Handle GET /status - return the current timer status
pub async fn status_handler(
    State(context): State<ApiContext>,
) -> Result<Json<StatusResponse>, StatusCode> {
    let timer = match context.timer.state() {
        Ok(timer) => timer,
        Err(e) => {
            error!("Failed to get timer state: {}", e);
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
    };

    let durations = match context.timer.durations() {
        Ok(durations) => durations,
        Err(e) => {
            error!("Failed to get durations: {}", e);
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
    };

    Ok(Json(StatusResponse::build(
        &timer,
        &durations,
        context.timer.warnings(),
        context.timer.uptime(),
    )))
}

/// Handle GET /health - health check endpoint
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}
