//! API response structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    state::{Durations, Phase, TimerState},
    utils::format::{format_clock, format_study_total},
};

/// API response structure for the control endpoints
#[derive(Debug, Clone, Serialize)]
pub struct ApiResponse {
    pub status: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub timer: TimerState,
}

impl ApiResponse {
    /// Create a new API response
    pub fn new(status: String, message: String, timer: TimerState) -> Self {
        Self {
            status,
            message,
            timestamp: Utc::now(),
            timer,
        }
    }

    /// Create a response for a running timer
    pub fn running(message: String, timer: TimerState) -> Self {
        Self::new("running".to_string(), message, timer)
    }

    /// Create a response for a paused timer
    pub fn paused(message: String, timer: TimerState) -> Self {
        Self::new("paused".to_string(), message, timer)
    }

    /// Create an error response
    pub fn error(message: String, timer: TimerState) -> Self {
        Self::new("error".to_string(), message, timer)
    }
}

/// Full status response: the rendered display plus the raw state
#[derive(Debug, Clone, Serialize)]
pub struct StatusResponse {
    pub phase: Phase,
    pub phase_label: &'static str,
    pub running: bool,
    pub remaining_seconds: u64,
    /// Remaining time rendered as "MM:SS"
    pub clock: String,
    pub total_study_seconds: u64,
    /// Cumulative study time rendered as "HHh MMm"
    pub total_study: String,
    pub study_minutes: u64,
    pub break_minutes: u64,
    pub warnings: Vec<String>,
    pub uptime: String,
}

impl StatusResponse {
    pub fn build(state: &TimerState, durations: &Durations, warnings: Vec<String>, uptime: String) -> Self {
        Self {
            phase: state.phase,
            phase_label: state.phase.label(),
            running: state.running,
            remaining_seconds: state.remaining_seconds,
            clock: format_clock(state.remaining_seconds),
            total_study_seconds: state.total_study_seconds,
            total_study: format_study_total(state.total_study_seconds),
            study_minutes: durations.study_minutes,
            break_minutes: durations.break_minutes,
            warnings,
            uptime,
        }
    }
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
}

impl HealthResponse {
    /// Create a new health response
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            timestamp: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_renders_the_display_strings() {
        let state = TimerState {
            phase: Phase::Break,
            remaining_seconds: 300,
            running: true,
            total_study_seconds: 9000,
        };
        let durations = Durations { study_minutes: 25, break_minutes: 5 };

        let status = StatusResponse::build(&state, &durations, Vec::new(), "5m 3s".to_string());
        assert_eq!(status.clock, "05:00");
        assert_eq!(status.total_study, "02h 30m");
        assert_eq!(status.phase_label, "On break");
        assert_eq!(status.study_minutes, 25);
    }
}
