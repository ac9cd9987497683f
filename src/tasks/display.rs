//! Display task: renders timer events into the log
//!
//! This is the presentation collaborator for a headless deployment. It owns
//! all formatting and wording; the timer core only hands it events.

use std::sync::Arc;

use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, info, warn};

use crate::{
    state::{Phase, PhaseTimer, TimerEvent},
    utils::format::{format_clock, format_study_total},
};

/// Subscribe to timer events and log them until the timer goes away
pub async fn display_task(timer: Arc<PhaseTimer>) {
    info!("Starting display task");

    let mut events = timer.subscribe();

    loop {
        match events.recv().await {
            Ok(TimerEvent::Tick { remaining_seconds, phase }) => {
                debug!("{} {} remaining", phase.label(), format_clock(remaining_seconds));
            }
            Ok(TimerEvent::PhaseChanged { phase }) => match phase {
                Phase::Study => info!("📚 {}", phase.label()),
                Phase::Break => info!("☕️ {}", phase.label()),
            },
            Ok(TimerEvent::StudyTotalChanged { total_seconds }) => {
                debug!("Total study time: {}", format_study_total(total_seconds));
            }
            Ok(TimerEvent::Warning { message }) => {
                warn!("Timer warning: {}", message);
            }
            Err(RecvError::Lagged(skipped)) => {
                warn!("Display task lagged, skipped {} events", skipped);
            }
            Err(RecvError::Closed) => {
                debug!("Event channel closed, display task exiting");
                break;
            }
        }
    }
}
