//! The periodic tick source
//!
//! Exactly one of these runs while the timer is running. `start()` spawns it,
//! `pause()`/`reset()` cancel it; a tick that arrives after a pause observes
//! the stopped state and applies nothing.

use std::{sync::Arc, time::Duration};

use tokio::sync::watch;
use tracing::debug;

use crate::state::PhaseTimer;

/// Drive the timer forward one second at a time until canceled
pub async fn ticker_task(timer: Arc<PhaseTimer>, mut cancel: watch::Receiver<bool>) {
    debug!("Ticker started");

    let mut interval = tokio::time::interval(Duration::from_secs(1));
    // The first interval tick completes immediately; consume it so the
    // countdown only moves after a full second has elapsed
    interval.tick().await;

    loop {
        tokio::select! {
            _ = interval.tick() => {
                if !timer.tick() {
                    debug!("Timer no longer running, ticker exiting");
                    break;
                }
            }
            _ = cancel.changed() => {
                debug!("Ticker canceled");
                break;
            }
        }
    }
}
