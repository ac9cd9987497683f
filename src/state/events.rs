//! Timer event contract
//!
//! PhaseTimer broadcasts these to whatever presentation layer is listening;
//! the core never renders anything itself.

use serde::Serialize;

use super::Phase;

/// Events emitted by the timer core
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum TimerEvent {
    /// One second elapsed (or the display value changed while idle)
    Tick { remaining_seconds: u64, phase: Phase },
    /// The timer crossed zero and entered a new phase, or was reset
    PhaseChanged { phase: Phase },
    /// The cumulative study total changed
    StudyTotalChanged { total_seconds: u64 },
    /// A non-fatal problem the presentation layer should surface
    Warning { message: String },
}
