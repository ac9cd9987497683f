//! Timer state structure

use serde::{Deserialize, Serialize};

use super::Phase;

/// The single owned state record of the timer.
///
/// Mutated only by the PhaseTimer operations and the tick transition; never
/// destroyed, only reset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimerState {
    pub phase: Phase,
    pub remaining_seconds: u64,
    pub running: bool,
    /// Cumulative study time across pause/resume cycles, seeded from the
    /// persisted counter at startup.
    pub total_study_seconds: u64,
}

impl TimerState {
    /// Create the startup state: idle at the top of a study phase
    pub fn new(study_minutes: u64, total_study_seconds: u64) -> Self {
        Self {
            phase: Phase::Study,
            remaining_seconds: study_minutes * 60,
            running: false,
            total_study_seconds,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_idle_in_study_phase() {
        let state = TimerState::new(25, 90);
        assert_eq!(state.phase, Phase::Study);
        assert_eq!(state.remaining_seconds, 1500);
        assert!(!state.running);
        assert_eq!(state.total_study_seconds, 90);
    }
}
