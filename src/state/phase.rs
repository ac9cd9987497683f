//! The study/break phase dimension of the timer

use serde::{Deserialize, Serialize};

/// Which half of the study/break cycle the timer is currently in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Study,
    Break,
}

impl Phase {
    /// The phase entered when this one runs out
    pub fn flip(self) -> Self {
        match self {
            Phase::Study => Phase::Break,
            Phase::Break => Phase::Study,
        }
    }

    /// Human-readable status label for displays
    pub fn label(&self) -> &'static str {
        match self {
            Phase::Study => "Studying",
            Phase::Break => "On break",
        }
    }
}
