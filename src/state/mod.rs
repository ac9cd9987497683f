//! State management module
//!
//! This module contains the timer state record, the phase dimension, the event
//! contract, and the PhaseTimer that owns all of them.

pub mod events;
pub mod phase;
pub mod phase_timer;
pub mod timer_state;

// Re-export main types
pub use events::TimerEvent;
pub use phase::Phase;
pub use phase_timer::{Durations, PhaseTimer};
pub use timer_state::TimerState;
