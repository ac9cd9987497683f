//! External collaborators module
//!
//! The timer core only issues commands at these seams; what actually happens
//! (which player binary runs, whether audio comes out) is not its concern.

pub mod playback;

// Re-export main types
pub use playback::{CommandPlayer, PlaybackControl};
