//! Background tasks module
//!
//! This module contains tasks that run alongside the HTTP server: the one
//! periodic tick source and the log-rendering display loop.

pub mod display;
pub mod ticker;

// Re-export main functions
pub use display::display_task;
pub use ticker::ticker_task;
