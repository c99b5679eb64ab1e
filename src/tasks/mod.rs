//! Background tasks module
//! 
//! This module contains the per-timer countdown task and the periodic expiry
//! sweeper.

pub mod countdown;
pub mod expiry_sweeper;

// Re-export main functions
pub use countdown::{countdown_task, CountdownRun};
pub use expiry_sweeper::expiry_sweeper_task;
