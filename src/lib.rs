//! Multi-Timer - ten independent countdown timers with desktop notifications
//! 
//! This library provides the timer state machine, the slot registry and its
//! control surface, throttled expiry notifications, and a terminal console
//! front end.

pub mod config;
pub mod console;
pub mod parser;
pub mod services;
pub mod state;
pub mod tasks;
pub mod utils;

// Re-export commonly used types
pub use config::Config;
pub use parser::{format_hms, parse_duration, ParseError};
pub use state::{TimerRegistry, SLOT_COUNT};
pub use utils::signals::shutdown_signal;
