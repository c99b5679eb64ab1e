//! State management module
//! 
//! This module contains the timer state machine, the slot registry that owns
//! the timers, and the display sink they report to.

pub mod display;
pub mod registry;
pub mod timer_state;

// Re-export main types
pub use display::{Board, BoardSink, Display, DisplaySink};
pub use registry::{RegistryError, StartOutcome, TimerRegistry, SLOT_COUNT};
pub use timer_state::{StartRejection, Tick, Timer, TimerPhase, TimerSnapshot};
