//! Console command handlers

use std::sync::Arc;
use tokio::time::Instant;
use tracing::{error, info};

use super::{
    commands::{Command, HELP},
    render::render_board,
    responses::StatusResponse,
};
use crate::{
    parser::format_hms,
    state::{BoardSink, RegistryError, StartOutcome, TimerRegistry},
};

/// What the console loop should do after a command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Text(String),
    Quit,
}

/// Front end state: the registry it drives and the board it renders
#[derive(Debug)]
pub struct Console {
    registry: Arc<TimerRegistry>,
    board: Arc<BoardSink>,
    start_time: Instant,
}

impl Console {
    pub fn new(registry: Arc<TimerRegistry>, board: Arc<BoardSink>) -> Self {
        Self {
            registry,
            board,
            start_time: Instant::now(),
        }
    }

    pub fn registry(&self) -> &TimerRegistry {
        &self.registry
    }

    /// Execute one command; registry failures become error text
    pub fn handle(&self, command: Command) -> Reply {
        match self.dispatch(command) {
            Ok(reply) => reply,
            Err(e) => {
                error!("Command failed: {}", e);
                Reply::Text(format!("Error: {}", e))
            }
        }
    }

    fn dispatch(&self, command: Command) -> Result<Reply, RegistryError> {
        let text = match command {
            Command::Start { slot, duration, name } => self.start(slot, &duration, name)?,
            Command::Stop { slot } => {
                if self.registry.stop_timer(slot)? {
                    let remaining = self.registry.snapshot(slot)?.remaining_seconds;
                    format!("Timer {} stopped at {}", slot + 1, format_hms(remaining))
                } else {
                    format!("Timer {} is not running", slot + 1)
                }
            }
            Command::Clear { slot } => {
                self.registry.clear_timer(slot)?;
                format!("Timer {} cleared", slot + 1)
            }
            Command::Name { slot, name } => {
                if self.registry.rename(slot, &name)? {
                    info!("Renamed timer {} to {:?}", slot, name);
                    format!("Timer {} renamed to {}", slot + 1, name)
                } else {
                    format!("Cannot rename timer {} while it is running", slot + 1)
                }
            }
            Command::List => render_board(&self.registry.snapshots()?, &self.board.board()),
            Command::Json => {
                let status = StatusResponse::new(self.registry.snapshots()?, self.start_time.elapsed());
                serde_json::to_string_pretty(&status).unwrap_or_else(|e| format!("Error: {}", e))
            }
            Command::Help => HELP.to_string(),
            Command::Quit => return Ok(Reply::Quit),
        };
        Ok(Reply::Text(text))
    }

    fn start(&self, slot: usize, duration: &str, name: Option<String>) -> Result<String, RegistryError> {
        let name = match name {
            Some(name) => name,
            None => self.registry.snapshot(slot)?.name,
        };

        let text = match self.registry.start_timer(slot, &name, duration)? {
            StartOutcome::Started(secs) => format!("{} started for {}", name, format_hms(secs)),
            StartOutcome::AlreadyRunning => format!("Timer {} is already running", slot + 1),
            StartOutcome::ZeroDuration => "Duration must be greater than zero".to_string(),
            StartOutcome::InvalidInput => format!("Timer {}: Invalid input", slot + 1),
        };
        Ok(text)
    }
}
