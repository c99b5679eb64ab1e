//! Structured console output

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::state::TimerSnapshot;

/// Output of the `json` command
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub timers: Vec<TimerSnapshot>,
    pub uptime: String,
    pub timestamp: DateTime<Utc>,
}

impl StatusResponse {
    pub fn new(timers: Vec<TimerSnapshot>, uptime: Duration) -> Self {
        Self {
            timers,
            uptime: format_uptime(uptime),
            timestamp: Utc::now(),
        }
    }
}

/// Format an uptime as `1h 2m 3s`, dropping leading zero units
pub fn format_uptime(duration: Duration) -> String {
    let hours = duration.as_secs() / 3600;
    let minutes = (duration.as_secs() % 3600) / 60;
    let seconds = duration.as_secs() % 60;

    if hours > 0 {
        format!("{}h {}m {}s", hours, minutes, seconds)
    } else if minutes > 0 {
        format!("{}m {}s", minutes, seconds)
    } else {
        format!("{}s", seconds)
    }
}
