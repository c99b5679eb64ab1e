//! Single countdown timer state machine

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use super::display::Display;

/// Lifecycle phase of a timer; exactly one holds at any time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerPhase {
    Idle,
    Running,
    Expired,
}

/// Result of a countdown poll
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    /// Still counting down with this many seconds left
    Counting(u64),
    /// This tick moved the timer into `Expired`
    Expired,
    /// The run that polled is no longer the active one
    Stale,
}

/// Why a start request did not begin a countdown
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartRejection {
    AlreadyRunning,
    ZeroDuration,
}

/// One countdown slot.
///
/// `remaining` is derived from the instant the run started, so a late or
/// skipped poll never accumulates drift.
#[derive(Debug)]
pub struct Timer {
    index: usize,
    name: String,
    duration: u64,
    remaining: u64,
    phase: TimerPhase,
    started_at: Option<Instant>,
    last_notified: Option<Instant>,
    last_notified_at: Option<DateTime<Utc>>,
    run: Option<CancellationToken>,
    /// Bumped on every change that alters what the timer displays
    revision: u64,
}

impl Timer {
    /// Create an idle timer for `index` with its default label
    pub fn new(index: usize) -> Self {
        Self {
            index,
            name: format!("Timer {}", index + 1),
            duration: 0,
            remaining: 0,
            phase: TimerPhase::Idle,
            started_at: None,
            last_notified: None,
            last_notified_at: None,
            run: None,
            revision: 0,
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn duration(&self) -> u64 {
        self.duration
    }

    pub fn remaining(&self) -> u64 {
        self.remaining
    }

    pub fn phase(&self) -> TimerPhase {
        self.phase
    }

    pub fn is_running(&self) -> bool {
        self.phase == TimerPhase::Running
    }

    pub fn is_expired(&self) -> bool {
        self.phase == TimerPhase::Expired
    }

    pub fn last_notified(&self) -> Option<Instant> {
        self.last_notified
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// What the slot should show for the current state
    pub fn display(&self) -> Display {
        match self.phase {
            TimerPhase::Expired => Display::Expired,
            TimerPhase::Idle | TimerPhase::Running => Display::Remaining(self.remaining),
        }
    }

    /// Change the label; refused while the countdown is running
    pub fn rename(&mut self, name: &str) -> bool {
        if self.is_running() {
            return false;
        }
        self.name = name.to_string();
        true
    }

    /// Begin a countdown of `duration` seconds.
    ///
    /// Returns the cancellation token of the new run. Starting from
    /// `Expired` re-arms the timer.
    pub fn start(&mut self, name: &str, duration: u64, now: Instant) -> Result<CancellationToken, StartRejection> {
        if self.is_running() {
            return Err(StartRejection::AlreadyRunning);
        }
        if duration == 0 {
            return Err(StartRejection::ZeroDuration);
        }

        let token = CancellationToken::new();
        self.name = name.to_string();
        self.duration = duration;
        self.remaining = duration;
        self.phase = TimerPhase::Running;
        self.started_at = Some(now);
        self.run = Some(token.clone());
        self.revision += 1;
        Ok(token)
    }

    /// Halt a running countdown, keeping `remaining` as last computed
    pub fn stop(&mut self) -> bool {
        if !self.is_running() {
            return false;
        }
        self.cancel_run();
        self.phase = TimerPhase::Idle;
        self.revision += 1;
        true
    }

    /// Reset to an idle, zero-length timer from any phase
    pub fn clear(&mut self) {
        self.cancel_run();
        self.duration = 0;
        self.remaining = 0;
        self.phase = TimerPhase::Idle;
        self.revision += 1;
    }

    /// Recompute `remaining` for the run identified by `token`
    pub fn tick(&mut self, token: &CancellationToken, now: Instant) -> Tick {
        if !self.is_running() || token.is_cancelled() {
            return Tick::Stale;
        }
        let Some(started_at) = self.started_at else {
            return Tick::Stale;
        };

        let elapsed = now.saturating_duration_since(started_at).as_secs();
        self.remaining = self.duration.saturating_sub(elapsed);
        self.revision += 1;

        if self.remaining == 0 {
            self.phase = TimerPhase::Expired;
            self.started_at = None;
            self.run = None;
            Tick::Expired
        } else {
            Tick::Counting(self.remaining)
        }
    }

    /// Whether the throttle window since the last notification has passed
    pub fn notification_due(&self, now: Instant, throttle: Duration) -> bool {
        match self.last_notified {
            None => true,
            Some(at) => now.saturating_duration_since(at) >= throttle,
        }
    }

    pub fn mark_notified(&mut self, now: Instant) {
        self.last_notified = Some(now);
        self.last_notified_at = Some(Utc::now());
    }

    /// Point-in-time copy for rendering and JSON output
    pub fn snapshot(&self) -> TimerSnapshot {
        TimerSnapshot {
            slot: self.index + 1,
            name: self.name.clone(),
            duration_seconds: self.duration,
            remaining_seconds: self.remaining,
            phase: self.phase,
            last_notified_at: self.last_notified_at,
        }
    }

    fn cancel_run(&mut self) {
        if let Some(token) = self.run.take() {
            token.cancel();
        }
        self.started_at = None;
    }
}

/// Serializable view of a timer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimerSnapshot {
    /// One-based slot number as shown to the user
    pub slot: usize,
    pub name: String,
    pub duration_seconds: u64,
    pub remaining_seconds: u64,
    pub phase: TimerPhase,
    pub last_notified_at: Option<DateTime<Utc>>,
}
