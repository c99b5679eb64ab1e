//! Fixed collection of timers and the control surface the front end calls

use std::{
    sync::{Arc, Mutex, MutexGuard},
    time::Duration,
};
use thiserror::Error;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use super::{
    display::{Display, DisplaySink},
    timer_state::{StartRejection, Timer, TimerSnapshot},
};
use crate::{
    parser::parse_duration,
    services::Notifier,
    tasks::countdown::{countdown_task, CountdownRun},
};

/// Number of timer slots the application presents
pub const SLOT_COUNT: usize = 10;

/// Control surface failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("no timer in slot {0}")]
    UnknownSlot(usize),
    #[error("failed to lock timer {0}")]
    LockPoisoned(usize),
}

/// What a start request did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartOutcome {
    /// Countdown started with this many seconds
    Started(u64),
    /// The timer was already counting down; nothing changed
    AlreadyRunning,
    /// The duration parsed to zero seconds; nothing changed
    ZeroDuration,
    /// The duration text did not parse; the slot shows "Invalid input"
    InvalidInput,
}

/// Owns every timer slot and mediates between timer state and the display
pub struct TimerRegistry {
    slots: Vec<Arc<Mutex<Timer>>>,
    sink: Arc<dyn DisplaySink>,
    notifier: Arc<Notifier>,
    poll_interval: Duration,
}

impl TimerRegistry {
    /// Create `slot_count` idle timers
    pub fn new(
        slot_count: usize,
        sink: Arc<dyn DisplaySink>,
        notifier: Arc<Notifier>,
        poll_interval: Duration,
    ) -> Self {
        let slots = (0..slot_count)
            .map(|index| Arc::new(Mutex::new(Timer::new(index))))
            .collect();

        Self {
            slots,
            sink,
            notifier,
            poll_interval,
        }
    }

    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    /// Parse `duration_text` and start the timer in `slot` under `name`.
    ///
    /// Parse failures are reported to the display sink and leave the timer
    /// untouched. Must be called from within a tokio runtime.
    pub fn start_timer(&self, slot: usize, name: &str, duration_text: &str) -> Result<StartOutcome, RegistryError> {
        let shared = self.shared(slot)?;

        let duration = match parse_duration(duration_text) {
            Ok(duration) => duration,
            Err(e) => {
                warn!("Rejected duration for slot {}: {}", slot, e);
                self.sink.update(slot, Display::InvalidInput);
                return Ok(StartOutcome::InvalidInput);
            }
        };

        let token = {
            let mut timer = lock_slot(shared, slot)?;
            match timer.start(name, duration, Instant::now()) {
                Ok(token) => token,
                Err(StartRejection::AlreadyRunning) => {
                    debug!("Slot {} already running, ignoring start", slot);
                    return Ok(StartOutcome::AlreadyRunning);
                }
                Err(StartRejection::ZeroDuration) => {
                    debug!("Slot {} given zero duration, ignoring start", slot);
                    return Ok(StartOutcome::ZeroDuration);
                }
            }
        };

        info!("Starting timer {} ({:?}) for {}s", slot, name, duration);
        publish(shared, slot, self.sink.as_ref());

        tokio::spawn(countdown_task(CountdownRun {
            index: slot,
            slot: Arc::clone(shared),
            token,
            poll_interval: self.poll_interval,
            sink: Arc::clone(&self.sink),
            notifier: Arc::clone(&self.notifier),
        }));

        Ok(StartOutcome::Started(duration))
    }

    /// Halt a running timer, freezing its remaining time.
    /// Returns false if it was not running.
    pub fn stop_timer(&self, slot: usize) -> Result<bool, RegistryError> {
        let (stopped, remaining) = {
            let mut timer = self.lock(slot)?;
            (timer.stop(), timer.remaining())
        };

        if stopped {
            info!("Stopped timer {} with {}s remaining", slot, remaining);
            publish(self.shared(slot)?, slot, self.sink.as_ref());
        }
        Ok(stopped)
    }

    /// Reset a timer to zero from any state
    pub fn clear_timer(&self, slot: usize) -> Result<(), RegistryError> {
        self.lock(slot)?.clear();
        info!("Cleared timer {}", slot);
        publish(self.shared(slot)?, slot, self.sink.as_ref());
        Ok(())
    }

    /// Change a timer's label. Returns false while the timer is running.
    pub fn rename(&self, slot: usize, name: &str) -> Result<bool, RegistryError> {
        Ok(self.lock(slot)?.rename(name))
    }

    pub fn snapshot(&self, slot: usize) -> Result<TimerSnapshot, RegistryError> {
        Ok(self.lock(slot)?.snapshot())
    }

    pub fn snapshots(&self) -> Result<Vec<TimerSnapshot>, RegistryError> {
        (0..self.slots.len()).map(|slot| self.snapshot(slot)).collect()
    }

    /// Re-notify every expired timer whose throttle window has passed.
    /// Returns how many notifications were dispatched.
    pub fn sweep_expired(&self) -> usize {
        self.slots
            .iter()
            .filter(|slot| self.notifier.notify_when(slot, Timer::is_expired))
            .count()
    }

    /// Stop every running countdown
    pub fn shutdown(&self) {
        for (index, slot) in self.slots.iter().enumerate() {
            match lock_slot(slot, index) {
                Ok(mut timer) => {
                    timer.stop();
                }
                Err(e) => warn!("Failed to stop timer during shutdown: {}", e),
            }
        }
        info!("All timers stopped");
    }

    fn shared(&self, slot: usize) -> Result<&Arc<Mutex<Timer>>, RegistryError> {
        self.slots.get(slot).ok_or(RegistryError::UnknownSlot(slot))
    }

    fn lock(&self, slot: usize) -> Result<MutexGuard<'_, Timer>, RegistryError> {
        lock_slot(self.shared(slot)?, slot)
    }
}

/// Push the timer's current display to `sink`.
///
/// The sink is called without the timer lock held, so it may call back into
/// the registry. If the timer changed while the update was in flight, the
/// newer state is pushed again; the last value the sink sees always matches
/// the timer.
pub fn publish(shared: &Mutex<Timer>, slot: usize, sink: &dyn DisplaySink) {
    let Ok(mut current) = lock_slot(shared, slot).map(|timer| (timer.display(), timer.revision())) else {
        warn!("Failed to lock timer {} for display", slot);
        return;
    };

    loop {
        let (display, revision) = current;
        sink.update(slot, display);

        match lock_slot(shared, slot) {
            Ok(timer) if timer.revision() == revision => break,
            Ok(timer) => current = (timer.display(), timer.revision()),
            Err(e) => {
                warn!("Failed to lock timer for display: {}", e);
                break;
            }
        }
    }
}

fn lock_slot(shared: &Mutex<Timer>, slot: usize) -> Result<MutexGuard<'_, Timer>, RegistryError> {
    shared.lock().map_err(|_| RegistryError::LockPoisoned(slot))
}

impl std::fmt::Debug for TimerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TimerRegistry")
            .field("slots", &self.slots.len())
            .field("poll_interval", &self.poll_interval)
            .finish_non_exhaustive()
    }
}
