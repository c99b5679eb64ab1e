//! Per-timer countdown background task

use std::{
    sync::{Arc, Mutex},
    time::Duration,
};
use tokio::time::{interval, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

use crate::{
    services::Notifier,
    state::{registry::publish, DisplaySink, Tick, Timer},
};

/// Everything one countdown run needs
pub struct CountdownRun {
    pub index: usize,
    pub slot: Arc<Mutex<Timer>>,
    /// Cancelled by stop/clear; identifies this run to the timer
    pub token: CancellationToken,
    pub poll_interval: Duration,
    pub sink: Arc<dyn DisplaySink>,
    pub notifier: Arc<Notifier>,
}

/// Poll the timer until it expires or the run is cancelled.
///
/// Every poll pushes the timer's display to the sink. On expiry the sink
/// shows `EXPIRED` and one notification is requested.
pub async fn countdown_task(run: CountdownRun) {
    debug!("Starting countdown task for slot {}", run.index);

    let mut ticker = interval(run.poll_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            _ = run.token.cancelled() => {
                debug!("Countdown for slot {} cancelled", run.index);
                break;
            }

            _ = ticker.tick() => {
                match poll(&run) {
                    Some(Tick::Counting(_)) => {
                        publish(&run.slot, run.index, run.sink.as_ref());
                    }
                    Some(Tick::Expired) => {
                        info!("Timer {} expired", run.index);
                        publish(&run.slot, run.index, run.sink.as_ref());
                        run.notifier.notify_when(&run.slot, Timer::is_expired);
                        break;
                    }
                    Some(Tick::Stale) | None => break,
                }
            }
        }
    }
}

fn poll(run: &CountdownRun) -> Option<Tick> {
    match run.slot.lock() {
        Ok(mut timer) => Some(timer.tick(&run.token, Instant::now())),
        Err(e) => {
            error!("Failed to lock timer {}: {}", run.index, e);
            None
        }
    }
}
