//! Periodic re-notification of expired timers

use std::{sync::Arc, time::Duration};
use tokio::time::interval;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::state::TimerRegistry;

/// Background task that re-fires notifications for timers left expired
pub async fn expiry_sweeper_task(registry: Arc<TimerRegistry>, period: Duration, shutdown: CancellationToken) {
    info!("Starting expiry sweeper task");

    let mut interval = interval(period);

    loop {
        tokio::select! {
            _ = shutdown.cancelled() => {
                info!("Expiry sweeper stopped");
                break;
            }
            _ = interval.tick() => {
                let fired = registry.sweep_expired();
                if fired > 0 {
                    debug!("Sweep re-notified {} expired timer(s)", fired);
                }
            }
        }
    }
}
