//! Throttled expiry notifications

use std::{
    sync::{Arc, Mutex},
    time::Duration,
};
use tokio::time::{timeout, Instant};
use tracing::{debug, info, warn};

use super::desktop::NotificationBackend;
use crate::state::Timer;

/// Content of one expiry notification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpiryNotice {
    pub slot: usize,
    pub title: String,
    pub body: String,
    pub timeout: Duration,
}

impl ExpiryNotice {
    pub fn for_timer(timer: &Timer, timeout: Duration) -> Self {
        Self {
            slot: timer.index(),
            title: format!("{} Expired!", timer.name()),
            body: format!("{} has completed!", timer.name()),
            timeout,
        }
    }
}

/// Upper bound on a single delivery before it is abandoned
pub const DELIVERY_TIMEOUT: Duration = Duration::from_secs(30);

/// Fires expiry notifications, at most once per throttle window per timer
pub struct Notifier {
    backend: Arc<dyn NotificationBackend>,
    throttle: Duration,
    timeout: Duration,
}

impl Notifier {
    pub fn new(backend: Arc<dyn NotificationBackend>, throttle: Duration, timeout: Duration) -> Self {
        Self {
            backend,
            throttle,
            timeout,
        }
    }

    pub fn throttle(&self) -> Duration {
        self.throttle
    }

    /// Notify for `slot` unless it was notified within the throttle window.
    ///
    /// Returns whether a notification was dispatched. Delivery runs on its
    /// own task, bounded by [`DELIVERY_TIMEOUT`]; failures are logged and
    /// otherwise ignored. Must be called from within a tokio runtime.
    pub fn notify(&self, slot: &Mutex<Timer>) -> bool {
        self.notify_when(slot, |_| true)
    }

    /// Like [`Notifier::notify`], but only if `condition` holds for the timer.
    /// The condition and the throttle are checked under the same lock.
    pub fn notify_when<F>(&self, slot: &Mutex<Timer>, condition: F) -> bool
    where
        F: FnOnce(&Timer) -> bool,
    {
        let Some(notice) = self.claim(slot, condition) else {
            return false;
        };

        info!("Sending expiry notification: {}", notice.title);
        let backend = Arc::clone(&self.backend);
        tokio::spawn(async move {
            match timeout(DELIVERY_TIMEOUT, backend.show(&notice)).await {
                Ok(Ok(())) => {}
                Ok(Err(e)) => warn!("Failed to deliver notification for slot {}: {}", notice.slot, e),
                Err(_) => warn!("Notification for slot {} timed out", notice.slot),
            }
        });
        true
    }

    fn claim<F>(&self, slot: &Mutex<Timer>, condition: F) -> Option<ExpiryNotice>
    where
        F: FnOnce(&Timer) -> bool,
    {
        let mut timer = match slot.lock() {
            Ok(timer) => timer,
            Err(e) => {
                warn!("Failed to lock timer for notification: {}", e);
                return None;
            }
        };

        let now = Instant::now();
        if !condition(&timer) {
            return None;
        }
        if !timer.notification_due(now, self.throttle) {
            debug!("Notification for slot {} throttled", timer.index());
            return None;
        }

        timer.mark_notified(now);
        Some(ExpiryNotice::for_timer(&timer, self.timeout))
    }
}

impl std::fmt::Debug for Notifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Notifier")
            .field("throttle", &self.throttle)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::NotifyError;
    use async_trait::async_trait;

    #[derive(Default)]
    struct Recording {
        shown: Mutex<Vec<ExpiryNotice>>,
        fail: bool,
    }

    #[async_trait]
    impl NotificationBackend for Recording {
        async fn show(&self, notice: &ExpiryNotice) -> Result<(), NotifyError> {
            self.shown.lock().unwrap().push(notice.clone());
            if self.fail {
                Err(NotifyError::Backend("no session bus".to_string()))
            } else {
                Ok(())
            }
        }
    }

    fn notifier(backend: Arc<Recording>) -> Notifier {
        Notifier::new(backend, Duration::from_secs(60), Duration::from_secs(10))
    }

    /// Let spawned deliveries run
    async fn settle() {
        tokio::time::sleep(Duration::from_millis(1)).await;
    }

    fn named_slot(name: &str) -> Mutex<Timer> {
        let mut timer = Timer::new(0);
        timer.rename(name);
        Mutex::new(timer)
    }

    #[tokio::test(start_paused = true)]
    async fn notice_carries_timer_name() {
        let backend = Arc::new(Recording::default());
        let notifier = notifier(Arc::clone(&backend));

        assert!(notifier.notify(&named_slot("Pasta")));
        settle().await;

        let shown = backend.shown.lock().unwrap();
        assert_eq!(shown.len(), 1);
        assert_eq!(shown[0].title, "Pasta Expired!");
        assert_eq!(shown[0].body, "Pasta has completed!");
        assert_eq!(shown[0].timeout, Duration::from_secs(10));
    }

    #[tokio::test(start_paused = true)]
    async fn second_notify_inside_window_is_suppressed() {
        let backend = Arc::new(Recording::default());
        let notifier = notifier(Arc::clone(&backend));
        let slot = named_slot("Tea");

        assert!(notifier.notify(&slot));
        tokio::time::advance(Duration::from_secs(30)).await;
        assert!(!notifier.notify(&slot));
        settle().await;
        assert_eq!(backend.shown.lock().unwrap().len(), 1);

        tokio::time::advance(Duration::from_secs(30)).await;
        assert!(notifier.notify(&slot));
        settle().await;
        assert_eq!(backend.shown.lock().unwrap().len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn delivery_failure_still_counts_as_fired() {
        let backend = Arc::new(Recording {
            fail: true,
            ..Default::default()
        });
        let notifier = notifier(Arc::clone(&backend));
        let slot = named_slot("Tea");

        assert!(notifier.notify(&slot));
        settle().await;
        assert_eq!(backend.shown.lock().unwrap().len(), 1);
        assert!(slot.lock().unwrap().last_notified().is_some());
        assert!(!notifier.notify(&slot));
    }

    struct Hanging;

    #[async_trait]
    impl NotificationBackend for Hanging {
        async fn show(&self, _notice: &ExpiryNotice) -> Result<(), NotifyError> {
            std::future::pending().await
        }
    }

    #[tokio::test(start_paused = true)]
    async fn hung_delivery_does_not_block_the_caller() {
        let notifier = Notifier::new(Arc::new(Hanging), Duration::from_secs(60), Duration::from_secs(10));
        let first = named_slot("Tea");
        let second = named_slot("Eggs");

        // Both return straight away even though neither delivery ever completes
        assert!(notifier.notify(&first));
        assert!(notifier.notify(&second));

        // The abandoned deliveries time out; the throttle still holds
        tokio::time::sleep(DELIVERY_TIMEOUT + Duration::from_secs(1)).await;
        assert!(!notifier.notify(&first));
        assert!(first.lock().unwrap().last_notified().is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn condition_gates_notification() {
        let backend = Arc::new(Recording::default());
        let notifier = notifier(Arc::clone(&backend));
        let slot = named_slot("Tea");

        assert!(!notifier.notify_when(&slot, |t| t.is_expired()));
        settle().await;
        assert!(slot.lock().unwrap().last_notified().is_none());
        assert!(backend.shown.lock().unwrap().is_empty());
    }
}
