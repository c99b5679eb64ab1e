//! Desktop notification delivery

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use tracing::{debug, info};

use super::notifier::ExpiryNotice;

/// Failure to hand a notification to the desktop
#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("notification backend failed: {0}")]
    Backend(String),
}

/// Something that can put an expiry notice in front of the user
#[async_trait]
pub trait NotificationBackend: Send + Sync {
    async fn show(&self, notice: &ExpiryNotice) -> Result<(), NotifyError>;
}

/// Sends notices through the OS notification service via notify-rust
#[derive(Debug, Clone)]
pub struct DesktopBackend {
    app_name: String,
}

impl DesktopBackend {
    pub fn new(app_name: impl Into<String>) -> Self {
        Self {
            app_name: app_name.into(),
        }
    }
}

#[async_trait]
impl NotificationBackend for DesktopBackend {
    async fn show(&self, notice: &ExpiryNotice) -> Result<(), NotifyError> {
        debug!(slot = notice.slot, "building desktop notification");

        let mut notification = notify_rust::Notification::new();
        notification
            .appname(&self.app_name)
            .summary(&notice.title)
            .body(&notice.body)
            .timeout(notify_rust::Timeout::Milliseconds(timeout_millis(notice.timeout)));

        // notify-rust blocks on the session bus, keep it off the async workers
        tokio::task::spawn_blocking(move || notification.show().map(|_| ()).map_err(|e| e.to_string()))
            .await
            .map_err(|e| NotifyError::Backend(e.to_string()))?
            .map_err(NotifyError::Backend)
    }
}

/// Notification services take a u32 millisecond hint; saturate rather than wrap
fn timeout_millis(timeout: Duration) -> u32 {
    u32::try_from(timeout.as_millis()).unwrap_or(u32::MAX)
}

/// Writes notices to the log instead of the desktop
#[derive(Debug, Clone, Default)]
pub struct LogOnlyBackend;

#[async_trait]
impl NotificationBackend for LogOnlyBackend {
    async fn show(&self, notice: &ExpiryNotice) -> Result<(), NotifyError> {
        info!("[NOTIFY] {} - {}", notice.title, notice.body);
        Ok(())
    }
}
