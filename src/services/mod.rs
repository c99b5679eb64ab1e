//! External side effects module
//! 
//! This module contains the desktop notification backends and the throttling
//! notifier that sits in front of them.

pub mod desktop;
pub mod notifier;

// Re-export main types
pub use desktop::{DesktopBackend, LogOnlyBackend, NotificationBackend, NotifyError};
pub use notifier::{ExpiryNotice, Notifier};
