//! Configuration and CLI argument handling

use std::time::Duration;

use clap::Parser;

/// CLI argument parsing structure
#[derive(Parser, Debug, Clone)]
#[command(name = "multi-timer")]
#[command(about = "Ten countdown timers with desktop expiry notifications")]
#[command(version)]
pub struct Config {
    /// Countdown poll interval in milliseconds
    #[arg(long, default_value = "100", value_parser = clap::value_parser!(u64).range(1..))]
    pub poll_ms: u64,

    /// Expired-timer sweep interval in seconds
    #[arg(long, default_value = "1", value_parser = clap::value_parser!(u64).range(1..))]
    pub sweep_secs: u64,

    /// Minimum seconds between repeated notifications for one expired timer
    #[arg(long, default_value = "60")]
    pub renotify_secs: u64,

    /// How long the desktop should show a notification, in seconds
    #[arg(long, default_value = "10")]
    pub notification_timeout: u64,

    /// Application name reported to the notification service
    #[arg(long, default_value = "Multi-Timer")]
    pub app_name: String,

    /// Log notifications instead of sending them to the desktop
    #[arg(long)]
    pub log_only: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    /// Parse configuration from command line arguments
    pub fn parse() -> Self {
        Parser::parse()
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_ms)
    }

    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_secs)
    }

    pub fn renotify_after(&self) -> Duration {
        Duration::from_secs(self.renotify_secs)
    }

    pub fn notification_timeout(&self) -> Duration {
        Duration::from_secs(self.notification_timeout)
    }

    /// Get the appropriate log level based on verbose flag
    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }
}
