//! Multi-Timer - ten countdown timers with desktop expiry notifications
//!
//! This is the main entry point for the multi-timer application.

use std::sync::Arc;
use tokio::io::{stdin, stdout, BufReader};
use tokio_util::sync::CancellationToken;
use tracing::info;

use multi_timer::{
    config::Config,
    console::{run_console, watch_alerts, Console, HELP},
    services::{DesktopBackend, LogOnlyBackend, NotificationBackend, Notifier},
    state::{BoardSink, TimerRegistry, SLOT_COUNT},
    tasks::expiry_sweeper_task,
    utils::shutdown_signal,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Logs go to stderr; stdout belongs to the console
    tracing_subscriber::fmt()
        .with_env_filter(format!("multi_timer={}", config.log_level()))
        .with_writer(std::io::stderr)
        .init();

    info!("Starting multi-timer v{}", env!("CARGO_PKG_VERSION"));
    info!(
        "Configuration: poll={}ms, sweep={}s, renotify={}s, log_only={}",
        config.poll_ms, config.sweep_secs, config.renotify_secs, config.log_only
    );

    let backend: Arc<dyn NotificationBackend> = if config.log_only {
        Arc::new(LogOnlyBackend)
    } else {
        Arc::new(DesktopBackend::new(config.app_name.clone()))
    };
    let notifier = Arc::new(Notifier::new(
        backend,
        config.renotify_after(),
        config.notification_timeout(),
    ));

    let board = Arc::new(BoardSink::new(SLOT_COUNT));
    let registry = Arc::new(TimerRegistry::new(
        SLOT_COUNT,
        board.clone(),
        notifier,
        config.poll_interval(),
    ));

    let shutdown = CancellationToken::new();

    // Start the expiry sweeper background task
    let sweeper = tokio::spawn(expiry_sweeper_task(
        Arc::clone(&registry),
        config.sweep_interval(),
        shutdown.clone(),
    ));

    // Print a line whenever a timer expires or rejects its input
    tokio::spawn(watch_alerts(board.subscribe(), stdout()));

    println!("{}", HELP);
    let console = Console::new(Arc::clone(&registry), board);

    let signalled = tokio::select! {
        result = run_console(&console, BufReader::new(stdin()), stdout(), shutdown.clone()) => {
            result?;
            false
        }
        result = shutdown_signal() => {
            result?;
            info!("Shutdown signal received");
            true
        }
    };

    shutdown.cancel();
    registry.shutdown();
    sweeper.await?;

    info!("Shutdown complete");
    if signalled {
        // The blocking stdin read would otherwise hold the runtime open
        std::process::exit(0);
    }
    Ok(())
}
