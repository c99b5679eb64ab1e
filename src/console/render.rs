//! Text rendering of the timer board

use std::fmt::Write as _;

use tokio::{
    io::{AsyncWrite, AsyncWriteExt},
    sync::watch,
};
use tracing::debug;

use crate::state::{Board, Display, TimerPhase, TimerSnapshot};

/// Render one row per timer: slot, name, display value and phase
pub fn render_board(timers: &[TimerSnapshot], board: &Board) -> String {
    let mut out = String::new();
    for timer in timers {
        let display = board
            .cells
            .get(timer.slot - 1)
            .copied()
            .unwrap_or(Display::Remaining(timer.remaining_seconds));
        let phase = match timer.phase {
            TimerPhase::Idle => "idle",
            TimerPhase::Running => "running",
            TimerPhase::Expired => "expired",
        };
        let _ = writeln!(out, "{:>2}  {:<20} {:>13}  {}", timer.slot, timer.name, display.to_string(), phase);
    }
    out
}

/// Slots whose display just turned into something the user must see
pub fn alerts(previous: &Board, current: &Board) -> Vec<(usize, Display)> {
    current
        .cells
        .iter()
        .enumerate()
        .filter(|(slot, cell)| {
            matches!(cell, Display::Expired | Display::InvalidInput) && previous.cells.get(*slot) != Some(*cell)
        })
        .map(|(slot, cell)| (slot, *cell))
        .collect()
}

/// Print a line whenever a slot first shows `EXPIRED` or `Invalid input`.
/// Ends when the board sender is dropped or the output fails.
pub async fn watch_alerts<W>(mut board_rx: watch::Receiver<Board>, mut output: W)
where
    W: AsyncWrite + Unpin,
{
    let mut previous = board_rx.borrow_and_update().clone();

    while board_rx.changed().await.is_ok() {
        let current = board_rx.borrow_and_update().clone();
        for (slot, display) in alerts(&previous, &current) {
            let line = format!("Timer {}: {}\n", slot + 1, display);
            if output.write_all(line.as_bytes()).await.is_err() || output.flush().await.is_err() {
                debug!("Alert output closed");
                return;
            }
        }
        previous = current;
    }
}
