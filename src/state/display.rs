//! Render callback between the timer core and whatever draws it

use std::fmt;

use tokio::sync::watch;

use crate::parser::format_hms;

/// What a slot should currently show
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Display {
    Remaining(u64),
    Expired,
    InvalidInput,
}

impl fmt::Display for Display {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Display::Remaining(secs) => f.write_str(&format_hms(*secs)),
            Display::Expired => f.write_str("EXPIRED"),
            Display::InvalidInput => f.write_str("Invalid input"),
        }
    }
}

/// Receives display updates from the core; implementations must be cheap
/// since running timers call this on every poll.
pub trait DisplaySink: Send + Sync {
    fn update(&self, slot: usize, display: Display);
}

/// Latest display value of every slot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    pub cells: Vec<Display>,
}

impl Board {
    pub fn new(slots: usize) -> Self {
        Self {
            cells: vec![Display::Remaining(0); slots],
        }
    }
}

/// Display sink that publishes the whole board on a watch channel
#[derive(Debug)]
pub struct BoardSink {
    board_tx: watch::Sender<Board>,
}

impl BoardSink {
    pub fn new(slots: usize) -> Self {
        let (board_tx, _) = watch::channel(Board::new(slots));
        Self { board_tx }
    }

    /// Subscribe to board changes
    pub fn subscribe(&self) -> watch::Receiver<Board> {
        self.board_tx.subscribe()
    }

    /// Current board contents
    pub fn board(&self) -> Board {
        self.board_tx.borrow().clone()
    }
}

impl DisplaySink for BoardSink {
    fn update(&self, slot: usize, display: Display) {
        // Only wake watchers when the rendered value actually changes
        self.board_tx.send_if_modified(|board| match board.cells.get_mut(slot) {
            Some(cell) if *cell != display => {
                *cell = display;
                true
            }
            _ => false,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_each_variant() {
        assert_eq!(Display::Remaining(90).to_string(), "00:01:30");
        assert_eq!(Display::Expired.to_string(), "EXPIRED");
        assert_eq!(Display::InvalidInput.to_string(), "Invalid input");
    }

    #[test]
    fn board_sink_notifies_only_on_change() {
        let sink = BoardSink::new(3);
        let mut rx = sink.subscribe();

        sink.update(1, Display::Remaining(0));
        assert!(!rx.has_changed().unwrap());

        sink.update(1, Display::Expired);
        assert!(rx.has_changed().unwrap());
        assert_eq!(rx.borrow_and_update().cells[1], Display::Expired);

        // Out of range slots are ignored
        sink.update(7, Display::Expired);
        assert!(!rx.has_changed().unwrap());
        assert_eq!(sink.board().cells.len(), 3);
    }
}
