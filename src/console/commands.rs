//! Console command parsing

use thiserror::Error;

/// A parsed console line. Slots are zero-based here; users type 1-based.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Start {
        slot: usize,
        duration: String,
        name: Option<String>,
    },
    Stop { slot: usize },
    Clear { slot: usize },
    Name { slot: usize, name: String },
    List,
    Json,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("empty command")]
    Empty,
    #[error("unknown command: {0}")]
    Unknown(String),
    #[error("usage: {0}")]
    Usage(&'static str),
    #[error("slot must be a number from 1 to {max}, got {given:?}")]
    BadSlot { given: String, max: usize },
}

pub const HELP: &str = "\
Commands:
  start <n> <duration> [name]  start timer n (duration: SS, MM:SS or HH:MM:SS)
  stop <n>                     stop timer n, keeping its remaining time
  clear <n>                    reset timer n to zero
  name <n> <text>              rename timer n (not while running)
  list                         show all timers
  json                         print all timers as JSON
  help                         show this help
  quit                         exit";

/// Parse one input line against a registry of `slot_count` timers
pub fn parse_command(line: &str, slot_count: usize) -> Result<Command, CommandError> {
    let mut words = line.split_whitespace();
    let verb = words.next().ok_or(CommandError::Empty)?.to_lowercase();
    let rest: Vec<&str> = words.collect();

    match verb.as_str() {
        "start" => {
            const USAGE: &str = "start <n> <duration> [name]";
            let (slot, duration) = match rest.as_slice() {
                [slot, duration, ..] => (parse_slot(slot, slot_count)?, duration.to_string()),
                _ => return Err(CommandError::Usage(USAGE)),
            };
            let name = (rest.len() > 2).then(|| rest[2..].join(" "));
            Ok(Command::Start { slot, duration, name })
        }
        "stop" => Ok(Command::Stop {
            slot: single_slot(&rest, slot_count, "stop <n>")?,
        }),
        "clear" => Ok(Command::Clear {
            slot: single_slot(&rest, slot_count, "clear <n>")?,
        }),
        "name" => match rest.as_slice() {
            [slot, name @ ..] if !name.is_empty() => Ok(Command::Name {
                slot: parse_slot(slot, slot_count)?,
                name: name.join(" "),
            }),
            _ => Err(CommandError::Usage("name <n> <text>")),
        },
        "list" | "ls" => Ok(Command::List),
        "json" => Ok(Command::Json),
        "help" | "?" => Ok(Command::Help),
        "quit" | "exit" | "q" => Ok(Command::Quit),
        _ => Err(CommandError::Unknown(verb)),
    }
}

fn single_slot(rest: &[&str], slot_count: usize, usage: &'static str) -> Result<usize, CommandError> {
    match rest {
        [slot] => parse_slot(slot, slot_count),
        _ => Err(CommandError::Usage(usage)),
    }
}

fn parse_slot(word: &str, slot_count: usize) -> Result<usize, CommandError> {
    match word.parse::<usize>() {
        Ok(n) if (1..=slot_count).contains(&n) => Ok(n - 1),
        _ => Err(CommandError::BadSlot {
            given: word.to_string(),
            max: slot_count,
        }),
    }
}
