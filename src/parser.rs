//! Duration text parsing and `HH:MM:SS` formatting

use thiserror::Error;

/// Errors produced while parsing a duration string
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// The input is not `SS`, `MM:SS` or `HH:MM:SS` with digit-only fields
    #[error("invalid time format: {0:?}")]
    InvalidFormat(String),
    /// The fields are well formed but the total does not fit in a u64
    #[error("duration out of range: {0:?}")]
    InvalidRange(String),
}

/// Parse a user supplied duration into seconds.
///
/// Accepted shapes, after trimming surrounding whitespace:
/// - `SS` - a bare number of seconds
/// - `MM:SS`
/// - `HH:MM:SS`
///
/// Sub-fields are taken literally, so `90:00` is ninety minutes.
pub fn parse_duration(input: &str) -> Result<u64, ParseError> {
    let trimmed = input.trim();
    let fields: Vec<&str> = trimmed.split(':').collect();

    let multipliers: &[u64] = match fields.len() {
        1 => &[1],
        2 => &[60, 1],
        3 => &[3600, 60, 1],
        _ => return Err(ParseError::InvalidFormat(trimmed.to_string())),
    };

    let mut total: u64 = 0;
    for (field, multiplier) in fields.iter().zip(multipliers) {
        if !is_digits(field) {
            return Err(ParseError::InvalidFormat(trimmed.to_string()));
        }
        let value: u64 = field
            .parse()
            .map_err(|_| ParseError::InvalidRange(trimmed.to_string()))?;
        total = value
            .checked_mul(*multiplier)
            .and_then(|secs| total.checked_add(secs))
            .ok_or_else(|| ParseError::InvalidRange(trimmed.to_string()))?;
    }

    Ok(total)
}

/// `u64::from_str` alone would accept a leading `+`
fn is_digits(field: &str) -> bool {
    !field.is_empty() && field.bytes().all(|b| b.is_ascii_digit())
}

/// Render seconds as `HH:MM:SS`; hours grow past two digits when needed
pub fn format_hms(total_seconds: u64) -> String {
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;
    format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
}
