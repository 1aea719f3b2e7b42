//! mm:ss formatting and parsing for timer displays and target input

use crate::error::TimerError;

/// Format a second count as `MM:SS`. Minutes are unbounded (no hour
/// rollover), both fields zero-padded to two digits.
pub fn format_mm_ss(total_seconds: u64) -> String {
    format!("{:02}:{:02}", total_seconds / 60, total_seconds % 60)
}

/// Parse a `mm:ss` duration string into seconds.
///
/// Accepts exactly two colon-separated decimal fields with seconds in
/// `0..=59`. Anything else (wrong separator count, non-numeric text,
/// out-of-range seconds) is an `InvalidFormat` error.
pub fn parse_mm_ss(text: &str) -> Result<u64, TimerError> {
    let mut parts = text.trim().split(':');
    let (minutes, seconds) = match (parts.next(), parts.next(), parts.next()) {
        (Some(m), Some(s), None) => (m, s),
        _ => return Err(TimerError::InvalidFormat),
    };

    let minutes = parse_field(minutes)?;
    let seconds = parse_field(seconds)?;
    if seconds > 59 {
        return Err(TimerError::InvalidFormat);
    }

    minutes
        .checked_mul(60)
        .and_then(|m| m.checked_add(seconds))
        .ok_or(TimerError::InvalidFormat)
}

/// Parse one duration field: non-empty, ASCII digits only
fn parse_field(field: &str) -> Result<u64, TimerError> {
    if field.is_empty() || !field.bytes().all(|b| b.is_ascii_digit()) {
        return Err(TimerError::InvalidFormat);
    }
    field.parse().map_err(|_| TimerError::InvalidFormat)
}
