//! `hh:mm:ss` conversions for durations.
//!
//! Both directions are pure functions. Parsing accepts one, two or three
//! colon-separated components (`ss`, `mm:ss`, `hh:mm:ss`); components are not
//! range-limited, so `90:00` is ninety minutes.

use super::error::TimeFormatError;

const SECONDS_PER_MINUTE: u32 = 60;
const SECONDS_PER_HOUR: u32 = 60 * 60;

/// Parses a duration string into seconds.
///
/// # Errors
///
/// Returns an error for more than three components, an empty or
/// non-numeric component, a negative value, or a total that overflows.
///
/// # Example
///
/// ```
/// use pomodoro_bar::settings::parse_time;
///
/// assert_eq!(parse_time("25:00").unwrap(), 1500);
/// assert_eq!(parse_time("01:00:05").unwrap(), 3605);
/// assert!(parse_time("1:2:3:4").is_err());
/// ```
pub fn parse_time(input: &str) -> Result<u32, TimeFormatError> {
    let parts: Vec<&str> = input.split(':').collect();
    if parts.len() > 3 {
        return Err(TimeFormatError::TooManyComponents(input.to_string()));
    }

    let mut total: u32 = 0;
    for part in &parts {
        let value = parse_component(part, input)?;
        total = total
            .checked_mul(SECONDS_PER_MINUTE)
            .and_then(|t| t.checked_add(value))
            .ok_or_else(|| TimeFormatError::Overflow(input.to_string()))?;
    }
    Ok(total)
}

fn parse_component(part: &str, input: &str) -> Result<u32, TimeFormatError> {
    let trimmed = part.trim();
    if trimmed.starts_with('-') {
        return Err(TimeFormatError::Negative(input.to_string()));
    }
    if trimmed.is_empty() || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
        return Err(TimeFormatError::InvalidComponent {
            input: input.to_string(),
            component: part.to_string(),
        });
    }
    trimmed
        .parse::<u32>()
        .map_err(|_| TimeFormatError::Overflow(input.to_string()))
}

/// Formats seconds as `mm:ss`, or `hh:mm:ss` from one hour upwards.
///
/// # Example
///
/// ```
/// use pomodoro_bar::settings::format_time;
///
/// assert_eq!(format_time(300), "05:00");
/// assert_eq!(format_time(3605), "01:00:05");
/// ```
pub fn format_time(total_seconds: u32) -> String {
    let hours = total_seconds / SECONDS_PER_HOUR;
    let minutes = (total_seconds % SECONDS_PER_HOUR) / SECONDS_PER_MINUTE;
    let seconds = total_seconds % SECONDS_PER_MINUTE;
    if hours > 0 {
        format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
    } else {
        format!("{:02}:{:02}", minutes, seconds)
    }
}
