use chrono::{DateTime, NaiveDate, Utc};
use exec_signals::config::check_lookback_days;

/// Accepts an RFC 3339 timestamp or a plain `YYYY-MM-DD` date (midnight UTC).
pub(crate) fn parse_as_of(raw: &str) -> Result<DateTime<Utc>, String> {
    let trimmed = raw.trim();
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(timestamp.with_timezone(&Utc));
    }

    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
        .ok_or_else(|| format!("failed to parse '{raw}' as an RFC 3339 timestamp or YYYY-MM-DD"))
}

pub(crate) fn parse_positive(raw: &str) -> Result<usize, String> {
    match raw.trim().parse::<usize>() {
        Ok(0) => Err("value must be at least 1".to_string()),
        Ok(value) => Ok(value),
        Err(err) => Err(format!("failed to parse '{raw}' as a positive integer ({err})")),
    }
}

pub(crate) fn parse_lookback_days(raw: &str) -> Result<u32, String> {
    let days = raw
        .trim()
        .parse::<u32>()
        .map_err(|err| format!("failed to parse '{raw}' as a number of days ({err})"))?;
    check_lookback_days(days).map_err(|err| err.to_string())
}
