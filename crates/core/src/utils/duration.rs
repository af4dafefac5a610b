use crate::error::{Error, Result};
use std::time::Duration;

const NANOS_PER_SEC: f64 = 1_000_000_000.0;

/// Parse durations such as `500ms`, `30s`, `1.5m`, `1h30m`.
///
/// A bare number is taken as seconds.
pub fn parse_duration(input: &str) -> Result<Duration> {
    let input = input.trim();
    if input.is_empty() {
        return Err(Error::InvalidDuration("empty string".to_string()));
    }

    if let Ok(seconds) = input.parse::<f64>() {
        return from_nanos(seconds * NANOS_PER_SEC, input);
    }

    let invalid = || Error::InvalidDuration(input.to_string());
    let mut total = 0.0_f64;
    let mut rest = input;

    while !rest.is_empty() {
        let number_end = rest
            .find(|c: char| !(c.is_ascii_digit() || c == '.'))
            .ok_or_else(invalid)?;
        if number_end == 0 {
            return Err(invalid());
        }
        let (number, tail) = rest.split_at(number_end);
        let unit_end = tail
            .find(|c: char| c.is_ascii_digit() || c == '.')
            .unwrap_or(tail.len());
        let (unit, tail) = tail.split_at(unit_end);

        let value: f64 = number.parse().map_err(|_| invalid())?;
        let scale = match unit {
            "ms" => NANOS_PER_SEC / 1000.0,
            "s" | "sec" | "secs" => NANOS_PER_SEC,
            "m" | "min" | "mins" => NANOS_PER_SEC * 60.0,
            "h" | "hr" | "hrs" => NANOS_PER_SEC * 3600.0,
            _ => return Err(invalid()),
        };

        total += value * scale;
        rest = tail;
    }

    from_nanos(total, input)
}

fn from_nanos(nanos: f64, input: &str) -> Result<Duration> {
    if !nanos.is_finite() || nanos < 0.0 || nanos >= u64::MAX as f64 {
        return Err(Error::InvalidDuration(format!("{input}: out of range")));
    }
    Ok(Duration::from_nanos(nanos.round() as u64))
}

/// Compact rendering used in messages, e.g. `10m`, `1h30m`, `250ms`.
pub fn format_duration(duration: Duration) -> String {
    let total_ms = duration.as_millis();
    if total_ms < 1000 {
        return format!("{total_ms}ms");
    }

    let mut secs = duration.as_secs();
    let hours = secs / 3600;
    secs %= 3600;
    let minutes = secs / 60;
    secs %= 60;

    let mut out = String::new();
    if hours > 0 {
        out.push_str(&format!("{hours}h"));
    }
    if minutes > 0 {
        out.push_str(&format!("{minutes}m"));
    }
    if secs > 0 || out.is_empty() {
        out.push_str(&format!("{secs}s"));
    }
    out
}
