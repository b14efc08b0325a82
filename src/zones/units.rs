//! Unit Helpers
//!
//! Conversions between the unit-specific strings used in zone configuration
//! and workout text (`mm:ss` paces, bpm, watts) and the numeric values stored
//! on targets, plus validators for single user-entered zone strings.

use once_cell::sync::Lazy;
use regex::Regex;

use super::zone::{Bounds, ZoneError, ZoneFamily, ZoneValue};

/// Distance a pace string refers to, in meters.
pub const PACE_DISTANCE_METERS: f64 = 1000.0;

static PACE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{1,2}):([0-5]\d)$").expect("pace pattern is valid"));

/// Parses a `m:ss` or `mm:ss` pace into seconds.
///
/// # Example
///
/// ```
/// use zoneplanner::zones::units::parse_pace_seconds;
///
/// assert_eq!(parse_pace_seconds("5:30").unwrap(), 330);
/// assert!(parse_pace_seconds("5:75").is_err());
/// ```
pub fn parse_pace_seconds(pace: &str) -> Result<u32, ZoneError> {
    let pace = pace.trim();
    let captures = PACE_RE
        .captures(pace)
        .ok_or_else(|| ZoneError::InvalidPace(pace.to_string()))?;

    let minutes: u32 = captures[1]
        .parse()
        .map_err(|_| ZoneError::InvalidPace(pace.to_string()))?;
    let seconds: u32 = captures[2]
        .parse()
        .map_err(|_| ZoneError::InvalidPace(pace.to_string()))?;

    Ok(minutes * 60 + seconds)
}

/// Formats seconds as `m:ss`.
pub fn format_pace(seconds: u32) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

/// Converts seconds per kilometer into meters per second.
///
/// Returns 0 for a non-positive duration.
pub fn pace_to_speed(seconds_per_km: f64) -> f64 {
    if seconds_per_km <= 0.0 {
        return 0.0;
    }
    PACE_DISTANCE_METERS / seconds_per_km
}

/// Converts meters per second into whole seconds per kilometer.
pub fn speed_to_pace_seconds(speed: f64) -> Option<u32> {
    if speed <= 0.0 || !speed.is_finite() {
        return None;
    }
    Some((PACE_DISTANCE_METERS / speed).round() as u32)
}

/// Formats a number without a trailing `.0` for whole values.
pub fn format_number(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        let formatted = format!("{:.3}", value);
        formatted.trim_end_matches('0').trim_end_matches('.').to_string()
    }
}

/// Validates a single pace value as entered for a zone (`mm:ss`).
pub fn validate_pace(pace: &str) -> Result<(), ZoneError> {
    parse_pace_seconds(pace).map(|_| ())
}

/// Validates a power zone: `N`, `N-N` (ascending), `<N` or `N+`.
pub fn validate_power(power: &str) -> Result<(), ZoneError> {
    match ZoneValue::parse(ZoneFamily::Power, power)? {
        ZoneValue::Power {
            bounds,
            percent_of_ftp,
        } => {
            check_ascending(power, bounds)?;
            if percent_of_ftp {
                check_percentage(power, bounds, f64::INFINITY)?;
            }
            Ok(())
        }
        _ => Ok(()),
    }
}

/// Validates a heart-rate zone: `N`, `N-N`, `N% max_hr` or `N-N% max_hr`.
///
/// Ranges must be ascending and percentages within 1..=100.
pub fn validate_heart_rate(heart_rate: &str) -> Result<(), ZoneError> {
    if let ZoneValue::HeartRate {
        bounds,
        percent_of_max,
    } = ZoneValue::parse(ZoneFamily::HeartRate, heart_rate)?
    {
        check_ascending(heart_rate, bounds)?;
        if percent_of_max {
            check_percentage(heart_rate, bounds, 100.0)?;
        }
    }
    Ok(())
}

fn check_ascending(raw: &str, bounds: Bounds) -> Result<(), ZoneError> {
    match bounds {
        Bounds::Range(low, high) if low >= high => Err(ZoneError::DescendingRange(raw.to_string())),
        _ => Ok(()),
    }
}

fn check_percentage(raw: &str, bounds: Bounds, max: f64) -> Result<(), ZoneError> {
    let (low, high) = bounds.min_max();
    if low <= 0.0 || high > max {
        return Err(ZoneError::InvalidPercentage(raw.to_string()));
    }
    Ok(())
}
