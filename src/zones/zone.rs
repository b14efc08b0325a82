//! Zone Definitions
//!
//! A zone is a named training intensity band taken from the configuration,
//! e.g. `Z2: "6:00-5:30"` or `Z3_HR: "85-91% max_hr"`. This module parses the
//! unit-specific value strings into a typed [`ZoneValue`]; turning them into
//! numeric targets is the resolver's job since it needs margins and reference
//! values.

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

use super::units::parse_pace_seconds;

/// Upper bound used for open-ended power zones such as `375+`.
pub const POWER_UNBOUNDED: f64 = 9999.0;

static HEART_RATE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(\d+(?:\.\d+)?)\s*(?:-\s*(\d+(?:\.\d+)?))?\s*(%(?:\s*max_hr)?)?\s*(?:bpm)?$")
        .expect("heart rate pattern is valid")
});

static POWER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(\d+(?:\.\d+)?)\s*(?:-\s*(\d+(?:\.\d+)?))?\s*(%(?:\s*ftp)?)?\s*(?:w)?$")
        .expect("power pattern is valid")
});

static POWER_BELOW_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^<\s*(\d+(?:\.\d+)?)\s*(?:w)?$").expect("power below pattern is valid")
});

static POWER_ABOVE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(\d+(?:\.\d+)?)\s*\+\s*(?:w)?$").expect("power above pattern is valid")
});

/// Errors raised while parsing or resolving zones.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ZoneError {
    #[error("Invalid pace '{0}': expected mm:ss or mm:ss-mm:ss")]
    InvalidPace(String),

    #[error("Invalid heart rate '{0}': expected N, N-N, N% max_hr or N-N% max_hr")]
    InvalidHeartRate(String),

    #[error("Invalid power '{0}': expected N, N-N, <N or N+")]
    InvalidPower(String),

    #[error("Descending range '{0}': the first value must be lower than the second")]
    DescendingRange(String),

    #[error("Percentage out of range in '{0}'")]
    InvalidPercentage(String),

    #[error("Unknown zone '{zone}' for {sport}")]
    UnknownZone { zone: String, sport: String },
}

/// Which configuration table a zone comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ZoneFamily {
    /// `sports.<sport>.paces`, in seconds per kilometer
    Pace,
    /// `heart_rates`, shared by every sport
    HeartRate,
    /// `sports.cycling.power_values`
    Power,
}

impl fmt::Display for ZoneFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pace => write!(f, "pace"),
            Self::HeartRate => write!(f, "heart rate"),
            Self::Power => write!(f, "power"),
        }
    }
}

/// A single value or a range, in the order written.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Bounds {
    Single(f64),
    Range(f64, f64),
}

impl Bounds {
    /// Lower and upper value regardless of the written order.
    pub fn min_max(self) -> (f64, f64) {
        match self {
            Self::Single(value) => (value, value),
            Self::Range(a, b) => (a.min(b), a.max(b)),
        }
    }

    fn map(self, f: impl Fn(f64) -> f64) -> Self {
        match self {
            Self::Single(value) => Self::Single(f(value)),
            Self::Range(a, b) => Self::Range(f(a), f(b)),
        }
    }
}

/// Parsed value of a zone string.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ZoneValue {
    /// Seconds per kilometer
    Pace(Bounds),
    /// Beats per minute, or percent of `max_hr`
    HeartRate { bounds: Bounds, percent_of_max: bool },
    /// Watts, or percent of `ftp`
    Power { bounds: Bounds, percent_of_ftp: bool },
    /// `<N`: anything up to N watts
    PowerBelow(f64),
    /// `N+`: N watts and above
    PowerAbove(f64),
}

impl ZoneValue {
    /// Parses a zone string of the given family.
    ///
    /// # Example
    ///
    /// ```
    /// use zoneplanner::zones::{ZoneFamily, ZoneValue};
    ///
    /// let value = ZoneValue::parse(ZoneFamily::Power, "375+").unwrap();
    /// assert_eq!(value, ZoneValue::PowerAbove(375.0));
    /// ```
    pub fn parse(family: ZoneFamily, raw: &str) -> Result<Self, ZoneError> {
        let text = raw.trim();
        match family {
            ZoneFamily::Pace => parse_pace(text),
            ZoneFamily::HeartRate => parse_heart_rate(text),
            ZoneFamily::Power => parse_power(text),
        }
    }

    pub fn family(&self) -> ZoneFamily {
        match self {
            Self::Pace(_) => ZoneFamily::Pace,
            Self::HeartRate { .. } => ZoneFamily::HeartRate,
            Self::Power { .. } | Self::PowerBelow(_) | Self::PowerAbove(_) => ZoneFamily::Power,
        }
    }

    /// True for a zone written as one value, which gets margins applied.
    pub fn is_single(&self) -> bool {
        matches!(
            self,
            Self::Pace(Bounds::Single(_))
                | Self::HeartRate { bounds: Bounds::Single(_), .. }
                | Self::Power { bounds: Bounds::Single(_), .. }
        )
    }
}

fn parse_pace(text: &str) -> Result<ZoneValue, ZoneError> {
    let invalid = || ZoneError::InvalidPace(text.to_string());
    let bounds = match text.split_once('-') {
        Some((first, second)) => {
            let first = parse_pace_seconds(first).map_err(|_| invalid())?;
            let second = parse_pace_seconds(second).map_err(|_| invalid())?;
            Bounds::Range(f64::from(first), f64::from(second))
        }
        None => Bounds::Single(f64::from(parse_pace_seconds(text).map_err(|_| invalid())?)),
    };
    Ok(ZoneValue::Pace(bounds))
}

fn parse_heart_rate(text: &str) -> Result<ZoneValue, ZoneError> {
    let captures = HEART_RATE_RE
        .captures(text)
        .ok_or_else(|| ZoneError::InvalidHeartRate(text.to_string()))?;
    let bounds = captured_bounds(&captures).ok_or_else(|| ZoneError::InvalidHeartRate(text.to_string()))?;

    Ok(ZoneValue::HeartRate {
        bounds,
        percent_of_max: captures.get(3).is_some(),
    })
}

fn parse_power(text: &str) -> Result<ZoneValue, ZoneError> {
    let invalid = || ZoneError::InvalidPower(text.to_string());

    if let Some(captures) = POWER_BELOW_RE.captures(text) {
        return captures[1].parse().map(ZoneValue::PowerBelow).map_err(|_| invalid());
    }
    if let Some(captures) = POWER_ABOVE_RE.captures(text) {
        return captures[1].parse().map(ZoneValue::PowerAbove).map_err(|_| invalid());
    }

    let captures = POWER_RE.captures(text).ok_or_else(invalid)?;
    let bounds = captured_bounds(&captures).ok_or_else(invalid)?;

    Ok(ZoneValue::Power {
        bounds,
        percent_of_ftp: captures.get(3).is_some(),
    })
}

fn captured_bounds(captures: &regex::Captures<'_>) -> Option<Bounds> {
    let first: f64 = captures.get(1)?.as_str().parse().ok()?;
    match captures.get(2) {
        Some(second) => Some(Bounds::Range(first, second.as_str().parse().ok()?)),
        None => Some(Bounds::Single(first)),
    }
}

/// A named zone from the configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct Zone {
    pub name: String,
    pub value: ZoneValue,
    /// The configuration string the zone was parsed from
    pub raw: String,
}

impl Zone {
    pub fn parse(name: &str, family: ZoneFamily, raw: &str) -> Result<Self, ZoneError> {
        Ok(Self {
            name: name.to_string(),
            value: ZoneValue::parse(family, raw)?,
            raw: raw.trim().to_string(),
        })
    }

    pub fn family(&self) -> ZoneFamily {
        self.value.family()
    }

    /// Nominal bounds without margins, in bpm or watts for heart rate and
    /// power and in seconds per kilometer for pace.
    ///
    /// Percentages are resolved against `reference` (max_hr or ftp) and
    /// floored to whole units.
    pub fn nominal_bounds(&self, reference: f64) -> (f64, f64) {
        let percent = |p: f64| (p * reference / 100.0).floor();
        match self.value {
            ZoneValue::Pace(bounds) => bounds.min_max(),
            ZoneValue::HeartRate {
                bounds,
                percent_of_max,
            } => {
                if percent_of_max {
                    bounds.map(percent).min_max()
                } else {
                    bounds.min_max()
                }
            }
            ZoneValue::Power {
                bounds,
                percent_of_ftp,
            } => {
                if percent_of_ftp {
                    bounds.map(percent).min_max()
                } else {
                    bounds.min_max()
                }
            }
            ZoneValue::PowerBelow(limit) => (0.0, limit),
            ZoneValue::PowerAbove(limit) => (limit, POWER_UNBOUNDED),
        }
    }
}
