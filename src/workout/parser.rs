//! Workout DSL Parser
//!
//! Converts the line-oriented step language used by spreadsheet and text
//! import into a step tree:
//!
//! ```text
//! warmup: 10min @ Z1_HR -- easy start
//! repeat 4:
//!     interval: 1km @ Z4
//!     recovery: 2:30min @ 6:30-7:00
//! cooldown: lap-button
//! ```
//!
//! Each line is `type: value [@ target] [-- description]`. A `repeat N:` line
//! opens a block holding every following line indented deeper than it.
//! Problems are reported per line and never abort the block: a line that
//! cannot be read is skipped, an unreadable number falls back to a fixed
//! default.

use log::{debug, warn};
use thiserror::Error;

use super::model::{push_ordered, EndCondition, RepeatGroup, SportType, StepType, Target, Workout, WorkoutStep};
use crate::zones::resolver::HEART_RATE_SUFFIX;
use crate::zones::units::{format_number, pace_to_speed};
use crate::zones::{Zone, ZoneConfig, ZoneFamily, ZoneResolver};

/// Columns a tab counts for when measuring indentation.
const TAB_WIDTH: usize = 4;

const FALLBACK_MINUTES_SECONDS: u32 = 60;
const FALLBACK_SECONDS: u32 = 30;
const FALLBACK_KILOMETERS_METERS: f64 = 1000.0;
const FALLBACK_METERS: f64 = 100.0;

/// A problem found on one line of a DSL block. Line numbers are 1-based.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DslError {
    #[error("line {line}: missing ':' separator in '{text}', line skipped")]
    MissingSeparator { line: usize, text: String },

    #[error("line {line}: unknown step type '{step_type}', line skipped")]
    UnknownStepType { line: usize, step_type: String },

    #[error("line {line}: invalid repeat count '{text}', using 1")]
    InvalidRepeatCount { line: usize, text: String },

    #[error("line {line}: repeat block has no steps, block skipped")]
    EmptyRepeat { line: usize },

    #[error("line {line}: invalid value '{value}', using {fallback}")]
    InvalidValue {
        line: usize,
        value: String,
        fallback: String,
    },

    #[error("line {line}: cannot resolve target '{target}', using {fallback}")]
    InvalidTarget {
        line: usize,
        target: String,
        fallback: String,
    },
}

impl DslError {
    pub fn line(&self) -> usize {
        match self {
            Self::MissingSeparator { line, .. }
            | Self::UnknownStepType { line, .. }
            | Self::InvalidRepeatCount { line, .. }
            | Self::EmptyRepeat { line }
            | Self::InvalidValue { line, .. }
            | Self::InvalidTarget { line, .. } => *line,
        }
    }
}

/// Steps read from a block plus the problems met along the way.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedBlock {
    pub steps: Vec<WorkoutStep>,
    pub warnings: Vec<DslError>,
}

impl ParsedBlock {
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }
}

/// A repeat whose body is still being read.
struct OpenRepeat {
    indent: usize,
    line: usize,
    group: RepeatGroup,
}

/// Parses DSL text for one sport against a zone configuration.
#[derive(Debug, Clone, Copy)]
pub struct DslParser<'a> {
    resolver: ZoneResolver<'a>,
    sport: SportType,
}

impl<'a> DslParser<'a> {
    pub fn new(config: &'a ZoneConfig, sport: SportType) -> Self {
        Self {
            resolver: ZoneResolver::new(config),
            sport,
        }
    }

    pub fn sport(&self) -> SportType {
        self.sport
    }

    /// Parses a whole block into a workout.
    ///
    /// # Example
    ///
    /// ```
    /// use zoneplanner::workout::{DslParser, SportType};
    /// use zoneplanner::zones::ZoneConfig;
    ///
    /// let config = ZoneConfig::default();
    /// let parser = DslParser::new(&config, SportType::Running);
    /// let (workout, warnings) = parser.parse_workout("W01S01 Easy", "warmup: 10min @ Z1\ncooldown: lap-button");
    /// assert_eq!(workout.len(), 2);
    /// assert!(warnings.is_empty());
    /// ```
    pub fn parse_workout(&self, name: &str, text: &str) -> (Workout, Vec<DslError>) {
        let block = self.parse(text);
        let workout = Workout::new(self.sport, name).with_steps(block.steps);
        (workout, block.warnings)
    }

    /// Parses a block into top-level steps.
    pub fn parse(&self, text: &str) -> ParsedBlock {
        let mut block = ParsedBlock::default();
        let mut stack: Vec<OpenRepeat> = Vec::new();

        for (index, raw) in text.lines().enumerate() {
            let line = index + 1;
            let content = raw.trim();
            if content.is_empty() || content.starts_with('#') {
                continue;
            }

            let indent = indentation(raw);
            while stack.last().map_or(false, |open| indent <= open.indent) {
                close_repeat(&mut stack, &mut block);
            }

            if is_repeat_line(content) {
                let group = self.parse_repeat(line, content, &mut block.warnings);
                stack.push(OpenRepeat { indent, line, group });
                continue;
            }

            if let Some(step) = self.parse_step(line, content, &mut block.warnings) {
                match stack.last_mut() {
                    Some(open) => open.group.add_step(step),
                    None => push_ordered(&mut block.steps, step),
                }
            }
        }

        while !stack.is_empty() {
            close_repeat(&mut stack, &mut block);
        }

        for warning in &block.warnings {
            warn!("{}", warning);
        }
        debug!(
            "Parsed {} top-level steps with {} warnings",
            block.steps.len(),
            block.warnings.len()
        );

        block
    }

    fn parse_repeat(&self, line: usize, content: &str, warnings: &mut Vec<DslError>) -> RepeatGroup {
        let (head, description) = split_description(content);
        let count_text = head["repeat".len()..].trim().trim_matches(':').trim();

        let iterations = match count_text.parse::<u32>() {
            Ok(count) if count > 0 => count,
            _ => {
                warnings.push(DslError::InvalidRepeatCount {
                    line,
                    text: count_text.to_string(),
                });
                1
            }
        };

        let mut group = RepeatGroup::new(iterations);
        group.description = description.to_string();
        group
    }

    /// Parses one `type: value [@ target] [-- description]` line.
    ///
    /// Returns `None` when the line has to be skipped; the reason is pushed
    /// onto `warnings` together with any fallback that was applied.
    pub fn parse_step(&self, line: usize, content: &str, warnings: &mut Vec<DslError>) -> Option<WorkoutStep> {
        let Some((type_text, rest)) = content.split_once(':') else {
            warnings.push(DslError::MissingSeparator {
                line,
                text: content.to_string(),
            });
            return None;
        };

        let step_type = match type_text.trim().parse::<StepType>() {
            Ok(StepType::Repeat) | Err(_) => {
                warnings.push(DslError::UnknownStepType {
                    line,
                    step_type: type_text.trim().to_string(),
                });
                return None;
            }
            Ok(step_type) => step_type,
        };

        let (body, description) = split_description(rest);
        let (value, target) = match body.split_once('@') {
            Some((value, target)) => (value, Some(target)),
            None => (body, None),
        };

        let end = parse_end_condition(line, value, warnings);
        let target = match target {
            Some(token) => self.parse_target(line, token, warnings),
            None => Target::none(),
        };

        Some(
            WorkoutStep::new(step_type, end)
                .with_target(target)
                .with_description(description),
        )
    }

    /// Reads a target token: a configured zone name or a raw range.
    pub fn parse_target(&self, line: usize, token: &str, warnings: &mut Vec<DslError>) -> Target {
        let token = token.trim();
        if token.is_empty() {
            return Target::none();
        }

        if self.resolver.lookup(self.sport, token).is_some() {
            match self.resolver.resolve(self.sport, token) {
                Ok(target) => return target,
                Err(e) => debug!("Zone '{}' is configured but invalid: {}", token, e),
            }
        } else if let Some(target) = self.parse_raw_target(token) {
            return target;
        }

        let fallback = self.fallback_target(token);
        warnings.push(DslError::InvalidTarget {
            line,
            target: token.to_string(),
            fallback: format!(
                "{} {}-{}",
                fallback.kind,
                format_number(fallback.from_value),
                format_number(fallback.to_value)
            ),
        });
        fallback
    }

    /// Parses a literal range such as `5:00-5:30`, `140-150 bpm` or `<125 W`.
    ///
    /// A trailing `@hr` or `@pwr` marks a bare range as heart rate or power.
    fn parse_raw_target(&self, token: &str) -> Option<Target> {
        let lower = token.to_ascii_lowercase();
        let (text, marked) = if let Some(rest) = lower.strip_suffix("@hr") {
            (rest.trim_end(), Some(ZoneFamily::HeartRate))
        } else if let Some(rest) = lower.strip_suffix("@pwr") {
            (rest.trim_end(), Some(ZoneFamily::Power))
        } else {
            (lower.as_str(), None)
        };
        let family = marked.unwrap_or_else(|| infer_family(text, self.sport));

        let zone = Zone::parse(token, family, text).ok()?;
        let config = self.resolver.config();
        let target = match family {
            ZoneFamily::Pace => {
                let (fastest, slowest) = zone.nominal_bounds(0.0);
                Target::pace(pace_to_speed(slowest), pace_to_speed(fastest))
            }
            ZoneFamily::HeartRate => {
                let (low, high) = zone.nominal_bounds(config.max_hr());
                Target::heart_rate(low, high)
            }
            ZoneFamily::Power => {
                let (low, high) = zone.nominal_bounds(config.ftp());
                Target::power(low, high)
            }
        };
        Some(target)
    }

    /// Target used when a token names no known zone and is not a range.
    fn fallback_target(&self, token: &str) -> Target {
        if token.ends_with(HEART_RATE_SUFFIX) {
            Target::heart_rate(120.0, 140.0)
        } else if self.sport == SportType::Cycling {
            Target::power(200.0, 250.0)
        } else {
            Target::pace(2.5, 3.0)
        }
    }
}

fn close_repeat(stack: &mut Vec<OpenRepeat>, block: &mut ParsedBlock) {
    let Some(open) = stack.pop() else {
        return;
    };

    if open.group.steps.is_empty() {
        block.warnings.push(DslError::EmptyRepeat { line: open.line });
        return;
    }

    let step = WorkoutStep::from(open.group);
    match stack.last_mut() {
        Some(parent) => parent.group.add_step(step),
        None => push_ordered(&mut block.steps, step),
    }
}

/// Zone family of an unmarked literal range, from its units.
fn infer_family(text: &str, sport: SportType) -> ZoneFamily {
    if text.contains("bpm") || text.contains("max_hr") {
        ZoneFamily::HeartRate
    } else if text.ends_with('w') || text.contains("ftp") || text.starts_with('<') || text.ends_with('+') {
        ZoneFamily::Power
    } else if text.contains(':') {
        ZoneFamily::Pace
    } else if sport == SportType::Cycling {
        ZoneFamily::Power
    } else {
        ZoneFamily::HeartRate
    }
}

fn indentation(raw: &str) -> usize {
    raw.chars()
        .take_while(|c| c.is_whitespace())
        .map(|c| if c == '\t' { TAB_WIDTH } else { 1 })
        .sum()
}

fn is_repeat_line(content: &str) -> bool {
    let lower = content.to_ascii_lowercase();
    lower
        .strip_prefix("repeat")
        .map_or(false, |rest| rest.starts_with(|c: char| c == ':' || c.is_whitespace()))
}

/// Splits off a trailing `-- description`.
fn split_description(text: &str) -> (&str, &str) {
    match text.split_once("--") {
        Some((body, description)) => (body.trim(), description.trim()),
        None => (text.trim(), ""),
    }
}

/// Reads `lap-button`, `Nmin`, `N:SSmin`, `Ns`, `Nkm` or `Nm`.
fn parse_end_condition(line: usize, value: &str, warnings: &mut Vec<DslError>) -> EndCondition {
    let text = value.trim().to_ascii_lowercase();
    let mut invalid = |fallback: EndCondition, label: &str| {
        warnings.push(DslError::InvalidValue {
            line,
            value: value.trim().to_string(),
            fallback: label.to_string(),
        });
        fallback
    };

    if text == "lap-button" || text == "lap.button" {
        return EndCondition::LapButton;
    }

    if let Some(minutes) = text.strip_suffix("min") {
        let seconds = match minutes.split_once(':') {
            Some((m, s)) => match (m.trim().parse::<u32>(), s.trim().parse::<u32>()) {
                (Ok(m), Ok(s)) if s < 60 => m.checked_mul(60).and_then(|total| total.checked_add(s)),
                _ => None,
            },
            None => minutes
                .trim()
                .parse::<f64>()
                .ok()
                .map(|m| (m * 60.0).round())
                .filter(|seconds| seconds.is_finite() && (0.0..=f64::from(u32::MAX)).contains(seconds))
                .map(|seconds| seconds as u32),
        };
        return match seconds {
            Some(seconds) => EndCondition::Time { seconds },
            None => invalid(
                EndCondition::Time {
                    seconds: FALLBACK_MINUTES_SECONDS,
                },
                "1min",
            ),
        };
    }

    if let Some(kilometers) = text.strip_suffix("km") {
        return match parse_positive(kilometers) {
            Some(km) => EndCondition::Distance {
                meters: (km * 1_000_000.0).round() / 1000.0,
            },
            None => invalid(
                EndCondition::Distance {
                    meters: FALLBACK_KILOMETERS_METERS,
                },
                "1km",
            ),
        };
    }

    if let Some(meters) = text.strip_suffix('m') {
        return match parse_positive(meters) {
            Some(meters) => EndCondition::Distance { meters },
            None => invalid(
                EndCondition::Distance {
                    meters: FALLBACK_METERS,
                },
                "100m",
            ),
        };
    }

    if let Some(seconds) = text.strip_suffix('s') {
        return match seconds.trim().parse::<u32>() {
            Ok(seconds) => EndCondition::Time { seconds },
            Err(_) => invalid(
                EndCondition::Time {
                    seconds: FALLBACK_SECONDS,
                },
                "30s",
            ),
        };
    }

    invalid(EndCondition::LapButton, "lap-button")
}

fn parse_positive(text: &str) -> Option<f64> {
    text.trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite() && *value >= 0.0)
}
