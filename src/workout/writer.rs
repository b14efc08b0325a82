//! Workout DSL Writer
//!
//! Renders a step tree back into the text accepted by
//! [`DslParser`](super::parser::DslParser), one line per step with four
//! spaces of indentation per repeat level.

use log::debug;

use super::model::{EndCondition, SportType, StepKind, Target, TargetKind, Workout, WorkoutStep};
use crate::zones::units::{format_number, format_pace, speed_to_pace_seconds};
use crate::zones::zone::POWER_UNBOUNDED;
use crate::zones::{ZoneConfig, ZoneResolver};

const INDENT: &str = "    ";

/// Writes workouts as DSL text.
///
/// Targets are written by zone label when they carry one. A writer built
/// with [`DslWriter::with_labels`] also looks labels up for unlabelled
/// targets; the plain writer writes their numeric range.
#[derive(Debug, Clone, Copy, Default)]
pub struct DslWriter<'a> {
    resolver: Option<ZoneResolver<'a>>,
}

impl<'a> DslWriter<'a> {
    pub fn new() -> Self {
        Self { resolver: None }
    }

    /// Writer that names targets matching a configured zone.
    pub fn with_labels(config: &'a ZoneConfig) -> Self {
        Self {
            resolver: Some(ZoneResolver::new(config)),
        }
    }

    /// Renders every step of a workout, one per line.
    ///
    /// # Example
    ///
    /// ```
    /// use zoneplanner::workout::{DslWriter, EndCondition, SportType, StepType, Workout, WorkoutStep};
    ///
    /// let workout = Workout::new(SportType::Running, "Easy")
    ///     .with_steps(vec![WorkoutStep::new(StepType::Warmup, EndCondition::Time { seconds: 600 })]);
    /// assert_eq!(DslWriter::new().write_workout(&workout), "warmup: 10min");
    /// ```
    pub fn write_workout(&self, workout: &Workout) -> String {
        self.write_steps(workout.sport_type, &workout.steps)
    }

    pub fn write_steps(&self, sport: SportType, steps: &[WorkoutStep]) -> String {
        let mut lines = Vec::new();
        for step in steps {
            self.write_step(sport, step, 0, &mut lines);
        }
        lines.join("\n")
    }

    fn write_step(&self, sport: SportType, step: &WorkoutStep, depth: usize, lines: &mut Vec<String>) {
        let indent = INDENT.repeat(depth);
        match &step.kind {
            StepKind::Repeat(group) => {
                lines.push(with_description(
                    format!("{}repeat {}:", indent, group.iterations),
                    &group.description,
                ));
                for child in &group.steps {
                    self.write_step(sport, child, depth + 1, lines);
                }
            }
            StepKind::Leaf(leaf) => {
                let mut line = format!("{}{}: {}", indent, leaf.step_type, format_end_condition(&leaf.end));
                if let Some(target) = self.format_target(sport, &leaf.target) {
                    line.push_str(" @ ");
                    line.push_str(&target);
                }
                lines.push(with_description(line, &leaf.description));
            }
        }
    }

    /// Target text: the zone label when known, otherwise the raw range.
    pub fn format_target(&self, sport: SportType, target: &Target) -> Option<String> {
        if target.is_none() {
            return None;
        }
        if let Some(label) = &target.zone_label {
            return Some(label.clone());
        }
        if let Some(label) = self.resolver.and_then(|resolver| resolver.label_for(sport, target)) {
            return Some(label);
        }
        format_raw_target(target)
    }
}

fn with_description(mut line: String, description: &str) -> String {
    if !description.trim().is_empty() {
        line.push_str(" -- ");
        line.push_str(description.trim());
    }
    line
}

/// `lap-button`, `Ns`, `Nmin`, `N:SSmin`, `Nm` or `Nkm`.
pub fn format_end_condition(end: &EndCondition) -> String {
    match *end {
        EndCondition::LapButton => "lap-button".to_string(),
        EndCondition::Time { seconds } => format_duration(seconds),
        EndCondition::Distance { meters } => format_distance(meters),
    }
}

pub fn format_duration(seconds: u32) -> String {
    if seconds < 60 {
        format!("{}s", seconds)
    } else if seconds % 60 == 0 {
        format!("{}min", seconds / 60)
    } else {
        format!("{}:{:02}min", seconds / 60, seconds % 60)
    }
}

pub fn format_distance(meters: f64) -> String {
    if meters >= 1000.0 {
        format!("{}km", format_number(meters / 1000.0))
    } else {
        format!("{}m", format_number(meters))
    }
}

/// Numeric range of a target in DSL syntax.
///
/// Speed and cadence targets have no text form and yield `None`.
pub fn format_raw_target(target: &Target) -> Option<String> {
    let (low, high) = (
        target.from_value.min(target.to_value),
        target.from_value.max(target.to_value),
    );

    match target.kind {
        TargetKind::PaceZone => {
            // Lower speed is the slower pace
            let slowest = speed_to_pace_seconds(low)?;
            let fastest = speed_to_pace_seconds(high)?;
            if slowest == fastest {
                Some(format_pace(slowest))
            } else {
                Some(format!("{}-{}", format_pace(slowest), format_pace(fastest)))
            }
        }
        TargetKind::HeartRateZone => Some(if low == high {
            format!("{} bpm", format_number(low))
        } else {
            format!("{}-{} bpm", format_number(low), format_number(high))
        }),
        TargetKind::PowerZone => Some(if low <= 0.0 && high > 0.0 {
            format!("<{} W", format_number(high))
        } else if high >= POWER_UNBOUNDED {
            format!("{}+W", format_number(low))
        } else if low == high {
            format!("{} W", format_number(low))
        } else {
            format!("{}-{} W", format_number(low), format_number(high))
        }),
        TargetKind::NoTarget | TargetKind::SpeedZone | TargetKind::CadenceZone => {
            debug!("No text form for {} target", target.kind);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workout::model::StepType;
    use crate::workout::parser::DslParser;

    fn interval_workout() -> Workout {
        Workout::new(SportType::Running, "Intervals").with_steps(vec![
            WorkoutStep::new(StepType::Warmup, EndCondition::Time { seconds: 600 })
                .with_target(Target::heart_rate(111.0, 136.0).with_label("Z1_HR")),
            WorkoutStep::repeat(4).with_steps(vec![
                WorkoutStep::new(StepType::Interval, EndCondition::Distance { meters: 1000.0 })
                    .with_target(Target::pace(1000.0 / 300.0, 1000.0 / 270.0))
                    .with_description("strong"),
                WorkoutStep::new(StepType::Recovery, EndCondition::Time { seconds: 150 }),
            ]),
            WorkoutStep::new(StepType::Cooldown, EndCondition::LapButton),
        ])
    }

    #[test]
    fn test_write_repeat_indents_children() {
        let text = DslWriter::new().write_workout(&interval_workout());
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(
            lines,
            vec![
                "warmup: 10min @ Z1_HR",
                "repeat 4:",
                "    interval: 1km @ 5:00-4:30 -- strong",
                "    recovery: 2:30min",
                "cooldown: lap-button",
            ]
        );
    }

    #[test]
    fn test_write_with_labels_names_known_ranges() {
        let config = ZoneConfig::default();
        let text = DslWriter::with_labels(&config).write_workout(&interval_workout());

        assert!(text.contains("interval: 1km @ Z4 -- strong"));
    }

    #[test]
    fn test_format_values() {
        assert_eq!(format_duration(45), "45s");
        assert_eq!(format_duration(60), "1min");
        assert_eq!(format_duration(90), "1:30min");
        assert_eq!(format_distance(400.0), "400m");
        assert_eq!(format_distance(1500.0), "1.5km");
        assert_eq!(format_distance(10000.0), "10km");
    }

    #[test]
    fn test_format_raw_targets() {
        assert_eq!(format_raw_target(&Target::heart_rate(140.0, 150.0)).as_deref(), Some("140-150 bpm"));
        assert_eq!(format_raw_target(&Target::heart_rate(150.0, 150.0)).as_deref(), Some("150 bpm"));
        assert_eq!(format_raw_target(&Target::power(0.0, 125.0)).as_deref(), Some("<125 W"));
        assert_eq!(format_raw_target(&Target::power(375.0, 9999.0)).as_deref(), Some("375+W"));
        assert_eq!(format_raw_target(&Target::power(200.0, 250.0)).as_deref(), Some("200-250 W"));
        assert_eq!(format_raw_target(&Target::pace(1000.0 / 300.0, 1000.0 / 300.0)).as_deref(), Some("5:00"));
        assert_eq!(format_raw_target(&Target::new(TargetKind::CadenceZone, 80.0, 90.0)), None);
    }

    #[test]
    fn test_round_trip_through_parser() {
        let config = ZoneConfig::default();
        let original = interval_workout();
        let text = DslWriter::new().write_workout(&original);

        let (parsed, warnings) = DslParser::new(&config, SportType::Running).parse_workout("Intervals", &text);

        assert!(warnings.is_empty(), "unexpected warnings: {:?}", warnings);
        assert_eq!(parsed.step_count(), original.step_count());
        assert_eq!(DslWriter::new().write_workout(&parsed), text);

        let repeat = &parsed.steps[1];
        assert_eq!(repeat.end_condition_value(), Some(4.0));
        let interval = repeat.children()[0].target().unwrap();
        assert!((interval.from_value - 1000.0 / 300.0).abs() < 1e-9);
        assert!((interval.to_value - 1000.0 / 270.0).abs() < 1e-9);
        assert_eq!(repeat.children()[0].description(), "strong");
    }

    #[test]
    fn test_round_trip_cycling_power() {
        let config = ZoneConfig::default();
        let text = "warmup: 15min @ Z1\nrepeat 3:\n    interval: 8min @ 280 W\n    recovery: 4min @ <150 W\ninterval: 30s @ 600+W";
        let parser = DslParser::new(&config, SportType::Cycling);

        let (workout, warnings) = parser.parse_workout("Power", text);
        assert!(warnings.is_empty());
        assert_eq!(DslWriter::new().write_workout(&workout), text);
    }
}
