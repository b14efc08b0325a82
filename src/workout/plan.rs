//! Plan Files
//!
//! A plan file is a YAML document holding a list of workouts written in the
//! step DSL, optionally together with the zones they refer to:
//!
//! ```yaml
//! name_prefix: "10K "
//! workouts:
//!   - name: W01S01 Easy
//!     sport: running
//!     date: 2026-05-05
//!     steps: |
//!       warmup: 10min @ Z1
//!       repeat 4:
//!           interval: 1km @ Z4
//!           recovery: 2min
//!       cooldown: lap-button
//! ```

use std::fs;
use std::path::Path;

use chrono::NaiveDate;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::model::{SportType, Workout};
use super::parser::{DslError, DslParser};
use super::writer::DslWriter;
use crate::zones::ZoneConfig;

/// Errors raised while loading, saving or scheduling a plan.
#[derive(Debug, Error)]
pub enum PlanError {
    #[error("Failed to read plan file '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write plan file '{path}': {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse plan YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid date '{0}': expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("Invalid training day {0}: expected 0 (Monday) to 6 (Sunday)")]
    InvalidDay(u8),

    #[error("No training days selected")]
    NoTrainingDays,

    #[error("No workouts for week {0} in the plan")]
    EmptyWeek(u32),

    #[error("No workout name follows the W##S## scheme")]
    NoWeeks,
}

/// Parses a `YYYY-MM-DD` date.
pub fn parse_date(text: &str) -> Result<NaiveDate, PlanError> {
    NaiveDate::parse_from_str(text.trim(), "%Y-%m-%d").map_err(|_| PlanError::InvalidDate(text.to_string()))
}

/// One workout of a plan file.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct PlanEntry {
    pub name: String,
    pub sport: SportType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    /// Step DSL block
    #[serde(default)]
    pub steps: String,
}

/// A DSL problem found while building a plan workout.
#[derive(Debug, Clone, PartialEq)]
pub struct EntryWarning {
    pub workout: String,
    pub error: DslError,
}

impl std::fmt::Display for EntryWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.workout, self.error)
    }
}

/// Parsed plan file.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct PlanFile {
    /// Zones the plan was written against; overrides the configuration
    #[serde(
        default,
        deserialize_with = "crate::zones::config::deserialize_merged",
        skip_serializing_if = "Option::is_none"
    )]
    pub zones: Option<ZoneConfig>,
    /// Prefix added to workout names on export
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name_prefix: String,
    #[serde(default)]
    pub workouts: Vec<PlanEntry>,
}

impl PlanFile {
    /// Loads a plan from a YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, PlanError> {
        let path = path.as_ref();
        info!("Loading plan from: {}", path.display());

        let content = fs::read_to_string(path).map_err(|source| PlanError::Read {
            path: path.display().to_string(),
            source,
        })?;
        debug!("Plan content loaded ({} bytes)", content.len());

        let plan = Self::from_yaml_str(&content)?;
        info!("Parsed {} workouts", plan.workouts.len());
        Ok(plan)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), PlanError> {
        let path = path.as_ref();
        fs::write(path, self.to_yaml_string()?).map_err(|source| PlanError::Write {
            path: path.display().to_string(),
            source,
        })?;
        info!("Saved {} workouts to: {}", self.workouts.len(), path.display());
        Ok(())
    }

    pub fn from_yaml_str(content: &str) -> Result<Self, PlanError> {
        Ok(serde_yaml::from_str(content)?)
    }

    pub fn to_yaml_string(&self) -> Result<String, PlanError> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Writes workouts back into plan entries.
    ///
    /// Targets carrying a zone label are written by name, the rest as raw
    /// ranges.
    pub fn from_workouts(workouts: &[Workout]) -> Self {
        let writer = DslWriter::new();
        Self {
            zones: None,
            name_prefix: String::new(),
            workouts: workouts
                .iter()
                .map(|workout| PlanEntry {
                    name: workout.name.clone(),
                    sport: workout.sport_type,
                    description: workout.description.clone(),
                    date: workout.scheduled_date,
                    steps: writer.write_workout(workout),
                })
                .collect(),
        }
    }

    /// Embeds the zones the plan refers to.
    pub fn with_zones(mut self, zones: ZoneConfig) -> Self {
        self.zones = Some(zones);
        self
    }

    /// The plan's own zones when present, otherwise `fallback`.
    pub fn zone_config<'a>(&'a self, fallback: &'a ZoneConfig) -> &'a ZoneConfig {
        self.zones.as_ref().unwrap_or(fallback)
    }

    /// Parses every entry into a workout.
    ///
    /// DSL problems never drop a workout; they are returned alongside.
    pub fn build_workouts(&self, config: &ZoneConfig) -> (Vec<Workout>, Vec<EntryWarning>) {
        let config = self.zone_config(config);
        let mut warnings = Vec::new();

        let workouts = self
            .workouts
            .iter()
            .map(|entry| {
                let parser = DslParser::new(config, entry.sport);
                let (mut workout, errors) = parser.parse_workout(&entry.name, &entry.steps);
                if let Some(description) = &entry.description {
                    workout = workout.with_description(description.clone());
                }
                workout.scheduled_date = entry.date;

                warnings.extend(errors.into_iter().map(|error| EntryWarning {
                    workout: entry.name.clone(),
                    error,
                }));
                workout
            })
            .collect();

        (workouts, warnings)
    }

    /// Name a workout is exported under.
    ///
    /// The plan's `name_prefix` wins over `planning.name_prefix` of the
    /// configuration. A name already carrying the prefix is left alone.
    pub fn export_name(&self, name: &str, config: &ZoneConfig) -> String {
        let prefix = if self.name_prefix.is_empty() {
            config.planning.name_prefix.as_str()
        } else {
            self.name_prefix.as_str()
        };

        if prefix.is_empty() || name.starts_with(prefix) {
            name.to_string()
        } else {
            format!("{}{}", prefix, name)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workout::model::TargetKind;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const PLAN: &str = r#"
name_prefix: "10K "
workouts:
  - name: W01S01 Easy
    sport: running
    date: 2026-05-05
    steps: |
      warmup: 10min @ Z1
      repeat 4:
          interval: 1km @ Z4
          recovery: 2min
      cooldown: lap-button
  - name: W01S02 Spin
    sport: cycling
    description: Steady ride
    steps: |
      interval: 45min @ Z2
"#;

    #[test]
    fn test_parse_plan() {
        let plan = PlanFile::from_yaml_str(PLAN).unwrap();

        assert_eq!(plan.workouts.len(), 2);
        assert_eq!(plan.workouts[0].date, Some(NaiveDate::from_ymd_opt(2026, 5, 5).unwrap()));
        assert_eq!(plan.workouts[1].sport, SportType::Cycling);
        let config = ZoneConfig::default();
        assert_eq!(plan.export_name("W01S01 Easy", &config), "10K W01S01 Easy");
        assert_eq!(plan.export_name("10K W01S01 Easy", &config), "10K W01S01 Easy");
    }

    #[test]
    fn test_export_name_falls_back_to_config_prefix() {
        let plan = PlanFile::default();
        let mut config = ZoneConfig::default();
        assert_eq!(plan.export_name("Easy", &config), "Easy");

        config.planning.name_prefix = "HM ".to_string();
        assert_eq!(plan.export_name("Easy", &config), "HM Easy");

        let prefixed = PlanFile {
            name_prefix: "10K ".to_string(),
            ..PlanFile::default()
        };
        assert_eq!(prefixed.export_name("Easy", &config), "10K Easy");
    }

    #[test]
    fn test_build_workouts() {
        let plan = PlanFile::from_yaml_str(PLAN).unwrap();
        let (workouts, warnings) = plan.build_workouts(&ZoneConfig::default());

        assert!(warnings.is_empty());
        assert_eq!(workouts[0].step_count(), 5);
        assert!(workouts[0].scheduled_date.is_some());
        assert_eq!(workouts[1].description.as_deref(), Some("Steady ride"));
        assert_eq!(workouts[1].steps[0].target().unwrap().kind, TargetKind::PowerZone);
    }

    #[test]
    fn test_build_uses_embedded_zones() {
        let mut zones = ZoneConfig::default();
        zones.sports.cycling.power_values.insert("Z2", "100-120");
        let plan = PlanFile::from_yaml_str(PLAN).unwrap().with_zones(zones);

        let (workouts, _) = plan.build_workouts(&ZoneConfig::default());
        let target = workouts[1].steps[0].target().unwrap();
        assert_eq!((target.from_value, target.to_value), (100.0, 120.0));
    }

    #[test]
    fn test_embedded_zones_merge_over_stock() {
        let yaml = format!("zones:\n  sports:\n    cycling:\n      power_values:\n        Z2: \"100-120\"\n{}", PLAN.trim_start());
        let plan = PlanFile::from_yaml_str(&yaml).unwrap();
        let zones = plan.zones.as_ref().unwrap();

        assert_eq!(zones.sports.cycling.power_values.get("Z2"), Some("100-120"));
        assert_eq!(zones.sports.cycling.power_values.get("Z3"), Some("215-250"));
        assert_eq!(zones.heart_rates.get("Z1_HR"), Some("62-76% max_hr"));
    }

    #[test]
    fn test_build_collects_warnings() {
        let plan = PlanFile::from_yaml_str(
            "workouts:\n  - name: Broken\n    sport: swimming\n    steps: \"warmup 200m\\nrest: 30s\"\n",
        )
        .unwrap();

        let (workouts, warnings) = plan.build_workouts(&ZoneConfig::default());
        assert_eq!(workouts[0].len(), 1);
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].workout, "Broken");
        assert_eq!(warnings[0].error.line(), 1);
    }

    #[test]
    fn test_from_workouts_round_trip() {
        let config = ZoneConfig::default();
        let plan = PlanFile::from_yaml_str(PLAN).unwrap();
        let (workouts, _) = plan.build_workouts(&config);

        let rewritten = PlanFile::from_workouts(&workouts);
        let (rebuilt, warnings) = rewritten.build_workouts(&config);

        assert!(warnings.is_empty());
        assert_eq!(rebuilt, workouts);
    }

    #[test]
    fn test_load_and_save() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(PLAN.as_bytes()).unwrap();

        let plan = PlanFile::load(file.path()).unwrap();
        let out = NamedTempFile::new().unwrap();
        plan.save(out.path()).unwrap();

        assert_eq!(PlanFile::load(out.path()).unwrap(), plan);
    }

    #[test]
    fn test_load_missing_file() {
        assert!(matches!(PlanFile::load("/nonexistent/plan.yaml"), Err(PlanError::Read { .. })));
    }

    #[test]
    fn test_parse_date() {
        assert_eq!(parse_date("2026-05-17").unwrap(), NaiveDate::from_ymd_opt(2026, 5, 17).unwrap());
        assert!(matches!(parse_date("17/05/2026"), Err(PlanError::InvalidDate(_))));
    }
}
