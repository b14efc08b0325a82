//! Zone Configuration
//!
//! Serde model of the zone configuration file. The layout follows the stock
//! configuration:
//!
//! ```yaml
//! sports:
//!   running:
//!     paces:
//!       Z1: "6:30-6:00"
//!       threshold: "5:10-4:50"
//!     margins:
//!       faster: "0:05"
//!       slower: "0:05"
//!   cycling:
//!     power_values:
//!       ftp: 250
//!       Z6: "375+"
//!     margins:
//!       power_up: 10
//!       power_down: 10
//! heart_rates:
//!   max_hr: 180
//!   Z2_HR: "76-85% max_hr"
//! hr_margins:
//!   hr_up: 5
//!   hr_down: 5
//! ```
//!
//! The file is merged key by key over the stock configuration: missing
//! sections and zones keep their stock values, new zones are appended after
//! the stock ones. Zone tables keep their insertion order since reverse zone
//! lookup returns the first match.

use std::fmt;
use std::fs;
use std::path::Path;

use log::{debug, info, warn};
use serde::de::Deserializer;
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use serde_yaml::{Mapping, Value};
use thiserror::Error;

use super::units::parse_pace_seconds;
use super::zone::{Zone, ZoneError, ZoneFamily};
use crate::workout::SportType;

/// Settings stored in zone tables that are not zones themselves.
pub const RESERVED_KEYS: [&str; 3] = ["max_hr", "rest_hr", "ftp"];

const DEFAULT_MAX_HR: f64 = 180.0;
const DEFAULT_REST_HR: f64 = 60.0;
const DEFAULT_FTP: f64 = 250.0;
const DEFAULT_PACE_MARGIN: &str = "0:05";
const DEFAULT_PACE_MARGIN_SECONDS: f64 = 5.0;
const DEFAULT_POWER_MARGIN: f64 = 10.0;
const DEFAULT_HR_MARGIN: f64 = 5.0;

/// Errors raised while loading, saving or validating the configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write config file '{path}': {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid zone '{name}' in {section}: {source}")]
    InvalidZone {
        section: String,
        name: String,
        #[source]
        source: ZoneError,
    },

    #[error("Invalid setting '{name}': '{value}'")]
    InvalidSetting { name: String, value: String },
}

/// Ordered mapping from zone name to its unit-specific string.
///
/// Numbers in the source file are kept as their string form so that
/// `ftp: 250` and `ftp: "250"` mean the same thing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ZoneTable {
    entries: Vec<(String, String)>,
}

impl ZoneTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a table from `(name, value)` pairs in order.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut table = Self::new();
        for (name, value) in pairs {
            table.insert(name, value);
        }
        table
    }

    /// Sets a value, keeping the position of an existing entry.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(existing, _)| *existing == name) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((name, value)),
        }
    }

    pub fn remove(&mut self, name: &str) -> Option<String> {
        let index = self.entries.iter().position(|(existing, _)| existing == name)?;
        Some(self.entries.remove(index).1)
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, value)| value.as_str())
    }

    /// Numeric value of an entry such as `max_hr` or `ftp`.
    pub fn number(&self, name: &str) -> Option<f64> {
        self.get(name).and_then(|value| value.trim().parse().ok())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(name, value)| (name.as_str(), value.as_str()))
    }

    /// Entries that describe zones, skipping reserved settings.
    pub fn zone_entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.iter().filter(|(name, _)| !RESERVED_KEYS.contains(name))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for ZoneTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, value) in &self.entries {
            match value.parse::<i64>() {
                Ok(number) => map.serialize_entry(name, &number)?,
                Err(_) => map.serialize_entry(name, value)?,
            }
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for ZoneTable {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let mapping = Mapping::deserialize(deserializer)?;
        let mut table = ZoneTable::new();

        for (key, value) in mapping {
            let name = scalar_to_string(&key)
                .ok_or_else(|| serde::de::Error::custom("zone names must be strings or numbers"))?;
            let value = scalar_to_string(&value).ok_or_else(|| {
                serde::de::Error::custom(format!("zone '{}' must have a string or number value", name))
            })?;
            table.insert(name, value);
        }

        Ok(table)
    }
}

/// Deserializes optional embedded zones, merged over the stock values.
pub fn deserialize_merged<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<ZoneConfig>, D::Error> {
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(overlay) => ZoneConfig::from_yaml_value(overlay)
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}

/// Merges `overlay` into `base`, recursing into mappings.
///
/// Existing keys keep their position; a null overlay value keeps the base.
fn merge_values(base: &mut Value, overlay: Value) {
    match (base, overlay) {
        (Value::Mapping(base), Value::Mapping(overlay)) => {
            for (key, value) in overlay {
                match base.get_mut(&key) {
                    Some(existing) => merge_values(existing, value),
                    None => {
                        base.insert(key, value);
                    }
                }
            }
        }
        (_, Value::Null) => {}
        (base, overlay) => *base = overlay,
    }
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Margins applied to single-value zones of one sport.
///
/// Pace margins are `m:ss` deltas, power margins are watts. Missing values
/// fall back to the stock margins.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SportMargins {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub faster: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slower: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub power_up: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub power_down: Option<f64>,
}

impl SportMargins {
    fn pace_margins() -> Self {
        Self {
            faster: Some(DEFAULT_PACE_MARGIN.to_string()),
            slower: Some(DEFAULT_PACE_MARGIN.to_string()),
            ..Self::default()
        }
    }

    fn power_margins() -> Self {
        Self {
            power_up: Some(DEFAULT_POWER_MARGIN),
            power_down: Some(DEFAULT_POWER_MARGIN),
            ..Self::default()
        }
    }

    /// Faster pace margin in seconds.
    pub fn faster_seconds(&self) -> f64 {
        pace_margin_seconds("faster", self.faster.as_deref())
    }

    /// Slower pace margin in seconds.
    pub fn slower_seconds(&self) -> f64 {
        pace_margin_seconds("slower", self.slower.as_deref())
    }

    pub fn power_up(&self) -> f64 {
        self.power_up.unwrap_or(DEFAULT_POWER_MARGIN)
    }

    pub fn power_down(&self) -> f64 {
        self.power_down.unwrap_or(DEFAULT_POWER_MARGIN)
    }
}

fn pace_margin_seconds(name: &str, margin: Option<&str>) -> f64 {
    match margin {
        None => DEFAULT_PACE_MARGIN_SECONDS,
        Some(text) => match parse_pace_seconds(text) {
            Ok(seconds) => f64::from(seconds),
            Err(e) => {
                warn!("Ignoring {} pace margin: {}", name, e);
                DEFAULT_PACE_MARGIN_SECONDS
            }
        },
    }
}

/// Zones and margins of one sport.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SportConfig {
    #[serde(default, skip_serializing_if = "ZoneTable::is_empty")]
    pub paces: ZoneTable,
    #[serde(default, skip_serializing_if = "ZoneTable::is_empty")]
    pub power_values: ZoneTable,
    #[serde(default)]
    pub margins: SportMargins,
}

/// Per-sport sections.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SportsConfig {
    #[serde(default = "default_running")]
    pub running: SportConfig,
    #[serde(default = "default_cycling")]
    pub cycling: SportConfig,
    #[serde(default = "default_swimming")]
    pub swimming: SportConfig,
}

impl Default for SportsConfig {
    fn default() -> Self {
        Self {
            running: default_running(),
            cycling: default_cycling(),
            swimming: default_swimming(),
        }
    }
}

fn default_running() -> SportConfig {
    SportConfig {
        paces: ZoneTable::from_pairs([
            ("Z1", "6:30-6:00"),
            ("Z2", "6:00-5:30"),
            ("Z3", "5:30-5:00"),
            ("Z4", "5:00-4:30"),
            ("Z5", "4:30-4:00"),
            ("recovery", "7:00-6:30"),
            ("threshold", "5:10-4:50"),
            ("marathon", "5:20-5:10"),
            ("race_pace", "5:10-4:50"),
        ]),
        power_values: ZoneTable::new(),
        margins: SportMargins::pace_margins(),
    }
}

fn default_cycling() -> SportConfig {
    SportConfig {
        paces: ZoneTable::new(),
        power_values: ZoneTable::from_pairs([
            ("ftp", "250"),
            ("Z1", "125-175"),
            ("Z2", "175-215"),
            ("Z3", "215-250"),
            ("Z4", "250-300"),
            ("Z5", "300-375"),
            ("Z6", "375+"),
            ("recovery", "<125"),
            ("threshold", "235-265"),
            ("sweet_spot", "220-235"),
        ]),
        margins: SportMargins::power_margins(),
    }
}

fn default_swimming() -> SportConfig {
    SportConfig {
        paces: ZoneTable::from_pairs([
            ("Z1", "2:30-2:15"),
            ("Z2", "2:15-2:00"),
            ("Z3", "2:00-1:45"),
            ("Z4", "1:45-1:30"),
            ("Z5", "1:30-1:15"),
            ("recovery", "2:45-2:30"),
            ("threshold", "1:55-1:40"),
            ("sprint", "1:25-1:15"),
        ]),
        power_values: ZoneTable::new(),
        margins: SportMargins::pace_margins(),
    }
}

fn default_heart_rates() -> ZoneTable {
    ZoneTable::from_pairs([
        ("max_hr", "180"),
        ("rest_hr", "60"),
        ("Z1_HR", "62-76% max_hr"),
        ("Z2_HR", "76-85% max_hr"),
        ("Z3_HR", "85-91% max_hr"),
        ("Z4_HR", "91-95% max_hr"),
        ("Z5_HR", "95-100% max_hr"),
    ])
}

/// Heart-rate margins for single-value zones, in bpm.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HrMargins {
    #[serde(default = "default_hr_margin")]
    pub hr_up: f64,
    #[serde(default = "default_hr_margin")]
    pub hr_down: f64,
}

fn default_hr_margin() -> f64 {
    DEFAULT_HR_MARGIN
}

impl Default for HrMargins {
    fn default() -> Self {
        Self {
            hr_up: DEFAULT_HR_MARGIN,
            hr_down: DEFAULT_HR_MARGIN,
        }
    }
}

/// Defaults used when scheduling a plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanningConfig {
    /// Prefix prepended to workout names on export
    #[serde(default)]
    pub name_prefix: String,
    /// Race date as `YYYY-MM-DD`; empty when unset
    #[serde(default)]
    pub race_day: String,
    /// Training days, 0 = Monday .. 6 = Sunday
    #[serde(default = "default_preferred_days")]
    pub preferred_days: Vec<u8>,
}

fn default_preferred_days() -> Vec<u8> {
    vec![1, 3, 5]
}

impl Default for PlanningConfig {
    fn default() -> Self {
        Self {
            name_prefix: String::new(),
            race_day: String::new(),
            preferred_days: default_preferred_days(),
        }
    }
}

/// Complete zone configuration.
///
/// Passed explicitly to the resolver and the DSL parser; nothing in the
/// crate reads configuration from global state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoneConfig {
    #[serde(default)]
    pub sports: SportsConfig,
    #[serde(default = "default_heart_rates")]
    pub heart_rates: ZoneTable,
    #[serde(default)]
    pub hr_margins: HrMargins,
    #[serde(default)]
    pub planning: PlanningConfig,
}

impl Default for ZoneConfig {
    fn default() -> Self {
        Self {
            sports: SportsConfig::default(),
            heart_rates: default_heart_rates(),
            hr_margins: HrMargins::default(),
            planning: PlanningConfig::default(),
        }
    }
}

impl ZoneConfig {
    /// Loads the configuration from a YAML file.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the configuration file
    ///
    /// # Returns
    ///
    /// * `Ok(ZoneConfig)` - Parsed configuration, stock values filling the gaps
    /// * `Err(ConfigError)` - The file could not be read or parsed
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        info!("Loading zone configuration from: {}", path.display());

        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        debug!("Config content loaded ({} bytes)", content.len());

        Self::from_yaml_str(&content)
    }

    /// Writes the configuration as YAML.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let content = self.to_yaml_string()?;
        fs::write(path, content).map_err(|source| ConfigError::Write {
            path: path.display().to_string(),
            source,
        })?;
        info!("Saved zone configuration to: {}", path.display());
        Ok(())
    }

    pub fn from_yaml_str(content: &str) -> Result<Self, ConfigError> {
        if content.trim().is_empty() {
            debug!("Empty configuration, using defaults");
            return Ok(Self::default());
        }

        Self::from_yaml_value(serde_yaml::from_str(content)?)
    }

    /// Builds a configuration by merging `overlay` over the stock values.
    pub fn from_yaml_value(overlay: Value) -> Result<Self, ConfigError> {
        let mut merged = serde_yaml::to_value(Self::default())?;
        merge_values(&mut merged, overlay);
        Ok(serde_yaml::from_value(merged)?)
    }

    pub fn to_yaml_string(&self) -> Result<String, ConfigError> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Section of the given sport.
    pub fn sport(&self, sport: SportType) -> &SportConfig {
        match sport {
            SportType::Running => &self.sports.running,
            SportType::Cycling => &self.sports.cycling,
            SportType::Swimming => &self.sports.swimming,
        }
    }

    pub fn sport_mut(&mut self, sport: SportType) -> &mut SportConfig {
        match sport {
            SportType::Running => &mut self.sports.running,
            SportType::Cycling => &mut self.sports.cycling,
            SportType::Swimming => &mut self.sports.swimming,
        }
    }

    pub fn max_hr(&self) -> f64 {
        self.heart_rates.number("max_hr").unwrap_or(DEFAULT_MAX_HR)
    }

    pub fn rest_hr(&self) -> f64 {
        self.heart_rates.number("rest_hr").unwrap_or(DEFAULT_REST_HR)
    }

    /// Functional threshold power from the cycling power table.
    pub fn ftp(&self) -> f64 {
        self.sports
            .cycling
            .power_values
            .number("ftp")
            .unwrap_or(DEFAULT_FTP)
    }

    /// Table and family holding the primary zones of a sport.
    pub fn primary_table(&self, sport: SportType) -> (&ZoneTable, ZoneFamily) {
        let section = self.sport(sport);
        if sport == SportType::Cycling || (section.paces.is_empty() && !section.power_values.is_empty()) {
            (&section.power_values, ZoneFamily::Power)
        } else {
            (&section.paces, ZoneFamily::Pace)
        }
    }

    /// Checks that every zone string and numeric setting parses.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for sport in SportType::ALL {
            let section = self.sport(sport);
            check_table(&format!("sports.{}.paces", sport), &section.paces, ZoneFamily::Pace)?;
            check_table(
                &format!("sports.{}.power_values", sport),
                &section.power_values,
                ZoneFamily::Power,
            )?;
            for (name, margin) in [("faster", &section.margins.faster), ("slower", &section.margins.slower)] {
                if let Some(text) = margin {
                    if parse_pace_seconds(text).is_err() {
                        return Err(ConfigError::InvalidSetting {
                            name: format!("sports.{}.margins.{}", sport, name),
                            value: text.clone(),
                        });
                    }
                }
            }
        }

        check_table("heart_rates", &self.heart_rates, ZoneFamily::HeartRate)?;

        for key in RESERVED_KEYS {
            for (section, table) in [
                ("heart_rates", &self.heart_rates),
                ("sports.cycling.power_values", &self.sports.cycling.power_values),
            ] {
                if let Some(value) = table.get(key) {
                    if value.trim().parse::<f64>().map_or(true, |v| v <= 0.0) {
                        return Err(ConfigError::InvalidSetting {
                            name: format!("{}.{}", section, key),
                            value: value.to_string(),
                        });
                    }
                }
            }
        }

        debug!("Zone configuration is valid");
        Ok(())
    }
}

fn check_table(section: &str, table: &ZoneTable, family: ZoneFamily) -> Result<(), ConfigError> {
    for (name, value) in table.zone_entries() {
        Zone::parse(name, family, value).map_err(|source| ConfigError::InvalidZone {
            section: section.to_string(),
            name: name.to_string(),
            source,
        })?;
    }
    Ok(())
}

impl fmt::Display for ZoneConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for sport in SportType::ALL {
            let (table, family) = self.primary_table(sport);
            writeln!(f, "{} ({} zones):", sport, family)?;
            for (name, value) in table.zone_entries() {
                writeln!(f, "  {:<12} {}", name, value)?;
            }
        }
        writeln!(f, "heart rate (max {}):", self.max_hr())?;
        for (name, value) in self.heart_rates.zone_entries() {
            writeln!(f, "  {:<12} {}", name, value)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config_is_valid() {
        let config = ZoneConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.max_hr(), 180.0);
        assert_eq!(config.rest_hr(), 60.0);
        assert_eq!(config.ftp(), 250.0);
        assert_eq!(config.sports.running.margins.faster_seconds(), 5.0);
        assert_eq!(config.sports.cycling.margins.power_up(), 10.0);
    }

    #[test]
    fn test_zone_table_keeps_insertion_order() {
        let yaml = "b: '1:00'\na: '2:00'\nc: 3\n";
        let table: ZoneTable = serde_yaml::from_str(yaml).unwrap();
        let names: Vec<&str> = table.iter().map(|(name, _)| name).collect();

        assert_eq!(names, vec!["b", "a", "c"]);
        assert_eq!(table.get("c"), Some("3"));
    }

    #[test]
    fn test_zone_table_insert_replaces_in_place() {
        let mut table = ZoneTable::from_pairs([("Z1", "1"), ("Z2", "2")]);
        table.insert("Z1", "10");

        assert_eq!(table.len(), 2);
        assert_eq!(table.iter().next(), Some(("Z1", "10")));
        assert_eq!(table.remove("Z2"), Some("2".to_string()));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_zone_entries_skip_reserved_keys() {
        let config = ZoneConfig::default();
        let names: Vec<&str> = config
            .sports
            .cycling
            .power_values
            .zone_entries()
            .map(|(name, _)| name)
            .collect();

        assert!(!names.contains(&"ftp"));
        assert_eq!(names.first(), Some(&"Z1"));
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let yaml = r#"
heart_rates:
  max_hr: 190
  Z2_HR: "140-150"
sports:
  running:
    paces:
      easy: "6:00"
athlete_name: ignored
"#;
        let config = ZoneConfig::from_yaml_str(yaml).unwrap();

        assert_eq!(config.max_hr(), 190.0);
        assert_eq!(config.heart_rates.get("Z2_HR"), Some("140-150"));
        assert_eq!(config.heart_rates.get("Z1_HR"), Some("62-76% max_hr"));
        assert_eq!(config.sports.running.paces.get("Z1"), Some("6:30-6:00"));
        assert_eq!(config.sports.running.paces.iter().last(), Some(("easy", "6:00")));
        assert_eq!(config.sports.running.margins.slower_seconds(), 5.0);
        assert_eq!(config.sports.cycling.power_values.get("Z6"), Some("375+"));
        assert_eq!(config.hr_margins.hr_up, 5.0);
    }

    #[test]
    fn test_single_setting_keeps_stock_zones() {
        let config = ZoneConfig::from_yaml_str("heart_rates:\n  max_hr: 190\n").unwrap();
        let names: Vec<&str> = config.heart_rates.zone_entries().map(|(name, _)| name).collect();

        assert_eq!(config.max_hr(), 190.0);
        assert_eq!(names, vec!["Z1_HR", "Z2_HR", "Z3_HR", "Z4_HR", "Z5_HR"]);
    }

    #[test]
    fn test_margins_only_keeps_power_zones() {
        let yaml = "sports:\n  cycling:\n    margins:\n      power_up: 5\n";
        let config = ZoneConfig::from_yaml_str(yaml).unwrap();
        let cycling = &config.sports.cycling;

        assert_eq!(cycling.margins.power_up(), 5.0);
        assert_eq!(cycling.margins.power_down(), 10.0);
        assert_eq!(cycling.power_values.get("Z2"), Some("175-215"));
        assert_eq!(cycling.power_values.len(), ZoneConfig::default().sports.cycling.power_values.len());
    }

    #[test]
    fn test_empty_yaml_is_default() {
        assert_eq!(ZoneConfig::from_yaml_str("  \n").unwrap(), ZoneConfig::default());
    }

    #[test]
    fn test_validate_reports_bad_zone() {
        let mut config = ZoneConfig::default();
        config.sports.running.paces.insert("Z9", "fast");

        match config.validate() {
            Err(ConfigError::InvalidZone { section, name, .. }) => {
                assert_eq!(section, "sports.running.paces");
                assert_eq!(name, "Z9");
            }
            other => panic!("expected invalid zone, got {:?}", other),
        }
    }

    #[test]
    fn test_validate_reports_bad_margin() {
        let mut config = ZoneConfig::default();
        config.sports.swimming.margins.faster = Some("five".to_string());

        assert!(matches!(config.validate(), Err(ConfigError::InvalidSetting { .. })));
    }

    #[test]
    fn test_load_and_save_round_trip() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "hr_margins:\n  hr_up: 3\n  hr_down: 4").unwrap();

        let config = ZoneConfig::load(file.path()).unwrap();
        assert_eq!(config.hr_margins.hr_up, 3.0);
        assert_eq!(config.hr_margins.hr_down, 4.0);

        let out = NamedTempFile::new().unwrap();
        config.save(out.path()).unwrap();
        let reloaded = ZoneConfig::load(out.path()).unwrap();
        assert_eq!(reloaded, config);
    }

    #[test]
    fn test_load_missing_file() {
        let result = ZoneConfig::load("/nonexistent/zones.yaml");
        assert!(matches!(result, Err(ConfigError::Read { .. })));
    }

    #[test]
    fn test_primary_table() {
        let config = ZoneConfig::default();
        assert_eq!(config.primary_table(SportType::Cycling).1, ZoneFamily::Power);
        assert_eq!(config.primary_table(SportType::Swimming).1, ZoneFamily::Pace);
    }
}
