//! Zone Resolver
//!
//! Translates between zone names and numeric targets.
//!
//! - Forward: `"Z2"` for running becomes a pace target in m/s. Single-value
//!   zones are widened by the configured margins.
//! - Reverse: a numeric target is matched against the nominal bounds of the
//!   configured zones, bound by bound, within a fixed tolerance. The first
//!   matching zone in configuration order wins.

use log::debug;

use super::config::{ZoneConfig, ZoneTable};
use super::units::{pace_to_speed, speed_to_pace_seconds};
use super::zone::{Bounds, Zone, ZoneError, ZoneFamily, ZoneValue, POWER_UNBOUNDED};
use crate::workout::{SportType, Target, TargetKind};

/// Per-bound tolerance for pace matches, in seconds per kilometer.
pub const PACE_TOLERANCE_SECONDS: f64 = 5.0;
/// Per-bound tolerance for heart-rate matches, in bpm.
pub const HEART_RATE_TOLERANCE_BPM: f64 = 3.0;
/// Per-bound tolerance for power matches, in watts.
pub const POWER_TOLERANCE_WATTS: f64 = 2.0;

/// Suffix that marks a heart-rate zone name.
pub const HEART_RATE_SUFFIX: &str = "_HR";

/// Resolves zones against a borrowed configuration.
#[derive(Debug, Clone, Copy)]
pub struct ZoneResolver<'a> {
    config: &'a ZoneConfig,
}

impl<'a> ZoneResolver<'a> {
    pub fn new(config: &'a ZoneConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &'a ZoneConfig {
        self.config
    }

    /// Finds a zone by name for a sport.
    ///
    /// Names ending in `_HR` are looked up in the heart-rate table. Other
    /// names are looked up in the sport's primary table (power for cycling,
    /// paces otherwise) and then in the heart-rate table.
    pub fn lookup(&self, sport: SportType, name: &str) -> Option<Result<Zone, ZoneError>> {
        let name = name.trim();
        let heart_rates = (&self.config.heart_rates, ZoneFamily::HeartRate);

        let candidates = if name.ends_with(HEART_RATE_SUFFIX) {
            vec![heart_rates]
        } else {
            vec![self.config.primary_table(sport), heart_rates]
        };

        candidates.into_iter().find_map(|(table, family)| {
            table
                .zone_entries()
                .find(|(zone_name, _)| *zone_name == name)
                .map(|(zone_name, raw)| Zone::parse(zone_name, family, raw))
        })
    }

    /// Resolves a zone name into a target labelled with that name.
    ///
    /// # Example
    ///
    /// ```
    /// use zoneplanner::workout::{SportType, TargetKind};
    /// use zoneplanner::zones::{ZoneConfig, ZoneResolver};
    ///
    /// let config = ZoneConfig::default();
    /// let resolver = ZoneResolver::new(&config);
    /// let target = resolver.resolve(SportType::Cycling, "Z6").unwrap();
    /// assert_eq!(target.kind, TargetKind::PowerZone);
    /// assert_eq!((target.from_value, target.to_value), (375.0, 9999.0));
    /// ```
    pub fn resolve(&self, sport: SportType, name: &str) -> Result<Target, ZoneError> {
        let zone = self.lookup(sport, name).ok_or_else(|| ZoneError::UnknownZone {
            zone: name.trim().to_string(),
            sport: sport.to_string(),
        })??;

        let target = self.resolve_zone(sport, &zone).with_label(zone.name.clone());
        debug!(
            "Resolved {} zone '{}' ({}) to {:.3}-{:.3}",
            sport, zone.name, zone.raw, target.from_value, target.to_value
        );
        Ok(target)
    }

    /// Converts a parsed zone into numeric bounds, applying margins to
    /// single-value zones.
    pub fn resolve_zone(&self, sport: SportType, zone: &Zone) -> Target {
        match zone.value {
            ZoneValue::Pace(bounds) => self.pace_target(sport, bounds),
            ZoneValue::HeartRate { .. } => {
                let (low, high) = zone.nominal_bounds(self.config.max_hr());
                if zone.value.is_single() {
                    let margins = &self.config.hr_margins;
                    Target::heart_rate((low - margins.hr_down).max(0.0), high + margins.hr_up)
                } else {
                    Target::heart_rate(low, high)
                }
            }
            ZoneValue::Power { .. } | ZoneValue::PowerBelow(_) | ZoneValue::PowerAbove(_) => {
                let (low, high) = zone.nominal_bounds(self.config.ftp());
                if zone.value.is_single() {
                    let margins = &self.config.sport(SportType::Cycling).margins;
                    Target::power((low - margins.power_down()).max(0.0), high + margins.power_up())
                } else {
                    Target::power(low, high)
                }
            }
        }
    }

    fn pace_target(&self, sport: SportType, bounds: Bounds) -> Target {
        let (fastest, slowest) = match bounds {
            Bounds::Single(base) => {
                let margins = &self.config.sport(sport).margins;
                let fastest = base - margins.faster_seconds();
                let fastest = if fastest > 0.0 { fastest } else { base };
                (fastest, base + margins.slower_seconds())
            }
            Bounds::Range(..) => bounds.min_max(),
        };

        // Slower pace is the lower speed
        Target::pace(pace_to_speed(slowest), pace_to_speed(fastest))
    }

    /// Returns the name of the first configured zone matching the target.
    ///
    /// Only targets of the kind the sport's tables describe can match; speed
    /// and cadence targets never do.
    pub fn label_for(&self, sport: SportType, target: &Target) -> Option<String> {
        let (table, family, tolerance, reference, observed) = match target.kind {
            TargetKind::PaceZone => {
                let section = self.config.sport(sport);
                let fastest = f64::from(speed_to_pace_seconds(target.to_value.max(target.from_value))?);
                let slowest = f64::from(speed_to_pace_seconds(target.to_value.min(target.from_value))?);
                (&section.paces, ZoneFamily::Pace, PACE_TOLERANCE_SECONDS, 0.0, (fastest, slowest))
            }
            TargetKind::HeartRateZone => (
                &self.config.heart_rates,
                ZoneFamily::HeartRate,
                HEART_RATE_TOLERANCE_BPM,
                self.config.max_hr(),
                ordered(target),
            ),
            TargetKind::PowerZone => (
                &self.config.sport(SportType::Cycling).power_values,
                ZoneFamily::Power,
                POWER_TOLERANCE_WATTS,
                self.config.ftp(),
                ordered(target),
            ),
            _ => return None,
        };

        let label = first_match(table, family, tolerance, reference, observed);
        match &label {
            Some(name) => debug!("Target {:?} matches zone '{}'", observed, name),
            None => debug!("No {} zone within tolerance of {:?}", family, observed),
        }
        label
    }
}

fn ordered(target: &Target) -> (f64, f64) {
    (
        target.from_value.min(target.to_value),
        target.from_value.max(target.to_value),
    )
}

fn first_match(
    table: &ZoneTable,
    family: ZoneFamily,
    tolerance: f64,
    reference: f64,
    (low, high): (f64, f64),
) -> Option<String> {
    table.zone_entries().find_map(|(name, raw)| {
        let zone = Zone::parse(name, family, raw).ok()?;
        let (zone_low, zone_high) = zone.nominal_bounds(reference);
        let high_matches = zone_high >= POWER_UNBOUNDED && high >= POWER_UNBOUNDED
            || (high - zone_high).abs() <= tolerance;
        ((low - zone_low).abs() <= tolerance && high_matches).then(|| zone.name)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-6,
            "expected {}, got {}",
            expected,
            actual
        );
    }

    fn config_with_single_pace() -> ZoneConfig {
        let mut config = ZoneConfig::default();
        config.sports.running.paces = ZoneTable::from_pairs([("tempo", "5:00")]);
        config
    }

    #[test]
    fn test_single_pace_margins_direction() {
        let config = config_with_single_pace();
        let resolver = ZoneResolver::new(&config);

        let target = resolver.resolve(SportType::Running, "tempo").unwrap();

        assert_eq!(target.kind, TargetKind::PaceZone);
        // slower bound: 5:05 per km, faster bound: 4:55 per km
        assert_close(target.from_value, 1000.0 / 305.0);
        assert_close(target.to_value, 1000.0 / 295.0);
        assert!(target.from_value < target.to_value);
        assert_eq!(target.zone_label.as_deref(), Some("tempo"));
    }

    #[test]
    fn test_pace_range_is_order_independent() {
        let config = ZoneConfig::default();
        let resolver = ZoneResolver::new(&config);

        let target = resolver.resolve(SportType::Running, "Z2").unwrap();

        assert_close(target.from_value, 1000.0 / 360.0);
        assert_close(target.to_value, 1000.0 / 330.0);
    }

    #[test]
    fn test_heart_rate_percentages() {
        let config = ZoneConfig::default();
        let resolver = ZoneResolver::new(&config);

        let target = resolver.resolve(SportType::Running, "Z2_HR").unwrap();

        assert_eq!(target.kind, TargetKind::HeartRateZone);
        assert_eq!((target.from_value, target.to_value), (136.0, 153.0));
    }

    #[test]
    fn test_heart_rate_single_value_margins() {
        let mut config = ZoneConfig::default();
        config.heart_rates.insert("LT_HR", "160");
        config.hr_margins.hr_up = 2.0;
        config.hr_margins.hr_down = 4.0;
        let resolver = ZoneResolver::new(&config);

        let target = resolver.resolve(SportType::Swimming, "LT_HR").unwrap();

        assert_eq!((target.from_value, target.to_value), (156.0, 162.0));
    }

    #[test]
    fn test_power_special_forms() {
        let config = ZoneConfig::default();
        let resolver = ZoneResolver::new(&config);

        let below = resolver.resolve(SportType::Cycling, "recovery").unwrap();
        assert_eq!((below.from_value, below.to_value), (0.0, 125.0));

        let above = resolver.resolve(SportType::Cycling, "Z6").unwrap();
        assert_eq!((above.from_value, above.to_value), (375.0, 9999.0));
    }

    #[test]
    fn test_power_single_value_margins() {
        let mut config = ZoneConfig::default();
        config.sports.cycling.power_values.insert("climb", "280");
        config.sports.cycling.power_values.insert("tempo_pct", "80% ftp");
        let resolver = ZoneResolver::new(&config);

        let target = resolver.resolve(SportType::Cycling, "climb").unwrap();
        assert_eq!((target.from_value, target.to_value), (270.0, 290.0));

        let target = resolver.resolve(SportType::Cycling, "tempo_pct").unwrap();
        assert_eq!((target.from_value, target.to_value), (190.0, 210.0));
    }

    #[test]
    fn test_unknown_zone() {
        let config = ZoneConfig::default();
        let resolver = ZoneResolver::new(&config);

        assert_eq!(
            resolver.resolve(SportType::Running, "Z9"),
            Err(ZoneError::UnknownZone {
                zone: "Z9".to_string(),
                sport: "running".to_string()
            })
        );
    }

    #[test]
    fn test_reserved_keys_are_not_zones() {
        let config = ZoneConfig::default();
        let resolver = ZoneResolver::new(&config);

        assert!(resolver.lookup(SportType::Cycling, "ftp").is_none());
        assert!(resolver.lookup(SportType::Running, "max_hr").is_none());
    }

    #[test]
    fn test_plain_name_falls_back_to_heart_rate_table() {
        let mut config = ZoneConfig::default();
        config.heart_rates.insert("aerobic", "140-150");
        let resolver = ZoneResolver::new(&config);

        let target = resolver.resolve(SportType::Running, "aerobic").unwrap();
        assert_eq!(target.kind, TargetKind::HeartRateZone);
    }

    #[test]
    fn test_reverse_pace_within_tolerance() {
        let config = config_with_single_pace();
        let resolver = ZoneResolver::new(&config);

        let near = Target::pace(1000.0 / 302.0, 1000.0 / 298.0);
        assert_eq!(resolver.label_for(SportType::Running, &near).as_deref(), Some("tempo"));

        let wide = Target::pace(1000.0 / 310.0, 1000.0 / 290.0);
        assert_eq!(resolver.label_for(SportType::Running, &wide), None);
    }

    #[test]
    fn test_reverse_first_match_wins() {
        let config = ZoneConfig::default();
        let resolver = ZoneResolver::new(&config);

        // threshold and race_pace share the same bounds
        let target = resolver.resolve(SportType::Running, "race_pace").unwrap();
        assert_eq!(
            resolver.label_for(SportType::Running, &target).as_deref(),
            Some("threshold")
        );
    }

    #[test]
    fn test_reverse_heart_rate_and_power() {
        let config = ZoneConfig::default();
        let resolver = ZoneResolver::new(&config);

        let hr = Target::heart_rate(138.0, 151.0);
        assert_eq!(resolver.label_for(SportType::Running, &hr).as_deref(), Some("Z2_HR"));

        let hr_far = Target::heart_rate(130.0, 153.0);
        assert_eq!(resolver.label_for(SportType::Running, &hr_far), None);

        let power = Target::power(301.0, 374.0);
        assert_eq!(resolver.label_for(SportType::Cycling, &power).as_deref(), Some("Z5"));

        let open = Target::power(376.0, 9999.0);
        assert_eq!(resolver.label_for(SportType::Cycling, &open).as_deref(), Some("Z6"));
    }

    #[test]
    fn test_reverse_ignores_other_kinds() {
        let config = ZoneConfig::default();
        let resolver = ZoneResolver::new(&config);

        let cadence = Target::new(TargetKind::CadenceZone, 85.0, 95.0);
        assert_eq!(resolver.label_for(SportType::Cycling, &cadence), None);
        assert_eq!(resolver.label_for(SportType::Running, &Target::none()), None);
    }

    #[test]
    fn test_resolve_label_is_idempotent() {
        let config = ZoneConfig::default();
        let resolver = ZoneResolver::new(&config);

        let mut target = Target::power(250.0, 300.0);
        assert_eq!(target.resolve_label(&resolver, SportType::Cycling), Some("Z4"));
        assert_eq!(target.resolve_label(&resolver, SportType::Cycling), Some("Z4"));
        assert_eq!(target.zone_label.as_deref(), Some("Z4"));
    }
}
