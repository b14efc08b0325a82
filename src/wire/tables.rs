//! Wire Enumerations
//!
//! Fixed `(key, id)` tables the remote platform uses for sports, step types,
//! end conditions and target types. Ids are emitted verbatim; on decode the
//! key is authoritative and the id is only consulted when the key is unknown.

use crate::workout::{EndConditionKind, SportType, StepType, TargetKind};

/// One enumeration table.
#[derive(Debug)]
pub struct WireTable<T: 'static> {
    /// Name used in error messages
    pub name: &'static str,
    entries: &'static [(T, u32, &'static str)],
}

impl<T: Copy + PartialEq + 'static> WireTable<T> {
    pub fn id(&self, value: T) -> u32 {
        self.entry(value).map_or(0, |(_, id, _)| *id)
    }

    pub fn key(&self, value: T) -> &'static str {
        self.entry(value).map_or("", |(_, _, key)| *key)
    }

    pub fn by_key(&self, key: &str) -> Option<T> {
        self.entries
            .iter()
            .find(|(_, _, candidate)| *candidate == key)
            .map(|(value, _, _)| *value)
    }

    pub fn by_id(&self, id: u32) -> Option<T> {
        self.entries
            .iter()
            .find(|(_, candidate, _)| *candidate == id)
            .map(|(value, _, _)| *value)
    }

    /// Looks the key up first, falling back to the id.
    pub fn lookup(&self, key: &str, id: u32) -> Option<T> {
        self.by_key(key).or_else(|| self.by_id(id))
    }

    fn entry(&self, value: T) -> Option<&(T, u32, &'static str)> {
        self.entries.iter().find(|(candidate, _, _)| *candidate == value)
    }
}

pub static SPORT_TYPES: WireTable<SportType> = WireTable {
    name: "sport type",
    entries: &[
        (SportType::Running, 1, "running"),
        (SportType::Cycling, 2, "cycling"),
        (SportType::Swimming, 4, "swimming"),
    ],
};

pub static STEP_TYPES: WireTable<StepType> = WireTable {
    name: "step type",
    entries: &[
        (StepType::Warmup, 1, "warmup"),
        (StepType::Cooldown, 2, "cooldown"),
        (StepType::Interval, 3, "interval"),
        (StepType::Recovery, 4, "recovery"),
        (StepType::Rest, 5, "rest"),
        (StepType::Repeat, 6, "repeat"),
        (StepType::Other, 7, "other"),
    ],
};

pub static END_CONDITIONS: WireTable<EndConditionKind> = WireTable {
    name: "end condition",
    entries: &[
        (EndConditionKind::LapButton, 1, "lap.button"),
        (EndConditionKind::Time, 2, "time"),
        (EndConditionKind::Distance, 3, "distance"),
        (EndConditionKind::Iterations, 7, "iterations"),
    ],
};

pub static TARGET_TYPES: WireTable<TargetKind> = WireTable {
    name: "target type",
    entries: &[
        (TargetKind::NoTarget, 1, "no.target"),
        (TargetKind::PowerZone, 2, "power.zone"),
        (TargetKind::CadenceZone, 3, "cadence.zone"),
        (TargetKind::HeartRateZone, 4, "heart.rate.zone"),
        (TargetKind::SpeedZone, 5, "speed.zone"),
        (TargetKind::PaceZone, 6, "pace.zone"),
    ],
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_stable() {
        assert_eq!(SPORT_TYPES.id(SportType::Swimming), 4);
        assert_eq!(STEP_TYPES.id(StepType::Repeat), 6);
        assert_eq!(END_CONDITIONS.id(EndConditionKind::Iterations), 7);
        assert_eq!(TARGET_TYPES.id(TargetKind::PaceZone), 6);
        assert_eq!(TARGET_TYPES.id(TargetKind::HeartRateZone), 4);
    }

    #[test]
    fn test_keys_match_model_keys() {
        for sport in SportType::ALL {
            assert_eq!(SPORT_TYPES.key(sport), sport.key());
        }
        for step_type in StepType::ALL {
            assert_eq!(STEP_TYPES.key(step_type), step_type.key());
        }
        for kind in EndConditionKind::ALL {
            assert_eq!(END_CONDITIONS.key(kind), kind.key());
        }
        for kind in TargetKind::ALL {
            assert_eq!(TARGET_TYPES.key(kind), kind.key());
        }
    }

    #[test]
    fn test_lookup_prefers_key() {
        assert_eq!(STEP_TYPES.lookup("cooldown", 1), Some(StepType::Cooldown));
        assert_eq!(STEP_TYPES.lookup("", 3), Some(StepType::Interval));
        assert_eq!(STEP_TYPES.lookup("bogus", 99), None);
    }
}
