//! Zone Module
//!
//! Training zone configuration and resolution: loading the zone tables,
//! parsing zone strings, and translating between zone names and numeric
//! targets.

pub mod config;
pub mod resolver;
pub mod units;
pub mod zone;

pub use config::{ConfigError, HrMargins, PlanningConfig, SportConfig, SportMargins, ZoneConfig, ZoneTable};
pub use resolver::ZoneResolver;
pub use units::{validate_heart_rate, validate_pace, validate_power};
pub use zone::{Bounds, Zone, ZoneError, ZoneFamily, ZoneValue};
