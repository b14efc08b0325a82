//! ZonePlanner - Zone-Based Workout Authoring
//!
//! A library for writing structured endurance workouts against personal
//! training zones and exchanging them with a remote training platform.
//!
//! # Architecture
//!
//! The library is organized into three main modules:
//!
//! - [`zones`]: Zone configuration, zone string parsing and zone resolution
//! - [`workout`]: Workout model, step DSL, validation and plan scheduling
//! - [`wire`]: JSON wire format of the training platform
//!
//! # Example
//!
//! ```rust
//! use zoneplanner::workout::{DslParser, SportType};
//! use zoneplanner::wire::encode_workout_json;
//! use zoneplanner::zones::ZoneConfig;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ZoneConfig::default();
//!     let parser = DslParser::new(&config, SportType::Running);
//!
//!     let (workout, warnings) = parser.parse_workout(
//!         "Tempo",
//!         "warmup: 10min @ Z1\nrepeat 3:\n    interval: 1km @ Z4\n    recovery: 90s\ncooldown: lap-button",
//!     );
//!     assert!(warnings.is_empty());
//!
//!     let json = encode_workout_json(&workout)?;
//!     assert!(json.contains("RepeatGroupDTO"));
//!     Ok(())
//! }
//! ```

pub mod wire;
pub mod workout;
pub mod zones;

// Re-export commonly used types
pub use wire::{decode_workout, encode_workout, CodecError};
pub use workout::model::{SportType, Target, Workout, WorkoutStep};
pub use workout::parser::DslParser;
pub use workout::writer::DslWriter;
pub use zones::{ZoneConfig, ZoneResolver};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
pub const APP_NAME: &str = "ZonePlanner";
