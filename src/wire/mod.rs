//! Wire Format Module
//!
//! JSON representation of workouts used by the remote training platform.
//!
//! - [`tables`]: fixed sport, step, end-condition and target enumerations
//! - [`types`]: serde DTOs mirroring the platform's JSON
//! - [`codec`]: conversion between the DTOs and the workout model

pub mod codec;
pub mod tables;
pub mod types;

pub use codec::{
    decode_step, decode_workout, decode_workout_lenient, decode_workout_str, encode_step, encode_workout,
    encode_workout_json, CodecError,
};
pub use types::{ExecutableStepDTO, RepeatGroupDTO, StepDTO, WorkoutDTO};
