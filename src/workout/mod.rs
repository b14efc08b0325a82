//! Workout Module
//!
//! Structured workouts and the text formats used to author them.
//!
//! # Structure
//!
//! - [`model`]: Core data structures (Workout, WorkoutStep, Target)
//! - [`parser`]: Step DSL parsing with per-line recovery
//! - [`writer`]: Step DSL rendering
//! - [`validator`]: Structural checks before export
//! - [`planner`]: Calendar scheduling from `W##S##` names
//! - [`plan`]: YAML plan files

pub mod model;
pub mod parser;
pub mod plan;
pub mod planner;
pub mod validator;
pub mod writer;

pub use model::{
    EndCondition, EndConditionKind, LeafStep, RepeatGroup, SportType, StepKind, StepType, Target, TargetKind,
    Workout, WorkoutStep,
};
pub use parser::{DslError, DslParser, ParsedBlock};
pub use plan::{parse_date, EntryWarning, PlanEntry, PlanError, PlanFile};
pub use planner::{sessions_per_week, weeks, TrainingPlanner, WorkoutName};
pub use validator::{validate_workout, ValidationError};
pub use writer::DslWriter;
