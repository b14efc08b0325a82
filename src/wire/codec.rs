//! Wire Codec
//!
//! Converts workouts to and from the remote platform's JSON representation.
//!
//! Target bounds map directly: `targetValueOne` is `from_value` and
//! `targetValueTwo` is `to_value`. Zone labels are not part of the wire
//! format; call [`Workout::resolve_labels`] after decoding to recover them.

use log::{debug, info, warn};
use serde_json::Value;
use thiserror::Error;

use super::tables::{END_CONDITIONS, SPORT_TYPES, STEP_TYPES, TARGET_TYPES};
use super::types::{
    EndConditionDTO, ExecutableStepDTO, RepeatGroupDTO, SportTypeDTO, StepDTO, StepTypeDTO, TargetTypeDTO,
    UnitDTO, WorkoutDTO, WorkoutSegmentDTO,
};
use crate::workout::{
    EndCondition, EndConditionKind, RepeatGroup, SportType, StepKind, StepType, Target, TargetKind, Workout,
    WorkoutStep,
};

/// Errors raised while decoding wire JSON.
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("Invalid workout JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{path}: missing field '{field}'")]
    MissingField { path: String, field: &'static str },

    #[error("{path}: unknown {table} '{key}' (id {id})")]
    UnknownKey {
        path: String,
        table: &'static str,
        key: String,
        id: u32,
    },

    #[error("{path}: invalid step: {message}")]
    InvalidStep { path: String, message: String },
}

impl CodecError {
    /// Location of the failing step, e.g. `workoutSteps[1].workoutSteps[0]`.
    pub fn path(&self) -> &str {
        match self {
            Self::Json(_) => "",
            Self::MissingField { path, .. } | Self::UnknownKey { path, .. } | Self::InvalidStep { path, .. } => path,
        }
    }
}

/// Encodes a workout into its wire form.
///
/// The schedule date is not part of the workout on the wire and is dropped.
pub fn encode_workout(workout: &Workout) -> WorkoutDTO {
    let sport_type = sport_dto(workout.sport_type);
    WorkoutDTO {
        workout_id: None,
        sport_type: sport_type.clone(),
        workout_name: workout.name.clone(),
        description: workout.description.clone().filter(|d| !d.trim().is_empty()),
        estimated_duration_in_secs: workout.estimated_duration(),
        workout_segments: vec![WorkoutSegmentDTO {
            segment_order: 1,
            sport_type: Some(sport_type),
            workout_steps: workout.steps.iter().map(encode_step).collect(),
        }],
    }
}

/// Encodes a workout as pretty-printed JSON.
pub fn encode_workout_json(workout: &Workout) -> Result<String, CodecError> {
    Ok(serde_json::to_string_pretty(&encode_workout(workout))?)
}

/// Encodes one step, recursing into repeat bodies.
pub fn encode_step(step: &WorkoutStep) -> StepDTO {
    match &step.kind {
        StepKind::Repeat(group) => StepDTO::RepeatGroupDTO(RepeatGroupDTO {
            step_id: None,
            step_order: step.order,
            step_type: step_type_dto(StepType::Repeat),
            description: non_empty(&group.description),
            number_of_iterations: Some(group.iterations),
            end_condition: Some(end_condition_dto(EndConditionKind::Iterations)),
            end_condition_value: Some(f64::from(group.iterations)),
            smart_repeat: false,
            workout_steps: group.steps.iter().map(encode_step).collect(),
        }),
        StepKind::Leaf(leaf) => {
            let target = &leaf.target;
            let (value_one, value_two) = if target.is_none() {
                (None, None)
            } else {
                (Some(target.from_value), Some(target.to_value))
            };

            StepDTO::ExecutableStepDTO(ExecutableStepDTO {
                step_id: None,
                step_order: step.order,
                step_type: step_type_dto(leaf.step_type),
                description: non_empty(&leaf.description),
                end_condition: end_condition_dto(leaf.end.kind()),
                end_condition_value: leaf.end.value(),
                preferred_end_condition_unit: preferred_unit(&leaf.end),
                target_type: Some(TargetTypeDTO {
                    workout_target_type_id: TARGET_TYPES.id(target.kind),
                    workout_target_type_key: TARGET_TYPES.key(target.kind).to_string(),
                }),
                target_value_one: value_one,
                target_value_two: value_two,
                zone_number: target.zone_number,
            })
        }
    }
}

fn sport_dto(sport: SportType) -> SportTypeDTO {
    SportTypeDTO {
        sport_type_id: SPORT_TYPES.id(sport),
        sport_type_key: SPORT_TYPES.key(sport).to_string(),
    }
}

fn step_type_dto(step_type: StepType) -> StepTypeDTO {
    StepTypeDTO {
        step_type_id: STEP_TYPES.id(step_type),
        step_type_key: STEP_TYPES.key(step_type).to_string(),
    }
}

fn end_condition_dto(kind: EndConditionKind) -> EndConditionDTO {
    EndConditionDTO {
        condition_type_id: END_CONDITIONS.id(kind),
        condition_type_key: END_CONDITIONS.key(kind).to_string(),
    }
}

fn preferred_unit(end: &EndCondition) -> Option<UnitDTO> {
    match end {
        EndCondition::Distance { meters } => Some(UnitDTO {
            unit_key: if *meters >= 1000.0 { "kilometer" } else { "meter" }.to_string(),
        }),
        _ => None,
    }
}

fn non_empty(description: &str) -> Option<String> {
    let description = description.trim();
    (!description.is_empty()).then(|| description.to_string())
}

/// Decodes a workout, failing on the first step that cannot be read.
pub fn decode_workout(value: &Value) -> Result<Workout, CodecError> {
    let (workout, mut errors) = decode(value, true)?;
    match errors.pop() {
        Some(error) => Err(error),
        None => Ok(workout),
    }
}

/// Decodes a workout, skipping steps that cannot be read.
///
/// Errors in the workout envelope itself (sport, name, segments) are still
/// fatal; step errors are returned next to the partial workout.
pub fn decode_workout_lenient(value: &Value) -> Result<(Workout, Vec<CodecError>), CodecError> {
    let (workout, errors) = decode(value, false)?;
    for error in &errors {
        warn!("Skipped step while decoding '{}': {}", workout.name, error);
    }
    Ok((workout, errors))
}

/// Decodes a workout from a JSON string.
pub fn decode_workout_str(json: &str) -> Result<Workout, CodecError> {
    let value: Value = serde_json::from_str(json)?;
    decode_workout(&value)
}

fn decode(value: &Value, strict: bool) -> Result<(Workout, Vec<CodecError>), CodecError> {
    let root = "workout".to_string();

    let sport_value = value.get("sportType").ok_or_else(|| CodecError::MissingField {
        path: root.clone(),
        field: "sportType",
    })?;
    let sport_type: SportTypeDTO = serde_json::from_value(sport_value.clone())?;
    let sport = SPORT_TYPES
        .lookup(&sport_type.sport_type_key, sport_type.sport_type_id)
        .ok_or_else(|| CodecError::UnknownKey {
            path: root.clone(),
            table: SPORT_TYPES.name,
            key: sport_type.sport_type_key.clone(),
            id: sport_type.sport_type_id,
        })?;

    let name = value
        .get("workoutName")
        .and_then(Value::as_str)
        .ok_or_else(|| CodecError::MissingField {
            path: root.clone(),
            field: "workoutName",
        })?;

    let mut workout = Workout::new(sport, name);
    if let Some(description) = value.get("description").and_then(Value::as_str) {
        workout = workout.with_description(description);
    }

    let steps = value
        .get("workoutSegments")
        .and_then(Value::as_array)
        .and_then(|segments| segments.first())
        .and_then(|segment| segment.get("workoutSteps"))
        .and_then(Value::as_array)
        .ok_or_else(|| CodecError::MissingField {
            path: root.clone(),
            field: "workoutSegments[0].workoutSteps",
        })?;

    let mut errors = Vec::new();
    for (index, step_value) in steps.iter().enumerate() {
        let path = format!("workoutSteps[{}]", index);
        let decoded = serde_json::from_value::<StepDTO>(step_value.clone())
            .map_err(|e| CodecError::InvalidStep {
                path: path.clone(),
                message: e.to_string(),
            })
            .and_then(|dto| decode_step(&dto, &path, strict, &mut errors));

        match decoded {
            Ok(step) => workout.steps.push(step),
            Err(error) if strict => return Err(error),
            Err(error) => errors.push(error),
        }
    }
    sort_by_order(&mut workout.steps);

    info!(
        "Decoded workout '{}' ({}, {} steps)",
        workout.name,
        workout.sport_type,
        workout.step_count()
    );
    Ok((workout, errors))
}

/// Decodes one step.
///
/// In lenient mode failing children of a repeat group are collected into
/// `errors` and the rest of the group is kept.
pub fn decode_step(
    dto: &StepDTO,
    path: &str,
    strict: bool,
    errors: &mut Vec<CodecError>,
) -> Result<WorkoutStep, CodecError> {
    match dto {
        StepDTO::RepeatGroupDTO(group) => {
            let iterations = group
                .number_of_iterations
                .or_else(|| group.end_condition_value.map(|v| v.round() as u32))
                .ok_or_else(|| CodecError::MissingField {
                    path: path.to_string(),
                    field: "numberOfIterations",
                })?;

            let mut repeat = RepeatGroup::new(iterations);
            repeat.description = group.description.clone().unwrap_or_default();
            for (index, child) in group.workout_steps.iter().enumerate() {
                let child_path = format!("{}.workoutSteps[{}]", path, index);
                match decode_step(child, &child_path, strict, errors) {
                    Ok(step) => repeat.steps.push(step),
                    Err(error) if strict => return Err(error),
                    Err(error) => errors.push(error),
                }
            }
            sort_by_order(&mut repeat.steps);

            Ok(WorkoutStep {
                order: group.step_order,
                kind: StepKind::Repeat(repeat),
            })
        }
        StepDTO::ExecutableStepDTO(step) => decode_executable(step, path),
    }
}

fn decode_executable(step: &ExecutableStepDTO, path: &str) -> Result<WorkoutStep, CodecError> {
    let step_type = STEP_TYPES
        .lookup(&step.step_type.step_type_key, step.step_type.step_type_id)
        .filter(|step_type| *step_type != StepType::Repeat)
        .ok_or_else(|| CodecError::UnknownKey {
            path: path.to_string(),
            table: STEP_TYPES.name,
            key: step.step_type.step_type_key.clone(),
            id: step.step_type.step_type_id,
        })?;

    let end_kind = END_CONDITIONS
        .lookup(
            &step.end_condition.condition_type_key,
            step.end_condition.condition_type_id,
        )
        .ok_or_else(|| CodecError::UnknownKey {
            path: path.to_string(),
            table: END_CONDITIONS.name,
            key: step.end_condition.condition_type_key.clone(),
            id: step.end_condition.condition_type_id,
        })?;

    let value = || {
        step.end_condition_value.ok_or_else(|| CodecError::MissingField {
            path: path.to_string(),
            field: "endConditionValue",
        })
    };
    let end = match end_kind {
        EndConditionKind::LapButton => EndCondition::LapButton,
        EndConditionKind::Time => EndCondition::Time {
            seconds: value()?.max(0.0).round() as u32,
        },
        EndConditionKind::Distance => EndCondition::Distance { meters: value()? },
        EndConditionKind::Iterations => {
            return Err(CodecError::InvalidStep {
                path: path.to_string(),
                message: "executable step cannot end on iterations".to_string(),
            })
        }
    };

    let target = match &step.target_type {
        None => Target::none(),
        Some(target_type) => {
            let kind = TARGET_TYPES
                .lookup(
                    &target_type.workout_target_type_key,
                    target_type.workout_target_type_id,
                )
                .ok_or_else(|| CodecError::UnknownKey {
                    path: path.to_string(),
                    table: TARGET_TYPES.name,
                    key: target_type.workout_target_type_key.clone(),
                    id: target_type.workout_target_type_id,
                })?;

            if kind == TargetKind::NoTarget {
                Target::none()
            } else {
                let mut target = Target::new(
                    kind,
                    step.target_value_one.unwrap_or(0.0),
                    step.target_value_two.unwrap_or(0.0),
                );
                target.zone_number = step.zone_number;
                target
            }
        }
    };

    debug!("{}: decoded {} step ending on {}", path, step_type, end_kind);
    Ok(WorkoutStep::new(step_type, end)
        .with_target(target)
        .with_description(step.description.clone().unwrap_or_default())
        .with_order(step.step_order))
}

/// Orders siblings by their wire order, numbering any that lack one.
fn sort_by_order(steps: &mut [WorkoutStep]) {
    steps.sort_by_key(|step| if step.order == 0 { u32::MAX } else { step.order });
    for (index, step) in steps.iter_mut().enumerate() {
        if step.order == 0 {
            step.order = index as u32 + 1;
        }
    }
}
