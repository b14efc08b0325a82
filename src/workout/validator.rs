//! Workout Validation
//!
//! Structural checks on a workout before it is exported or uploaded:
//! - Workout has a name and at least one step
//! - Leaf steps are not typed as repeat
//! - Repeat groups have a body and a positive iteration count
//! - End condition values and target bounds are usable

use log::{debug, info};

use super::model::{EndCondition, StepKind, StepType, Target, Workout, WorkoutStep};

/// Validation error types for user-friendly error messages.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    EmptyWorkout(String),
    EmptyName,
    LeafTypedAsRepeat { path: String },
    ZeroIterations { path: String },
    EmptyRepeat { path: String },
    ZeroDuration { path: String },
    InvalidDistance { path: String, meters: f64 },
    InvalidTarget { path: String, from: f64, to: f64 },
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyWorkout(name) => write!(f, "Workout '{}' has no steps", name),
            Self::EmptyName => write!(f, "Workout has an empty or whitespace-only name"),
            Self::LeafTypedAsRepeat { path } => {
                write!(f, "Step {} is typed 'repeat' but has no body", path)
            }
            Self::ZeroIterations { path } => write!(f, "Repeat {} has zero iterations", path),
            Self::EmptyRepeat { path } => write!(f, "Repeat {} contains no steps", path),
            Self::ZeroDuration { path } => write!(f, "Step {} lasts zero seconds", path),
            Self::InvalidDistance { path, meters } => {
                write!(f, "Step {} has an invalid distance of {} m", path, meters)
            }
            Self::InvalidTarget { path, from, to } => {
                write!(f, "Step {} has an invalid target range {} - {}", path, from, to)
            }
        }
    }
}

/// Validates a single step and its body, appending problems to `errors`.
fn validate_step(step: &WorkoutStep, path: &str, errors: &mut Vec<ValidationError>) {
    match &step.kind {
        StepKind::Repeat(group) => {
            if group.iterations == 0 {
                errors.push(ValidationError::ZeroIterations { path: path.to_string() });
            }
            if group.steps.is_empty() {
                errors.push(ValidationError::EmptyRepeat { path: path.to_string() });
            }
            for (index, child) in group.steps.iter().enumerate() {
                validate_step(child, &format!("{}.{}", path, index + 1), errors);
            }
        }
        StepKind::Leaf(leaf) => {
            if leaf.step_type == StepType::Repeat {
                errors.push(ValidationError::LeafTypedAsRepeat { path: path.to_string() });
            }

            match leaf.end {
                EndCondition::Time { seconds: 0 } => {
                    errors.push(ValidationError::ZeroDuration { path: path.to_string() });
                }
                EndCondition::Distance { meters } if meters <= 0.0 || !meters.is_finite() => {
                    errors.push(ValidationError::InvalidDistance {
                        path: path.to_string(),
                        meters,
                    });
                }
                _ => {}
            }

            if !target_is_valid(&leaf.target) {
                errors.push(ValidationError::InvalidTarget {
                    path: path.to_string(),
                    from: leaf.target.from_value,
                    to: leaf.target.to_value,
                });
            }
        }
    }
}

fn target_is_valid(target: &Target) -> bool {
    target.is_none()
        || [target.from_value, target.to_value]
            .iter()
            .all(|value| value.is_finite() && *value >= 0.0)
}

/// Validates the entire workout.
///
/// Step paths in the errors are 1-based positions joined by dots, so `2.1`
/// is the first step inside the second top-level step.
pub fn validate_workout(workout: &Workout) -> Result<(), Vec<ValidationError>> {
    info!("Validating workout '{}' with {} steps", workout.name, workout.step_count());

    let mut errors = Vec::new();

    if workout.name.trim().is_empty() {
        errors.push(ValidationError::EmptyName);
    }

    if workout.steps.is_empty() {
        errors.push(ValidationError::EmptyWorkout(workout.name.clone()));
    }

    for (index, step) in workout.steps.iter().enumerate() {
        validate_step(step, &(index + 1).to_string(), &mut errors);
    }

    if errors.is_empty() {
        debug!("Workout '{}' is valid", workout.name);
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workout::model::{LeafStep, SportType};

    fn valid_workout() -> Workout {
        Workout::new(SportType::Running, "Valid").with_steps(vec![
            WorkoutStep::new(StepType::Warmup, EndCondition::Time { seconds: 600 }),
            WorkoutStep::repeat(3).with_steps(vec![WorkoutStep::new(
                StepType::Interval,
                EndCondition::Distance { meters: 400.0 },
            )
            .with_target(Target::pace(3.5, 4.0))]),
        ])
    }

    #[test]
    fn test_valid_workout() {
        assert!(validate_workout(&valid_workout()).is_ok());
    }

    #[test]
    fn test_empty_workout() {
        let workout = Workout::new(SportType::Cycling, "Nothing");
        let errors = validate_workout(&workout).unwrap_err();
        assert_eq!(errors, vec![ValidationError::EmptyWorkout("Nothing".to_string())]);
    }

    #[test]
    fn test_blank_name() {
        let mut workout = valid_workout();
        workout.name = "  ".to_string();
        let errors = validate_workout(&workout).unwrap_err();
        assert!(errors.contains(&ValidationError::EmptyName));
    }

    #[test]
    fn test_repeat_problems() {
        let workout = Workout::new(SportType::Running, "Repeats").with_steps(vec![
            WorkoutStep::repeat(0).with_steps(vec![WorkoutStep::new(StepType::Rest, EndCondition::LapButton)]),
            WorkoutStep::repeat(2),
        ]);

        let errors = validate_workout(&workout).unwrap_err();
        assert_eq!(
            errors,
            vec![
                ValidationError::ZeroIterations { path: "1".to_string() },
                ValidationError::EmptyRepeat { path: "2".to_string() },
            ]
        );
    }

    #[test]
    fn test_leaf_typed_as_repeat() {
        let mut workout = Workout::new(SportType::Running, "Odd");
        workout.add_step(WorkoutStep {
            order: 0,
            kind: StepKind::Leaf(LeafStep {
                step_type: StepType::Repeat,
                description: String::new(),
                end: EndCondition::LapButton,
                target: Target::none(),
            }),
        });

        let errors = validate_workout(&workout).unwrap_err();
        assert_eq!(errors, vec![ValidationError::LeafTypedAsRepeat { path: "1".to_string() }]);
    }

    #[test]
    fn test_nested_step_paths() {
        let workout = Workout::new(SportType::Running, "Nested").with_steps(vec![
            WorkoutStep::new(StepType::Warmup, EndCondition::LapButton),
            WorkoutStep::repeat(2).with_steps(vec![
                WorkoutStep::new(StepType::Interval, EndCondition::Time { seconds: 0 }),
                WorkoutStep::new(StepType::Recovery, EndCondition::Distance { meters: -5.0 }),
            ]),
        ]);

        let errors = validate_workout(&workout).unwrap_err();
        assert_eq!(errors[0], ValidationError::ZeroDuration { path: "2.1".to_string() });
        assert_eq!(
            errors[1],
            ValidationError::InvalidDistance {
                path: "2.2".to_string(),
                meters: -5.0
            }
        );
    }

    #[test]
    fn test_invalid_target_bounds() {
        let workout = Workout::new(SportType::Cycling, "Power").with_steps(vec![WorkoutStep::new(
            StepType::Interval,
            EndCondition::Time { seconds: 60 },
        )
        .with_target(Target::power(f64::NAN, 200.0))]);

        let errors = validate_workout(&workout).unwrap_err();
        assert!(matches!(errors[0], ValidationError::InvalidTarget { .. }));
    }

    #[test]
    fn test_error_display() {
        let error = ValidationError::EmptyRepeat { path: "3".to_string() };
        assert_eq!(error.to_string(), "Repeat 3 contains no steps");
    }
}
