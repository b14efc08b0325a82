//! Wire Types
//!
//! Serde mirror of the remote platform's workout JSON. Field names follow the
//! platform's camelCase keys; steps are tagged by their `type` field as either
//! `ExecutableStepDTO` or `RepeatGroupDTO`.

use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutDTO {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workout_id: Option<u64>,
    pub sport_type: SportTypeDTO,
    pub workout_name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_duration_in_secs: Option<u32>,
    pub workout_segments: Vec<WorkoutSegmentDTO>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SportTypeDTO {
    #[serde(default)]
    pub sport_type_id: u32,
    #[serde(default)]
    pub sport_type_key: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutSegmentDTO {
    #[serde(default = "first_segment")]
    pub segment_order: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sport_type: Option<SportTypeDTO>,
    pub workout_steps: Vec<StepDTO>,
}

fn first_segment() -> u32 {
    1
}

/// A step envelope, discriminated by the `type` field.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "type")]
pub enum StepDTO {
    ExecutableStepDTO(ExecutableStepDTO),
    RepeatGroupDTO(RepeatGroupDTO),
}

impl StepDTO {
    pub fn step_order(&self) -> u32 {
        match self {
            Self::ExecutableStepDTO(step) => step.step_order,
            Self::RepeatGroupDTO(group) => group.step_order,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StepTypeDTO {
    #[serde(default)]
    pub step_type_id: u32,
    #[serde(default)]
    pub step_type_key: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EndConditionDTO {
    #[serde(default)]
    pub condition_type_id: u32,
    #[serde(default)]
    pub condition_type_key: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TargetTypeDTO {
    #[serde(default)]
    pub workout_target_type_id: u32,
    #[serde(default)]
    pub workout_target_type_key: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UnitDTO {
    pub unit_key: String,
}

/// A leaf step.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ExecutableStepDTO {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub step_id: Option<u64>,
    #[serde(default)]
    pub step_order: u32,
    pub step_type: StepTypeDTO,
    #[serde(default)]
    pub description: Option<String>,
    pub end_condition: EndConditionDTO,
    #[serde(default)]
    pub end_condition_value: Option<f64>,
    #[serde(default)]
    pub preferred_end_condition_unit: Option<UnitDTO>,
    #[serde(default)]
    pub target_type: Option<TargetTypeDTO>,
    #[serde(default)]
    pub target_value_one: Option<f64>,
    #[serde(default)]
    pub target_value_two: Option<f64>,
    #[serde(default)]
    pub zone_number: Option<u32>,
}

/// A repeat group and its nested steps.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RepeatGroupDTO {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub step_id: Option<u64>,
    #[serde(default)]
    pub step_order: u32,
    pub step_type: StepTypeDTO,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub number_of_iterations: Option<u32>,
    #[serde(default)]
    pub end_condition: Option<EndConditionDTO>,
    #[serde(default)]
    pub end_condition_value: Option<f64>,
    #[serde(default)]
    pub smart_repeat: bool,
    pub workout_steps: Vec<StepDTO>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_step_envelope_is_tagged() {
        let value = json!({
            "type": "RepeatGroupDTO",
            "stepOrder": 2,
            "stepType": {"stepTypeId": 6, "stepTypeKey": "repeat"},
            "numberOfIterations": 3,
            "workoutSteps": []
        });

        let step: StepDTO = serde_json::from_value(value).unwrap();
        match step {
            StepDTO::RepeatGroupDTO(group) => {
                assert_eq!(group.number_of_iterations, Some(3));
                assert_eq!(group.step_order, 2);
                assert!(!group.smart_repeat);
            }
            other => panic!("expected repeat group, got {:?}", other),
        }
    }

    #[test]
    fn test_executable_step_serializes_camel_case() {
        let step = StepDTO::ExecutableStepDTO(ExecutableStepDTO {
            step_id: None,
            step_order: 1,
            step_type: StepTypeDTO {
                step_type_id: 1,
                step_type_key: "warmup".to_string(),
            },
            description: None,
            end_condition: EndConditionDTO {
                condition_type_id: 2,
                condition_type_key: "time".to_string(),
            },
            end_condition_value: Some(600.0),
            preferred_end_condition_unit: None,
            target_type: None,
            target_value_one: None,
            target_value_two: None,
            zone_number: None,
        });

        let value = serde_json::to_value(&step).unwrap();
        assert_eq!(value["type"], "ExecutableStepDTO");
        assert_eq!(value["endCondition"]["conditionTypeKey"], "time");
        assert_eq!(value["endConditionValue"], 600.0);
        assert!(value["description"].is_null());
        assert!(value.get("stepId").is_none());
    }
}
