//! Model-facing routine input and its translation into the Hevy payload.
//!
//! Shared by `create_routine` and `update_routine`: both accept the same
//! exercise/set shape and apply the same defaults.

use hevychat_core::error::ToolError;
use hevychat_core::fitness::{RepRange, Routine, RoutineExercisePayload, RoutineSet, SetType};
use hevychat_core::schema::{ParamKind, ParamSpec};
use serde::Deserialize;
use serde_json::{Value, json};

pub const DEFAULT_REST_SECONDS: u32 = 90;

#[derive(Debug, Clone, Deserialize)]
pub struct ExerciseInput {
    pub exercise_template_id: String,
    pub rest_seconds: Option<f64>,
    pub notes: Option<String>,
    pub sets: Vec<SetInput>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SetInput {
    #[serde(rename = "type", default)]
    pub set_type: SetType,
    pub reps: Option<f64>,
    pub weight_kg: Option<f64>,
    pub duration_seconds: Option<f64>,
    pub distance_meters: Option<f64>,
}

impl SetInput {
    fn to_payload(&self) -> RoutineSet {
        let reps = self.reps.map(|r| r.round().max(0.0) as u32);
        RoutineSet {
            set_type: self.set_type,
            weight_kg: self.weight_kg,
            reps,
            distance_meters: self.distance_meters,
            duration_seconds: self.duration_seconds,
            custom_metric: None,
            rep_range: reps.filter(|&r| r != 0).map(|r| RepRange {
                start: Some(i64::from(r) - 2),
                end: Some(i64::from(r) + 2),
            }),
        }
    }
}

impl ExerciseInput {
    fn to_payload(&self) -> RoutineExercisePayload {
        RoutineExercisePayload {
            exercise_template_id: self.exercise_template_id.clone(),
            notes: self.notes.clone(),
            superset_id: None,
            rest_seconds: Some(
                self.rest_seconds
                    .map(|s| s.round().max(0.0) as u32)
                    .unwrap_or(DEFAULT_REST_SECONDS),
            ),
            sets: self.sets.iter().map(SetInput::to_payload).collect(),
        }
    }
}

/// Validate and translate exercises. Every exercise needs at least one set.
pub fn exercises_payload(
    exercises: &[ExerciseInput],
) -> Result<Vec<RoutineExercisePayload>, ToolError> {
    if let Some(ex) = exercises.iter().find(|ex| ex.sets.is_empty()) {
        return Err(ToolError::InvalidArguments(format!(
            "Exercise '{}' needs at least one set",
            ex.exercise_template_id
        )));
    }
    Ok(exercises.iter().map(ExerciseInput::to_payload).collect())
}

/// Routine summary returned to the model, including each set's configuration.
pub fn routine_summary(routine: &Routine) -> Value {
    json!({
        "id": routine.id,
        "title": routine.title,
        "exercises": routine.exercises.iter().map(|e| json!({
            "name": e.title,
            "sets": e.sets.len(),
            "configuration": e.sets,
        })).collect::<Vec<_>>(),
    })
}

/// Declared shape of the `exercises` parameter.
pub fn exercises_param() -> ParamSpec {
    let set = ParamKind::Object(vec![
        ParamSpec::new(
            "type",
            ParamKind::Enum(vec!["normal", "warmup", "dropset", "failure"]),
        )
        .with_default("normal")
        .described("Type of set"),
        ParamSpec::number("reps")
            .optional()
            .described("Target reps for this set"),
        ParamSpec::number("weight_kg")
            .optional()
            .described("Target weight in kg for this set"),
        ParamSpec::number("duration_seconds")
            .optional()
            .described("Duration in seconds for timed exercises"),
        ParamSpec::number("distance_meters")
            .optional()
            .described("Distance in meters for distance-based exercises"),
    ]);

    let exercise = ParamKind::Object(vec![
        ParamSpec::string("exercise_template_id")
            .described("The ID of the exercise from the exercise templates"),
        ParamSpec::number("rest_seconds")
            .optional()
            .described("Rest time in seconds between sets (default: 90)"),
        ParamSpec::string("notes")
            .optional()
            .described("Optional notes for this exercise"),
        ParamSpec::new("sets", ParamKind::Array(Box::new(set)))
            .described("Array of sets for this exercise"),
    ]);

    ParamSpec::new("exercises", ParamKind::Array(Box::new(exercise)))
}
