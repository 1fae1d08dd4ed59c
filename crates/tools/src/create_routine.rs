//! `create_routine`: build a new routine in Hevy from model-described exercises.

use async_trait::async_trait;
use hevychat_core::error::ToolError;
use hevychat_core::fitness::CreateRoutineRequest;
use hevychat_core::schema::ParamSpec;
use hevychat_core::tool::{Tool, ToolContext};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::debug;

use crate::args;
use crate::routine_payload::{ExerciseInput, exercises_payload, exercises_param, routine_summary};

#[derive(Debug, Deserialize)]
struct CreateRoutineInput {
    title: String,
    exercises: Vec<ExerciseInput>,
    #[serde(default)]
    notes: Option<String>,
    #[serde(default)]
    folder_id: Option<f64>,
}

pub struct CreateRoutineTool;

#[async_trait]
impl Tool for CreateRoutineTool {
    fn name(&self) -> &str {
        "create_routine"
    }

    fn description(&self) -> &str {
        "Create a new workout routine in Hevy. Use this when the user asks to create, design, or build a new training program or routine. The routine will include exercises with sets configuration."
    }

    fn parameters(&self) -> Vec<ParamSpec> {
        vec![
            ParamSpec::string("title")
                .described("The name of the routine (e.g., 'Push Day', 'Upper Body A')"),
            exercises_param().described("Array of exercises to include in the routine"),
            ParamSpec::string("notes")
                .optional()
                .described("Optional notes about the routine"),
            ParamSpec::number("folder_id")
                .optional()
                .described("Optional folder ID (number) to organize the routine"),
        ]
    }

    async fn execute(&self, ctx: &ToolContext, args: Value) -> Result<Value, ToolError> {
        let input: CreateRoutineInput = args::parse(args)?;
        if input.exercises.is_empty() {
            return Err(ToolError::InvalidArguments(
                "A routine needs at least one exercise".into(),
            ));
        }

        let request = CreateRoutineRequest {
            title: input.title,
            folder_id: input.folder_id.map(|id| id.round() as i64),
            notes: input.notes,
            exercises: exercises_payload(&input.exercises)?,
        };
        debug!(
            payload = %serde_json::to_string(&request).unwrap_or_default(),
            "Creating routine"
        );

        let routine = ctx.fitness.create_routine(&request).await?;

        Ok(json!({
            "success": true,
            "routine": routine_summary(&routine),
            "message": format!(
                "Successfully created routine \"{}\" with {} exercises",
                routine.title,
                routine.exercises.len()
            ),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::*;
    use hevychat_core::fitness::{RepRange, SetType};
    use std::sync::Arc;

    fn push_day() -> Value {
        json!({
            "title": "Push Day",
            "exercises": [
                {
                    "exercise_template_id": "BENCH",
                    "sets": [
                        {"type": "warmup", "reps": 12, "weight_kg": 40},
                        {"type": "normal", "reps": 8, "weight_kg": 80},
                        {"type": "normal", "reps": 8, "weight_kg": 80}
                    ]
                },
                {
                    "exercise_template_id": "OHP",
                    "rest_seconds": 120,
                    "sets": [{"reps": 10, "weight_kg": 40}]
                }
            ]
        })
    }

    #[tokio::test]
    async fn creates_push_day() {
        let stub = Arc::new(StubFitness::default());
        let out = CreateRoutineTool
            .execute(&context(stub.clone()), push_day())
            .await
            .unwrap();

        assert_eq!(out["success"], true);
        assert_eq!(out["routine"]["id"], "r-new");
        assert_eq!(out["routine"]["exercises"][0]["sets"], 3);
        assert_eq!(
            out["message"],
            "Successfully created routine \"Push Day\" with 2 exercises"
        );

        let created = stub.created.lock().unwrap();
        let request = &created[0];
        assert_eq!(request.title, "Push Day");
        assert_eq!(request.folder_id, None);
        assert_eq!(request.exercises[0].rest_seconds, Some(90));
        assert_eq!(request.exercises[1].rest_seconds, Some(120));
        assert_eq!(request.exercises[0].sets[0].set_type, SetType::Warmup);
        assert_eq!(
            request.exercises[0].sets[1].rep_range,
            Some(RepRange { start: Some(6), end: Some(10) })
        );
        assert_eq!(request.exercises[1].sets[0].set_type, SetType::Normal);
    }

    #[tokio::test]
    async fn folder_and_notes_are_forwarded() {
        let stub = Arc::new(StubFitness::default());
        let mut args = push_day();
        args["folder_id"] = json!(42);
        args["notes"] = json!("Heavy week");

        CreateRoutineTool
            .execute(&context(stub.clone()), args)
            .await
            .unwrap();

        let created = stub.created.lock().unwrap();
        assert_eq!(created[0].folder_id, Some(42));
        assert_eq!(created[0].notes.as_deref(), Some("Heavy week"));
    }

    #[tokio::test]
    async fn empty_exercise_list_is_rejected() {
        let stub = Arc::new(StubFitness::default());
        let err = CreateRoutineTool
            .execute(&context(stub.clone()), json!({"title": "Empty", "exercises": []}))
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::InvalidArguments(_)));
        assert!(stub.calls().is_empty());
    }

    #[tokio::test]
    async fn missing_title_is_rejected() {
        let stub = Arc::new(StubFitness::default());
        let err = CreateRoutineTool
            .execute(&context(stub), json!({"exercises": []}))
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::InvalidArguments(_)));
    }
}
