//! `update_routine`: modify an existing routine, reporting what it looked like before.

use async_trait::async_trait;
use hevychat_core::error::ToolError;
use hevychat_core::fitness::RoutineUpdate;
use hevychat_core::schema::ParamSpec;
use hevychat_core::tool::{Tool, ToolContext};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::debug;

use crate::args;
use crate::routine_payload::{ExerciseInput, exercises_payload, exercises_param, routine_summary};

#[derive(Debug, Deserialize)]
struct UpdateRoutineInput {
    routine_id: String,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    exercises: Option<Vec<ExerciseInput>>,
    #[serde(default)]
    notes: Option<String>,
}

pub struct UpdateRoutineTool;

#[async_trait]
impl Tool for UpdateRoutineTool {
    fn name(&self) -> &str {
        "update_routine"
    }

    fn description(&self) -> &str {
        "Update an existing workout routine in Hevy. Use this when the user asks to modify, change, or update an existing routine. You can change the title, exercises, or sets configuration."
    }

    fn parameters(&self) -> Vec<ParamSpec> {
        vec![
            ParamSpec::string("routine_id").described("The ID of the routine to update"),
            ParamSpec::string("title")
                .optional()
                .described("New title for the routine"),
            exercises_param()
                .optional()
                .described("New array of exercises (replaces existing)"),
            ParamSpec::string("notes")
                .optional()
                .described("New notes for the routine"),
        ]
    }

    async fn execute(&self, ctx: &ToolContext, args: Value) -> Result<Value, ToolError> {
        let input: UpdateRoutineInput = args::parse(args)?;

        let existing = ctx.fitness.routine(&input.routine_id).await?;

        let update = RoutineUpdate {
            title: input.title.filter(|t| !t.is_empty()),
            notes: input.notes,
            exercises: input
                .exercises
                .as_deref()
                .map(exercises_payload)
                .transpose()?,
        };
        debug!(
            routine_id = %input.routine_id,
            payload = %serde_json::to_string(&update).unwrap_or_default(),
            "Updating routine"
        );

        let updated = ctx.fitness.update_routine(&input.routine_id, &update).await?;

        Ok(json!({
            "success": true,
            "previousState": {
                "title": existing.title,
                "exercises": existing.exercises.len(),
            },
            "updatedRoutine": routine_summary(&updated),
            "message": format!("Successfully updated routine \"{}\"", updated.title),
        }))
    }
}
