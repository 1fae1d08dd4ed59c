//! `get_exercise_templates`: the exercise catalogue, truncated for the model.

use async_trait::async_trait;
use hevychat_core::error::ToolError;
use hevychat_core::schema::ParamSpec;
use hevychat_core::tool::{Tool, ToolContext};
use serde_json::{Value, json};

const MAX_LISTED: usize = 50;

pub struct ExerciseTemplatesTool;

#[async_trait]
impl Tool for ExerciseTemplatesTool {
    fn name(&self) -> &str {
        "get_exercise_templates"
    }

    fn description(&self) -> &str {
        "Get all available exercise templates from Hevy. Use this to help the user discover exercises or plan new routines."
    }

    fn parameters(&self) -> Vec<ParamSpec> {
        Vec::new()
    }

    async fn execute(&self, ctx: &ToolContext, _args: Value) -> Result<Value, ToolError> {
        let list = ctx.fitness.exercise_templates().await?;
        let templates = &list.exercise_templates;

        Ok(json!({
            "totalExercises": templates.len(),
            "exercises": templates.iter().take(MAX_LISTED).map(|e| json!({
                "id": e.id,
                "title": e.title,
                "type": e.kind,
                "muscleGroup": e.muscle_group,
            })).collect::<Vec<_>>(),
        }))
    }
}
