//! `get_routines`: saved routines with exercise and set counts.

use async_trait::async_trait;
use hevychat_core::error::ToolError;
use hevychat_core::schema::ParamSpec;
use hevychat_core::tool::{Tool, ToolContext};
use serde_json::{Value, json};

use crate::args::Bounded;

const COUNT: Bounded = Bounded::new(10, 1, 20);

pub struct RoutinesTool;

#[async_trait]
impl Tool for RoutinesTool {
    fn name(&self) -> &str {
        "get_routines"
    }

    fn description(&self) -> &str {
        "Get the user's saved workout routines. Use this to help plan workouts or suggest routines to follow."
    }

    fn parameters(&self) -> Vec<ParamSpec> {
        vec![
            ParamSpec::number("count")
                .with_default(10)
                .described("Number of routines to retrieve"),
        ]
    }

    async fn execute(&self, ctx: &ToolContext, args: Value) -> Result<Value, ToolError> {
        let count = COUNT.resolve(&args, "count")?;
        let page = ctx.fitness.routines(1, count).await?;

        let routines: Vec<Value> = page
            .routines
            .iter()
            .map(|r| {
                json!({
                    "id": r.id,
                    "title": r.title,
                    "exercises": r.exercises.iter().map(|e| json!({
                        "name": e.title,
                        "sets": e.sets.len(),
                    })).collect::<Vec<_>>(),
                })
            })
            .collect();

        Ok(json!({ "routines": routines }))
    }
}
