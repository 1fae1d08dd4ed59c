//! `get_recent_workouts`: the user's latest sessions with per-exercise summaries.

use async_trait::async_trait;
use hevychat_core::error::ToolError;
use hevychat_core::schema::ParamSpec;
use hevychat_core::tool::{Tool, ToolContext};
use serde_json::{Value, json};

use crate::args::Bounded;
use crate::stats;

const COUNT: Bounded = Bounded::new(5, 1, 20);

pub struct RecentWorkoutsTool;

#[async_trait]
impl Tool for RecentWorkoutsTool {
    fn name(&self) -> &str {
        "get_recent_workouts"
    }

    fn description(&self) -> &str {
        "Get the user's recent workouts from Hevy. Use this to answer questions about recent training sessions, exercises performed, or workout frequency."
    }

    fn parameters(&self) -> Vec<ParamSpec> {
        vec![
            ParamSpec::number("count")
                .with_default(5)
                .described("Number of workouts to retrieve (1-20)"),
        ]
    }

    async fn execute(&self, ctx: &ToolContext, args: Value) -> Result<Value, ToolError> {
        let count = COUNT.resolve(&args, "count")?;
        let page = ctx.fitness.workouts(1, count).await?;

        let workouts: Vec<Value> = page
            .workouts
            .iter()
            .map(|w| {
                json!({
                    "id": w.id,
                    "title": w.title,
                    "date": stats::long_date(w.start_time),
                    "duration": stats::humanize_duration(w.start_time, w.end_time),
                    "exercises": w.exercises.iter().map(|e| json!({
                        "name": e.title,
                        "sets": e.sets.len(),
                        "totalReps": stats::total_reps(&e.sets),
                        "maxWeight": stats::max_weight(&e.sets),
                    })).collect::<Vec<_>>(),
                })
            })
            .collect();

        Ok(json!({ "workouts": workouts }))
    }
}
