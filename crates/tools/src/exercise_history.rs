//! `get_exercise_history`: one exercise's sessions over a day window.

use async_trait::async_trait;
use chrono::Duration;
use hevychat_core::error::ToolError;
use hevychat_core::schema::ParamSpec;
use hevychat_core::tool::{Tool, ToolContext};
use serde_json::{Value, json};

use crate::args::{self, Bounded};
use crate::stats;

const DAYS: Bounded = Bounded::new(30, 7, 365);

pub struct ExerciseHistoryTool;

#[async_trait]
impl Tool for ExerciseHistoryTool {
    fn name(&self) -> &str {
        "get_exercise_history"
    }

    fn description(&self) -> &str {
        "Get the history of a specific exercise showing progression over time. Use this to track strength gains or performance trends for a particular exercise."
    }

    fn parameters(&self) -> Vec<ParamSpec> {
        vec![
            ParamSpec::string("exerciseTemplateId")
                .described("The ID of the exercise template to get history for"),
            ParamSpec::number("days")
                .with_default(30)
                .described("Number of days of history to retrieve"),
        ]
    }

    async fn execute(&self, ctx: &ToolContext, args: Value) -> Result<Value, ToolError> {
        let template_id = args::required_str(&args, "exerciseTemplateId")?;
        let days = DAYS.resolve(&args, "days")?;
        let start_date = (ctx.now - Duration::days(i64::from(days)))
            .format("%Y-%m-%d")
            .to_string();

        let history = ctx
            .fitness
            .exercise_history(template_id, Some(&start_date), None)
            .await?;

        let progression: Vec<Value> = history
            .entries
            .iter()
            .map(|entry| {
                json!({
                    "date": entry.date,
                    "workout": entry.workout_title,
                    "maxWeight": stats::max_weight(&entry.sets),
                    "totalVolume": stats::total_volume(&entry.sets),
                    "sets": entry.sets.len(),
                })
            })
            .collect();

        Ok(json!({
            "exercise": history.title,
            "totalSessions": history.entries.len(),
            "progression": progression,
        }))
    }
}
