//! `get_workout_stats`: lifetime total plus recent frequency.

use async_trait::async_trait;
use hevychat_core::error::ToolError;
use hevychat_core::schema::ParamSpec;
use hevychat_core::tool::{Tool, ToolContext};
use serde_json::{Value, json};

use crate::stats;

/// The recent sample is one page of this many workouts, read as "last 30 days".
const RECENT_SAMPLE: u32 = 30;

pub struct WorkoutStatsTool;

#[async_trait]
impl Tool for WorkoutStatsTool {
    fn name(&self) -> &str {
        "get_workout_stats"
    }

    fn description(&self) -> &str {
        "Get overall workout statistics including total count and workout frequency. Use this for high-level training insights."
    }

    fn parameters(&self) -> Vec<ParamSpec> {
        Vec::new()
    }

    async fn execute(&self, ctx: &ToolContext, _args: Value) -> Result<Value, ToolError> {
        let count = ctx.fitness.workout_count().await?;
        let recent = ctx.fitness.workouts(1, RECENT_SAMPLE).await?;
        let last_30 = recent.workouts.len();

        Ok(json!({
            "totalWorkouts": count.workout_count,
            "last30Days": last_30,
            "averagePerWeek": stats::average_per_week(last_30, RECENT_SAMPLE),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::*;
    use std::sync::Arc;

    #[tokio::test]
    async fn reports_totals_and_average() {
        let stub = Arc::new(StubFitness {
            workout_count: 120,
            workouts: (0..12).map(|i| workout(&format!("w{i}"), i, 60, vec![])).collect(),
            ..StubFitness::default()
        });

        let out = WorkoutStatsTool
            .execute(&context(stub.clone()), json!({}))
            .await
            .unwrap();

        assert_eq!(stub.calls(), vec!["workout_count", "workouts(1,30)"]);
        assert_eq!(out["totalWorkouts"], 120);
        assert_eq!(out["last30Days"], 12);
        assert_eq!(out["averagePerWeek"], json!(12.0 / 30.0 * 7.0));
    }

    #[test]
    fn takes_no_parameters() {
        let def = WorkoutStatsTool.to_definition();
        assert_eq!(def.input_schema, json!({"type": "object", "properties": {}}));
    }
}
