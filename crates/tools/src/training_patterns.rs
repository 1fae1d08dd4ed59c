//! `analyze_training_patterns`: frequency, rest days, favourite exercises and
//! consistency over a day window.

use std::collections::BTreeSet;

use async_trait::async_trait;
use chrono::Duration;
use hevychat_core::error::ToolError;
use hevychat_core::schema::ParamSpec;
use hevychat_core::tool::{Tool, ToolContext};
use serde_json::{Value, json};

use crate::args::Bounded;
use crate::stats;

const DAYS: Bounded = Bounded::new(30, 7, 90);
const MAX_PAGE_SIZE: u32 = 30;

/// Roughly two workouts per week of window, capped at one page.
fn page_size_for(days: u32) -> u32 {
    (days.div_ceil(7) * 2).min(MAX_PAGE_SIZE)
}

pub struct TrainingPatternsTool;

#[async_trait]
impl Tool for TrainingPatternsTool {
    fn name(&self) -> &str {
        "analyze_training_patterns"
    }

    fn description(&self) -> &str {
        "Analyze the user's training patterns including muscle groups worked, workout frequency, and rest days. Use this for comprehensive training insights."
    }

    fn parameters(&self) -> Vec<ParamSpec> {
        vec![
            ParamSpec::number("days")
                .with_default(30)
                .described("Number of days to analyze"),
        ]
    }

    async fn execute(&self, ctx: &ToolContext, args: Value) -> Result<Value, ToolError> {
        let days = DAYS.resolve(&args, "days")?;
        let page = ctx.fitness.workouts(1, page_size_for(days)).await?;

        let cutoff = ctx.now - Duration::days(i64::from(days));
        let in_range: Vec<_> = page
            .workouts
            .iter()
            .filter(|w| w.start_time >= cutoff)
            .collect();

        let active_dates: BTreeSet<String> = in_range
            .iter()
            .map(|w| w.start_time.format("%Y-%m-%d").to_string())
            .collect();
        let active_days = active_dates.len();

        let top = stats::top_exercises(
            in_range
                .iter()
                .flat_map(|w| w.exercises.iter().map(|e| e.title.as_str())),
        );

        Ok(json!({
            "periodDays": days,
            "totalWorkouts": in_range.len(),
            "activeDays": active_days,
            "restDays": i64::from(days) - active_days as i64,
            "averageWorkoutsPerWeek": stats::average_per_week(in_range.len(), days),
            "topExercises": top,
            "consistency": stats::consistency(active_days, days),
        }))
    }
}
