//! Hevy tools exposed to the model.
//!
//! Each tool reads from (or writes to) the user's Hevy account through the
//! [`FitnessData`](hevychat_core::fitness::FitnessData) held in the
//! [`ToolContext`](hevychat_core::tool::ToolContext), and returns a compact
//! JSON summary shaped for the model rather than the raw API payload.

mod args;
mod routine_payload;
mod stats;

pub mod create_routine;
pub mod exercise_history;
pub mod exercise_templates;
pub mod recent_workouts;
pub mod routines;
pub mod training_patterns;
pub mod update_routine;
pub mod workout_stats;

#[cfg(test)]
mod test_helpers;

use hevychat_core::tool::ToolRegistry;

pub use create_routine::CreateRoutineTool;
pub use exercise_history::ExerciseHistoryTool;
pub use exercise_templates::ExerciseTemplatesTool;
pub use recent_workouts::RecentWorkoutsTool;
pub use routines::RoutinesTool;
pub use training_patterns::TrainingPatternsTool;
pub use update_routine::UpdateRoutineTool;
pub use workout_stats::WorkoutStatsTool;

/// Create a registry with every Hevy tool, in the order they are offered to the model.
pub fn default_registry() -> ToolRegistry {
    let mut registry = ToolRegistry::new();
    registry.register(Box::new(RecentWorkoutsTool));
    registry.register(Box::new(WorkoutStatsTool));
    registry.register(Box::new(ExerciseHistoryTool));
    registry.register(Box::new(RoutinesTool));
    registry.register(Box::new(TrainingPatternsTool));
    registry.register(Box::new(ExerciseTemplatesTool));
    registry.register(Box::new(CreateRoutineTool));
    registry.register(Box::new(UpdateRoutineTool));
    registry
}
