//! Fitness data collaborator: the Hevy workout API as seen by the domain.
//!
//! [`FitnessData`] is one user's view of their training data, bound to that
//! user's API key. A [`FitnessConnector`] builds such a view from a resolved
//! credential, so every request gets its own client and nothing ambient is
//! shared between users.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::FitnessError;

// --- Workouts ---

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SetType {
    #[default]
    Normal,
    Warmup,
    Dropset,
    Failure,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Workout {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    #[serde(default)]
    pub exercises: Vec<WorkoutExercise>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkoutExercise {
    pub title: String,
    #[serde(default)]
    pub exercise_template_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default)]
    pub sets: Vec<WorkoutSet>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WorkoutSet {
    #[serde(rename = "type", alias = "set_type", default)]
    pub set_type: SetType,
    #[serde(default)]
    pub weight_kg: Option<f64>,
    #[serde(default)]
    pub reps: Option<u32>,
    #[serde(default)]
    pub distance_meters: Option<f64>,
    #[serde(default)]
    pub duration_seconds: Option<f64>,
    #[serde(default)]
    pub rpe: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WorkoutPage {
    #[serde(default)]
    pub page: u32,
    #[serde(default)]
    pub page_count: u32,
    #[serde(default)]
    pub workouts: Vec<Workout>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkoutCount {
    pub workout_count: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateWorkoutRequest {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub exercises: Vec<CreateWorkoutExercise>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateWorkoutExercise {
    pub exercise_template_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub sets: Vec<WorkoutSet>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkoutEvent {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub workout_id: String,
    #[serde(default)]
    pub event_type: String,
    #[serde(default)]
    pub timestamp: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WorkoutEventPage {
    #[serde(default)]
    pub page: u32,
    #[serde(default)]
    pub page_count: u32,
    #[serde(default)]
    pub events: Vec<WorkoutEvent>,
}

// --- Routines ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepRange {
    pub start: Option<i64>,
    pub end: Option<i64>,
}

/// A set as stored on a routine. Absent values are sent as explicit `null`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RoutineSet {
    #[serde(rename = "type", default)]
    pub set_type: SetType,
    #[serde(default)]
    pub weight_kg: Option<f64>,
    #[serde(default)]
    pub reps: Option<u32>,
    #[serde(default)]
    pub distance_meters: Option<f64>,
    #[serde(default)]
    pub duration_seconds: Option<f64>,
    #[serde(default)]
    pub custom_metric: Option<f64>,
    #[serde(default)]
    pub rep_range: Option<RepRange>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Routine {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub folder_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default)]
    pub exercises: Vec<RoutineExercise>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoutineExercise {
    pub title: String,
    #[serde(default)]
    pub exercise_template_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default)]
    pub superset_id: Option<i64>,
    #[serde(default)]
    pub rest_seconds: Option<u32>,
    #[serde(default)]
    pub sets: Vec<RoutineSet>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RoutinePage {
    #[serde(default)]
    pub page: u32,
    #[serde(default)]
    pub page_count: u32,
    #[serde(default)]
    pub routines: Vec<Routine>,
}

/// One exercise in a routine create/update payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoutineExercisePayload {
    pub exercise_template_id: String,
    pub notes: Option<String>,
    pub superset_id: Option<i64>,
    pub rest_seconds: Option<u32>,
    pub sets: Vec<RoutineSet>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateRoutineRequest {
    pub title: String,
    pub folder_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub exercises: Vec<RoutineExercisePayload>,
}

/// Partial routine update: only the present fields are sent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RoutineUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exercises: Option<Vec<RoutineExercisePayload>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoutineFolder {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub index: i64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RoutineFolderList {
    #[serde(default, alias = "routine_folders")]
    pub folders: Vec<RoutineFolder>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateRoutineFolderRequest {
    pub title: String,
}

// --- Exercises ---

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExerciseTemplate {
    pub id: String,
    pub title: String,
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default, alias = "primary_muscle_group")]
    pub muscle_group: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub equipment_type: Option<String>,
    #[serde(default)]
    pub is_custom: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExerciseTemplateList {
    #[serde(default)]
    pub exercise_templates: Vec<ExerciseTemplate>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExerciseHistory {
    #[serde(default)]
    pub exercise_template_id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub entries: Vec<ExerciseHistoryEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExerciseHistoryEntry {
    #[serde(default)]
    pub workout_id: String,
    #[serde(default)]
    pub workout_title: String,
    pub date: String,
    #[serde(default)]
    pub sets: Vec<WorkoutSet>,
}

/// One user's Hevy data, bound to their API key.
///
/// Every method is a single remote call; failures come back as
/// [`FitnessError`] and are never retried here.
#[async_trait]
pub trait FitnessData: Send + Sync {
    async fn workouts(&self, page: u32, page_size: u32) -> Result<WorkoutPage, FitnessError>;

    async fn workout(&self, id: &str) -> Result<Workout, FitnessError>;

    async fn workout_count(&self) -> Result<WorkoutCount, FitnessError>;

    async fn create_workout(&self, workout: &CreateWorkoutRequest) -> Result<Workout, FitnessError>;

    async fn workout_events(
        &self,
        since: &str,
        page: u32,
        page_size: u32,
    ) -> Result<WorkoutEventPage, FitnessError>;

    async fn routines(&self, page: u32, page_size: u32) -> Result<RoutinePage, FitnessError>;

    async fn routine(&self, id: &str) -> Result<Routine, FitnessError>;

    async fn create_routine(&self, routine: &CreateRoutineRequest) -> Result<Routine, FitnessError>;

    async fn update_routine(
        &self,
        id: &str,
        update: &RoutineUpdate,
    ) -> Result<Routine, FitnessError>;

    async fn routine_folders(&self) -> Result<RoutineFolderList, FitnessError>;

    async fn create_routine_folder(
        &self,
        folder: &CreateRoutineFolderRequest,
    ) -> Result<RoutineFolder, FitnessError>;

    async fn exercise_templates(&self) -> Result<ExerciseTemplateList, FitnessError>;

    /// History of one exercise, optionally bounded by `yyyy-MM-dd` dates.
    async fn exercise_history(
        &self,
        template_id: &str,
        start_date: Option<&str>,
        end_date: Option<&str>,
    ) -> Result<ExerciseHistory, FitnessError>;
}

/// Builds a [`FitnessData`] client for one resolved credential.
pub trait FitnessConnector: Send + Sync {
    fn connect(&self, api_key: &str) -> Result<Arc<dyn FitnessData>, FitnessError>;
}
