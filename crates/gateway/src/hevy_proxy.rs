//! `/api/hevy/*`: thin pass-through to the caller's Hevy account.
//!
//! Every failure is reported as `{error, message, errorType, timestamp}`.

use std::sync::Arc;

use axum::{
    Router,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::get,
};
use chrono::{SecondsFormat, Utc};
use hevychat_core::fitness::{
    CreateRoutineRequest, CreateWorkoutRequest, ExerciseHistory, ExerciseTemplateList, FitnessData,
    Routine, RoutinePage, Workout, WorkoutCount, WorkoutPage,
};
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, error};

use crate::SharedState;
use crate::access::{self, AccessError};

/// Routes mounted under `/api/hevy`.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/workouts", get(list_workouts).post(create_workout))
        .route("/workouts/count", get(workout_count))
        .route("/workouts/{id}", get(get_workout))
        .route("/routines", get(list_routines).post(create_routine))
        .route("/exercise-templates", get(exercise_templates))
        .route("/exercise-history/{id}", get(exercise_history))
}

/// A failed proxy call: what was being attempted, and why it failed.
#[derive(Debug)]
pub struct ProxyError {
    action: &'static str,
    cause: AccessError,
}

impl ProxyError {
    fn wrap<E: Into<AccessError>>(action: &'static str) -> impl FnOnce(E) -> Self {
        move |e| Self {
            action,
            cause: e.into(),
        }
    }
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        let status = self.cause.status();
        let error_type = self.cause.error_type();
        error!(
            action = self.action,
            status = status.as_u16(),
            error_type,
            error = %self.cause,
            "Hevy proxy request failed"
        );

        let body = json!({
            "error": self.action,
            "message": self.cause.to_string(),
            "errorType": error_type,
            "timestamp": Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        });
        (status, Json(body)).into_response()
    }
}

type ProxyResult<T> = Result<T, ProxyError>;

async fn client(
    state: &SharedState,
    headers: &HeaderMap,
    action: &'static str,
) -> ProxyResult<Arc<dyn FitnessData>> {
    access::resolve_fitness(state, headers)
        .await
        .map_err(ProxyError::wrap(action))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Paging {
    #[serde(default = "first_page")]
    page: u32,
    #[serde(default = "default_page_size")]
    page_size: u32,
}

fn first_page() -> u32 {
    1
}

fn default_page_size() -> u32 {
    10
}

#[derive(Debug, Deserialize)]
struct DateRange {
    start_date: Option<String>,
    end_date: Option<String>,
}

async fn list_workouts(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Query(paging): Query<Paging>,
) -> ProxyResult<Json<WorkoutPage>> {
    const ACTION: &str = "Failed to fetch workouts";
    let fitness = client(&state, &headers, ACTION).await?;
    let page = fitness
        .workouts(paging.page, paging.page_size)
        .await
        .map_err(ProxyError::wrap(ACTION))?;
    debug!(page = paging.page, results = page.workouts.len(), "Fetched workouts");
    Ok(Json(page))
}

async fn create_workout(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Json(body): Json<CreateWorkoutRequest>,
) -> ProxyResult<(StatusCode, Json<Workout>)> {
    const ACTION: &str = "Failed to create workout";
    let fitness = client(&state, &headers, ACTION).await?;
    let workout = fitness
        .create_workout(&body)
        .await
        .map_err(ProxyError::wrap(ACTION))?;
    Ok((StatusCode::CREATED, Json(workout)))
}

async fn workout_count(
    State(state): State<SharedState>,
    headers: HeaderMap,
) -> ProxyResult<Json<WorkoutCount>> {
    const ACTION: &str = "Failed to fetch workout count";
    let fitness = client(&state, &headers, ACTION).await?;
    let count = fitness
        .workout_count()
        .await
        .map_err(ProxyError::wrap(ACTION))?;
    Ok(Json(count))
}

async fn get_workout(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> ProxyResult<Json<Workout>> {
    const ACTION: &str = "Failed to fetch workout";
    let fitness = client(&state, &headers, ACTION).await?;
    let workout = fitness
        .workout(&id)
        .await
        .map_err(ProxyError::wrap(ACTION))?;
    Ok(Json(workout))
}

async fn list_routines(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Query(paging): Query<Paging>,
) -> ProxyResult<Json<RoutinePage>> {
    const ACTION: &str = "Failed to fetch routines";
    let fitness = client(&state, &headers, ACTION).await?;
    let page = fitness
        .routines(paging.page, paging.page_size)
        .await
        .map_err(ProxyError::wrap(ACTION))?;
    Ok(Json(page))
}

async fn create_routine(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Json(body): Json<CreateRoutineRequest>,
) -> ProxyResult<(StatusCode, Json<Routine>)> {
    const ACTION: &str = "Failed to create routine";
    let fitness = client(&state, &headers, ACTION).await?;
    let routine = fitness
        .create_routine(&body)
        .await
        .map_err(ProxyError::wrap(ACTION))?;
    Ok((StatusCode::CREATED, Json(routine)))
}

async fn exercise_templates(
    State(state): State<SharedState>,
    headers: HeaderMap,
) -> ProxyResult<Json<ExerciseTemplateList>> {
    const ACTION: &str = "Failed to fetch exercise templates";
    let fitness = client(&state, &headers, ACTION).await?;
    let templates = fitness
        .exercise_templates()
        .await
        .map_err(ProxyError::wrap(ACTION))?;
    Ok(Json(templates))
}

async fn exercise_history(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Query(range): Query<DateRange>,
) -> ProxyResult<Json<ExerciseHistory>> {
    const ACTION: &str = "Failed to fetch exercise history";
    let fitness = client(&state, &headers, ACTION).await?;
    let history = fitness
        .exercise_history(&id, range.start_date.as_deref(), range.end_date.as_deref())
        .await
        .map_err(ProxyError::wrap(ACTION))?;
    Ok(Json(history))
}
