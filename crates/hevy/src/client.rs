//! HTTP client for the Hevy public API (`/v1/...`).
//!
//! Authentication is a single `api-key` header. Non-2xx responses are mapped
//! to [`FitnessError`]: 401/403 become `InvalidApiKey`, anything else carries
//! the vendor's `message` field.

use async_trait::async_trait;
use hevychat_core::error::FitnessError;
use hevychat_core::fitness::*;
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

pub const DEFAULT_BASE_URL: &str = "https://api.hevyapp.com";

/// One user's Hevy client.
pub struct HevyClient {
    api_key: String,
    base_url: String,
    client: reqwest::Client,
}

impl HevyClient {
    pub fn new(api_key: impl Into<String>) -> Result<Self, FitnessError> {
        Self::with_client(api_key, DEFAULT_BASE_URL, reqwest::Client::new())
    }

    /// Build a client sharing an existing connection pool.
    pub fn with_client(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
        client: reqwest::Client,
    ) -> Result<Self, FitnessError> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(FitnessError::MissingApiKey);
        }
        Ok(Self {
            api_key,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        })
    }

    async fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<serde_json::Value>,
    ) -> Result<T, FitnessError> {
        let url = format!("{}{}", self.base_url, path);
        debug!(%method, %url, "Hevy API request");

        let mut builder = self
            .client
            .request(method.clone(), &url)
            .header("api-key", &self.api_key)
            .header("Content-Type", "application/json");
        if !query.is_empty() {
            builder = builder.query(query);
        }
        if let Some(body) = body {
            builder = builder.json(&body);
        }

        let response = builder.send().await.map_err(|e| {
            warn!(%method, %url, error = %e, "Hevy API request failed");
            FitnessError::Connection(e.to_string())
        })?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<HevyErrorBody>(&text)
                .ok()
                .and_then(|b| b.message.or(b.error))
                .unwrap_or_else(|| {
                    status
                        .canonical_reason()
                        .unwrap_or("Unknown Error")
                        .to_string()
                });

            warn!(%method, %url, status = status.as_u16(), error = %message, "Hevy API error");

            if status.as_u16() == 401 || status.as_u16() == 403 {
                return Err(FitnessError::InvalidApiKey);
            }
            return Err(FitnessError::Api {
                status: status.as_u16(),
                message,
            });
        }

        response
            .json::<T>()
            .await
            .map_err(|e| FitnessError::Decode(e.to_string()))
    }

    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, FitnessError> {
        self.request(Method::GET, path, query, None).await
    }

    fn to_body<B: Serialize>(body: &B) -> Result<serde_json::Value, FitnessError> {
        serde_json::to_value(body).map_err(|e| FitnessError::Decode(e.to_string()))
    }

    fn paging(page: u32, page_size: u32) -> Vec<(&'static str, String)> {
        vec![("page", page.to_string()), ("pageSize", page_size.to_string())]
    }
}

#[derive(Debug, Deserialize)]
struct HevyErrorBody {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Serialize)]
struct RoutineEnvelope<'a, T> {
    routine: &'a T,
}

/// Routine writes answer `{"routine": [ ... ]}`; a bare object is accepted too.
#[derive(Deserialize)]
struct RoutineReply {
    routine: OneOrMany,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    Many(Vec<Routine>),
    One(Box<Routine>),
}

impl RoutineReply {
    fn into_routine(self) -> Result<Routine, FitnessError> {
        match self.routine {
            OneOrMany::Many(list) => list
                .into_iter()
                .next()
                .ok_or(FitnessError::EmptyResponse("routine")),
            OneOrMany::One(routine) => Ok(*routine),
        }
    }
}

/// A caller-supplied id used as one path segment.
///
/// Ids come from the model and the proxy routes. Anything that could change
/// the request target (separators, query, fragment, escapes, dot segments)
/// is rejected before a request is built.
fn path_id(id: &str) -> Result<&str, FitnessError> {
    let id = id.trim();
    if id.is_empty() || id == "." || id == ".." || id.contains(['/', '\\', '?', '#', '%']) {
        return Err(FitnessError::InvalidId(id.to_string()));
    }
    Ok(id)
}

#[async_trait]
impl FitnessData for HevyClient {
    async fn workouts(&self, page: u32, page_size: u32) -> Result<WorkoutPage, FitnessError> {
        self.get("/v1/workouts", &Self::paging(page, page_size)).await
    }

    async fn workout(&self, id: &str) -> Result<Workout, FitnessError> {
        self.get(&format!("/v1/workouts/{}", path_id(id)?), &[]).await
    }

    async fn workout_count(&self) -> Result<WorkoutCount, FitnessError> {
        self.get("/v1/workouts/count", &[]).await
    }

    async fn create_workout(
        &self,
        workout: &CreateWorkoutRequest,
    ) -> Result<Workout, FitnessError> {
        let body = Self::to_body(workout)?;
        self.request(Method::POST, "/v1/workouts", &[], Some(body)).await
    }

    async fn workout_events(
        &self,
        since: &str,
        page: u32,
        page_size: u32,
    ) -> Result<WorkoutEventPage, FitnessError> {
        let mut query = vec![("since", since.to_string())];
        query.extend(Self::paging(page, page_size));
        self.get("/v1/workout_events", &query).await
    }

    async fn routines(&self, page: u32, page_size: u32) -> Result<RoutinePage, FitnessError> {
        self.get("/v1/routines", &Self::paging(page, page_size)).await
    }

    async fn routine(&self, id: &str) -> Result<Routine, FitnessError> {
        self.get(&format!("/v1/routines/{}", path_id(id)?), &[]).await
    }

    async fn create_routine(
        &self,
        routine: &CreateRoutineRequest,
    ) -> Result<Routine, FitnessError> {
        let body = Self::to_body(&RoutineEnvelope { routine })?;
        debug!(payload = %body, "Creating routine");
        let reply: RoutineReply = self
            .request(Method::POST, "/v1/routines", &[], Some(body))
            .await?;
        reply.into_routine()
    }

    async fn update_routine(
        &self,
        id: &str,
        update: &RoutineUpdate,
    ) -> Result<Routine, FitnessError> {
        let body = Self::to_body(&RoutineEnvelope { routine: update })?;
        debug!(routine_id = %id, payload = %body, "Updating routine");
        let reply: RoutineReply = self
            .request(Method::PUT, &format!("/v1/routines/{}", path_id(id)?), &[], Some(body))
            .await?;
        reply.into_routine()
    }

    async fn routine_folders(&self) -> Result<RoutineFolderList, FitnessError> {
        self.get("/v1/routine_folders", &[]).await
    }

    async fn create_routine_folder(
        &self,
        folder: &CreateRoutineFolderRequest,
    ) -> Result<RoutineFolder, FitnessError> {
        let body = Self::to_body(folder)?;
        self.request(Method::POST, "/v1/routine_folders", &[], Some(body))
            .await
    }

    async fn exercise_templates(&self) -> Result<ExerciseTemplateList, FitnessError> {
        self.get("/v1/exercise_templates", &[]).await
    }

    async fn exercise_history(
        &self,
        template_id: &str,
        start_date: Option<&str>,
        end_date: Option<&str>,
    ) -> Result<ExerciseHistory, FitnessError> {
        let mut query = Vec::new();
        if let Some(start) = start_date.filter(|s| !s.is_empty()) {
            query.push(("start_date", start.to_string()));
        }
        if let Some(end) = end_date.filter(|s| !s.is_empty()) {
            query.push(("end_date", end.to_string()));
        }
        self.get(&format!("/v1/exercise_history/{}", path_id(template_id)?), &query)
            .await
    }
}
