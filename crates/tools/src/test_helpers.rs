//! Shared test utilities for tool tests.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use hevychat_core::error::FitnessError;
use hevychat_core::fitness::*;
use hevychat_core::tool::ToolContext;

/// "Now" for every tool test: 2026-10-19 12:00 UTC.
pub fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 10, 19, 12, 0, 0).unwrap()
}

pub fn set(weight_kg: f64, reps: u32) -> WorkoutSet {
    WorkoutSet {
        weight_kg: Some(weight_kg),
        reps: Some(reps),
        ..WorkoutSet::default()
    }
}

pub fn exercise(title: &str, sets: Vec<WorkoutSet>) -> WorkoutExercise {
    WorkoutExercise {
        title: title.into(),
        exercise_template_id: format!("tpl-{}", title.to_lowercase()),
        notes: None,
        sets,
    }
}

/// A workout starting `days_ago` days before [`now`], lasting `minutes`.
pub fn workout(id: &str, days_ago: i64, minutes: i64, exercises: Vec<WorkoutExercise>) -> Workout {
    let start = now() - Duration::days(days_ago);
    Workout {
        id: id.into(),
        title: format!("Workout {id}"),
        description: None,
        start_time: start,
        end_time: start + Duration::minutes(minutes),
        exercises,
    }
}

pub fn routine(id: &str, title: &str, exercises: Vec<RoutineExercise>) -> Routine {
    Routine {
        id: id.into(),
        title: title.into(),
        folder_id: None,
        notes: None,
        exercises,
    }
}

/// Scripted fitness collaborator. Records every call it receives.
#[derive(Default)]
pub struct StubFitness {
    pub workouts: Vec<Workout>,
    pub workout_count: u64,
    pub routines: Vec<Routine>,
    pub templates: Vec<ExerciseTemplate>,
    pub history: Option<ExerciseHistory>,
    pub fail_with: Option<FitnessError>,
    pub calls: Mutex<Vec<String>>,
    pub created: Mutex<Vec<CreateRoutineRequest>>,
    pub updated: Mutex<Vec<(String, RoutineUpdate)>>,
}

impl StubFitness {
    pub fn failing(error: FitnessError) -> Self {
        Self {
            fail_with: Some(error),
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: String) -> Result<(), FitnessError> {
        self.calls.lock().unwrap().push(call);
        match &self.fail_with {
            Some(e) => Err(e.clone()),
            None => Ok(()),
        }
    }

    fn echo_routine(id: &str, title: &str, exercises: &[RoutineExercisePayload]) -> Routine {
        let exercises = exercises
            .iter()
            .map(|e| RoutineExercise {
                title: e.exercise_template_id.clone(),
                exercise_template_id: e.exercise_template_id.clone(),
                notes: e.notes.clone(),
                superset_id: e.superset_id,
                rest_seconds: e.rest_seconds,
                sets: e.sets.clone(),
            })
            .collect();
        routine(id, title, exercises)
    }
}

/// Context over a stub, with the clock pinned to [`now`].
pub fn context(stub: Arc<StubFitness>) -> ToolContext {
    ToolContext::new(stub).with_clock(now())
}

#[async_trait]
impl FitnessData for StubFitness {
    async fn workouts(&self, page: u32, page_size: u32) -> Result<WorkoutPage, FitnessError> {
        self.record(format!("workouts({page},{page_size})"))?;
        Ok(WorkoutPage {
            page,
            page_count: 1,
            workouts: self.workouts.iter().take(page_size as usize).cloned().collect(),
        })
    }

    async fn workout(&self, id: &str) -> Result<Workout, FitnessError> {
        self.record(format!("workout({id})"))?;
        self.workouts
            .iter()
            .find(|w| w.id == id)
            .cloned()
            .ok_or_else(|| FitnessError::Api {
                status: 404,
                message: "Workout not found".into(),
            })
    }

    async fn workout_count(&self) -> Result<WorkoutCount, FitnessError> {
        self.record("workout_count".into())?;
        Ok(WorkoutCount {
            workout_count: self.workout_count,
        })
    }

    async fn create_workout(
        &self,
        _workout: &CreateWorkoutRequest,
    ) -> Result<Workout, FitnessError> {
        self.record("create_workout".into())?;
        Err(FitnessError::Api {
            status: 501,
            message: "not scripted".into(),
        })
    }

    async fn workout_events(
        &self,
        since: &str,
        page: u32,
        page_size: u32,
    ) -> Result<WorkoutEventPage, FitnessError> {
        self.record(format!("workout_events({since},{page},{page_size})"))?;
        Ok(WorkoutEventPage::default())
    }

    async fn routines(&self, page: u32, page_size: u32) -> Result<RoutinePage, FitnessError> {
        self.record(format!("routines({page},{page_size})"))?;
        Ok(RoutinePage {
            page,
            page_count: 1,
            routines: self.routines.iter().take(page_size as usize).cloned().collect(),
        })
    }

    async fn routine(&self, id: &str) -> Result<Routine, FitnessError> {
        self.record(format!("routine({id})"))?;
        self.routines
            .iter()
            .find(|r| r.id == id)
            .cloned()
            .ok_or_else(|| FitnessError::Api {
                status: 404,
                message: "Routine not found".into(),
            })
    }

    async fn create_routine(
        &self,
        request: &CreateRoutineRequest,
    ) -> Result<Routine, FitnessError> {
        self.record("create_routine".into())?;
        self.created.lock().unwrap().push(request.clone());
        Ok(Self::echo_routine("r-new", &request.title, &request.exercises))
    }

    async fn update_routine(
        &self,
        id: &str,
        update: &RoutineUpdate,
    ) -> Result<Routine, FitnessError> {
        self.record(format!("update_routine({id})"))?;
        self.updated.lock().unwrap().push((id.to_string(), update.clone()));
        let existing = self.routines.iter().find(|r| r.id == id);
        let title = update
            .title
            .clone()
            .or_else(|| existing.map(|r| r.title.clone()))
            .unwrap_or_default();
        match &update.exercises {
            Some(exercises) => Ok(Self::echo_routine(id, &title, exercises)),
            None => Ok(routine(
                id,
                &title,
                existing.map(|r| r.exercises.clone()).unwrap_or_default(),
            )),
        }
    }

    async fn routine_folders(&self) -> Result<RoutineFolderList, FitnessError> {
        self.record("routine_folders".into())?;
        Ok(RoutineFolderList::default())
    }

    async fn create_routine_folder(
        &self,
        folder: &CreateRoutineFolderRequest,
    ) -> Result<RoutineFolder, FitnessError> {
        self.record("create_routine_folder".into())?;
        Ok(RoutineFolder {
            id: 1,
            title: folder.title.clone(),
            index: 0,
        })
    }

    async fn exercise_templates(&self) -> Result<ExerciseTemplateList, FitnessError> {
        self.record("exercise_templates".into())?;
        Ok(ExerciseTemplateList {
            exercise_templates: self.templates.clone(),
        })
    }

    async fn exercise_history(
        &self,
        template_id: &str,
        start_date: Option<&str>,
        end_date: Option<&str>,
    ) -> Result<ExerciseHistory, FitnessError> {
        self.record(format!(
            "exercise_history({template_id},{},{})",
            start_date.unwrap_or("-"),
            end_date.unwrap_or("-")
        ))?;
        self.history.clone().ok_or_else(|| FitnessError::Api {
            status: 404,
            message: "Exercise not found".into(),
        })
    }
}
