//! Aggregation and formatting helpers shared by the workout tools.

use std::collections::HashMap;

use chrono::{DateTime, Datelike, Utc};
use hevychat_core::fitness::WorkoutSet;
use serde::Serialize;

/// `(count / window_days) * 7`. A zero-day window yields 0.
pub fn average_per_week(count: usize, window_days: u32) -> f64 {
    if window_days == 0 {
        return 0.0;
    }
    (count as f64 / window_days as f64) * 7.0
}

/// `(active_days / window_days) * 100` with one decimal and a trailing `%`.
///
/// Halves round away from zero (`6.25` becomes `6.3%`).
pub fn consistency(active_days: usize, window_days: u32) -> String {
    if window_days == 0 {
        return "0.0%".into();
    }
    let pct = (active_days as f64 / window_days as f64) * 100.0;
    format!("{:.1}%", (pct * 10.0).round() / 10.0)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExerciseCount {
    pub name: String,
    pub count: usize,
}

/// Rank names by occurrence, most frequent first, keeping at most five.
/// Equal counts keep first-seen order.
pub fn top_exercises<'a>(names: impl IntoIterator<Item = &'a str>) -> Vec<ExerciseCount> {
    let mut counts: Vec<ExerciseCount> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for name in names {
        match index.get(name) {
            Some(&i) => counts[i].count += 1,
            None => {
                index.insert(name, counts.len());
                counts.push(ExerciseCount {
                    name: name.to_string(),
                    count: 1,
                });
            }
        }
    }

    // sort_by is stable, so ties stay in first-seen order
    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts.truncate(5);
    counts
}

/// Heaviest set weight, treating missing weights as 0. No sets yields 0.
pub fn max_weight(sets: &[WorkoutSet]) -> f64 {
    sets.iter()
        .map(|s| s.weight_kg.unwrap_or(0.0))
        .fold(0.0, f64::max)
}

pub fn total_reps(sets: &[WorkoutSet]) -> u64 {
    sets.iter().map(|s| u64::from(s.reps.unwrap_or(0))).sum()
}

/// Σ weight × reps, missing values counting as 0.
pub fn total_volume(sets: &[WorkoutSet]) -> f64 {
    sets.iter()
        .map(|s| s.weight_kg.unwrap_or(0.0) * f64::from(s.reps.unwrap_or(0)))
        .sum()
}

/// Long-form date, e.g. "October 10th, 2026".
pub fn long_date(at: DateTime<Utc>) -> String {
    let day = at.day();
    let suffix = match (day % 10, day % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    };
    format!("{} {day}{suffix}, {}", at.format("%B"), at.year())
}

/// Human phrasing of the distance between two instants ("45 minutes", "about 1 hour").
pub fn humanize_duration(start: DateTime<Utc>, end: DateTime<Utc>) -> String {
    let seconds = (end - start).num_seconds().abs();
    let minutes = (seconds as f64 / 60.0).round() as i64;

    match minutes {
        0 => "less than a minute".into(),
        1 => "1 minute".into(),
        2..=44 => format!("{minutes} minutes"),
        45..=89 => "about 1 hour".into(),
        90..=1439 => format!("about {} hours", (minutes as f64 / 60.0).round() as i64),
        1440..=2519 => "1 day".into(),
        _ => format!("{} days", (minutes as f64 / 1440.0).round() as i64),
    }
}
