use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::ProgramDocument;

/// Dashboard history row for a finished program.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompletedWorkout {
    pub program_name: String,
    pub date: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct ProgressStats {
    pub total_exercises: usize,
    pub avg_weight_lifted: f64,
}

/// Number of days, across every document, whose exercises are all logged.
pub fn count_completed_days(docs: &[ProgramDocument]) -> usize {
    docs.iter()
        .flat_map(|doc| &doc.weeks)
        .flat_map(|week| &week.days)
        .filter(|day| day.is_complete())
        .count()
}

/// Documents the backend has flagged as completed, in input order.
pub fn filter_completed(docs: &[ProgramDocument]) -> Vec<&ProgramDocument> {
    docs.iter().filter(|doc| doc.completed).collect()
}

pub fn summarize_completed_workouts(docs: &[ProgramDocument]) -> Vec<CompletedWorkout> {
    filter_completed(docs)
        .into_iter()
        .map(|doc| CompletedWorkout {
            program_name: doc.program_name.clone(),
            date: doc
                .updated_at
                .map(format_long_date)
                .unwrap_or_else(|| "N/A".to_string()),
        })
        .collect()
}

/// US long form, e.g. `January 5, 2024`. The calendar day is taken in UTC,
/// the zone the backend stamps `updatedAt` in, so the server's local zone
/// never shifts it.
pub fn format_long_date(date: DateTime<Utc>) -> String {
    date.format("%B %-d, %Y").to_string()
}

/// Counts every exercise and averages the target weights that are set.
/// Unset and zero weights are left out of the mean.
pub fn compute_progress_stats(docs: &[ProgramDocument]) -> ProgressStats {
    let mut total_exercises = 0;
    let mut total_weight = 0.0;
    let mut weighted = 0usize;

    for exercise in docs
        .iter()
        .flat_map(|doc| &doc.weeks)
        .flat_map(|week| &week.days)
        .flat_map(|day| &day.exercises)
    {
        total_exercises += 1;
        if let Some(weight) = exercise.weight.filter(|w| *w != 0.0 && !w.is_nan()) {
            total_weight += weight;
            weighted += 1;
        }
    }

    let avg_weight_lifted = if weighted > 0 {
        total_weight / weighted as f64
    } else {
        0.0
    };

    ProgressStats {
        total_exercises,
        avg_weight_lifted,
    }
}
