use serde::Serialize;

use crate::models::{ProgramDocument, Week};

/// One bar of the progress chart.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WeeklyProgress {
    pub week: u32,
    pub total_weight_lifted: f64,
    pub avg_weight_lifted: f64,
}

/// Per-week volume of a program, in the order the weeks were sent.
///
/// Volume is `sum(actual_reps) * weight` over logged exercises; the average
/// divides by the number of logged exercises in that week.
pub fn build_weekly_series(doc: &ProgramDocument) -> Vec<WeeklyProgress> {
    doc.weeks.iter().map(week_progress).collect()
}

/// Series for several programs laid end to end.
pub fn build_series(docs: &[ProgramDocument]) -> Vec<WeeklyProgress> {
    docs.iter().flat_map(build_weekly_series).collect()
}

fn week_progress(week: &Week) -> WeeklyProgress {
    let (total_weight_lifted, logged) = week
        .days
        .iter()
        .flat_map(|day| &day.exercises)
        .filter(|exercise| exercise.is_logged())
        .fold((0.0_f64, 0usize), |(total, count), exercise| {
            let volume = exercise.total_reps() as f64 * exercise.weight.unwrap_or(0.0);
            (total + volume, count + 1)
        });

    let avg_weight_lifted = if logged > 0 {
        total_weight_lifted / logged as f64
    } else {
        0.0
    };

    WeeklyProgress {
        week: week.week_number,
        total_weight_lifted,
        avg_weight_lifted,
    }
}
