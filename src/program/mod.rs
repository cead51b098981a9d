//! Pure derivations over [`ProgramDocument`](crate::models::ProgramDocument)s.
//!
//! Nothing in here performs I/O or mutates its input. Missing weeks, days,
//! or documents produce empty results; only malformed text input fails.

pub mod aggregate;
pub mod locator;
pub mod reps;
pub mod series;

use thiserror::Error;

pub use aggregate::{
    compute_progress_stats, count_completed_days, filter_completed, summarize_completed_workouts,
    CompletedWorkout, ProgressStats,
};
pub use locator::{
    current_locator, format_locator, parse_locator, select_exercises, select_latest_week_bounds,
    sorted_days, sorted_week_numbers, LatestBounds,
};
pub use reps::{parse_reps_text, validate_reps_text, RepsState};
pub use series::{build_series, build_weekly_series, WeeklyProgress};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("invalid day locator: {0:?}")]
    Locator(String),

    #[error("invalid reps entry: {0:?}")]
    Reps(String),
}

/// Parses a run of ASCII digits. Unlike `str::parse`, rejects signs.
pub(crate) fn parse_digits(s: &str) -> Option<u32> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}
