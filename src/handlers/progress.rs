use askama::Template;
use axum::{extract::State, response::Response};

use super::render;
use super::workouts::join_reps;
use crate::api::BackendClient;
use crate::error::Result;
use crate::middleware::AuthUser;
use crate::models::{Exercise, ProgramDocument};
use crate::program::{
    build_series, compute_progress_stats, filter_completed, sorted_days, sorted_week_numbers,
    WeeklyProgress,
};

#[derive(Clone)]
pub struct ProgressState {
    pub api: BackendClient,
}

const MAX_BAR_HEIGHT: f64 = 200.0;

pub struct BarView {
    pub label: String,
    pub total: String,
    pub average: String,
    pub height: String,
    pub dot: String,
}

impl From<&WeeklyProgress> for BarView {
    fn from(point: &WeeklyProgress) -> Self {
        let height = (point.total_weight_lifted / 10.0).clamp(0.0, MAX_BAR_HEIGHT);
        let dot = (point.avg_weight_lifted / 2.0).clamp(0.0, MAX_BAR_HEIGHT);
        Self {
            label: format!("W{}", point.week),
            total: format!("{:.0}", point.total_weight_lifted),
            average: format!("{:.2}", point.avg_weight_lifted),
            height: format!("{:.1}", height),
            dot: format!("{:.1}", dot),
        }
    }
}

pub struct HistoryExercise {
    pub name: String,
    pub detail: String,
    pub actual: String,
    pub rpe: String,
}

impl From<&Exercise> for HistoryExercise {
    fn from(exercise: &Exercise) -> Self {
        let weight = exercise
            .weight
            .map(|w| w.to_string())
            .unwrap_or_else(|| "N/A".to_string());
        Self {
            name: exercise.name.clone(),
            detail: format!(
                "{} lbs, {} sets x {} reps",
                weight, exercise.sets, exercise.target_reps
            ),
            actual: if exercise.is_logged() {
                format!("Actual Reps: {}", join_reps(&exercise.actual_reps))
            } else {
                "Not recorded".to_string()
            },
            rpe: exercise
                .rpe
                .map(|r| r.to_string())
                .unwrap_or_else(|| "N/A".to_string()),
        }
    }
}

pub struct HistoryDay {
    pub label: String,
    pub exercises: Vec<HistoryExercise>,
}

pub struct HistoryWeek {
    pub label: String,
    pub days: Vec<HistoryDay>,
}

pub struct HistoryProgram {
    pub name: String,
    pub duration: String,
    pub weeks: Vec<HistoryWeek>,
}

impl From<&ProgramDocument> for HistoryProgram {
    fn from(doc: &ProgramDocument) -> Self {
        let total_weeks = doc.total_weeks.unwrap_or(doc.weeks.len() as u32);
        let weeks = sorted_week_numbers(doc)
            .into_iter()
            .map(|week| HistoryWeek {
                label: format!("Week {}", week),
                days: sorted_days(doc, week)
                    .into_iter()
                    .map(|day| HistoryDay {
                        label: format!("Day {}", day.day_number),
                        exercises: day.exercises.iter().map(HistoryExercise::from).collect(),
                    })
                    .collect(),
            })
            .collect();

        Self {
            name: doc.program_name.clone(),
            duration: format!("{} weeks", total_weeks),
            weeks,
        }
    }
}

#[derive(Template)]
#[template(path = "settings/progress.html")]
struct ProgressTemplate {
    user: AuthUser,
    programs_completed: usize,
    total_exercises: usize,
    avg_weight: String,
    bars: Vec<BarView>,
    error: Option<String>,
}

#[derive(Template)]
#[template(path = "settings/history.html")]
struct HistoryTemplate {
    user: AuthUser,
    programs: Vec<HistoryProgram>,
    error: Option<String>,
}

pub async fn progress(State(state): State<ProgressState>, auth_user: AuthUser) -> Result<Response> {
    let template = match state.api.list_programs(&auth_user.id).await {
        Ok(programs) => {
            let stats = compute_progress_stats(&programs);
            ProgressTemplate {
                programs_completed: filter_completed(&programs).len(),
                total_exercises: stats.total_exercises,
                avg_weight: format!("{:.2} lbs", stats.avg_weight_lifted),
                bars: build_series(&programs).iter().map(BarView::from).collect(),
                error: None,
                user: auth_user,
            }
        }
        Err(e) => {
            tracing::warn!("Failed to load progress for {}: {}", auth_user.id, e);
            ProgressTemplate {
                programs_completed: 0,
                total_exercises: 0,
                avg_weight: format!("{:.2} lbs", 0.0),
                bars: Vec::new(),
                error: Some("Failed to load data. Please try again.".to_string()),
                user: auth_user,
            }
        }
    };

    render(&template)
}

pub async fn history(State(state): State<ProgressState>, auth_user: AuthUser) -> Result<Response> {
    let template = match state.api.list_programs(&auth_user.id).await {
        Ok(programs) => HistoryTemplate {
            programs: programs.iter().map(HistoryProgram::from).collect(),
            error: None,
            user: auth_user,
        },
        Err(e) => {
            tracing::warn!("Failed to load history for {}: {}", auth_user.id, e);
            HistoryTemplate {
                programs: Vec::new(),
                error: Some("Failed to load data. Please try again.".to_string()),
                user: auth_user,
            }
        }
    };

    render(&template)
}
