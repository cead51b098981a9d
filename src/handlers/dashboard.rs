use askama::Template;
use axum::{extract::State, response::Response};

use super::render;
use crate::api::BackendClient;
use crate::error::Result;
use crate::middleware::AuthUser;
use crate::models::ProgramDocument;
use crate::program::{
    count_completed_days, current_locator, filter_completed, format_locator,
    summarize_completed_workouts, CompletedWorkout,
};

#[derive(Clone)]
pub struct DashboardState {
    pub api: BackendClient,
}

/// Card for the program the client is working through.
pub struct CurrentProgramView {
    pub name: String,
    pub week: String,
    pub total_weeks: String,
    pub day: String,
    pub start_url: Option<String>,
}

impl CurrentProgramView {
    fn from_document(doc: &ProgramDocument) -> Self {
        let or_na = |n: Option<u32>| n.map(|n| n.to_string()).unwrap_or_else(|| "N/A".to_string());
        let name = if doc.program_name.is_empty() {
            "No Program Available".to_string()
        } else {
            doc.program_name.clone()
        };
        let total_weeks = if doc.weeks.is_empty() {
            "N/A".to_string()
        } else {
            doc.weeks.len().to_string()
        };

        Self {
            name,
            week: or_na(doc.current_week),
            total_weeks,
            day: or_na(doc.current_day),
            start_url: current_locator(doc)
                .map(|(day, week)| format!("/workouts/{}", format_locator(day, week))),
        }
    }
}

#[derive(Template)]
#[template(path = "dashboard/index.html")]
struct DashboardTemplate {
    user: AuthUser,
    current: Option<CurrentProgramView>,
    programs_completed: usize,
    completed_days: usize,
    history: Vec<CompletedWorkout>,
    error: Option<String>,
}

pub async fn index(State(state): State<DashboardState>, auth_user: AuthUser) -> Result<Response> {
    // Both reads are independent; the card needs the first, the stats the second.
    let fetched = tokio::try_join!(
        state.api.list_uncompleted_programs(&auth_user.id),
        state.api.list_programs(&auth_user.id),
    );

    let template = match fetched {
        Ok((uncompleted, programs)) => DashboardTemplate {
            current: uncompleted.first().map(CurrentProgramView::from_document),
            programs_completed: filter_completed(&programs).len(),
            completed_days: count_completed_days(&programs),
            history: summarize_completed_workouts(&programs),
            error: None,
            user: auth_user,
        },
        Err(e) => {
            tracing::warn!("Failed to load dashboard for {}: {}", auth_user.id, e);
            DashboardTemplate {
                current: None,
                programs_completed: 0,
                completed_days: 0,
                history: Vec::new(),
                error: Some("Failed to load user data. Please try again.".to_string()),
                user: auth_user,
            }
        }
    };

    render(&template)
}
