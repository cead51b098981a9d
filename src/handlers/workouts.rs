use askama::Template;
use axum::{
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    Form, Json,
};
use serde::{Deserialize, Serialize};

use super::render;
use crate::api::{BackendClient, ExerciseRef};
use crate::error::{AppError, Result};
use crate::middleware::{AuthUser, OptionalAuthUser};
use crate::models::{Exercise, ProgramDocument};
use crate::program::{
    format_locator, parse_locator, select_exercises, select_latest_week_bounds, sorted_days,
    sorted_week_numbers, RepsState,
};

#[derive(Clone)]
pub struct WorkoutsState {
    pub api: BackendClient,
    pub upload_limit_bytes: usize,
}

// View models
pub struct WeekOption {
    pub number: u32,
    pub url: String,
    pub selected: bool,
}

pub struct DayLink {
    pub label: String,
    pub url: String,
    pub exercise_count: usize,
    pub completed: bool,
}

pub struct ExerciseView {
    pub id: String,
    pub name: String,
    pub sets: u32,
    pub weight: String,
    pub target_reps: String,
    pub rest: String,
    pub logged: String,
    pub input: String,
    pub error: Option<String>,
    pub notice: Option<String>,
    pub reps_action: String,
    pub video_action: String,
}

/// Outcome of the last action on one exercise, shown next to its form.
#[derive(Default)]
struct Feedback {
    exercise_id: String,
    input: String,
    error: Option<String>,
    notice: Option<String>,
}

// Templates
#[derive(Template)]
#[template(path = "workouts/index.html")]
struct BrowseTemplate {
    user: AuthUser,
    program_name: Option<String>,
    weeks: Vec<WeekOption>,
    selected_week: u32,
    days: Vec<DayLink>,
}

#[derive(Template)]
#[template(path = "workouts/day.html")]
struct DayTemplate {
    user: AuthUser,
    day: u32,
    week: u32,
    program_name: Option<String>,
    exercises: Vec<ExerciseView>,
    prev_url: Option<String>,
    next_url: Option<String>,
    error: Option<String>,
}

// Query params
#[derive(Deserialize)]
pub struct BrowseQuery {
    week: Option<u32>,
}

#[derive(Deserialize)]
pub struct DayQuery {
    logged: Option<String>,
    uploaded: Option<String>,
}

#[derive(Deserialize)]
pub struct RepsForm {
    #[serde(default)]
    actual_reps: String,
}

#[derive(Deserialize)]
pub struct ValidateRepsRequest {
    text: String,
}

#[derive(Serialize)]
pub struct ValidateRepsResponse {
    state: &'static str,
    reps: Option<Vec<u32>>,
}

fn day_url(day: u32, week: u32) -> String {
    format!("/workouts/{}", format_locator(day, week))
}

/// Previous and next session around `(day, week)`, taken from the days the
/// program actually defines. Nothing past the latest week bounds is linked.
fn neighbours(doc: &ProgramDocument, day: u32, week: u32) -> (Option<String>, Option<String>) {
    let Some(bounds) = select_latest_week_bounds(doc) else {
        return (None, None);
    };
    let end = (bounds.week, bounds.day);
    let current = (week, day);

    let sessions: Vec<(u32, u32)> = sorted_week_numbers(doc)
        .into_iter()
        .flat_map(|w| {
            sorted_days(doc, w)
                .into_iter()
                .map(move |d| (w, d.day_number))
        })
        .filter(|&session| session <= end)
        .collect();

    let prev = sessions
        .iter()
        .rev()
        .find(|&&session| session < current)
        .map(|&(w, d)| day_url(d, w));
    let next = sessions
        .iter()
        .find(|&&session| session > current)
        .map(|&(w, d)| day_url(d, w));

    (prev, next)
}

fn exercise_view(exercise: &Exercise, day: u32, week: u32, feedback: &Feedback) -> ExerciseView {
    let base = format!(
        "{}/exercises/{}",
        day_url(day, week),
        urlencoding::encode(&exercise.id)
    );
    let is_target = feedback.exercise_id == exercise.id;

    ExerciseView {
        id: exercise.id.clone(),
        name: exercise.name.clone(),
        sets: exercise.sets,
        weight: exercise
            .weight
            .map(|w| format!("{} lbs", w))
            .unwrap_or_else(|| "N/A".to_string()),
        target_reps: exercise.target_reps.to_string(),
        rest: exercise.rest.clone().unwrap_or_default(),
        logged: if exercise.is_logged() {
            join_reps(&exercise.actual_reps)
        } else {
            "Not recorded".to_string()
        },
        input: if is_target {
            feedback.input.clone()
        } else {
            String::new()
        },
        error: feedback.error.clone().filter(|_| is_target),
        notice: feedback.notice.clone().filter(|_| is_target),
        reps_action: format!("{}/reps", base),
        video_action: format!("{}/video", base),
    }
}

pub(crate) fn join_reps(reps: &[u32]) -> String {
    reps.iter()
        .map(|r| r.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

fn day_template(
    user: AuthUser,
    doc: Option<&ProgramDocument>,
    day: u32,
    week: u32,
    feedback: Feedback,
) -> DayTemplate {
    let exercises = select_exercises(doc, day, week)
        .iter()
        .map(|exercise| exercise_view(exercise, day, week, &feedback))
        .collect();
    let (prev_url, next_url) = doc
        .map(|doc| neighbours(doc, day, week))
        .unwrap_or((None, None));

    // Errors for a specific exercise render next to it; others go on top.
    let error = if feedback.exercise_id.is_empty() {
        feedback.error
    } else {
        None
    };

    DayTemplate {
        user,
        day,
        week,
        program_name: doc.map(|doc| doc.program_name.clone()),
        exercises,
        prev_url,
        next_url,
        error,
    }
}

// Handlers
pub async fn index(
    State(state): State<WorkoutsState>,
    auth_user: AuthUser,
    Query(query): Query<BrowseQuery>,
) -> Result<Response> {
    let program = state.api.current_program(&auth_user.id).await?;

    let Some(doc) = program else {
        return render(&BrowseTemplate {
            user: auth_user,
            program_name: None,
            weeks: Vec::new(),
            selected_week: 0,
            days: Vec::new(),
        });
    };

    let week_numbers = sorted_week_numbers(&doc);
    let selected_week = query
        .week
        .filter(|w| week_numbers.contains(w))
        .or_else(|| doc.current_week.filter(|w| week_numbers.contains(w)))
        .or_else(|| week_numbers.first().copied())
        .unwrap_or(0);

    let weeks = week_numbers
        .iter()
        .map(|&number| WeekOption {
            number,
            url: format!("/workouts?week={}", number),
            selected: number == selected_week,
        })
        .collect();

    let days = sorted_days(&doc, selected_week)
        .into_iter()
        .map(|day| DayLink {
            label: format!("Day {}", day.day_number),
            url: day_url(day.day_number, selected_week),
            exercise_count: day.exercises.len(),
            completed: day.is_complete(),
        })
        .collect();

    render(&BrowseTemplate {
        user: auth_user,
        program_name: Some(doc.program_name.clone()),
        weeks,
        selected_week,
        days,
    })
}

pub async fn day_page(
    State(state): State<WorkoutsState>,
    auth_user: AuthUser,
    Path(locator): Path<String>,
    Query(query): Query<DayQuery>,
) -> Result<Response> {
    let (day, week) = parse_locator(&locator)?;
    let program = state.api.current_program(&auth_user.id).await?;

    let feedback = match (query.logged, query.uploaded) {
        (Some(exercise_id), _) => Feedback {
            exercise_id,
            notice: Some("Actual reps updated successfully!".to_string()),
            ..Default::default()
        },
        (None, Some(exercise_id)) => Feedback {
            exercise_id,
            notice: Some("Your video has been uploaded.".to_string()),
            ..Default::default()
        },
        (None, None) => Feedback::default(),
    };

    render(&day_template(auth_user, program.as_ref(), day, week, feedback))
}

pub async fn log_reps(
    State(state): State<WorkoutsState>,
    auth_user: AuthUser,
    Path((locator, exercise_id)): Path<(String, String)>,
    Form(form): Form<RepsForm>,
) -> Result<Response> {
    let (day, week) = parse_locator(&locator)?;
    let program = state.api.current_program(&auth_user.id).await?;

    let mut entry = RepsState::from_input(&form.actual_reps);
    let mut feedback = Feedback {
        exercise_id: exercise_id.clone(),
        input: form.actual_reps.clone(),
        ..Default::default()
    };

    match (&program, entry.submit()) {
        (Some(doc), Some(reps)) => {
            let target = ExerciseRef {
                program_id: &doc.id,
                week,
                day,
                exercise_id: &exercise_id,
            };
            match state.api.log_actual_reps(&target, &reps).await {
                Ok(()) => {
                    let url = format!(
                        "{}?logged={}",
                        day_url(day, week),
                        urlencoding::encode(&exercise_id)
                    );
                    return Ok(Redirect::to(&url).into_response());
                }
                Err(e) => {
                    tracing::warn!("Failed to log reps for {}: {}", exercise_id, e);
                    feedback.error =
                        Some("Failed to update actual reps. Please try again.".to_string());
                }
            }
        }
        (None, _) => {
            feedback.exercise_id.clear();
            feedback.error = Some("No active program found.".to_string());
        }
        (Some(_), None) => {
            feedback.error = Some(match entry {
                RepsState::Empty => "Enter your reps before logging.".to_string(),
                _ => "Invalid reps format".to_string(),
            });
        }
    }

    render(&day_template(auth_user, program.as_ref(), day, week, feedback))
}

pub async fn upload_video(
    State(state): State<WorkoutsState>,
    auth_user: AuthUser,
    Path((locator, exercise_id)): Path<(String, String)>,
    mut multipart: Multipart,
) -> Result<Response> {
    let (day, week) = parse_locator(&locator)?;

    let mut upload = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let file_name = field
            .file_name()
            .filter(|name| !name.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| format!("exercise_{}.mp4", exercise_id));
        let content_type = field.content_type().unwrap_or("video/mp4").to_string();
        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::BadRequest(e.to_string()))?;
        upload = Some((file_name, content_type, data.to_vec()));
    }

    let Some((file_name, content_type, data)) = upload.filter(|(_, _, data)| !data.is_empty())
    else {
        return Err(AppError::Validation("No video selected".to_string()));
    };

    match state
        .api
        .upload_video(&auth_user.id, &exercise_id, file_name, &content_type, data)
        .await
    {
        Ok(uploaded) => {
            tracing::info!("Video URL: {}", uploaded.download_url);
            let url = format!(
                "{}?uploaded={}",
                day_url(day, week),
                urlencoding::encode(&exercise_id)
            );
            Ok(Redirect::to(&url).into_response())
        }
        Err(e) => {
            tracing::warn!("Video upload failed for {}: {}", exercise_id, e);
            let program = state.api.current_program(&auth_user.id).await?;
            let feedback = Feedback {
                exercise_id,
                error: Some("An error occurred while uploading the video.".to_string()),
                ..Default::default()
            };
            render(&day_template(auth_user, program.as_ref(), day, week, feedback))
        }
    }
}

/// Re-evaluates a reps entry as it's typed. Answers 401 rather than the
/// login redirect so the page script can tell the session has ended.
pub async fn validate_reps(
    OptionalAuthUser(auth_user): OptionalAuthUser,
    Json(request): Json<ValidateRepsRequest>,
) -> Response {
    if auth_user.is_none() {
        return (
            StatusCode::UNAUTHORIZED,
            Json(ValidateRepsResponse {
                state: "unauthorized",
                reps: None,
            }),
        )
            .into_response();
    }

    let entry = RepsState::from_input(&request.text);
    let reps = match &entry {
        RepsState::Valid(reps) => Some(reps.clone()),
        _ => None,
    };
    Json(ValidateRepsResponse {
        state: entry.label(),
        reps,
    })
    .into_response()
}
