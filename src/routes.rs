use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Extension, Router,
};
use tower_http::trace::TraceLayer;

use crate::handlers::{auth, dashboard, health, progress, settings, workouts};
use crate::repositories::SessionRepository;

pub fn create_router(
    auth_state: auth::AuthState,
    dashboard_state: dashboard::DashboardState,
    workouts_state: workouts::WorkoutsState,
    progress_state: progress::ProgressState,
    settings_state: settings::SettingsState,
    session_repo: SessionRepository,
) -> Router {
    let upload_limit = workouts_state.upload_limit_bytes;

    Router::new()
        .route("/health", get(health::health_check))
        // Dashboard
        .route("/", get(dashboard::index))
        .with_state(dashboard_state)
        // Auth routes
        .route(
            "/auth/login",
            get(auth::login_page).post(auth::login_submit),
        )
        .route(
            "/auth/signup",
            get(auth::signup_page).post(auth::signup_submit),
        )
        .route("/auth/logout", post(auth::logout))
        .with_state(auth_state)
        // Workout routes
        .route("/workouts", get(workouts::index))
        .route("/workouts/{locator}", get(workouts::day_page))
        .route(
            "/workouts/{locator}/exercises/{exercise_id}/reps",
            post(workouts::log_reps),
        )
        .route(
            "/workouts/{locator}/exercises/{exercise_id}/video",
            post(workouts::upload_video).layer(DefaultBodyLimit::max(upload_limit)),
        )
        .route("/api/reps/validate", post(workouts::validate_reps))
        .with_state(workouts_state)
        // Progress routes
        .route("/settings/progress", get(progress::progress))
        .route("/settings/history", get(progress::history))
        .with_state(progress_state)
        // Settings routes
        .route("/settings", get(settings::index))
        .route("/settings/profile", get(settings::profile))
        .with_state(settings_state)
        // Session store via Extension layer
        .layer(Extension(session_repo))
        .layer(TraceLayer::new_for_http())
}
