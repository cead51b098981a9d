#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use serde_json::{json, Value};
use tokio::net::TcpListener;

use workout_tracker::api::{BackendClient, BackendConfig};
use workout_tracker::db::{create_memory_pool, DbPool};
use workout_tracker::handlers::{auth, dashboard, progress, settings, workouts};
use workout_tracker::migrations::run_migrations;
use workout_tracker::models::BackendUser;
use workout_tracker::repositories::SessionRepository;

pub const PASSWORD: &str = "password123";
pub const SUPPORT_EMAIL: &str = "help@example.com";

pub fn setup_test_db() -> DbPool {
    let pool = create_memory_pool().expect("Failed to create test database");
    run_migrations(&pool).expect("Failed to run migrations");
    pool
}

pub fn create_test_app(pool: DbPool, backend_url: &str) -> Router {
    let api = BackendClient::new(BackendConfig {
        base_url: backend_url.to_string(),
        timeout: Duration::from_secs(5),
    })
    .expect("Failed to build backend client");
    let session_repo = SessionRepository::new(pool);

    let auth_state = auth::AuthState {
        api: api.clone(),
        session_repo: session_repo.clone(),
    };
    let dashboard_state = dashboard::DashboardState { api: api.clone() };
    let workouts_state = workouts::WorkoutsState {
        api: api.clone(),
        upload_limit_bytes: 1024 * 1024,
    };
    let progress_state = progress::ProgressState { api };
    let settings_state = settings::SettingsState {
        support_email: SUPPORT_EMAIL.to_string(),
    };

    workout_tracker::routes::create_router(
        auth_state,
        dashboard_state,
        workouts_state,
        progress_state,
        settings_state,
        session_repo,
    )
}

pub fn backend_user() -> BackendUser {
    BackendUser {
        id: "user-1".to_string(),
        first_name: Some("Ada".to_string()),
        last_name: Some("Lovelace".to_string()),
        email: Some("ada@example.com".to_string()),
        role: None,
    }
}

pub async fn create_session_cookie(pool: &DbPool) -> String {
    let session_repo = SessionRepository::new(pool.clone());
    let token = session_repo.create(&backend_user(), "uid-1").await.unwrap();
    format!("session={}", token)
}

pub fn extract_cookie_header(set_cookie: &str) -> String {
    set_cookie.split(';').next().unwrap_or("").to_string()
}

// Stub backend

/// Requests the stub backend has received, plus switches to make it fail.
#[derive(Default)]
pub struct StubState {
    pub rep_writes: Mutex<Vec<(String, Value)>>,
    pub uploads: Mutex<Vec<(HashMap<String, String>, String)>>,
    pub fail_reads: AtomicBool,
    pub fail_writes: AtomicBool,
}

pub struct StubBackend {
    pub url: String,
    pub state: Arc<StubState>,
}

impl StubBackend {
    pub fn fail_reads(&self) {
        self.state.fail_reads.store(true, Ordering::SeqCst);
    }

    pub fn fail_writes(&self) {
        self.state.fail_writes.store(true, Ordering::SeqCst);
    }

    pub fn rep_writes(&self) -> Vec<(String, Value)> {
        self.state.rep_writes.lock().unwrap().clone()
    }

    pub fn uploads(&self) -> Vec<(HashMap<String, String>, String)> {
        self.state.uploads.lock().unwrap().clone()
    }
}

/// Program in progress: two weeks of two days each.
pub fn active_program() -> Value {
    json!({
        "_id": "prog-active",
        "programName": "Strength Block",
        "clientId": "user-1",
        "completed": false,
        "currentWeek": 1,
        "currentDay": 2,
        "totalWeeks": 2,
        "weeks": [
            {
                "weekNumber": 1,
                "days": [
                    {
                        "dayNumber": 2,
                        "exercises": [
                            { "_id": "ex-dl", "name": "Deadlift", "sets": 3, "weight": 250, "targetReps": "5", "rest": "180s", "actualReps": [] }
                        ]
                    },
                    {
                        "dayNumber": 1,
                        "exercises": [
                            { "_id": "ex-squat", "name": "Squat", "sets": 3, "weight": 200, "targetReps": 5, "actualReps": [5, 5, 5] },
                            { "_id": "ex-bench", "name": "Bench Press", "sets": 2, "weight": 100, "targetReps": 8, "actualReps": [8, 8, null], "rpe": 8 }
                        ]
                    }
                ]
            },
            {
                "weekNumber": 2,
                "days": [
                    {
                        "dayNumber": 1,
                        "exercises": [
                            { "_id": "ex-press", "name": "Overhead Press", "sets": 3, "weight": null, "targetReps": "AMRAP", "actualReps": null }
                        ]
                    },
                    {
                        "dayNumber": 2,
                        "exercises": [
                            { "_id": "ex-row", "name": "Barbell Row", "sets": 3, "targetReps": 10 }
                        ]
                    }
                ]
            }
        ]
    })
}

pub fn completed_program() -> Value {
    json!({
        "_id": "prog-done",
        "programName": "Intro Program",
        "clientId": "user-1",
        "completed": true,
        "updatedAt": "2024-01-05T12:00:00Z",
        "weeks": [
            {
                "weekNumber": 1,
                "days": [
                    {
                        "dayNumber": 1,
                        "exercises": [
                            { "_id": "ex-curl", "name": "Curl", "sets": 3, "weight": 30, "targetReps": 10, "actualReps": [10, 10] }
                        ]
                    }
                ]
            }
        ]
    })
}

fn unavailable() -> Response {
    (StatusCode::INTERNAL_SERVER_ERROR, "backend unavailable").into_response()
}

async fn stub_sign_in(Json(body): Json<Value>) -> Response {
    if body["password"] == PASSWORD {
        Json(json!({ "uid": "uid-1" })).into_response()
    } else {
        (StatusCode::UNAUTHORIZED, "invalid credentials").into_response()
    }
}

async fn stub_sign_up(Json(body): Json<Value>) -> Response {
    if body["email"] == "taken@example.com" {
        (StatusCode::BAD_REQUEST, "email already registered").into_response()
    } else {
        StatusCode::CREATED.into_response()
    }
}

async fn stub_sign_out() -> StatusCode {
    StatusCode::OK
}

async fn stub_user(Query(query): Query<HashMap<String, String>>) -> Response {
    match query.get("firebaseUID").map(String::as_str) {
        Some("uid-1") => Json(json!({
            "_id": "user-1",
            "first_name": "Ada",
            "last_name": "Lovelace",
            "email": "ada@example.com",
            "role": null
        }))
        .into_response(),
        _ => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn stub_programs(State(state): State<Arc<StubState>>) -> Response {
    if state.fail_reads.load(Ordering::SeqCst) {
        return unavailable();
    }
    Json(json!([completed_program(), active_program()])).into_response()
}

/// Sends a bare object rather than an array, as the real backend does
/// when there is a single match.
async fn stub_uncompleted(
    State(state): State<Arc<StubState>>,
    Path(_user_id): Path<String>,
) -> Response {
    if state.fail_reads.load(Ordering::SeqCst) {
        return unavailable();
    }
    Json(active_program()).into_response()
}

async fn stub_log_reps(
    State(state): State<Arc<StubState>>,
    Path((program_id, week, day, exercise_id)): Path<(String, u32, u32, String)>,
    Json(body): Json<Value>,
) -> Response {
    if state.fail_writes.load(Ordering::SeqCst) {
        return unavailable();
    }
    state.rep_writes.lock().unwrap().push((
        format!("{}/{}/{}/{}", program_id, week, day, exercise_id),
        body,
    ));
    StatusCode::OK.into_response()
}

async fn stub_upload(
    State(state): State<Arc<StubState>>,
    Query(query): Query<HashMap<String, String>>,
    mut multipart: Multipart,
) -> Response {
    if state.fail_writes.load(Ordering::SeqCst) {
        return unavailable();
    }
    while let Ok(Some(field)) = multipart.next_field().await {
        if field.name() == Some("file") {
            let name = field.file_name().unwrap_or_default().to_string();
            state.uploads.lock().unwrap().push((query.clone(), name));
        }
    }
    Json(json!({ "downloadURL": "https://cdn.test/video.mp4" })).into_response()
}

/// Serves the backend endpoints on a random local port.
pub async fn spawn_backend() -> StubBackend {
    let state = Arc::new(StubState::default());

    let app = Router::new()
        .route("/auth/signin", post(stub_sign_in))
        .route("/auth/signup", post(stub_sign_up))
        .route("/auth/signout", post(stub_sign_out))
        .route("/users/firebase", get(stub_user))
        .route("/workouts", get(stub_programs))
        .route("/workouts/uncompleted/{user_id}", get(stub_uncompleted))
        .route(
            "/workouts/{program_id}/weeks/{week}/days/{day}/exercises/{exercise_id}",
            put(stub_log_reps),
        )
        .route("/videos/uploadFile", post(stub_upload))
        .with_state(state.clone());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    StubBackend {
        url: format!("http://{}", addr),
        state,
    }
}

/// Stub backend plus an app wired to it.
pub async fn setup() -> (Router, DbPool, StubBackend) {
    let backend = spawn_backend().await;
    let pool = setup_test_db();
    let app = create_test_app(pool.clone(), &backend.url);
    (app, pool, backend)
}

pub async fn body_string(response: Response) -> String {
    use http_body_util::BodyExt;

    let body = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(body.to_vec()).unwrap()
}
