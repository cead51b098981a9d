use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use workout_tracker::api::BackendClient;
use workout_tracker::config::Config;
use workout_tracker::db;
use workout_tracker::handlers::{auth, dashboard, progress, settings, workouts};
use workout_tracker::migrations::run_migrations;
use workout_tracker::repositories::SessionRepository;
use workout_tracker::routes;
use workout_tracker::version::GIT_VERSION;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "workout_tracker=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load environment variables
    dotenvy::dotenv().ok();

    let config = Config::from_env();
    tracing::info!("workout-tracker {}", GIT_VERSION);
    tracing::info!("Connecting to database: {}", config.database_url);

    let pool = db::create_pool(&config.database_url)?;
    run_migrations(&pool)?;

    let session_repo = SessionRepository::new(pool.clone());
    let removed = session_repo.cleanup_expired().await?;
    if removed > 0 {
        tracing::info!("Removed {} expired sessions", removed);
    }

    tracing::info!("Using backend at {}", config.backend_url);
    let api = BackendClient::new(config.backend())?;

    // Create handler states
    let auth_state = auth::AuthState {
        api: api.clone(),
        session_repo: session_repo.clone(),
    };
    let dashboard_state = dashboard::DashboardState { api: api.clone() };
    let workouts_state = workouts::WorkoutsState {
        api: api.clone(),
        upload_limit_bytes: config.upload_limit_bytes,
    };
    let progress_state = progress::ProgressState { api };
    let settings_state = settings::SettingsState {
        support_email: config.support_email.clone(),
    };

    let app = routes::create_router(
        auth_state,
        dashboard_state,
        workouts_state,
        progress_state,
        settings_state,
        session_repo,
    );

    let addr = config.server_addr();
    tracing::info!("Starting server at http://{}", addr);

    let listener = TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
