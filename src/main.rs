use careconnect::{build_router, AppConfig, AppState};
use sqlx::postgres::PgPoolOptions;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

type StartupResult<T> = Result<T, Box<dyn std::error::Error>>;

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "careconnect=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    if let Err(e) = run().await {
        error!(error = %e, "Server failed to start");
        std::process::exit(1);
    }
}

async fn run() -> StartupResult<()> {
    let config = AppConfig::from_env()?;

    info!(
        app_name = %config.app_name,
        environment = %config.environment,
        "Starting CareConnect backend"
    );

    let addr = config.bind_addr();
    let app_state = connect_storage(config).await?;
    let app = build_router(app_state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Server running on http://{}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}

/// Picks the store named by `DATABASE_URL` and prepares it
async fn connect_storage(config: AppConfig) -> StartupResult<AppState> {
    if config.uses_in_memory_store() {
        info!("Using in-memory store, data is lost on restart");
        return Ok(AppState::in_memory(config));
    }

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(&config.database_url)
        .await?;
    info!("Connected to database");

    sqlx::migrate!("./migrations").run(&pool).await?;
    info!("Database migrations applied");

    Ok(AppState::postgres(config, pool))
}
