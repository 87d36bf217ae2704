use anyhow::Result;
use tokio::{net::TcpListener, signal};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use plant_sensor_service::{
    api::{self, AppState},
    config::Config,
    db,
    reading_cache::ReadingCache,
    sensors::ReadingSimulator,
    vision::VisionClient,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env (ignore error if file absent — env vars may be set externally)
    let _ = dotenvy::dotenv();

    // Initialise tracing
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env())
        .init();

    // Load config
    let config = Config::from_env()?;

    // Connect to DB and run migrations
    let pool = db::create_pool(&config.database_url).await?;
    db::run_migrations(&pool).await?;
    info!("Database ready");

    // Shared in-memory cache of the latest reading per plant, warmed from
    // the database so list views work immediately after a restart.
    let cache = ReadingCache::new();
    cache.warm(db::load_latest_readings(&pool).await?).await;

    // Gateway to the remote vision classifier (falls back to the mock
    // generator when no credential is configured).
    let vision = VisionClient::new(&config);

    // Spawn the simulated-sensor sampling loop
    {
        let simulator =
            ReadingSimulator::new(pool.clone(), cache.clone(), config.poll_interval_secs);
        tokio::spawn(simulator.run());
    }

    // Start HTTP server
    let addr = format!("{}:{}", config.server_host, config.server_port);
    let listener = TcpListener::bind(&addr).await?;
    info!(addr = %addr, "HTTP server listening");

    let state = AppState {
        pool,
        vision,
        cache,
    };
    axum::serve(listener, api::router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c().await.expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
