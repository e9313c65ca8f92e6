use anyhow::Context as _;
use api::auth::session_layer;
use api::settings::{Backend, Settings};
use api::AppState;
use tower_sessions::MemoryStore;
use tower_sessions_sqlx_store::PostgresStore;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug")),
        )
        .init();

    let settings = Settings::new().context("Failed to load settings")?;

    let router = match settings.storage.backend {
        Backend::Postgres => {
            let pool = api::db::connect(&settings.database)
                .await
                .context("Failed to connect to database")?;
            api::db::migrate(&pool)
                .await
                .context("Failed to run migrations")?;

            let session_store = PostgresStore::new(pool.clone());
            session_store
                .migrate()
                .await
                .context("Failed to migrate session store")?;

            api::router(AppState::postgres(pool))
                .layer(session_layer(session_store, &settings.session))
        }
        Backend::Memory => {
            tracing::warn!("using in-memory storage, all data is lost on shutdown");
            api::router(AppState::memory())
                .layer(session_layer(MemoryStore::default(), &settings.session))
        }
    };

    let listener = tokio::net::TcpListener::bind(settings.server.addr())
        .await
        .with_context(|| format!("Failed to bind {}", settings.server.addr()))?;
    tracing::info!("Server listening on {}", listener.local_addr()?);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
