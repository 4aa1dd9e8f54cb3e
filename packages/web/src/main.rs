use anyhow::Context;
use api::{db, Logbook, Settings};
use tokio::{net::TcpListener, signal, time::Duration};
use tower_http::trace::TraceLayer;
use tower_sessions::ExpiredDeletion;
use tower_sessions_sqlx_store::PostgresStore;
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

mod error;
mod routes;
mod session;
mod views;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let settings = Settings::new().context("failed to load settings")?;

    info!("Connecting to database...");
    let pool = db::connect(&settings.database)
        .await
        .context("failed to connect to database")?;
    db::migrate(&pool).await.context("failed to run migrations")?;

    let session_store = PostgresStore::new(pool.clone());
    session_store
        .migrate()
        .await
        .context("failed to prepare session store")?;

    let sweeper = session_store.clone();
    let deletion_task = tokio::spawn(async move {
        if let Err(e) = sweeper
            .continuously_delete_expired(Duration::from_secs(60 * 60))
            .await
        {
            error!(error = %e, "expired session cleanup stopped");
        }
    });

    let app = routes::router(Logbook::new(db::PgStore::new(pool)))
        .layer(session::session_layer(
            session_store,
            settings.store_key(),
            settings.server.secure,
        ))
        .layer(TraceLayer::new_for_http());

    let address = settings.server.address();
    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("failed to bind {address}"))?;
    info!("Server listening on {address}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    deletion_task.abort();
    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C, shutting down"),
            Err(e) => {
                error!(error = %e, "failed to listen for Ctrl+C");
                std::future::pending::<()>().await
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut terminate) => {
                terminate.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                error!(error = %e, "failed to install terminate handler");
                std::future::pending::<()>().await
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
