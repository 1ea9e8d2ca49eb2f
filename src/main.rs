//! Server: opens the database, applies the schema, serves `/api` and operational routes.

use furniture_api::{app, apply_migrations, connect, AppState, Catalog, Settings};
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let settings = Settings::from_env()?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("furniture_api=info")),
        )
        .init();

    let catalog = Catalog::furniture()?;
    let pool = connect(&settings.database_url).await?;
    apply_migrations(&pool, &catalog).await?;

    let state = AppState::new(pool.clone(), catalog);
    let router = app(state, settings.body_limit);

    let listener = TcpListener::bind(settings.bind_addr).await?;
    tracing::info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, router)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await?;

    pool.close().await;
    tracing::info!("database connection closed");
    Ok(())
}
