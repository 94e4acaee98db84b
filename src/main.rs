use anyhow::Context;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use motorent_web::{app, config::Config, fleet::catalog, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "motorent_web=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;
    let addr = config.socket_addr()?;

    let snapshot = catalog::load_snapshot(
        &config.catalog_path,
        config.closures_path.as_deref(),
        1,
    )
    .await
    .with_context(|| format!("loading catalog {}", config.catalog_path.display()))?;

    let state = AppState::new(config, snapshot);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {}", addr))?;
    info!("Listening on {}", addr);

    axum::serve(listener, app(state)).await?;

    Ok(())
}
