use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tower_governor::{governor::GovernorConfigBuilder, GovernorLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use chirpy::{app, config::Config, state::AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    dotenvy::dotenv().ok();

    let config = Config::from_env()?;
    tracing::info!("✅ Configuration loaded successfully");
    tracing::debug!("{:?}", config);

    let addr = config.bind_addr;

    let state = AppState::new(config).await?;
    tracing::info!("✅ AppState initialized");

    // One token replenished every 100ms per client IP, bursts of 50.
    let governor_conf = Arc::new(
        GovernorConfigBuilder::default()
            .per_millisecond(100)
            .burst_size(50)
            .use_headers()
            .finish()
            .context("invalid rate limiter configuration")?,
    );

    let app = app::router(state).layer(GovernorLayer::new(governor_conf));

    tracing::info!("🚀 Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
