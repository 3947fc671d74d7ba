use std::sync::Arc;

use mock_route::{config::ServerConfig, create_router, route_file::RouteStore, AppState};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mock_route=debug,axum::rejection=trace".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ServerConfig::from_env()?;
    tracing::info!("persisting routes to {}", config.route_file.display());

    let state = AppState {
        store: Arc::new(RouteStore::new(config.route_file)),
    };
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    tracing::info!("starting server on http://{}", config.addr);
    axum::serve(listener, app).await?;

    Ok(())
}
