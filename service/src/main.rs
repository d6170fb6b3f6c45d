mod config;
mod models;
mod routes;
mod storage;

use axum::{Router, extract::DefaultBodyLimit};
use config::ServiceConfig;
use storage::LogStorage;
use tower_http::cors::{CorsLayer, Any};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "matchlog_service=debug,matchlog=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ServiceConfig::load()?;
    tracing::debug!("Configuration: {:?}", config);

    let storage = LogStorage::new(&config.data_dir)?;

    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .merge(routes::create_routes(storage))
        .layer(DefaultBodyLimit::max(config.max_upload_bytes))
        .layer(cors);

    let addr = config.socket_addr()?;
    tracing::info!("Starting match log service on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
