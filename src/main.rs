use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod api;
mod state;

use s3list_backend::config;
use s3list_backend::s3::{ClientFactory, ClientOptions, S3Credentials};
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "s3list_backend=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration / 加载配置
    let app_config = config::load_config().map_err(|e| anyhow::anyhow!(e))?;
    tracing::info!(
        "Server will listen on {}:{}",
        app_config.server.host,
        app_config.server.port
    );

    // Seed the credential store from config.json / 从配置文件载入初始凭证
    let seed = S3Credentials::from(&app_config.s3);
    if seed.is_explicit() {
        tracing::info!(
            "Using explicit S3 credentials from config.json (endpoint {})",
            seed.endpoint_url
        );
    } else if !seed.is_empty() {
        tracing::warn!(
            "Partial S3 credentials in config.json are ignored; endpoint_url, client_id and client_secret are all required"
        );
    } else {
        tracing::info!("No explicit S3 credentials configured, using ambient chain");
    }

    let state = Arc::new(AppState {
        clients: ClientFactory::new(seed, ClientOptions::from(&app_config.s3)),
    });

    let app = Router::new()
        .route("/api/health", get(api::server::health_check))
        .route("/api/s3/auth", get(api::auth::check_auth))
        .route("/api/s3/auth", post(api::auth::set_credentials))
        .route("/api/s3/files", get(api::files::browse_root))
        .route("/api/s3/files/", get(api::files::browse_root))
        .route("/api/s3/files/*path", get(api::files::browse))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let bind_addr = app_config.get_bind_address();
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;

    tracing::info!("Server running at http://{}", bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}
