mod config;

use std::sync::Arc;

use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use kolam_api::{AppStateInner, build_router};
use kolam_db::Database;

use crate::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Init logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "kolam=debug,kolam_api=debug,kolam_db=info,tower_http=debug".into()),
        )
        .init();

    let config = Config::from_env()?;

    let jwt_secret = match config.jwt_secret {
        Some(secret) => secret,
        None => {
            warn!("KOLAM_JWT_SECRET not set; using a generated secret, sessions end on restart");
            kolam_crypto::keys::generate_session_secret()
        }
    };

    // Init database
    let db = Arc::new(Database::open(&config.db_path)?);

    let state = AppStateInner::new(
        db,
        jwt_secret,
        chrono::Duration::days(config.token_ttl_days),
    );

    let app = build_router(state, config.max_upload_bytes)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    info!("Kolam Art Studio listening on {}", config.addr);

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
