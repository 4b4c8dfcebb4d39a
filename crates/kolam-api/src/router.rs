use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post},
};

use crate::artworks;
use crate::auth::{self, AppState};
use crate::middleware::require_session;
use crate::profile;

/// Build the API router. Reads are public; saving and the account page need a session.
pub fn build_router(state: AppState, max_upload_bytes: usize) -> Router {
    let public_routes = Router::new()
        .route("/health", get(health))
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/gallery", get(artworks::list_gallery))
        .route("/artworks/{id}", get(artworks::get_artwork))
        .route("/artworks/{id}/image", get(artworks::artwork_image))
        .route("/artworks/{id}/like", post(artworks::like_artwork));

    let protected_routes = Router::new()
        .route("/artworks", post(artworks::save_artwork))
        .route("/account", get(profile::get_account))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_session));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .with_state(state)
}

async fn health() -> &'static str {
    "ok"
}
