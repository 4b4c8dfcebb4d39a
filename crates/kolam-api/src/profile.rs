use axum::{Extension, Json, extract::State, response::IntoResponse};

use kolam_types::api::{AccountResponse, GalleryItem};
use kolam_types::models::Session;

use crate::artworks::card;
use crate::auth::AppState;
use crate::error::{AppError, blocking};

/// The logged-in user's page: totals plus their own artworks, newest first.
pub async fn get_account(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
) -> Result<impl IntoResponse, AppError> {
    let accounts = state.accounts.clone();
    let gallery = state.gallery.clone();

    let (user, stats, artworks) = blocking(move || {
        let user = accounts
            .user(session.user_id)?
            .ok_or(AppError::Unauthorized)?;
        let stats = accounts.stats(&session)?;
        let artworks: Vec<GalleryItem> = gallery
            .list_by_owner(session.user_id)?
            .into_iter()
            .map(|a| card(a, user.username.clone()))
            .collect();
        Ok((user, stats, artworks))
    })
    .await?;

    Ok(Json(AccountResponse {
        user_id: user.id,
        username: user.username,
        member_since: user.created_at,
        artwork_count: stats.artwork_count,
        total_likes: stats.total_likes,
        artworks,
    }))
}
