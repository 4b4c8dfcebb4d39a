use axum::{
    Extension, Json,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    http::{StatusCode, header},
    response::IntoResponse,
};
use tracing::warn;

use kolam_types::api::{
    GalleryItem, GalleryQuery, LikeResponse, SaveArtworkRequest, SaveArtworkResponse,
};
use kolam_types::models::{Artwork, GalleryEntry, Session};

use crate::auth::AppState;
use crate::error::{AppError, blocking};
use crate::gallery::render_image;

// Cards decode every stored PNG, so they are built on the blocking pool.

pub async fn list_gallery(
    State(state): State<AppState>,
    query: Result<Query<GalleryQuery>, QueryRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Query(query) = query?;
    let gallery = state.gallery.clone();
    let items: Vec<GalleryItem> = blocking(move || {
        let entries = gallery.browse(query.q.as_deref(), query.sort)?;
        Ok(entries.into_iter().map(gallery_item).collect())
    })
    .await?;

    Ok(Json(items))
}

pub async fn get_artwork(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Path(id) = id?;
    let gallery = state.gallery.clone();
    let item = blocking(move || {
        let entry = gallery.get_entry(id)?.ok_or(AppError::ArtworkNotFound(id))?;
        Ok(gallery_item(entry))
    })
    .await?;

    Ok(Json(item))
}

/// Serve the stored PNG. A corrupt image answers 422 for this artwork only.
pub async fn artwork_image(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Path(id) = id?;
    let gallery = state.gallery.clone();
    let png = blocking(move || {
        let artwork = gallery.get_artwork(id)?.ok_or(AppError::ArtworkNotFound(id))?;
        render_image(&artwork)
    })
    .await?;

    Ok(([(header::CONTENT_TYPE, "image/png")], png))
}

pub async fn like_artwork(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Path(id) = id?;
    let gallery = state.gallery.clone();
    let likes = blocking(move || gallery.like(id)).await?;

    Ok(Json(LikeResponse { id, likes }))
}

pub async fn save_artwork(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    req: Result<Json<SaveArtworkRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(req) = req?;
    let gallery = state.gallery.clone();
    let id = blocking(move || gallery.save_artwork(&session, &req.title, &req.image_data)).await?;

    Ok((StatusCode::CREATED, Json(SaveArtworkResponse { id })))
}

/// Build a gallery card. Each image is checked on its own, so one unreadable
/// image only blanks its own card.
pub(crate) fn gallery_item(entry: GalleryEntry) -> GalleryItem {
    card(entry.artwork, entry.owner_username)
}

pub(crate) fn card(artwork: Artwork, owner: String) -> GalleryItem {
    let image_available = match render_image(&artwork) {
        Ok(_) => true,
        Err(e) => {
            warn!(artwork_id = artwork.id, "{}", e);
            false
        }
    };

    GalleryItem {
        id: artwork.id,
        title: artwork.title,
        owner,
        likes: artwork.likes,
        created_at: artwork.created_at,
        image_available,
        image_data: image_available.then_some(artwork.image_data),
    }
}
