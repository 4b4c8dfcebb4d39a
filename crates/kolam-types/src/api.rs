use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::GallerySort;

// -- Session token --

/// Claims carried in a session token. `sub` is the decimal user id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub username: String,
    pub exp: usize,
}

// -- Auth --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RegisterResponse {
    pub user_id: i64,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub user_id: i64,
    pub username: String,
    pub token: String,
}

// -- Artworks --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SaveArtworkRequest {
    pub title: String,
    /// Base64-encoded PNG exported from the canvas.
    pub image_data: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SaveArtworkResponse {
    pub id: i64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LikeResponse {
    pub id: i64,
    pub likes: i64,
}

// -- Gallery --

#[derive(Debug, Default, Deserialize)]
pub struct GalleryQuery {
    pub q: Option<String>,
    #[serde(default)]
    pub sort: GallerySort,
}

/// A gallery card. `image_data` is omitted when the stored image cannot be
/// decoded, and `image_available` is false; the rest of the card still renders.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GalleryItem {
    pub id: i64,
    pub title: String,
    pub owner: String,
    pub likes: i64,
    pub created_at: DateTime<Utc>,
    pub image_available: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_data: Option<String>,
}

// -- Account --

#[derive(Debug, Serialize, Deserialize)]
pub struct AccountResponse {
    pub user_id: i64,
    pub username: String,
    pub member_since: DateTime<Utc>,
    pub artwork_count: i64,
    pub total_likes: i64,
    pub artworks: Vec<GalleryItem>,
}

// -- Errors --

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}
