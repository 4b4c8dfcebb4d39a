//! Database row types. These map directly to SQLite rows.
//! Distinct from kolam-types models so the password digest stays in this crate.

use chrono::{DateTime, Utc};
use kolam_types::models::{Artwork, GalleryEntry, User};

pub struct UserRow {
    pub id: i64,
    pub username: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

pub struct ArtworkRow {
    pub id: i64,
    pub owner_id: i64,
    pub title: String,
    pub image_data: String,
    pub likes: i64,
    pub created_at: DateTime<Utc>,
}

pub struct GalleryRow {
    pub artwork: ArtworkRow,
    pub owner_username: String,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User {
            id: row.id,
            username: row.username,
            created_at: row.created_at,
        }
    }
}

impl From<ArtworkRow> for Artwork {
    fn from(row: ArtworkRow) -> Self {
        Artwork {
            id: row.id,
            owner_id: row.owner_id,
            title: row.title,
            image_data: row.image_data,
            likes: row.likes,
            created_at: row.created_at,
        }
    }
}

impl From<GalleryRow> for GalleryEntry {
    fn from(row: GalleryRow) -> Self {
        GalleryEntry {
            artwork: row.artwork.into(),
            owner_username: row.owner_username,
        }
    }
}
