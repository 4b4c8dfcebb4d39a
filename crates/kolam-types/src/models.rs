use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A registered account. The password digest never leaves the store layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub created_at: DateTime<Utc>,
}

/// A saved drawing. `image_data` is a base64-encoded PNG.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artwork {
    pub id: i64,
    pub owner_id: i64,
    pub title: String,
    pub image_data: String,
    pub likes: i64,
    pub created_at: DateTime<Utc>,
}

/// One gallery row: an artwork joined with its owner's username.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GalleryEntry {
    pub artwork: Artwork,
    pub owner_username: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserStats {
    pub artwork_count: i64,
    pub total_likes: i64,
}

/// Identity of the caller for one request.
///
/// Only produced by a successful login or by validating a session token;
/// every write goes through one of these instead of a process-wide "current user".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub user_id: i64,
    pub username: String,
}

/// Ordering applied to a gallery listing after it comes back from the store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GallerySort {
    #[default]
    Newest,
    MostLiked,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sort_names_are_snake_case() {
        let json = serde_json::to_string(&GallerySort::MostLiked).unwrap();
        assert_eq!(json, "\"most_liked\"");

        let parsed: GallerySort = serde_json::from_str("\"most_liked\"").unwrap();
        assert_eq!(parsed, GallerySort::MostLiked);
        assert!(serde_json::from_str::<GallerySort>("\"oldest\"").is_err());
    }
}
