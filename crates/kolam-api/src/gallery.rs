use std::sync::Arc;

use tracing::info;

use kolam_db::Database;
use kolam_types::models::{Artwork, GalleryEntry, GallerySort, Session};

use crate::error::AppError;

/// Artwork storage and the public gallery.
#[derive(Clone)]
pub struct GalleryService {
    db: Arc<Database>,
}

impl GalleryService {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Store a canvas export for the logged-in user. The owner is always the
    /// session's user; callers cannot save on someone else's behalf.
    pub fn save_artwork(
        &self,
        session: &Session,
        title: &str,
        image_data: &str,
    ) -> Result<i64, AppError> {
        let id = self.db.insert_artwork(session.user_id, title, image_data)?;
        info!(artwork_id = id, owner = %session.username, "artwork saved");
        Ok(id)
    }

    pub fn get_artwork(&self, id: i64) -> Result<Option<Artwork>, AppError> {
        Ok(self.db.get_artwork(id)?.map(Artwork::from))
    }

    /// One artwork with its owner's name.
    pub fn get_entry(&self, id: i64) -> Result<Option<GalleryEntry>, AppError> {
        let Some(artwork) = self.get_artwork(id)? else {
            return Ok(None);
        };
        let owner = self
            .db
            .get_user_by_id(artwork.owner_id)?
            .ok_or(AppError::UnknownOwner(artwork.owner_id))?;

        Ok(Some(GalleryEntry {
            artwork,
            owner_username: owner.username,
        }))
    }

    /// A user's artworks, newest first.
    pub fn list_by_owner(&self, owner_id: i64) -> Result<Vec<Artwork>, AppError> {
        let rows = self.db.list_artworks_by_owner(owner_id)?;
        Ok(rows.into_iter().map(Artwork::from).collect())
    }

    /// Every artwork with its owner's name, newest first.
    pub fn list_all(&self) -> Result<Vec<GalleryEntry>, AppError> {
        let rows = self.db.list_gallery()?;
        Ok(rows.into_iter().map(GalleryEntry::from).collect())
    }

    /// Register one like and return the new total.
    pub fn like(&self, artwork_id: i64) -> Result<i64, AppError> {
        Ok(self.db.increment_likes(artwork_id)?)
    }

    /// `list_all`, then search, then the requested ordering.
    pub fn browse(&self, term: Option<&str>, sort: GallerySort) -> Result<Vec<GalleryEntry>, AppError> {
        let mut entries = filter_by_search_term(self.list_all()?, term);
        sort_entries(&mut entries, sort);
        Ok(entries)
    }
}

/// Keep entries whose title or owner contains `term`, ignoring case.
/// An absent or empty term keeps everything.
pub fn filter_by_search_term(entries: Vec<GalleryEntry>, term: Option<&str>) -> Vec<GalleryEntry> {
    let needle = match term {
        Some(t) if !t.is_empty() => t.to_lowercase(),
        _ => return entries,
    };

    entries
        .into_iter()
        .filter(|e| {
            e.artwork.title.to_lowercase().contains(&needle)
                || e.owner_username.to_lowercase().contains(&needle)
        })
        .collect()
}

/// Reorder a listing that is already newest-first. `MostLiked` is stable, so
/// equal like counts keep newest-first order.
pub fn sort_entries(entries: &mut [GalleryEntry], sort: GallerySort) {
    match sort {
        GallerySort::Newest => {}
        GallerySort::MostLiked => entries.sort_by(|a, b| b.artwork.likes.cmp(&a.artwork.likes)),
    }
}

/// PNG bytes for an artwork, or `DecodeFailure` if the stored text is corrupt.
pub fn render_image(artwork: &Artwork) -> Result<Vec<u8>, AppError> {
    Ok(kolam_codec::decode_png_bytes(&artwork.image_data)?)
}
