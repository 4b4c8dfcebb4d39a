use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};
use rusqlite::types::Type;
use rusqlite::{Connection, OptionalExtension, Row, ffi};
use tracing::debug;

use crate::error::is_constraint;
use crate::models::{ArtworkRow, GalleryRow, UserRow};
use crate::{Database, StoreError, StoreResult};

const ARTWORK_COLUMNS: &str = "a.id, a.owner_id, a.title, a.image_data, a.likes, a.created_at";

impl Database {
    // -- Users --

    /// Insert a user. A taken username is reported by the UNIQUE constraint,
    /// so two concurrent signups for the same name cannot both succeed.
    pub fn create_user(&self, username: &str, password_hash: &str) -> StoreResult<i64> {
        let created_at = format_timestamp(Utc::now());
        self.with_conn_mut(|conn| {
            match conn.execute(
                "INSERT INTO users (username, password_hash, created_at) VALUES (?1, ?2, ?3)",
                (username, password_hash, &created_at),
            ) {
                Ok(_) => Ok(conn.last_insert_rowid()),
                Err(e) if is_constraint(&e, ffi::SQLITE_CONSTRAINT_UNIQUE) => {
                    Err(StoreError::DuplicateUsername(username.to_string()))
                }
                Err(e) => Err(e.into()),
            }
        })
    }

    pub fn find_user_id_by_credentials(
        &self,
        username: &str,
        password_hash: &str,
    ) -> StoreResult<Option<i64>> {
        self.with_conn(|conn| {
            let id = conn
                .query_row(
                    "SELECT id FROM users WHERE username = ?1 AND password_hash = ?2",
                    (username, password_hash),
                    |row| row.get(0),
                )
                .optional()?;
            Ok(id)
        })
    }

    pub fn get_user_by_username(&self, username: &str) -> StoreResult<Option<UserRow>> {
        self.with_conn(|conn| query_user(conn, "username = ?1", username))
    }

    pub fn get_user_by_id(&self, id: i64) -> StoreResult<Option<UserRow>> {
        self.with_conn(|conn| query_user(conn, "id = ?1", id))
    }

    // -- Artworks --

    pub fn insert_artwork(&self, owner_id: i64, title: &str, image_data: &str) -> StoreResult<i64> {
        self.insert_artwork_at(owner_id, title, image_data, Utc::now())
    }

    pub(crate) fn insert_artwork_at(
        &self,
        owner_id: i64,
        title: &str,
        image_data: &str,
        created_at: DateTime<Utc>,
    ) -> StoreResult<i64> {
        let created_at = format_timestamp(created_at);
        self.with_conn_mut(|conn| {
            match conn.execute(
                "INSERT INTO artworks (owner_id, title, image_data, likes, created_at)
                 VALUES (?1, ?2, ?3, 0, ?4)",
                (owner_id, title, image_data, &created_at),
            ) {
                Ok(_) => {
                    let id = conn.last_insert_rowid();
                    debug!(artwork_id = id, owner_id, "artwork inserted");
                    Ok(id)
                }
                Err(e) if is_constraint(&e, ffi::SQLITE_CONSTRAINT_FOREIGNKEY) => {
                    Err(StoreError::UnknownOwner(owner_id))
                }
                Err(e) => Err(e.into()),
            }
        })
    }

    pub fn get_artwork(&self, id: i64) -> StoreResult<Option<ArtworkRow>> {
        self.with_conn(|conn| {
            let sql = format!("SELECT {ARTWORK_COLUMNS} FROM artworks a WHERE a.id = ?1");
            let row = conn.query_row(&sql, [id], artwork_from_row).optional()?;
            Ok(row)
        })
    }

    /// A user's artworks, newest first.
    pub fn list_artworks_by_owner(&self, owner_id: i64) -> StoreResult<Vec<ArtworkRow>> {
        self.with_conn(|conn| {
            let sql = format!(
                "SELECT {ARTWORK_COLUMNS} FROM artworks a
                 WHERE a.owner_id = ?1
                 ORDER BY a.created_at DESC, a.id DESC"
            );
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt
                .query_map([owner_id], artwork_from_row)?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    /// Every artwork joined with its owner's username, newest first.
    /// Equal timestamps fall back to the later insert first.
    pub fn list_gallery(&self) -> StoreResult<Vec<GalleryRow>> {
        self.with_conn(|conn| {
            // JOIN users to fetch the owner name in a single query
            let sql = format!(
                "SELECT {ARTWORK_COLUMNS}, u.username
                 FROM artworks a
                 JOIN users u ON a.owner_id = u.id
                 ORDER BY a.created_at DESC, a.id DESC"
            );
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt
                .query_map([], |row| {
                    Ok(GalleryRow {
                        artwork: artwork_from_row(row)?,
                        owner_username: row.get(6)?,
                    })
                })?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    /// Add one like and return the new count.
    ///
    /// The read-modify-write happens inside a single UPDATE statement, so
    /// concurrent likers (even on separate connections) never lose an increment.
    pub fn increment_likes(&self, artwork_id: i64) -> StoreResult<i64> {
        self.with_conn_mut(|conn| {
            conn.query_row(
                "UPDATE artworks SET likes = likes + 1 WHERE id = ?1 RETURNING likes",
                [artwork_id],
                |row| row.get(0),
            )
            .optional()?
            .ok_or(StoreError::ArtworkNotFound(artwork_id))
        })
    }

    /// `(artwork_count, total_likes)` for one owner.
    pub fn user_stats(&self, owner_id: i64) -> StoreResult<(i64, i64)> {
        self.with_conn(|conn| {
            let stats = conn.query_row(
                "SELECT COUNT(*), COALESCE(SUM(likes), 0) FROM artworks WHERE owner_id = ?1",
                [owner_id],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )?;
            Ok(stats)
        })
    }
}

fn query_user<P: rusqlite::ToSql>(
    conn: &Connection,
    predicate: &str,
    value: P,
) -> StoreResult<Option<UserRow>> {
    let sql = format!("SELECT id, username, password_hash, created_at FROM users WHERE {predicate}");
    let mut stmt = conn.prepare(&sql)?;

    let row = stmt
        .query_row([value], |row| {
            Ok(UserRow {
                id: row.get(0)?,
                username: row.get(1)?,
                password_hash: row.get(2)?,
                created_at: timestamp_column(row, 3)?,
            })
        })
        .optional()?;

    Ok(row)
}

fn artwork_from_row(row: &Row<'_>) -> rusqlite::Result<ArtworkRow> {
    Ok(ArtworkRow {
        id: row.get(0)?,
        owner_id: row.get(1)?,
        title: row.get(2)?,
        image_data: row.get(3)?,
        likes: row.get(4)?,
        created_at: timestamp_column(row, 5)?,
    })
}

/// Fixed-width RFC 3339 in UTC, so text order matches time order.
pub(crate) fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Parse a stored timestamp. Zone-less ISO 8601 text (as written by older
/// deployments) is read as UTC.
pub(crate) fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f").map(|dt| dt.and_utc()))
}

fn timestamp_column(row: &Row<'_>, idx: usize) -> rusqlite::Result<DateTime<Utc>> {
    let raw: String = row.get(idx)?;
    parse_timestamp(&raw)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}
