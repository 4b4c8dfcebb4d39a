use rusqlite::Connection;
use tracing::{info, warn};

use crate::StoreResult;
use crate::queries::{format_timestamp, parse_timestamp};

pub fn run(conn: &Connection) -> StoreResult<()> {
    conn.execute_batch("CREATE TABLE IF NOT EXISTS schema_version (version INTEGER NOT NULL);")?;

    let version: i64 = conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_version",
        [],
        |r| r.get(0),
    )?;

    if version < 1 {
        adopt_legacy_layout(conn)?;

        info!("Running migration v1 (users, artworks, comments)");
        conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS users (
                id              INTEGER PRIMARY KEY,
                username        TEXT NOT NULL UNIQUE,
                password_hash   TEXT NOT NULL,
                created_at      TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS artworks (
                id          INTEGER PRIMARY KEY,
                owner_id    INTEGER NOT NULL REFERENCES users(id),
                title       TEXT NOT NULL,
                image_data  TEXT NOT NULL,
                likes       INTEGER NOT NULL DEFAULT 0 CHECK (likes >= 0),
                created_at  TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_artworks_created
                ON artworks(created_at);

            CREATE INDEX IF NOT EXISTS idx_artworks_owner
                ON artworks(owner_id, created_at);

            -- Reserved: nothing reads or writes comments yet
            CREATE TABLE IF NOT EXISTS comments (
                id          INTEGER PRIMARY KEY,
                artwork_id  INTEGER NOT NULL REFERENCES artworks(id),
                owner_id    INTEGER NOT NULL REFERENCES users(id),
                comment     TEXT NOT NULL,
                created_at  TEXT NOT NULL
            );

            INSERT INTO schema_version (version) VALUES (1);
            ",
        )?;
    }

    info!("Database migrations complete");
    Ok(())
}

/// Unversioned databases name the credential column `password`, the owner
/// columns `user_id`, and store zone-less local timestamps. Bring them in line
/// with v1 before the v1 DDL runs against them.
fn adopt_legacy_layout(conn: &Connection) -> StoreResult<()> {
    if !has_column(conn, "users", "password")? {
        return Ok(());
    }
    info!("Adopting unversioned database layout");

    let tx = conn.unchecked_transaction()?;
    tx.execute_batch("ALTER TABLE users RENAME COLUMN password TO password_hash;")?;
    for table in ["artworks", "comments"] {
        if has_column(&tx, table, "user_id")? {
            tx.execute_batch(&format!(
                "ALTER TABLE {table} RENAME COLUMN user_id TO owner_id;"
            ))?;
        }
    }
    for table in ["users", "artworks", "comments"] {
        normalize_timestamps(&tx, table)?;
    }
    tx.commit()?;
    Ok(())
}

fn has_column(conn: &Connection, table: &str, column: &str) -> StoreResult<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table})"))?;
    let names = stmt
        .query_map([], |r| r.get::<_, String>(1))?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(names.iter().any(|name| name == column))
}

/// Rewrite `created_at` in the fixed-width UTC form so ordering by text stays
/// ordering by time once new rows arrive.
fn normalize_timestamps(conn: &Connection, table: &str) -> StoreResult<()> {
    if !has_column(conn, table, "created_at")? {
        return Ok(());
    }

    let rows: Vec<(i64, String)> = {
        let mut stmt = conn.prepare(&format!(
            "SELECT id, created_at FROM {table} WHERE created_at IS NOT NULL"
        ))?;
        stmt.query_map([], |r| Ok((r.get(0)?, r.get(1)?)))?
            .collect::<Result<_, _>>()?
    };

    let mut update = conn.prepare(&format!("UPDATE {table} SET created_at = ?1 WHERE id = ?2"))?;
    for (id, raw) in rows {
        match parse_timestamp(&raw) {
            Ok(at) => {
                update.execute((format_timestamp(at), id))?;
            }
            Err(e) => warn!(table, id, "unreadable created_at {:?}: {}", raw, e),
        }
    }
    Ok(())
}
