//! Databases written before schema versioning open in place.

use chrono::{TimeZone, Utc};
use rusqlite::Connection;

use kolam_db::Database;

fn write_unversioned_db(path: &std::path::Path) {
    let conn = Connection::open(path).unwrap();
    conn.execute_batch(
        "
        CREATE TABLE users (
            id INTEGER PRIMARY KEY,
            username TEXT UNIQUE,
            password TEXT,
            created_at TEXT
        );
        CREATE TABLE artworks (
            id INTEGER PRIMARY KEY,
            user_id INTEGER,
            title TEXT,
            image_data TEXT,
            likes INTEGER DEFAULT 0,
            created_at TEXT,
            FOREIGN KEY (user_id) REFERENCES users (id)
        );
        CREATE TABLE comments (
            id INTEGER PRIMARY KEY,
            artwork_id INTEGER,
            user_id INTEGER,
            comment TEXT,
            created_at TEXT,
            FOREIGN KEY (artwork_id) REFERENCES artworks (id),
            FOREIGN KEY (user_id) REFERENCES users (id)
        );

        INSERT INTO users (username, password, created_at)
            VALUES ('asha', 'digest-asha', '2024-01-05T09:00:00.000001');
        INSERT INTO users (username, password, created_at)
            VALUES ('ravi', 'digest-ravi', '2024-01-05T09:05:00');
        INSERT INTO artworks (user_id, title, image_data, likes, created_at)
            VALUES (1, 'Pongal', 'data-1', 4, '2024-01-05T10:00:00.500000');
        INSERT INTO artworks (user_id, title, image_data, created_at)
            VALUES (2, 'Lotus', 'data-2', '2024-01-06T07:30:00');
        ",
    )
    .unwrap();
}

#[test]
fn unversioned_database_opens_and_keeps_its_rows() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("kolam_art.db");
    write_unversioned_db(&path);

    let db = Database::open(&path).unwrap();

    let asha = db
        .find_user_id_by_credentials("asha", "digest-asha")
        .unwrap()
        .unwrap();
    assert!(db.find_user_id_by_credentials("asha", "digest-ravi").unwrap().is_none());

    let user = db.get_user_by_id(asha).unwrap().unwrap();
    assert_eq!(
        user.created_at,
        Utc.with_ymd_and_hms(2024, 1, 5, 9, 0, 0).unwrap() + chrono::Duration::microseconds(1)
    );

    let gallery = db.list_gallery().unwrap();
    let titles: Vec<&str> = gallery.iter().map(|g| g.artwork.title.as_str()).collect();
    assert_eq!(titles, vec!["Lotus", "Pongal"]);
    assert_eq!(gallery[0].owner_username, "ravi");
    assert_eq!(gallery[0].artwork.likes, 0);
    assert_eq!(gallery[1].artwork.owner_id, asha);

    let pongal = gallery[1].artwork.id;
    assert_eq!(db.increment_likes(pongal).unwrap(), 5);
    assert_eq!(db.user_stats(asha).unwrap(), (1, 5));

    // New rows land after the migrated ones.
    let fresh = db.insert_artwork(asha, "Kolam", "data-3").unwrap();
    assert_eq!(db.list_gallery().unwrap()[0].artwork.id, fresh);
    assert_eq!(db.list_artworks_by_owner(asha).unwrap().len(), 2);
}

#[test]
fn migrated_database_reopens() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("kolam_art.db");
    write_unversioned_db(&path);

    drop(Database::open(&path).unwrap());
    let db = Database::open(&path).unwrap();

    assert_eq!(db.list_gallery().unwrap().len(), 2);
    assert!(db.create_user("asha", "x").is_err());
    let meena = db.create_user("meena", "digest-meena").unwrap();
    assert!(meena > 2);
}
