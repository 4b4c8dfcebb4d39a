//! Likes from many independent callers must all land.

use std::thread;

use kolam_db::Database;

const THREADS: usize = 8;
const LIKES_PER_THREAD: usize = 25;

#[test]
fn concurrent_likes_are_never_lost() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("kolam.db");

    // Two handles means two writer connections racing on the same file.
    let first = Database::open(&path).unwrap();
    let second = Database::open(&path).unwrap();

    let owner = first.create_user("asha", "digest").unwrap();
    let artwork = first.insert_artwork(owner, "Sunrise", "data").unwrap();

    thread::scope(|s| {
        for i in 0..THREADS {
            let db = if i % 2 == 0 { &first } else { &second };
            s.spawn(move || {
                for _ in 0..LIKES_PER_THREAD {
                    db.increment_likes(artwork).unwrap();
                }
            });
        }
    });

    let likes = second.get_artwork(artwork).unwrap().unwrap().likes;
    assert_eq!(likes, (THREADS * LIKES_PER_THREAD) as i64);
}

#[test]
fn readers_see_committed_writes_while_writer_busy() {
    let dir = tempfile::tempdir().unwrap();
    let db = Database::open(&dir.path().join("kolam.db")).unwrap();

    let owner = db.create_user("ravi", "digest").unwrap();
    for i in 0..5 {
        db.insert_artwork(owner, &format!("Pattern {i}"), "data").unwrap();
    }

    thread::scope(|s| {
        s.spawn(|| {
            for _ in 0..50 {
                db.insert_artwork(owner, "More", "data").unwrap();
            }
        });
        for _ in 0..4 {
            s.spawn(|| {
                for _ in 0..20 {
                    let rows = db.list_gallery().unwrap();
                    assert!(rows.len() >= 5);
                    assert!(rows.iter().all(|r| r.owner_username == "ravi"));
                }
            });
        }
    });

    assert_eq!(db.user_stats(owner).unwrap(), (55, 0));
}
