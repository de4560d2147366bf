//! Unit tests for paste storage operations.

use super::{expiry_key, AccessOutcome, PasteDb};
use crate::db::tables::{PASTES_BY_EXPIRY, REDB_FILE_NAME};
use crate::detection::Language;
use crate::models::paste::Paste;
use crate::AppError;
use chrono::{Duration, Utc};
use redb::{ReadableDatabase, ReadableTable};
use std::sync::Arc;
use tempfile::TempDir;

fn setup_paste_db() -> (PasteDb, Arc<redb::Database>, TempDir) {
    let dir = TempDir::new().expect("temp dir");
    let db = Arc::new(redb::Database::create(dir.path().join(REDB_FILE_NAME)).expect("open redb"));
    let paste_db = PasteDb::new(db.clone()).expect("open paste db");
    (paste_db, db, dir)
}

fn paste_expiring_in(lifetime: Option<Duration>) -> Paste {
    let now = Utc::now();
    let mut paste = Paste::new("body text".to_string(), Language::Plaintext, now);
    paste.expires_at = lifetime.map(|lifetime| now + lifetime);
    paste
}

fn expiry_index_len(db: &redb::Database) -> usize {
    let read_txn = db.begin_read().expect("read txn");
    let table = read_txn.open_table(PASTES_BY_EXPIRY).expect("index table");
    table.iter().expect("iter").count()
}

#[test]
fn create_then_get_returns_identical_row() {
    let (paste_db, _db, _dir) = setup_paste_db();
    let paste = paste_expiring_in(Some(Duration::hours(1)));
    paste_db.create(&paste).expect("create");
    assert_eq!(paste_db.get(&paste.id).expect("get"), Some(paste));
    assert_eq!(paste_db.get("missing").expect("get"), None);
}

#[test]
fn create_rejects_duplicate_id_without_overwriting() {
    let (paste_db, _db, _dir) = setup_paste_db();
    let original = paste_expiring_in(None);
    paste_db.create(&original).expect("create");

    let mut duplicate = paste_expiring_in(None);
    duplicate.id = original.id.clone();
    duplicate.content = "other".to_string();
    let err = paste_db.create(&duplicate).expect_err("duplicate id");
    assert!(matches!(err, AppError::StorageMessage(_)));
    assert_eq!(
        paste_db.get(&original.id).expect("get").map(|p| p.content),
        Some("body text".to_string())
    );
}

#[test]
fn record_access_bumps_live_rows_only() {
    let (paste_db, _db, _dir) = setup_paste_db();
    let paste = paste_expiring_in(None);
    paste_db.create(&paste).expect("create");

    let now = Utc::now();
    for expected in 1..=3u64 {
        match paste_db.record_access(&paste.id, now).expect("access") {
            AccessOutcome::Disclosed(row) => {
                assert_eq!(row.access_count, expected);
                assert_eq!(row.last_accessed_at, Some(now));
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }
    assert_eq!(
        paste_db.record_access("nope", now).expect("access"),
        AccessOutcome::Missing
    );
}

#[test]
fn record_access_lazily_expires_due_rows() {
    let (paste_db, db, _dir) = setup_paste_db();
    let paste = paste_expiring_in(Some(Duration::minutes(10)));
    paste_db.create(&paste).expect("create");
    assert_eq!(expiry_index_len(&db), 1);

    let later = paste.expires_at.expect("expiry") + Duration::seconds(1);
    assert_eq!(
        paste_db.record_access(&paste.id, later).expect("access"),
        AccessOutcome::Expired
    );
    let stored = paste_db.get(&paste.id).expect("get").expect("row kept");
    assert!(stored.is_deleted);
    assert_eq!(stored.access_count, 0);
    assert_eq!(expiry_index_len(&db), 0);

    // Deleted rows stay inert.
    assert_eq!(
        paste_db.record_access(&paste.id, later).expect("access"),
        AccessOutcome::Missing
    );
}

#[test]
fn expire_if_due_flips_once() {
    let (paste_db, _db, _dir) = setup_paste_db();
    let paste = paste_expiring_in(Some(Duration::minutes(10)));
    paste_db.create(&paste).expect("create");
    let deadline = paste.expires_at.expect("expiry");

    assert!(!paste_db
        .expire_if_due(&paste.id, deadline - Duration::seconds(1))
        .expect("not yet due"));
    assert!(paste_db.expire_if_due(&paste.id, deadline).expect("due"));
    assert!(!paste_db.expire_if_due(&paste.id, deadline).expect("idempotent"));
}

#[test]
fn delete_with_token_requires_matching_token_and_live_row() {
    let (paste_db, db, _dir) = setup_paste_db();
    let paste = paste_expiring_in(Some(Duration::days(1)));
    paste_db.create(&paste).expect("create");

    assert!(!paste_db.delete_with_token(&paste.id, "wrong").expect("delete"));
    assert!(!paste_db
        .delete_with_token("missing", &paste.delete_token)
        .expect("delete"));
    assert!(!paste_db.get(&paste.id).expect("get").expect("row").is_deleted);

    assert!(paste_db
        .delete_with_token(&paste.id, &paste.delete_token)
        .expect("delete"));
    assert!(paste_db.get(&paste.id).expect("get").expect("row").is_deleted);
    assert_eq!(expiry_index_len(&db), 0);

    assert!(!paste_db
        .delete_with_token(&paste.id, &paste.delete_token)
        .expect("second delete"));
}

#[test]
fn sweep_flips_only_due_live_rows() {
    let (paste_db, db, _dir) = setup_paste_db();
    let short = paste_expiring_in(Some(Duration::minutes(10)));
    let long = paste_expiring_in(Some(Duration::days(7)));
    let forever = paste_expiring_in(None);
    let deleted = paste_expiring_in(Some(Duration::minutes(5)));
    for paste in [&short, &long, &forever, &deleted] {
        paste_db.create(paste).expect("create");
    }
    assert!(paste_db
        .delete_with_token(&deleted.id, &deleted.delete_token)
        .expect("delete"));

    let now = Utc::now() + Duration::hours(1);
    assert_eq!(paste_db.sweep_expired(now).expect("sweep"), 1);
    assert!(paste_db.get(&short.id).expect("get").expect("row").is_deleted);
    assert!(!paste_db.get(&long.id).expect("get").expect("row").is_deleted);
    assert!(!paste_db.get(&forever.id).expect("get").expect("row").is_deleted);
    assert_eq!(expiry_index_len(&db), 1);

    assert_eq!(paste_db.sweep_expired(now).expect("sweep again"), 0);
    assert_eq!(paste_db.count_live().expect("count"), 2);
}

#[test]
fn sweep_handles_pre_epoch_expiry() {
    let (paste_db, _db, _dir) = setup_paste_db();
    let mut paste = paste_expiring_in(None);
    paste.expires_at = Some(
        chrono::DateTime::from_timestamp(-60, 0).expect("valid pre-epoch timestamp"),
    );
    paste_db.create(&paste).expect("create");
    assert_eq!(expiry_key(paste.expires_at.expect("expiry")), 0);
    assert_eq!(paste_db.sweep_expired(Utc::now()).expect("sweep"), 1);
}

#[test]
fn concurrent_access_bumps_are_not_lost() {
    let (paste_db, _db, _dir) = setup_paste_db();
    let paste = paste_expiring_in(None);
    paste_db.create(&paste).expect("create");
    let paste_db = Arc::new(paste_db);

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let paste_db = paste_db.clone();
            let id = paste.id.clone();
            std::thread::spawn(move || {
                for _ in 0..25 {
                    paste_db.record_access(&id, Utc::now()).expect("access");
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().expect("join");
    }

    let stored = paste_db.get(&paste.id).expect("get").expect("row");
    assert_eq!(stored.access_count, 200);
}

#[test]
fn racing_deletes_flip_exactly_once() {
    let (paste_db, _db, _dir) = setup_paste_db();
    let paste = paste_expiring_in(None);
    paste_db.create(&paste).expect("create");
    let paste_db = Arc::new(paste_db);

    let handles: Vec<_> = (0..6)
        .map(|_| {
            let paste_db = paste_db.clone();
            let id = paste.id.clone();
            let token = paste.delete_token.clone();
            std::thread::spawn(move || paste_db.delete_with_token(&id, &token).expect("delete"))
        })
        .collect();
    let successes = handles
        .into_iter()
        .map(|handle| handle.join().expect("join"))
        .filter(|flipped| *flipped)
        .count();
    assert_eq!(successes, 1);
}
