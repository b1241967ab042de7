#![allow(clippy::unwrap_used)]

use super::*;

#[test]
fn test_fresh_database_has_no_values() {
    let db = Database::open_in_memory().unwrap();
    assert_eq!(db.get("finance_transactions").unwrap(), None);
}

#[test]
fn test_set_then_get() {
    let mut db = Database::open_in_memory().unwrap();
    db.set("finance_currency", "\"USD\"").unwrap();
    assert_eq!(db.get("finance_currency").unwrap().as_deref(), Some("\"USD\""));
}

#[test]
fn test_set_overwrites_whole_value() {
    let mut db = Database::open_in_memory().unwrap();
    db.set("finance_budgets", "[1,2,3]").unwrap();
    db.set("finance_budgets", "[]").unwrap();
    assert_eq!(db.get("finance_budgets").unwrap().as_deref(), Some("[]"));
}

#[test]
fn test_keys_are_independent() {
    let mut db = Database::open_in_memory().unwrap();
    db.set("b", "2").unwrap();
    db.set("a", "1").unwrap();
    assert_eq!(db.get("a").unwrap().as_deref(), Some("1"));
    assert_eq!(db.get("b").unwrap().as_deref(), Some("2"));
}

#[test]
fn test_reopen_file_keeps_values() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("dompet.db");
    {
        let mut db = Database::open(&path).unwrap();
        db.set("finance_currency", "\"EUR\"").unwrap();
    }
    let db = Database::open(&path).unwrap();
    assert_eq!(db.get("finance_currency").unwrap().as_deref(), Some("\"EUR\""));
}

#[test]
fn test_migrate_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("dompet.db");
    Database::open(&path).unwrap();
    let db = Database::open(&path).unwrap();
    let version: i32 = db
        .conn
        .query_row("SELECT version FROM schema_version", [], |row| row.get(0))
        .unwrap();
    assert_eq!(version, schema::CURRENT_VERSION);
    let rows: i64 = db
        .conn
        .query_row("SELECT COUNT(*) FROM schema_version", [], |row| row.get(0))
        .unwrap();
    assert_eq!(rows, 1);
}

#[test]
fn test_open_fails_for_missing_directory() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing").join("dompet.db");
    assert!(Database::open(&path).is_err());
}

#[test]
fn test_open_storage_uses_database_file() {
    let dir = tempfile::tempdir().unwrap();
    let mut storage = open_storage(Some(dir.path()));
    storage.set("finance_currency", "\"EUR\"").unwrap();
    assert!(dir.path().join(DB_FILE).is_file());

    let reopened = open_storage(Some(dir.path()));
    assert_eq!(reopened.get("finance_currency").unwrap().as_deref(), Some("\"EUR\""));
}

#[test]
fn test_open_storage_falls_back_to_memory() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("absent");

    for data_dir in [None, Some(missing.as_path())] {
        let mut storage = open_storage(data_dir);
        storage.set("finance_currency", "\"USD\"").unwrap();
        assert_eq!(storage.get("finance_currency").unwrap().as_deref(), Some("\"USD\""));
    }
    assert!(!missing.exists());
}
