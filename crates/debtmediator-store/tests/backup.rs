use debtmediator_core::domain::StoredRecord;
use debtmediator_store::error::StoreError;
use debtmediator_store::Store;
use std::path::PathBuf;
use tempfile::TempDir;

fn open_migrated(path: &std::path::Path) -> Store {
    let store = Store::open(path).expect("open store");
    store.migrate().expect("migrate");
    store
}

#[test]
fn backup_creates_readable_snapshot() {
    let temp = TempDir::new().expect("temp dir");
    let db_path = temp.path().join("debtmediator.sqlite3");
    let backup_path = temp.path().join("snapshots").join("backup.sqlite3");

    let store = open_migrated(&db_path);
    store
        .borrowers()
        .create(
            1_700_000_000,
            StoredRecord::new(123_456_789_012_i64, "+7 701 234 56 78"),
        )
        .expect("create borrower");

    store.backup_to(&backup_path).expect("backup");
    assert!(backup_path.exists());

    let backup = Store::open(&backup_path).expect("open backup");
    let borrowers = backup.borrowers().list().expect("list borrowers");
    assert_eq!(borrowers.len(), 1);
    assert_eq!(borrowers[0].record.phone.to_string(), "+7 701 234 56 78");
}

#[test]
fn backup_rejects_database_and_sidecar_paths() {
    let temp = TempDir::new().expect("temp dir");
    let db_path = temp.path().join("debtmediator.sqlite3");
    let store = open_migrated(&db_path);

    let err = store.backup_to(&db_path).expect_err("backup should fail");
    assert!(matches!(err, StoreError::InvalidBackupPath(_)));

    for suffix in ["-wal", "-shm"] {
        let sidecar = PathBuf::from(format!("{}{suffix}", db_path.display()));
        let err = store.backup_to(&sidecar).expect_err("backup should fail");
        assert!(matches!(err, StoreError::InvalidBackupPath(_)));
    }
}

#[cfg(unix)]
#[test]
fn backup_rejects_hardlink_paths() {
    let temp = TempDir::new().expect("temp dir");
    let db_path = temp.path().join("debtmediator.sqlite3");
    let link_path = temp.path().join("debtmediator-link.sqlite3");
    let store = open_migrated(&db_path);

    std::fs::hard_link(&db_path, &link_path).expect("hard link");
    let err = store.backup_to(&link_path).expect_err("backup should fail");
    assert!(matches!(err, StoreError::InvalidBackupPath(_)));
}
