use debtmediator_store::migrate;
use debtmediator_store::Store;

#[test]
fn migrations_apply_once() {
    let store = Store::open_in_memory().expect("open in memory");
    assert_eq!(store.schema_version().expect("version before"), 0);

    store.migrate().expect("migrate");
    store.migrate().expect("migrate again");

    let version: i64 = store
        .connection()
        .query_row("SELECT version FROM debtmediator_schema;", [], |row| {
            row.get(0)
        })
        .expect("schema version");
    assert_eq!(version, migrate::latest_version());
    assert_eq!(store.schema_version().expect("version"), 1);
}

#[test]
fn migrate_rejects_newer_database() {
    let store = Store::open_in_memory().expect("open in memory");
    store.migrate().expect("migrate");
    store
        .connection()
        .execute("UPDATE debtmediator_schema SET version = 99;", [])
        .expect("bump version");

    let err = store.migrate().expect_err("newer schema");
    assert!(err.to_string().contains("newer than available migrations"));
}
