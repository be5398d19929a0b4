use debtmediator_core::domain::{StoredRecord, StoredValue};
use debtmediator_core::{match_claim, IdentifierClaim, MatchPolicy};
use debtmediator_store::error::StoreError;
use debtmediator_store::Store;

const NOW: i64 = 1_700_000_000;

fn store() -> Store {
    let store = Store::open_in_memory().expect("open in memory");
    store.migrate().expect("migrate");
    store
}

#[test]
fn find_candidates_ignores_stored_representation() {
    let store = store();
    let repo = store.borrowers();
    repo.create(NOW, StoredRecord::new(123_456_789_012_i64, "+7 701 234 56 78"))
        .expect("numeric iin");
    repo.create(NOW + 1, StoredRecord::new("123456789012", 77_012_345_678_i64))
        .expect("text iin");
    repo.create(NOW + 2, StoredRecord::new("1234-5678-9012", "87012345678"))
        .expect("formatted iin");
    repo.create(NOW + 3, StoredRecord::new("999999999999", "77012345678"))
        .expect("other borrower");

    let candidates = repo.find_candidates("123456789012").expect("find");
    assert_eq!(candidates.len(), 3);
    assert_eq!(
        candidates[0].record.national_id,
        StoredValue::Integer(123_456_789_012)
    );
    assert_eq!(
        candidates[1].record.phone,
        StoredValue::Integer(77_012_345_678)
    );
}

#[test]
fn text_values_keep_leading_zeros() {
    let store = store();
    let repo = store.borrowers();
    let created = repo
        .create(NOW, StoredRecord::new("000123456789", "77011234567"))
        .expect("create");

    let fetched = repo.get(created.id).expect("get").expect("exists");
    assert_eq!(
        fetched.record.national_id,
        StoredValue::Text("000123456789".to_string())
    );
    assert!(repo.find_candidates("123456789").expect("find").is_empty());
    assert_eq!(repo.find_candidates("000123456789").expect("find").len(), 1);
}

#[test]
fn find_candidates_with_digit_free_id_is_empty() {
    let store = store();
    store
        .borrowers()
        .create(NOW, StoredRecord::new("123456789012", "77011234567"))
        .expect("create");
    assert!(store.borrowers().find_candidates("n/a").expect("find").is_empty());
}

#[test]
fn create_rejects_digit_free_fields() {
    let store = store();
    let err = store
        .borrowers()
        .create(NOW, StoredRecord::new("unknown", "77011234567"))
        .expect_err("iin without digits");
    assert!(matches!(err, StoreError::InvalidField { field: "iin", .. }));

    let err = store
        .borrowers()
        .create(NOW, StoredRecord::new("123456789012", "---"))
        .expect_err("phone without digits");
    assert!(matches!(
        err,
        StoreError::InvalidField {
            field: "phoneNumber",
            ..
        }
    ));
}

#[test]
fn import_is_all_or_nothing() {
    let store = store();
    let repo = store.borrowers();
    let err = repo
        .import(
            NOW,
            vec![
                StoredRecord::new("123456789012", "77011234567"),
                StoredRecord::new("", "77011234567"),
            ],
        )
        .expect_err("second record invalid");
    assert!(err.to_string().contains("record 1"));
    assert_eq!(repo.count().expect("count"), 0);

    let imported = repo
        .import(
            NOW,
            vec![
                StoredRecord::new("123456789012", "77011234567"),
                StoredRecord::new(880_101_300_456_i64, 87_011_112_233_i64),
            ],
        )
        .expect("import");
    assert_eq!(imported, 2);
    assert_eq!(repo.list().expect("list").len(), 2);
}

#[test]
fn delete_removes_borrower() {
    let store = store();
    let repo = store.borrowers();
    let borrower = repo
        .create(NOW, StoredRecord::new("123456789012", "77011234567"))
        .expect("create");

    repo.delete(borrower.id).expect("delete");
    assert!(repo.get(borrower.id).expect("get").is_none());
    let err = repo.delete(borrower.id).expect_err("already gone");
    assert!(matches!(err, StoreError::NotFound(_)));
}

#[test]
fn unreadable_legacy_rows_are_skipped() {
    let store = store();
    let conn = store.connection();
    conn.execute(
        "INSERT INTO borrowers (id, national_id, national_id_digits, phone, created_at, updated_at)
         VALUES ('0b4f2f7e-2d55-4d0e-8a4e-2f4f7d7c9a01', 123456789012.0, '123456789012', '87012345678', ?1, ?1);",
        [NOW],
    )
    .expect("insert real iin");
    conn.execute(
        "INSERT INTO borrowers (id, national_id, national_id_digits, phone, created_at, updated_at)
         VALUES ('5a1c8d3e-6f0b-4b7a-9c2d-1e3f5a7b9c02', x'01', '123456789012', '77012345678', ?1, ?1);",
        [NOW + 1],
    )
    .expect("insert blob iin");

    let candidates = store
        .borrowers()
        .find_candidates("123456789012")
        .expect("find");
    assert_eq!(candidates.len(), 1);
    assert_eq!(
        candidates[0].record.national_id,
        StoredValue::Integer(123_456_789_012)
    );
}

#[test]
fn lookup_feeds_matcher() {
    let store = store();
    store
        .borrowers()
        .create(NOW, StoredRecord::new(123_456_789_012_i64, "+7 701 234 56 78"))
        .expect("create");

    let claim = IdentifierClaim::new("123456789012", "77012345678");
    let candidates = store
        .borrowers()
        .find_candidates(&claim.national_id)
        .expect("find");
    let result = match_claim(&claim, &candidates, MatchPolicy::default()).expect("match");
    assert!(result.is_match());

    let claim = IdentifierClaim::new("123456789012", "77019999999");
    let result = match_claim(&claim, &candidates, MatchPolicy::default()).expect("match");
    assert!(!result.is_match());
}
