use crate::error::{Result, StoreError};
use debtmediator_core::domain::{normalize_digits, Borrower, BorrowerId, StoredRecord, StoredValue};
use rusqlite::types::{Value, ValueRef};
use rusqlite::{params, Connection, Row};
use std::str::FromStr;
use tracing::warn;

// Integral REALs beyond this lose precision when read back as i64.
const MAX_EXACT_REAL: f64 = 9_007_199_254_740_992.0;

const SELECT_COLUMNS: &str = "id, national_id, phone, created_at, updated_at";

pub struct BorrowersRepo<'a> {
    conn: &'a Connection,
}

impl<'a> BorrowersRepo<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    pub fn create(&self, now_utc: i64, record: StoredRecord) -> Result<Borrower> {
        insert(self.conn, now_utc, record)
    }

    /// Inserts every record or none of them.
    pub fn import(&self, now_utc: i64, records: Vec<StoredRecord>) -> Result<usize> {
        let tx = self.conn.unchecked_transaction()?;
        let mut imported = 0;
        for (index, record) in records.into_iter().enumerate() {
            insert(&tx, now_utc, record).map_err(|err| match err {
                StoreError::InvalidField { field, message } => StoreError::InvalidField {
                    field,
                    message: format!("record {index}: {message}"),
                },
                other => other,
            })?;
            imported += 1;
        }
        tx.commit()?;
        Ok(imported)
    }

    pub fn get(&self, id: BorrowerId) -> Result<Option<Borrower>> {
        let sql = format!("SELECT {SELECT_COLUMNS} FROM borrowers WHERE id = ?1;");
        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query([id.to_string()])?;
        match rows.next()? {
            Some(row) => borrower_from_row(row),
            None => Ok(None),
        }
    }

    /// Borrowers whose stored national ID normalizes to the same digits as
    /// `national_id`, whatever representation they were written with.
    pub fn find_candidates(&self, national_id: &str) -> Result<Vec<Borrower>> {
        let digits = normalize_digits(national_id);
        if digits.is_empty() {
            return Ok(Vec::new());
        }
        let sql = format!(
            "SELECT {SELECT_COLUMNS} FROM borrowers
             WHERE national_id_digits = ?1
             ORDER BY created_at ASC, id ASC;"
        );
        self.collect(&sql, [digits])
    }

    pub fn list(&self) -> Result<Vec<Borrower>> {
        let sql = format!("SELECT {SELECT_COLUMNS} FROM borrowers ORDER BY created_at ASC, id ASC;");
        self.collect(&sql, [])
    }

    pub fn count(&self) -> Result<i64> {
        Ok(self
            .conn
            .query_row("SELECT COUNT(*) FROM borrowers;", [], |row| row.get(0))?)
    }

    pub fn delete(&self, id: BorrowerId) -> Result<()> {
        let deleted = self
            .conn
            .execute("DELETE FROM borrowers WHERE id = ?1;", [id.to_string()])?;
        if deleted == 0 {
            return Err(StoreError::NotFound(id.to_string()));
        }
        Ok(())
    }

    fn collect<P: rusqlite::Params>(&self, sql: &str, params: P) -> Result<Vec<Borrower>> {
        let mut stmt = self.conn.prepare(sql)?;
        let mut rows = stmt.query(params)?;
        let mut borrowers = Vec::new();
        while let Some(row) = rows.next()? {
            if let Some(borrower) = borrower_from_row(row)? {
                borrowers.push(borrower);
            }
        }
        Ok(borrowers)
    }
}

fn insert(conn: &Connection, now_utc: i64, record: StoredRecord) -> Result<Borrower> {
    let national_id_digits = record.national_id.digits();
    if national_id_digits.is_empty() {
        return Err(StoreError::InvalidField {
            field: "iin",
            message: format!("no digits in {:?}", record.national_id.to_string()),
        });
    }
    if record.phone.digits().is_empty() {
        return Err(StoreError::InvalidField {
            field: "phoneNumber",
            message: format!("no digits in {:?}", record.phone.to_string()),
        });
    }

    let id = BorrowerId::new();
    conn.execute(
        "INSERT INTO borrowers (id, national_id, national_id_digits, phone, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6);",
        params![
            id.to_string(),
            sql_value(&record.national_id),
            national_id_digits.as_str(),
            sql_value(&record.phone),
            now_utc,
            now_utc
        ],
    )?;

    Ok(Borrower {
        id,
        record,
        created_at: now_utc,
        updated_at: now_utc,
    })
}

fn sql_value(value: &StoredValue) -> Value {
    match value {
        StoredValue::Integer(number) => Value::Integer(*number),
        StoredValue::Text(text) => Value::Text(text.clone()),
    }
}

fn stored_value(value: ValueRef<'_>) -> Option<StoredValue> {
    match value {
        ValueRef::Integer(number) => Some(StoredValue::Integer(number)),
        ValueRef::Text(bytes) => std::str::from_utf8(bytes)
            .ok()
            .map(|text| StoredValue::Text(text.to_string())),
        ValueRef::Real(number) if number.fract() == 0.0 && number.abs() < MAX_EXACT_REAL => {
            Some(StoredValue::Integer(number as i64))
        }
        ValueRef::Real(_) | ValueRef::Null | ValueRef::Blob(_) => None,
    }
}

/// `Ok(None)` for rows whose identifying fields cannot be represented.
fn borrower_from_row(row: &Row<'_>) -> Result<Option<Borrower>> {
    let id: String = row.get(0)?;
    let borrower_id = BorrowerId::from_str(&id).map_err(|_| StoreError::InvalidId(id.clone()))?;

    let national_id = stored_value(row.get_ref(1)?);
    let phone = stored_value(row.get_ref(2)?);
    let (Some(national_id), Some(phone)) = (national_id, phone) else {
        warn!(borrower = %borrower_id, "skipping borrower with unreadable iin or phone");
        return Ok(None);
    };

    Ok(Some(Borrower {
        id: borrower_id,
        record: StoredRecord { national_id, phone },
        created_at: row.get(3)?,
        updated_at: row.get(4)?,
    }))
}
