use crate::domain::ids::BorrowerId;
use crate::domain::value::StoredValue;
use serde::{Deserialize, Serialize};

/// Identifier pair submitted by a caller. Unvalidated until it reaches the matcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentifierClaim {
    pub national_id: String,
    pub phone: String,
}

impl IdentifierClaim {
    pub fn new(national_id: impl Into<String>, phone: impl Into<String>) -> Self {
        Self {
            national_id: national_id.into(),
            phone: phone.into(),
        }
    }
}

/// The identifying fields of a persisted borrower.
///
/// Field names follow the legacy documents (`iin`, `phoneNumber`) when
/// serialized, so exported data can be imported back unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredRecord {
    #[serde(rename = "iin")]
    pub national_id: StoredValue,
    #[serde(rename = "phoneNumber")]
    pub phone: StoredValue,
}

impl StoredRecord {
    pub fn new(national_id: impl Into<StoredValue>, phone: impl Into<StoredValue>) -> Self {
        Self {
            national_id: national_id.into(),
            phone: phone.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Borrower {
    pub id: BorrowerId,
    pub record: StoredRecord,
    pub created_at: i64,
    pub updated_at: i64,
}

impl AsRef<StoredRecord> for Borrower {
    fn as_ref(&self) -> &StoredRecord {
        &self.record
    }
}

impl AsRef<StoredRecord> for StoredRecord {
    fn as_ref(&self) -> &StoredRecord {
        self
    }
}
