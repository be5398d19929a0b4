use crate::domain::{Borrower, BorrowerId, StoredValue};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckUserDto {
    pub exists: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BorrowerDto {
    pub id: BorrowerId,
    pub iin: StoredValue,
    #[serde(rename = "phoneNumber")]
    pub phone_number: StoredValue,
    pub created_at: i64,
    pub updated_at: i64,
}

impl From<Borrower> for BorrowerDto {
    fn from(borrower: Borrower) -> Self {
        Self {
            id: borrower.id,
            iin: borrower.record.national_id,
            phone_number: borrower.record.phone,
            created_at: borrower.created_at,
            updated_at: borrower.updated_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormSentDto {
    pub message: String,
    pub attachments: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportReportDto {
    pub imported: usize,
}
