pub mod borrower;
pub mod digits;
pub mod form;
pub mod ids;
pub mod value;

pub use borrower::{Borrower, IdentifierClaim, StoredRecord};
pub use digits::{normalize_digits, NormalizedDigits};
pub use form::{FormAttachment, SettlementRequest, DEFAULT_MAX_ATTACHMENTS, SETTLEMENT_SUBJECT};
pub use ids::BorrowerId;
pub use value::StoredValue;
