use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    #[error("invalid claim: {0} is required")]
    InvalidClaim(&'static str),
    #[error("{0} is required")]
    MissingFormField(&'static str),
    #[error("too many attachments: {count} (max {max})")]
    TooManyAttachments { count: usize, max: usize },
    #[error("invalid min_phone_digits: {0}")]
    InvalidMinPhoneDigits(usize),
}
