pub mod domain;
pub mod dto;
pub mod error;
pub mod matcher;

pub use domain::*;
pub use dto::*;
pub use error::CoreError;
pub use matcher::{match_claim, MatchPolicy, MatchResult, DEFAULT_MIN_PHONE_DIGITS};
