use anyhow::Result;
use chrono::{DateTime, Local, Utc};
use debtmediator_core::domain::{BorrowerId, StoredValue};
use std::str::FromStr;

use crate::error::invalid_input;

pub fn now_utc() -> i64 {
    Utc::now().timestamp()
}

pub fn format_timestamp_datetime(ts: i64) -> String {
    match DateTime::<Utc>::from_timestamp(ts, 0) {
        Some(dt) => dt.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string(),
        None => ts.to_string(),
    }
}

pub fn parse_borrower_id(raw: &str) -> Result<BorrowerId> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(invalid_input("borrower id cannot be empty"));
    }
    BorrowerId::from_str(trimmed).map_err(|_| invalid_input("invalid borrower id"))
}

/// Builds the stored representation for a field typed on the command line.
/// `numeric` asks for an integer, as legacy rows written by number have.
pub fn parse_stored_value(field: &str, raw: &str, numeric: bool) -> Result<StoredValue> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(invalid_input(format!("{field} cannot be empty")));
    }
    if !numeric {
        return Ok(StoredValue::Text(trimmed.to_string()));
    }
    trimmed
        .parse::<i64>()
        .map(StoredValue::Integer)
        .map_err(|_| invalid_input(format!("{field} is not an integer: {trimmed}")))
}
