//! Borrower identity matching.
//!
//! A claim matches when some candidate passes two checks in order:
//!
//! 1. the national ID prefilter: normalized digits are equal as strings, so
//!    leading zeros count;
//! 2. phone containment: one normalized phone is a contiguous run inside the
//!    other, in either direction.
//!
//! Equal phones always match. Any other containment only counts when the
//! shorter side has at least [`MatchPolicy::min_phone_digits`] digits.

use crate::domain::{IdentifierClaim, NormalizedDigits, StoredRecord};
use crate::error::CoreError;

pub const DEFAULT_MIN_PHONE_DIGITS: usize = 7;
pub const MAX_MIN_PHONE_DIGITS: usize = 15;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchPolicy {
    pub min_phone_digits: usize,
}

impl Default for MatchPolicy {
    fn default() -> Self {
        Self {
            min_phone_digits: DEFAULT_MIN_PHONE_DIGITS,
        }
    }
}

impl MatchPolicy {
    pub fn new(min_phone_digits: usize) -> Result<Self, CoreError> {
        if min_phone_digits == 0 || min_phone_digits > MAX_MIN_PHONE_DIGITS {
            return Err(CoreError::InvalidMinPhoneDigits(min_phone_digits));
        }
        Ok(Self { min_phone_digits })
    }

    fn phones_overlap(&self, claimed: &NormalizedDigits, stored: &NormalizedDigits) -> bool {
        // The floor only limits partial overlap; equal numbers always match.
        if claimed == stored {
            return true;
        }
        if claimed.len().min(stored.len()) < self.min_phone_digits {
            return false;
        }
        stored.contains_run(claimed) || claimed.contains_run(stored)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MatchResult {
    /// Position of the first satisfying candidate in the input order.
    pub matched_index: Option<usize>,
}

impl MatchResult {
    pub fn is_match(&self) -> bool {
        self.matched_index.is_some()
    }
}

struct NormalizedClaim {
    national_id: NormalizedDigits,
    phone: NormalizedDigits,
}

fn normalize_claim(claim: &IdentifierClaim) -> Result<NormalizedClaim, CoreError> {
    if claim.national_id.trim().is_empty() {
        return Err(CoreError::InvalidClaim("national id"));
    }
    if claim.phone.trim().is_empty() {
        return Err(CoreError::InvalidClaim("phone"));
    }

    // A digit-free field normalizes to "", which every stored phone contains.
    let national_id = NormalizedDigits::from_text(&claim.national_id);
    if national_id.is_empty() {
        return Err(CoreError::InvalidClaim("national id"));
    }
    let phone = NormalizedDigits::from_text(&claim.phone);
    if phone.is_empty() {
        return Err(CoreError::InvalidClaim("phone"));
    }

    Ok(NormalizedClaim { national_id, phone })
}

/// Decides whether `claim` identifies one of `candidates`.
///
/// Candidates with unusable data never cause an error; they just do not match.
pub fn match_claim<I, R>(
    claim: &IdentifierClaim,
    candidates: I,
    policy: MatchPolicy,
) -> Result<MatchResult, CoreError>
where
    I: IntoIterator<Item = R>,
    R: AsRef<StoredRecord>,
{
    let claim = normalize_claim(claim)?;

    let matched_index = candidates.into_iter().position(|candidate| {
        let record = candidate.as_ref();
        if record.national_id.digits() != claim.national_id {
            return false;
        }
        let stored_phone = record.phone.digits();
        !stored_phone.is_empty() && policy.phones_overlap(&claim.phone, &stored_phone)
    });

    Ok(MatchResult { matched_index })
}
