use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Row identifier for a stored borrower.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BorrowerId(pub Uuid);

impl Default for BorrowerId {
    fn default() -> Self {
        Self::new()
    }
}

impl BorrowerId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for BorrowerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for BorrowerId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s.trim())?))
    }
}

#[cfg(test)]
mod tests {
    use super::BorrowerId;
    use std::str::FromStr;

    #[test]
    fn borrower_id_parses_display_output() {
        let id = BorrowerId::new();
        let parsed = BorrowerId::from_str(&format!(" {id} ")).expect("parse id");
        assert_eq!(parsed, id);
    }

    #[test]
    fn borrower_id_rejects_garbage() {
        assert!(BorrowerId::from_str("not-a-uuid").is_err());
    }
}
