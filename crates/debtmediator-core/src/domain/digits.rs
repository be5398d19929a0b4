/// Keeps the ASCII decimal digits of `value`, in order, and drops everything else.
pub fn normalize_digits(value: &str) -> String {
    value.chars().filter(char::is_ascii_digit).collect()
}

/// A string made only of ASCII digits.
///
/// Built exclusively through [`NormalizedDigits::from_text`] (or the
/// `StoredValue` conversion), so the digit-only invariant always holds and
/// comparisons are plain string comparisons. Leading zeros are significant.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NormalizedDigits(String);

impl NormalizedDigits {
    pub fn from_text(value: &str) -> Self {
        Self(normalize_digits(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// True when `other` appears as a contiguous run inside `self`.
    pub fn contains_run(&self, other: &NormalizedDigits) -> bool {
        self.0.contains(other.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::{normalize_digits, NormalizedDigits};

    #[test]
    fn normalize_digits_strips_formatting() {
        assert_eq!(normalize_digits("+7 (701) 123-45-67"), "77011234567");
        assert_eq!(normalize_digits("  8 701 123 45 67 "), "87011234567");
    }

    #[test]
    fn normalize_digits_is_idempotent() {
        for raw in ["+7 (701) 123-45-67", "000123", "abc", "", "12a3b"] {
            let once = normalize_digits(raw);
            assert_eq!(normalize_digits(&once), once);
        }
    }

    #[test]
    fn normalize_digits_keeps_leading_zeros() {
        assert_eq!(normalize_digits("000123456789"), "000123456789");
    }

    #[test]
    fn normalize_digits_ignores_non_ascii_digits() {
        // Arabic-Indic digits are not decimal digits for matching purposes.
        assert_eq!(normalize_digits("١٢٣45"), "45");
    }

    #[test]
    fn contains_run_requires_contiguous_digits() {
        let stored = NormalizedDigits::from_text("77011234567");
        assert!(stored.contains_run(&NormalizedDigits::from_text("7011234567")));
        assert!(stored.contains_run(&NormalizedDigits::from_text("1234567")));
        assert!(!stored.contains_run(&NormalizedDigits::from_text("71234567")));
    }
}
