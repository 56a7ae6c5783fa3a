use serde::{Deserialize, Serialize};
use std::fmt;

/// Monetary amount in integer minor units.
///
/// Persists as a plain BSON int64 and crosses the wire as a plain JSON
/// number. All arithmetic is checked; the ledger never touches floats.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    pub const ZERO: Money = Money(0);

    pub const fn new(minor_units: i64) -> Self {
        Money(minor_units)
    }

    pub const fn minor_units(self) -> i64 {
        self.0
    }

    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    pub const fn is_positive(self) -> bool {
        self.0 > 0
    }

    pub const fn is_negative(self) -> bool {
        self.0 < 0
    }

    pub fn checked_add(self, rhs: Money) -> Option<Money> {
        self.0.checked_add(rhs.0).map(Money)
    }

    pub fn checked_sub(self, rhs: Money) -> Option<Money> {
        self.0.checked_sub(rhs.0).map(Money)
    }

    pub fn saturating_add(self, rhs: Money) -> Money {
        Money(self.0.saturating_add(rhs.0))
    }
}

impl From<i64> for Money {
    fn from(minor_units: i64) -> Self {
        Money(minor_units)
    }
}

/// Indian digit grouping (last three digits, then pairs), as printed on
/// receipts: 500000 -> "5,00,000".
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let negative = self.0 < 0;
        let digits = self.0.unsigned_abs().to_string();

        let mut grouped = String::new();
        let len = digits.len();
        for (i, ch) in digits.chars().enumerate() {
            let remaining = len - i;
            if i > 0 && (remaining == 3 || (remaining > 3 && (remaining - 3) % 2 == 0)) {
                grouped.push(',');
            }
            grouped.push(ch);
        }

        if negative {
            write!(f, "-{}", grouped)
        } else {
            write!(f, "{}", grouped)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn checked_arithmetic() {
        let a = Money::new(200_000);
        let b = Money::new(300_000);
        assert_eq!(a.checked_add(b), Some(Money::new(500_000)));
        assert_eq!(b.checked_sub(a), Some(Money::new(100_000)));
        assert_eq!(Money::new(i64::MAX).checked_add(Money::new(1)), None);
    }

    #[test]
    fn indian_grouping() {
        assert_eq!(Money::new(0).to_string(), "0");
        assert_eq!(Money::new(999).to_string(), "999");
        assert_eq!(Money::new(1_000).to_string(), "1,000");
        assert_eq!(Money::new(100_000).to_string(), "1,00,000");
        assert_eq!(Money::new(500_000).to_string(), "5,00,000");
        assert_eq!(Money::new(12_345_678).to_string(), "1,23,45,678");
        assert_eq!(Money::new(-500_000).to_string(), "-5,00,000");
    }

    #[test]
    fn serializes_as_plain_number() {
        let value = serde_json::to_value(Money::new(500_000)).unwrap();
        assert_eq!(value, serde_json::json!(500_000));
        let back: Money = serde_json::from_value(value).unwrap();
        assert_eq!(back, Money::new(500_000));
    }
}
