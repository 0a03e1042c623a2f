use std::{
    fmt,
    ops::Neg,
    str::FromStr,
};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{EngineError, ResultEngine};

/// Signed money amount backed by an exact decimal.
///
/// Use this type for **all** monetary values in the engine (balances,
/// transaction amounts, totals). Values never go through binary floats, so
/// repeated apply/reverse cycles cannot drift.
///
/// The value is signed:
/// - positive = income / increase
/// - negative = expense / decrease
///
/// In the database a `Money` is stored as its canonical decimal text (see
/// [`Money::to_storage`]).
///
/// # Examples
///
/// ```rust
/// use engine::Money;
///
/// let amount: Money = "12.34".parse().unwrap();
/// assert_eq!(amount.to_string(), "12.34");
/// assert_eq!(
///     "10,5".parse::<Money>().unwrap(),
///     "10.50".parse::<Money>().unwrap()
/// );
/// assert!("ten".parse::<Money>().is_err());
/// ```
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Money(Decimal);

impl Money {
    pub const ZERO: Money = Money(Decimal::ZERO);

    #[must_use]
    pub const fn new(value: Decimal) -> Self {
        Self(value)
    }

    /// Returns the underlying decimal.
    #[must_use]
    pub const fn value(self) -> Decimal {
        self.0
    }

    #[must_use]
    pub fn is_zero(self) -> bool {
        self.0.is_zero()
    }

    #[must_use]
    pub fn is_positive(self) -> bool {
        self.0 > Decimal::ZERO
    }

    #[must_use]
    pub fn is_negative(self) -> bool {
        self.0 < Decimal::ZERO
    }

    /// Checked addition (returns `None` on overflow).
    #[must_use]
    pub fn checked_add(self, rhs: Money) -> Option<Money> {
        self.0.checked_add(rhs.0).map(Money)
    }

    /// Checked subtraction (returns `None` on overflow).
    #[must_use]
    pub fn checked_sub(self, rhs: Money) -> Option<Money> {
        self.0.checked_sub(rhs.0).map(Money)
    }

    /// Canonical text used for the database columns (`"45000"`, `"0.5"`).
    #[must_use]
    pub fn to_storage(self) -> String {
        self.0.normalize().to_string()
    }

    /// Parses a value written by [`Money::to_storage`].
    pub fn from_storage(value: &str) -> ResultEngine<Self> {
        Decimal::from_str(value)
            .map(Money)
            .map_err(|_| EngineError::Validation(format!("invalid stored amount: {value}")))
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Decimal> for Money {
    fn from(value: Decimal) -> Self {
        Self(value)
    }
}

impl From<Money> for Decimal {
    fn from(value: Money) -> Self {
        value.0
    }
}

impl Neg for Money {
    type Output = Money;

    fn neg(self) -> Self::Output {
        Money(-self.0)
    }
}

impl FromStr for Money {
    type Err = EngineError;

    /// Parses a decimal string.
    ///
    /// Accepts `.` or `,` as decimal separator and an optional leading `+`/`-`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(EngineError::Validation("empty amount".to_string()));
        }

        let normalized = trimmed.replace(',', ".");
        let unsigned = normalized
            .strip_prefix(['+', '-'])
            .unwrap_or(normalized.as_str());
        if unsigned.is_empty()
            || unsigned.starts_with('.')
            || !unsigned.chars().all(|c| c.is_ascii_digit() || c == '.')
        {
            return Err(EngineError::Validation("invalid amount".to_string()));
        }

        Decimal::from_str(&normalized)
            .map(Money)
            .map_err(|_| EngineError::Validation("invalid amount".to_string()))
    }
}
