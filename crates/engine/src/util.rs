//! Internal helpers for input normalization and conversion.
//!
//! These utilities are **not** part of the public API.

use uuid::Uuid;

use crate::{EngineError, Money, ResultEngine};

/// Parse a UUID from storage and return a labeled error on failure.
pub(crate) fn parse_uuid(value: &str, label: &str) -> ResultEngine<Uuid> {
    Uuid::parse_str(value).map_err(|_| EngineError::Validation(format!("invalid {label} id")))
}

pub(crate) fn normalize_required_name(value: &str, label: &str) -> ResultEngine<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(EngineError::Validation(format!(
            "{label} name must not be empty"
        )));
    }
    Ok(trimmed.to_string())
}

pub(crate) fn normalize_optional_text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
}

/// A wallet balance set by hand must not be negative.
pub(crate) fn validate_opening_balance(balance: Money) -> ResultEngine<()> {
    if balance.is_negative() {
        return Err(EngineError::Validation(
            "wallet balance must be >= 0".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn names_are_trimmed_and_required() {
        assert_eq!(normalize_required_name("  Cash ", "wallet").unwrap(), "Cash");
        assert_eq!(
            normalize_required_name("   ", "wallet"),
            Err(EngineError::Validation(
                "wallet name must not be empty".to_string()
            ))
        );
    }

    #[test]
    fn blank_optional_text_becomes_none() {
        assert_eq!(normalize_optional_text(Some("  ")), None);
        assert_eq!(normalize_optional_text(None), None);
        assert_eq!(
            normalize_optional_text(Some(" rent ")),
            Some("rent".to_string())
        );
    }

    #[test]
    fn opening_balance_cannot_be_negative() {
        assert!(validate_opening_balance(Money::ZERO).is_ok());
        assert!(validate_opening_balance(Money::new(dec!(-0.01))).is_err());
    }
}
