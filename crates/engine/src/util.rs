//! Internal helpers for input validation and normalization.
//!
//! These utilities are **not** part of the public API. They keep the checks
//! shared by the different create/update paths in one place.

use crate::{EngineError, MoneyCents, ResultEngine, period::parse_iso_date};

/// Largest amount a single record may hold: one hundred billion units.
pub(crate) const MAX_AMOUNT: MoneyCents = MoneyCents::new(10_000_000_000_000);

/// Trim a required text field and reject it when empty.
pub(crate) fn normalize_required_name(value: &str, label: &str) -> ResultEngine<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(EngineError::InvalidInput(format!(
            "{label} must not be empty"
        )));
    }
    Ok(trimmed.to_string())
}

/// Trim and lowercase an email address. Only the `local@domain` shape is
/// checked.
pub(crate) fn normalize_email(value: &str) -> ResultEngine<String> {
    let email = value.trim().to_lowercase();
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() => Ok(email),
        _ => Err(EngineError::InvalidInput(format!(
            "invalid email: \"{value}\""
        ))),
    }
}

/// Stored amounts are magnitudes in `0..=MAX_AMOUNT`; the sign comes from
/// the record kind.
pub(crate) fn ensure_amount(amount: MoneyCents, label: &str) -> ResultEngine<()> {
    if amount.is_negative() {
        return Err(EngineError::InvalidAmount(format!("{label} must be >= 0")));
    }
    if amount > MAX_AMOUNT {
        return Err(EngineError::InvalidAmount(format!(
            "{label} must be <= {MAX_AMOUNT}"
        )));
    }
    Ok(())
}

/// Validates a `YYYY-MM-DD` date and returns it unchanged.
pub(crate) fn validate_date(value: &str) -> ResultEngine<String> {
    parse_iso_date(value)?;
    Ok(value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_is_trimmed_and_lowercased() {
        assert_eq!(
            normalize_email("  Ada@Example.COM ").unwrap(),
            "ada@example.com"
        );
        assert!(normalize_email("no-at-sign").is_err());
        assert!(normalize_email("@example.com").is_err());
    }

    #[test]
    fn amounts_outside_the_stored_range_are_rejected() {
        assert!(ensure_amount(MoneyCents::new(0), "amount").is_ok());
        assert!(ensure_amount(MAX_AMOUNT, "amount").is_ok());
        assert!(matches!(
            ensure_amount(MoneyCents::new(-1), "amount"),
            Err(EngineError::InvalidAmount(_))
        ));
        assert!(matches!(
            ensure_amount(MoneyCents::new(i64::MAX), "amount"),
            Err(EngineError::InvalidAmount(_))
        ));
    }

    #[test]
    fn blank_names_are_rejected() {
        assert_eq!(normalize_required_name("  Food ", "name").unwrap(), "Food");
        assert!(normalize_required_name("   ", "name").is_err());
    }
}
