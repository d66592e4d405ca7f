//! # Validation Module
//!
//! Input validation for the pricing engine.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Form / request parsing                                       │
//! │  ├── Numeric parsing (NaN and infinity rejected on conversion)         │
//! │  └── Immediate user feedback                                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE - engine preconditions                           │
//! │  ├── Costs and flat fees non-negative                                  │
//! │  ├── Unit cost strictly positive where markup is applied               │
//! │  └── Packs per box / group size at least one                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Persistence                                                  │
//! │  └── Constraints on the stored record                                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use stockroom_core::money::Money;
//! use stockroom_core::validation::{validate_non_negative, validate_packs_per_box};
//!
//! assert!(validate_non_negative("shipping_cost", Money::from_cents(500)).is_ok());
//! assert!(validate_packs_per_box(0).is_err());
//! ```

use rust_decimal::Decimal;

use crate::error::ValidationError;
use crate::money::Money;
use crate::types::Percent;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Money Validators
// =============================================================================

/// Validates that an amount is zero or greater.
pub fn validate_non_negative(field: &str, amount: Money) -> ValidationResult<()> {
    if amount.is_negative() {
        return Err(ValidationError::Negative {
            field: field.to_string(),
        });
    }

    Ok(())
}

/// Validates that an amount is strictly greater than zero.
///
/// ## Example
/// ```rust
/// use stockroom_core::money::Money;
/// use stockroom_core::validation::validate_positive;
///
/// assert!(validate_positive("cost", Money::from_cents(1)).is_ok());
/// assert!(validate_positive("cost", Money::ZERO).is_err());
/// ```
pub fn validate_positive(field: &str, amount: Money) -> ValidationResult<()> {
    if !amount.is_positive() {
        return Err(ValidationError::MustBePositive {
            field: field.to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Percentage Validators
// =============================================================================

/// Validates a fee or markup percentage is zero or greater.
///
/// The upper bound is not checked here: a 100% fee is a legal (if silly)
/// schedule for fee totals and net profit, and only the grossing-up formulas
/// reject it with `InvalidFeeSchedule`.
pub fn validate_percent(field: &str, percent: Percent) -> ValidationResult<()> {
    if percent.is_negative() {
        return Err(ValidationError::Negative {
            field: field.to_string(),
        });
    }

    Ok(())
}

/// Validates a target margin for quick quotes: `0 < margin <= 1`.
pub fn validate_margin(margin: Decimal) -> ValidationResult<()> {
    if margin <= Decimal::ZERO || margin > Decimal::ONE {
        return Err(ValidationError::OutOfRange {
            field: "margin".to_string(),
            min: "0 (exclusive)".to_string(),
            max: "1".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Count Validators
// =============================================================================

/// Validates the number of packs in a box.
pub fn validate_packs_per_box(packs: u32) -> ValidationResult<()> {
    if packs == 0 {
        return Err(ValidationError::MustBePositive {
            field: "packs_per_box".to_string(),
        });
    }

    Ok(())
}

/// Validates the number of packs bundled into a group price.
pub fn validate_pack_group_size(size: u32) -> ValidationResult<()> {
    if size == 0 {
        return Err(ValidationError::MustBePositive {
            field: "pack_group_size".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_validate_non_negative() {
        assert!(validate_non_negative("shipping_cost", Money::ZERO).is_ok());
        assert!(validate_non_negative("shipping_cost", Money::from_cents(250)).is_ok());

        let err = validate_non_negative("shipping_cost", Money::from_cents(-1)).unwrap_err();
        assert_eq!(err.to_string(), "shipping_cost cannot be negative");
    }

    #[test]
    fn test_validate_positive() {
        assert!(validate_positive("cost", Money::from_cents(1)).is_ok());
        assert!(validate_positive("cost", Money::ZERO).is_err());
        assert!(validate_positive("cost", Money::from_cents(-100)).is_err());
    }

    #[test]
    fn test_validate_percent() {
        assert!(validate_percent("fee_percent", Percent::ZERO).is_ok());
        assert!(validate_percent("fee_percent", Percent::HUNDRED).is_ok());
        assert!(validate_percent("fee_percent", Percent::new(dec!(-0.5))).is_err());
    }

    #[test]
    fn test_validate_margin() {
        assert!(validate_margin(dec!(0.88)).is_ok());
        assert!(validate_margin(dec!(1)).is_ok());
        assert!(validate_margin(dec!(0)).is_err());
        assert!(validate_margin(dec!(1.2)).is_err());
    }

    #[test]
    fn test_validate_counts() {
        assert!(validate_packs_per_box(1).is_ok());
        assert!(validate_packs_per_box(36).is_ok());
        assert!(validate_packs_per_box(0).is_err());

        assert!(validate_pack_group_size(3).is_ok());
        assert!(validate_pack_group_size(0).is_err());
    }
}
