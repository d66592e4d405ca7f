//! # Error Types
//!
//! Domain-specific error types for stockroom-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  stockroom-core errors (this file)                                     │
//! │  ├── CoreError        - What callers match on                          │
//! │  │   ├── InvalidInput        (wraps ValidationError)                   │
//! │  │   └── InvalidFeeSchedule  (fee percent >= 100%)                     │
//! │  └── ValidationError  - Field-level input failures                     │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → request handler → user            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Every message names the field that failed, because the UI shows the
//!    raw text to the user
//! 3. Errors are enum variants, never String
//! 4. Each `CoreError` has a stable machine code next to its message

use rust_decimal::Decimal;
use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Errors raised by the pricing engine.
///
/// Nothing here is retryable: every operation is pure arithmetic, so the
/// same inputs fail the same way. A caller that gets one of these must not
/// persist the record it was computing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// An input value failed validation (negative cost, zero packs per box,
    /// NaN from a form field, ...).
    #[error("Invalid input: {0}")]
    InvalidInput(#[from] ValidationError),

    /// A percentage fee of 100% or more was used where the price has to be
    /// grossed up by `1 / (1 - fee)`.
    ///
    /// ## When This Occurs
    /// ```text
    /// break_even_listing_price(costs, fee = 100%)
    ///      │
    ///      ▼
    /// (costs + flat) / (1 - 1.00)   ← division by zero
    ///      │
    ///      ▼
    /// InvalidFeeSchedule { fee_percent: 100 }
    /// ```
    #[error("Invalid fee schedule: a {fee_percent}% platform fee leaves nothing to cover costs (must be below 100%)")]
    InvalidFeeSchedule { fee_percent: Decimal },
}

impl CoreError {
    /// Machine-readable error code for programmatic handling.
    pub fn code(&self) -> &'static str {
        match self {
            CoreError::InvalidInput(_) => "INVALID_INPUT",
            CoreError::InvalidFeeSchedule { .. } => "INVALID_FEE_SCHEDULE",
        }
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Value must be zero or greater.
    #[error("{field} cannot be negative")]
    Negative { field: String },

    /// Value must be strictly greater than zero.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Form input parsed to NaN or infinity.
    #[error("{field} must be a finite number")]
    NotFinite { field: String },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: String, max: String },

    /// Value is not in the allowed set.
    #[error("{field} must be one of: {allowed:?}")]
    NotAllowed { field: String, allowed: Vec<String> },

    /// Value is well-formed but not usable in this context.
    #[error("{field} is invalid: {reason}")]
    Invalid { field: String, reason: String },
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages_name_the_field() {
        let err: CoreError = ValidationError::MustBePositive {
            field: "cost".to_string(),
        }
        .into();
        assert_eq!(err.to_string(), "Invalid input: cost must be positive");

        let err = ValidationError::Negative {
            field: "shipping_cost".to_string(),
        };
        assert_eq!(err.to_string(), "shipping_cost cannot be negative");
    }

    #[test]
    fn test_fee_schedule_message() {
        let err = CoreError::InvalidFeeSchedule {
            fee_percent: Decimal::ONE_HUNDRED,
        };
        assert!(err.to_string().contains("100%"));
        assert!(err.to_string().contains("below 100%"));
    }

    #[test]
    fn test_codes() {
        let input: CoreError = ValidationError::NotFinite {
            field: "sold_price".to_string(),
        }
        .into();
        assert_eq!(input.code(), "INVALID_INPUT");

        let schedule = CoreError::InvalidFeeSchedule {
            fee_percent: Decimal::ONE_HUNDRED,
        };
        assert_eq!(schedule.code(), "INVALID_FEE_SCHEDULE");
    }
}
