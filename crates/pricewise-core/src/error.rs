//! # Error Types
//!
//! Domain-specific error types for pricewise-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                 │
//! │                                                                     │
//! │  pricewise-core errors (this file)                                 │
//! │  ├── CoreError        - Engine-level failures                      │
//! │  └── ValidationError  - Input validation failures                  │
//! │                                                                     │
//! │  pricewise-db errors (separate crate)                              │
//! │  └── DbError          - Database operation failures                │
//! │                                                                     │
//! │  pricewise-remote errors (separate crate)                          │
//! │  └── RemoteError      - Config fetch failures (fail-soft)          │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Expected business conditions (no tiers, infeasible price) are error
//!    variants the caller matches on, never panics
//! 3. Each variant maps to a user-facing message

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Pricing engine errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// No logistics tiers are configured.
    ///
    /// Every matching/solving operation requires at least one tier; the
    /// caller should block the workflow and prompt for configuration.
    #[error("no logistics tiers configured")]
    TiersMissing,

    /// The target sale price cannot cover costs under any tier.
    ///
    /// Returned by the reverse solver when even the fallback tier implies a
    /// purchase-cost ceiling of zero or below. `target_price` is the sale
    /// price (sale currency) that was being solved for.
    #[error("sale price {target_price:.2} cannot cover costs under any tier")]
    InfeasiblePrice { target_price: f64 },

    /// Validation error (wraps ValidationError).
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Raised at the engine boundary before any arithmetic runs, so degenerate
/// denominators (commission/margin/discount at 100%) never reach a division.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A percentage rate is outside the half-open range `[0, 100)`.
    #[error("{field} must be at least 0 and below 100, got {value}")]
    RateOutOfRange { field: &'static str, value: f64 },

    /// A value that must be strictly positive is not.
    #[error("{field} must be positive, got {value}")]
    MustBePositive { field: &'static str, value: f64 },

    /// A value that must be zero or greater is negative.
    #[error("{field} must not be negative, got {value}")]
    MustBeNonNegative { field: &'static str, value: f64 },

    /// A value is not a finite number (NaN or infinite).
    #[error("{field} must be a finite number")]
    NotFinite { field: &'static str },
}

// =============================================================================
// Result Type Alias
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
    fn test_error_messages() {
        let err = CoreError::TiersMissing;
        assert_eq!(err.to_string(), "no logistics tiers configured");

        let err = CoreError::InfeasiblePrice { target_price: 99.5 };
        assert_eq!(
            err.to_string(),
            "sale price 99.50 cannot cover costs under any tier"
        );
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::RateOutOfRange {
            field: "commission_rate_pct",
            value: 100.0,
        };
        assert_eq!(
            err.to_string(),
            "commission_rate_pct must be at least 0 and below 100, got 100"
        );
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::MustBePositive {
            field: "exchange_rate",
            value: 0.0,
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
