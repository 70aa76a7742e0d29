//! # Validation Module
//!
//! Input-boundary validation for the pricing engine.
//!
//! Every solver divides by `commission_factor` (and the promotional solver
//! additionally by margin and discount factors), so percentage rates are
//! constrained to `[0, 100)` before any arithmetic runs. Weights, costs and
//! fees are clamped to non-negative at the same boundary. The engine itself
//! never re-checks these mid-computation.
//!
//! ## Usage
//! ```rust
//! use pricewise_core::validation::{validate_rate_pct, validate_non_negative};
//!
//! validate_rate_pct("commission_rate_pct", 15.0).unwrap();
//! validate_non_negative("actual_weight_g", 300.0).unwrap();
//! assert!(validate_rate_pct("discount_pct", 100.0).is_err());
//! ```

use crate::error::ValidationError;
use crate::types::{PricingParameters, PricingRequest};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Scalar Validators
// =============================================================================

/// Validates a percentage rate.
///
/// ## Rules
/// - Must be finite
/// - Must be in the half-open range `[0, 100)`; at exactly 100 the
///   denominator `1 − rate/100` reaches zero
pub fn validate_rate_pct(field: &'static str, value: f64) -> ValidationResult<()> {
    if !value.is_finite() {
        return Err(ValidationError::NotFinite { field });
    }
    if !(0.0..100.0).contains(&value) {
        return Err(ValidationError::RateOutOfRange { field, value });
    }
    Ok(())
}

/// Validates a value that must be strictly positive (exchange rate,
/// profit multiplier).
pub fn validate_positive(field: &'static str, value: f64) -> ValidationResult<()> {
    if !value.is_finite() {
        return Err(ValidationError::NotFinite { field });
    }
    if value <= 0.0 {
        return Err(ValidationError::MustBePositive { field, value });
    }
    Ok(())
}

/// Validates a value that must be zero or greater (weights, costs, fees).
pub fn validate_non_negative(field: &'static str, value: f64) -> ValidationResult<()> {
    if !value.is_finite() {
        return Err(ValidationError::NotFinite { field });
    }
    if value < 0.0 {
        return Err(ValidationError::MustBeNonNegative { field, value });
    }
    Ok(())
}

// =============================================================================
// Composite Validators
// =============================================================================

/// Validates a full parameter set.
///
/// Called at the top of every solver, so a degenerate commission rate can
/// never reach a division.
pub fn validate_parameters(params: &PricingParameters) -> ValidationResult<()> {
    validate_positive("exchange_rate", params.exchange_rate)?;
    validate_rate_pct("commission_rate_pct", params.commission_rate_pct)?;
    validate_non_negative("label_fee", params.label_fee)?;
    validate_positive("profit_multiplier", params.profit_multiplier)?;
    Ok(())
}

/// Validates a forward-mode request.
///
/// Dimensions are not validated here: a non-positive dimension is a valid
/// way of saying "no package dimensions", handled by the weight calculator.
pub fn validate_request(request: &PricingRequest) -> ValidationResult<()> {
    validate_non_negative("cost", request.cost)?;
    validate_non_negative("actual_weight_g", request.actual_weight_g)?;
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
