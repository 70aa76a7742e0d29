//! # Chargeable Weight Calculator
//!
//! Derives the billable weight from actual weight and optional package
//! dimensions.
//!
//! ## How Carriers Bill Weight
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │  Actual weight:       what the scale says (grams)                   │
//! │  Dimensional weight:  (L × W × H) / 6000 kg, carried here in grams  │
//! │  Chargeable weight:   max(actual, dimensional)                      │
//! │                                                                     │
//! │  A parcel is "bulky" when the dimensional weight strictly exceeds   │
//! │  the actual weight: the carrier bills volume, not mass.             │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```

use crate::types::ChargeableWeight;
use crate::VOLUMETRIC_DIVISOR;

/// Computes the chargeable weight for a parcel.
///
/// If any dimension is zero or negative the dimensional override is
/// disabled: dimensional weight is `0`, the chargeable weight is the actual
/// weight, and the parcel is never bulky.
///
/// The bulky flag uses a strict comparison: a parcel whose dimensional
/// weight exactly equals its actual weight is NOT flagged.
///
/// ## Example
/// ```rust
/// use pricewise_core::chargeable_weight;
///
/// // 30 × 20 × 10 cm → 1000 g dimensional, overriding a 300 g actual weight
/// let w = chargeable_weight(300.0, 30.0, 20.0, 10.0);
/// assert_eq!(w.charge_weight_g, 1000.0);
/// assert!(w.is_bulky);
/// ```
pub fn chargeable_weight(
    actual_weight_g: f64,
    length_cm: f64,
    width_cm: f64,
    height_cm: f64,
) -> ChargeableWeight {
    let dimensional_weight_g = dimensional_weight(length_cm, width_cm, height_cm);

    ChargeableWeight {
        charge_weight_g: actual_weight_g.max(dimensional_weight_g),
        dimensional_weight_g,
        is_bulky: dimensional_weight_g > actual_weight_g,
    }
}

/// Grams per kilogram; the volumetric divisor yields kilograms while all
/// weights in the engine are grams.
const GRAMS_PER_KILOGRAM: f64 = 1000.0;

/// Dimensional (volumetric) weight in grams, or `0` when any dimension is
/// non-positive.
fn dimensional_weight(length_cm: f64, width_cm: f64, height_cm: f64) -> f64 {
    if length_cm <= 0.0 || width_cm <= 0.0 || height_cm <= 0.0 {
        return 0.0;
    }
    (length_cm * width_cm * height_cm) / VOLUMETRIC_DIVISOR * GRAMS_PER_KILOGRAM
}

// =============================================================================
// Unit Tests
// =============================================================================
