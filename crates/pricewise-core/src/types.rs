//! # Domain Types
//!
//! Core domain types used throughout Pricewise.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                │
//! │                                                                     │
//! │  ┌──────────────────┐   ┌───────────────────┐   ┌───────────────┐  │
//! │  │  LogisticsTier   │   │ PricingParameters │   │PricingRequest │  │
//! │  │  ──────────────  │   │ ───────────────── │   │ ───────────── │  │
//! │  │  name, priority  │   │ exchange_rate     │   │ cost, weight  │  │
//! │  │  max_weight_g    │   │ commission_rate   │   │ dimensions    │  │
//! │  │  max_price       │   │ label_fee         │   └───────┬───────┘  │
//! │  │  fixed_fee       │   │ profit_multiplier │           │          │
//! │  │  per_gram_fee    │   └───────────────────┘           ▼          │
//! │  └──────────────────┘                          ┌───────────────┐   │
//! │                                                │ PricingResult │   │
//! │  TierQuote / ReverseQuote / PromoQuote ◄───────│ (full forward │   │
//! │  (one per solver mode)                         │  breakdown)   │   │
//! │                                                └───────────────┘   │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! All amounts are `f64` in the local (purchase) currency unless a field name
//! says `_sale`; the sale-currency figure is always `local × exchange_rate`.
//! Weights are grams, dimensions are centimeters.

use serde::{Deserialize, Serialize};

// =============================================================================
// Parameter Defaults
// =============================================================================
// Literal fallbacks used when the config store has no value for a key.

/// Default local→sale currency exchange rate.
pub const DEFAULT_EXCHANGE_RATE: f64 = 13.5;

/// Default platform commission rate, percent of the sale price.
pub const DEFAULT_COMMISSION_RATE_PCT: f64 = 15.0;

/// Default per-parcel labeling fee, local currency.
pub const DEFAULT_LABEL_FEE: f64 = 1.5;

/// Default profit multiplier applied to the purchase cost.
pub const DEFAULT_PROFIT_MULTIPLIER: f64 = 1.35;

// =============================================================================
// Logistics Tier
// =============================================================================

/// One shipping-fee bracket.
///
/// A tier applies to a computation when the chargeable weight and the trial
/// sale price fall inside its bounds; a bound of `0` means unbounded. The
/// tier list sorted ascending by `priority` is evaluated front to back, and
/// the last element of the sorted list doubles as the unconditional fallback.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct LogisticsTier {
    /// Row identifier. Opaque to the matching algorithm.
    pub id: i64,

    /// Display label (e.g. "Petite parcel").
    pub name: String,

    /// Upper weight bound in grams; `0` = unbounded.
    pub max_weight_g: f64,

    /// Upper bound on the trial sale price (local currency); `0` = unbounded.
    pub max_price: f64,

    /// Flat fee component, local currency.
    pub fixed_fee: f64,

    /// Fee per gram of chargeable weight.
    pub per_gram_fee: f64,

    /// Evaluation order; lower = tried first. Ties keep table order.
    pub priority: i64,
}

impl LogisticsTier {
    /// Whether `charge_weight_g` falls inside this tier's weight bound.
    #[inline]
    pub fn accepts_weight(&self, charge_weight_g: f64) -> bool {
        self.max_weight_g == 0.0 || charge_weight_g <= self.max_weight_g
    }

    /// Whether `price` falls inside this tier's price bound.
    #[inline]
    pub fn accepts_price(&self, price: f64) -> bool {
        self.max_price == 0.0 || price <= self.max_price
    }
}

/// Returns the tiers sorted ascending by `priority`.
///
/// The sort is stable: tiers sharing a priority keep their original relative
/// order, which keeps matching deterministic even for malformed tables.
pub fn sorted_by_priority(tiers: &[LogisticsTier]) -> Vec<&LogisticsTier> {
    let mut sorted: Vec<&LogisticsTier> = tiers.iter().collect();
    sorted.sort_by_key(|t| t.priority);
    sorted
}

// =============================================================================
// Pricing Parameters
// =============================================================================

/// Global pricing parameters for one computation.
///
/// Constructed once per request (typically by the config repository) and
/// passed by reference into every engine function; no engine code reads
/// ambient configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricingParameters {
    /// Local→sale currency exchange rate (sale = local × rate).
    pub exchange_rate: f64,

    /// Platform commission, percent of sale price. Must be in `[0, 100)`.
    pub commission_rate_pct: f64,

    /// Per-parcel labeling fee, local currency.
    pub label_fee: f64,

    /// Multiplier applied to purchase cost before fees (e.g. 1.35).
    pub profit_multiplier: f64,
}

impl Default for PricingParameters {
    fn default() -> Self {
        PricingParameters {
            exchange_rate: DEFAULT_EXCHANGE_RATE,
            commission_rate_pct: DEFAULT_COMMISSION_RATE_PCT,
            label_fee: DEFAULT_LABEL_FEE,
            profit_multiplier: DEFAULT_PROFIT_MULTIPLIER,
        }
    }
}

impl PricingParameters {
    /// The fraction of the sale price retained after platform commission.
    #[inline]
    pub fn commission_factor(&self) -> f64 {
        1.0 - self.commission_rate_pct / 100.0
    }

    /// Converts a local-currency amount to the sale currency.
    #[inline]
    pub fn to_sale_currency(&self, local: f64) -> f64 {
        local * self.exchange_rate
    }
}

// =============================================================================
// Forward Mode
// =============================================================================

/// Ephemeral input for one forward pricing computation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingRequest {
    /// Product label carried into history records. May be empty.
    pub product_name: String,

    /// Purchase cost, local currency.
    pub cost: f64,

    /// Actual (scale) weight in grams.
    pub actual_weight_g: f64,

    /// Package length in cm; `0` (or any non-positive dimension) disables
    /// the dimensional-weight override.
    pub length_cm: f64,

    /// Package width in cm.
    pub width_cm: f64,

    /// Package height in cm.
    pub height_cm: f64,
}

/// Billable weight derived from actual weight and package dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChargeableWeight {
    /// The weight fees are computed from: `max(actual, dimensional)`.
    pub charge_weight_g: f64,

    /// Dimensional (volumetric) weight, grams. `0` when dimensions are absent.
    pub dimensional_weight_g: f64,

    /// True when dimensional weight strictly exceeds actual weight.
    pub is_bulky: bool,
}

/// Matched tier plus the fee/price pair computed under it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TierQuote {
    /// The tier the quote was computed under.
    pub tier: LogisticsTier,

    /// Shipping fee under this tier, local currency.
    pub shipping_fee: f64,

    /// Recommended sale price, local currency.
    pub final_price: f64,

    /// True when no tier's bounds held and the last tier was used anyway.
    /// A fallback quote is still a successful quote.
    pub is_fallback: bool,
}

/// Full forward-mode output: matched tier, weights, price in both currencies
/// and the profit breakdown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingResult {
    /// The matched (or fallback) tier.
    pub tier: LogisticsTier,

    /// Billable weight, grams.
    pub charge_weight_g: f64,

    /// Dimensional weight, grams.
    pub dimensional_weight_g: f64,

    /// Dimensional weight strictly exceeded actual weight.
    pub is_bulky: bool,

    /// Shipping fee, local currency.
    pub shipping_fee: f64,

    /// Recommended sale price, local currency.
    pub final_price_local: f64,

    /// Recommended sale price, sale currency.
    pub final_price_sale: f64,

    /// Platform commission at the recommended price, local currency.
    pub commission_fee: f64,

    /// Net profit at the recommended price, local currency.
    pub net_profit: f64,

    /// Net margin, percent of the recommended price (`0` if the price is 0).
    pub margin_pct: f64,

    /// The quote came from the fallback tier.
    pub is_fallback: bool,
}

// =============================================================================
// Reverse Mode
// =============================================================================

/// Reverse-mode output: the purchase-cost ceiling a target sale price
/// supports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReverseQuote {
    /// The tier the ceiling was computed under.
    pub tier: LogisticsTier,

    /// Shipping fee under that tier, local currency.
    pub shipping_fee: f64,

    /// Maximum supportable purchase cost, local currency. Always positive;
    /// a non-positive ceiling is reported as `CoreError::InfeasiblePrice`
    /// instead.
    pub max_cost: f64,

    /// The ceiling came from the fallback tier.
    pub is_fallback: bool,
}

// =============================================================================
// Promotional Mode
// =============================================================================

/// Promotional back-solve output: the list price to publish so that a given
/// discount still clears a minimum margin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromoQuote {
    /// The tier shipping was priced under (by weight, pre-discount).
    pub tier: LogisticsTier,

    /// Shipping fee, local currency.
    pub shipping_fee: f64,

    /// Pre-discount list price, local currency.
    pub list_price_local: f64,

    /// Pre-discount list price, sale currency.
    pub list_price_sale: f64,

    /// Price after the discount, local currency. Equals the margin-floor
    /// target price up to floating rounding.
    pub discounted_price_local: f64,

    /// Price after the discount, sale currency.
    pub discounted_price_sale: f64,

    /// Platform commission at the discounted price, local currency.
    pub commission_fee: f64,

    /// Net profit at the discounted price, local currency.
    pub net_profit: f64,

    /// Realized margin at the discounted price, percent.
    pub actual_margin_pct: f64,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn tier(priority: i64, max_weight_g: f64, max_price: f64) -> LogisticsTier {
        LogisticsTier {
            id: priority,
            name: format!("tier-{priority}"),
            max_weight_g,
            max_price,
            fixed_fee: 1.0,
            per_gram_fee: 0.01,
            priority,
        }
    }

    #[test]
    fn test_bounds_with_zero_meaning_unbounded() {
        let t = tier(1, 500.0, 135.0);
        assert!(t.accepts_weight(500.0));
        assert!(!t.accepts_weight(500.1));
        assert!(t.accepts_price(135.0));
        assert!(!t.accepts_price(135.1));

        let unbounded = tier(4, 0.0, 0.0);
        assert!(unbounded.accepts_weight(1e9));
        assert!(unbounded.accepts_price(1e9));
    }

    #[test]
    fn test_sorted_by_priority_is_stable() {
        let mut a = tier(2, 0.0, 0.0);
        a.id = 10;
        let mut b = tier(1, 0.0, 0.0);
        b.id = 20;
        let mut c = tier(2, 0.0, 0.0);
        c.id = 30;

        let tiers = vec![a, b, c];
        let sorted = sorted_by_priority(&tiers);
        let ids: Vec<i64> = sorted.iter().map(|t| t.id).collect();
        // Priority 1 first; the two priority-2 tiers keep table order.
        assert_eq!(ids, vec![20, 10, 30]);
    }

    #[test]
    fn test_default_parameters() {
        let params = PricingParameters::default();
        assert_eq!(params.exchange_rate, 13.5);
        assert_eq!(params.commission_rate_pct, 15.0);
        assert_eq!(params.label_fee, 1.5);
        assert_eq!(params.profit_multiplier, 1.35);
        assert!((params.commission_factor() - 0.85).abs() < 1e-12);
    }

    #[test]
    fn test_sale_currency_conversion() {
        let params = PricingParameters::default();
        assert!((params.to_sale_currency(10.0) - 135.0).abs() < 1e-12);
    }
}
