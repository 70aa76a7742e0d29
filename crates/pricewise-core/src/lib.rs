//! # pricewise-core: Pure Pricing Engine
//!
//! This crate is the **heart** of Pricewise. It contains the tier-matching
//! and price-derivation logic as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                      Pricewise Architecture                         │
//! │                                                                     │
//! │  ┌───────────────────────────────────────────────────────────────┐ │
//! │  │             ★ pricewise-core (THIS CRATE) ★                   │ │
//! │  │                                                               │ │
//! │  │  ┌─────────┐  ┌─────────┐  ┌──────────┐  ┌────────────┐     │ │
//! │  │  │  types  │  │ weight  │  │ pricing  │  │ validation │     │ │
//! │  │  │  Tier   │  │ Charge  │  │ Matcher  │  │   rules    │     │ │
//! │  │  │  Params │  │ Weight  │  │ Solvers  │  │   checks   │     │ │
//! │  │  └─────────┘  └─────────┘  └──────────┘  └────────────┘     │ │
//! │  │                                                               │ │
//! │  │  NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS          │ │
//! │  └───────────────────────────────────────────────────────────────┘ │
//! │                               │                                     │
//! │  ┌────────────────────────────▼──────────────────────────────────┐ │
//! │  │                pricewise-db (Persistence Layer)               │ │
//! │  │           SQLite tiers / config / history repositories        │ │
//! │  └───────────────────────────────────────────────────────────────┘ │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (LogisticsTier, PricingParameters, quotes)
//! - [`weight`] - Chargeable-weight calculator (dimensional override)
//! - [`pricing`] - Tier matching and the three solver modes
//! - [`validation`] - Input-boundary validation
//! - [`error`] - Engine error types
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: same tiers + same parameters = same quote
//! 2. **No I/O**: database, network, file system access is FORBIDDEN here
//! 3. **Explicit Parameters**: every operation takes a [`PricingParameters`]
//!    value; nothing reads ambient configuration
//! 4. **Typed Failures**: "no tiers" and "infeasible price" are error
//!    variants, never panics or sentinel numbers
//!
//! ## Example Usage
//!
//! ```rust
//! use pricewise_core::{chargeable_weight, match_and_price, LogisticsTier, PricingParameters};
//!
//! let tiers = vec![LogisticsTier {
//!     id: 1,
//!     name: "Petite parcel".to_string(),
//!     max_weight_g: 500.0,
//!     max_price: 135.0,
//!     fixed_fee: 2.6,
//!     per_gram_fee: 0.035,
//!     priority: 1,
//! }];
//! let params = PricingParameters::default();
//!
//! let weight = chargeable_weight(300.0, 0.0, 0.0, 0.0);
//! let quote = match_and_price(&tiers, weight.charge_weight_g, 25.0, &params).unwrap();
//! assert_eq!(quote.tier.id, 1);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod pricing;
pub mod types;
pub mod validation;
pub mod weight;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use pricewise_core::LogisticsTier` instead of
// `use pricewise_core::types::LogisticsTier`

pub use error::{CoreError, CoreResult, ValidationError};
pub use pricing::{match_and_price, max_supportable_cost, price_product, promotional_pricing, shipping_fee};
pub use types::*;
pub use weight::chargeable_weight;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Volumetric divisor for dimensional weight: `(L × W × H) / 6000` gives
/// the dimensional weight in kilograms.
///
/// A fixed carrier-side constant, deliberately not configurable.
pub const VOLUMETRIC_DIVISOR: f64 = 6000.0;

/// Margin percentage at or above which a computation counts as "high profit"
/// in dashboard statistics.
pub const HIGH_PROFIT_MARGIN_PCT: f64 = 20.0;
