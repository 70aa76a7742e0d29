//! # Tier Matching & Price Derivation
//!
//! The three solver modes of the pricing engine, all built on one fee model:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │  Fee model      fee = fixed_fee + label_fee + weight × per_gram_fee │
//! │                                                                     │
//! │  Forward        cost ──► trial price per tier ──► first tier whose  │
//! │                 bounds hold wins; last tier is the fallback         │
//! │                                                                     │
//! │  Reverse        target sale price ──► max purchase cost per tier;   │
//! │                 tiers implying a non-positive cost are skipped      │
//! │                                                                     │
//! │  Promotional    discount + margin floor ──► discounted target       │
//! │                 price ──► pre-discount list price                   │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Matching is **first-fit in priority order**, not cheapest-fit: an earlier
//! tier wins even when a later tier would quote a lower price. Priority
//! ordering is how operators express which channels to prefer.

use crate::error::{CoreError, CoreResult};
use crate::types::{
    sorted_by_priority, LogisticsTier, PricingParameters, PricingRequest, PricingResult,
    PromoQuote, ReverseQuote, TierQuote,
};
use crate::validation::{
    validate_non_negative, validate_parameters, validate_positive, validate_rate_pct,
    validate_request,
};
use crate::weight::chargeable_weight;

// =============================================================================
// Fee Model
// =============================================================================

/// Shipping fee for a tier at a given chargeable weight, local currency.
///
/// `fee = fixed_fee + label_fee + charge_weight × per_gram_fee`
#[inline]
pub fn shipping_fee(tier: &LogisticsTier, charge_weight_g: f64, label_fee: f64) -> f64 {
    tier.fixed_fee + label_fee + charge_weight_g * tier.per_gram_fee
}

/// Trial sale price for a cost/fee pair: the price at which the configured
/// profit multiple survives the platform commission.
#[inline]
fn trial_price(cost: f64, fee: f64, params: &PricingParameters) -> f64 {
    (cost * params.profit_multiplier + fee) / params.commission_factor()
}

// =============================================================================
// Forward Matcher
// =============================================================================

/// Matches a tier and derives the recommended sale price (local currency).
///
/// Walks the tiers in ascending priority order; for each, prices the parcel
/// under that tier and takes the first whose weight AND price bounds hold.
/// If none hold, the quote is recomputed under the **last** tier in sorted
/// order regardless of its bounds (`is_fallback = true`); with at least one
/// tier configured, forward matching always succeeds.
///
/// ## Errors
/// - [`CoreError::TiersMissing`] when `tiers` is empty
/// - [`CoreError::Validation`] for out-of-range parameters or negative inputs
pub fn match_and_price(
    tiers: &[LogisticsTier],
    charge_weight_g: f64,
    cost: f64,
    params: &PricingParameters,
) -> CoreResult<TierQuote> {
    validate_parameters(params)?;
    validate_non_negative("charge_weight_g", charge_weight_g)?;
    validate_non_negative("cost", cost)?;

    if tiers.is_empty() {
        return Err(CoreError::TiersMissing);
    }

    let sorted = sorted_by_priority(tiers);

    for tier in &sorted {
        let fee = shipping_fee(tier, charge_weight_g, params.label_fee);
        let price = trial_price(cost, fee, params);

        if tier.accepts_weight(charge_weight_g) && tier.accepts_price(price) {
            return Ok(TierQuote {
                tier: (*tier).clone(),
                shipping_fee: fee,
                final_price: price,
                is_fallback: false,
            });
        }
    }

    // No tier's bounds held: price under the last tier anyway.
    let last = sorted[sorted.len() - 1];
    let fee = shipping_fee(last, charge_weight_g, params.label_fee);
    let price = trial_price(cost, fee, params);

    Ok(TierQuote {
        tier: last.clone(),
        shipping_fee: fee,
        final_price: price,
        is_fallback: true,
    })
}

/// Full forward computation: chargeable weight, tier match, two-currency
/// price and the profit breakdown.
///
/// This is the operation behind the pricing workstation's "calculate"
/// action; its output maps one-to-one onto a history record.
pub fn price_product(
    request: &PricingRequest,
    tiers: &[LogisticsTier],
    params: &PricingParameters,
) -> CoreResult<PricingResult> {
    validate_request(request)?;

    let weight = chargeable_weight(
        request.actual_weight_g,
        request.length_cm,
        request.width_cm,
        request.height_cm,
    );

    let quote = match_and_price(tiers, weight.charge_weight_g, request.cost, params)?;

    let commission_fee = quote.final_price * params.commission_rate_pct / 100.0;
    let net_profit = quote.final_price - request.cost - quote.shipping_fee - commission_fee;
    let margin_pct = if quote.final_price > 0.0 {
        net_profit / quote.final_price * 100.0
    } else {
        0.0
    };

    Ok(PricingResult {
        final_price_sale: params.to_sale_currency(quote.final_price),
        final_price_local: quote.final_price,
        charge_weight_g: weight.charge_weight_g,
        dimensional_weight_g: weight.dimensional_weight_g,
        is_bulky: weight.is_bulky,
        shipping_fee: quote.shipping_fee,
        commission_fee,
        net_profit,
        margin_pct,
        is_fallback: quote.is_fallback,
        tier: quote.tier,
    })
}

// =============================================================================
// Reverse Cost Solver
// =============================================================================

/// Solves for the maximum purchase cost a target sale price can support.
///
/// The target is given in the sale currency and converted through the
/// exchange rate before tier evaluation. Tiers are tried in priority order;
/// a tier is accepted only when its bounds hold AND the implied cost ceiling
/// is strictly positive. A structurally-fitting tier whose fees already eat
/// the whole price is skipped in favor of later tiers. When no tier
/// qualifies, the ceiling is computed under the last tier and clamped at
/// zero; a clamped-to-zero ceiling is reported as
/// [`CoreError::InfeasiblePrice`], never as a usable number.
pub fn max_supportable_cost(
    tiers: &[LogisticsTier],
    target_price_sale: f64,
    charge_weight_g: f64,
    params: &PricingParameters,
) -> CoreResult<ReverseQuote> {
    validate_parameters(params)?;
    validate_positive("target_price_sale", target_price_sale)?;
    validate_non_negative("charge_weight_g", charge_weight_g)?;

    if tiers.is_empty() {
        return Err(CoreError::TiersMissing);
    }

    let price_local = target_price_sale / params.exchange_rate;
    let commission_factor = params.commission_factor();
    let sorted = sorted_by_priority(tiers);

    for tier in &sorted {
        let fee = shipping_fee(tier, charge_weight_g, params.label_fee);
        let max_cost = (price_local * commission_factor - fee) / params.profit_multiplier;

        if tier.accepts_weight(charge_weight_g)
            && tier.accepts_price(price_local)
            && max_cost > 0.0
        {
            return Ok(ReverseQuote {
                tier: (*tier).clone(),
                shipping_fee: fee,
                max_cost,
                is_fallback: false,
            });
        }
    }

    let last = sorted[sorted.len() - 1];
    let fee = shipping_fee(last, charge_weight_g, params.label_fee);
    let max_cost =
        ((price_local * commission_factor - fee) / params.profit_multiplier).max(0.0);

    if max_cost <= 0.0 {
        return Err(CoreError::InfeasiblePrice {
            target_price: target_price_sale,
        });
    }

    Ok(ReverseQuote {
        tier: last.clone(),
        shipping_fee: fee,
        max_cost,
        is_fallback: true,
    })
}

// =============================================================================
// Promotional Back-Solver
// =============================================================================

/// Solves for the list price to publish so that selling at `discount_pct`
/// off still clears `min_margin_pct`.
///
/// Shipping is priced through the forward matcher on the undiscounted
/// cost/weight (fees depend on the parcel, not the price point). The floor
/// (discounted) price is then
///
/// ```text
/// target = (cost + fee) / (commission_factor × (1 − min_margin/100))
/// list   = target / (1 − discount/100)
/// ```
///
/// and the returned breakdown is recomputed from the discounted price, which
/// equals `target` up to floating rounding.
pub fn promotional_pricing(
    tiers: &[LogisticsTier],
    cost: f64,
    charge_weight_g: f64,
    discount_pct: f64,
    min_margin_pct: f64,
    params: &PricingParameters,
) -> CoreResult<PromoQuote> {
    validate_rate_pct("discount_pct", discount_pct)?;
    validate_rate_pct("min_margin_pct", min_margin_pct)?;

    // Validates the remaining inputs and rejects an empty tier table.
    let quote = match_and_price(tiers, charge_weight_g, cost, params)?;
    let fee = quote.shipping_fee;

    let commission_factor = params.commission_factor();
    let margin_factor = min_margin_pct / 100.0;
    let target_price = (cost + fee) / (commission_factor * (1.0 - margin_factor));

    let discount_factor = 1.0 - discount_pct / 100.0;
    let list_price = target_price / discount_factor;
    let discounted_price = list_price * discount_factor;

    let commission_fee = discounted_price * params.commission_rate_pct / 100.0;
    let net_profit = discounted_price - cost - fee - commission_fee;
    let actual_margin_pct = if discounted_price > 0.0 {
        net_profit / discounted_price * 100.0
    } else {
        0.0
    };

    Ok(PromoQuote {
        tier: quote.tier,
        shipping_fee: fee,
        list_price_sale: params.to_sale_currency(list_price),
        list_price_local: list_price,
        discounted_price_sale: params.to_sale_currency(discounted_price),
        discounted_price_local: discounted_price,
        commission_fee,
        net_profit,
        actual_margin_pct,
    })
}

// =============================================================================
// Unit Tests
// =============================================================================
