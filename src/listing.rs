//! Listing-surface helpers: draft validation, commission recommendations,
//! money formatting, and re-pricing of legacy records.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::FeeSchedule;
use crate::engine::{forward_price, inverse_price};
use crate::engine::rounding::round_to_cents;
use crate::types::CommissionSpec;

/// Problems that make a draft listing unpricable or suspect. Detected before
/// the engine runs; the engine itself clamps rather than rejects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ListingIssue {
    #[error("seller ask must be greater than zero")]
    NonPositiveSellerAsk,
    #[error("commission value cannot be negative")]
    NegativeCommission,
    #[error("percent commission cannot exceed 100")]
    PercentAboveCap,
    #[error("flat commission cannot exceed twice the seller ask")]
    FlatCommissionDisproportionate,
}

/// Check a draft listing. An empty result means the listing is pricable.
pub fn validate_listing(seller_ask: f64, commission: Option<&CommissionSpec>) -> Vec<ListingIssue> {
    let mut issues = Vec::new();

    if !seller_ask.is_finite() || seller_ask <= 0.0 {
        issues.push(ListingIssue::NonPositiveSellerAsk);
    }

    match commission {
        Some(CommissionSpec::Percent(value)) => {
            if *value < 0.0 {
                issues.push(ListingIssue::NegativeCommission);
            }
            if *value > 100.0 {
                issues.push(ListingIssue::PercentAboveCap);
            }
        }
        Some(CommissionSpec::Flat(value)) => {
            if *value < 0.0 {
                issues.push(ListingIssue::NegativeCommission);
            }
            if seller_ask.is_finite() && *value > seller_ask * 2.0 {
                issues.push(ListingIssue::FlatCommissionDisproportionate);
            }
        }
        None => {}
    }

    issues
}

/// Suggested affiliate percent tiers for a seller ask bracket.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RateRecommendation {
    pub low: f64,
    pub medium: f64,
    pub high: f64,
}

pub fn recommended_rates(seller_ask: f64) -> RateRecommendation {
    if seller_ask < 50.0 {
        RateRecommendation {
            low: 15.0,
            medium: 25.0,
            high: 40.0,
        }
    } else if seller_ask < 200.0 {
        RateRecommendation {
            low: 10.0,
            medium: 20.0,
            high: 35.0,
        }
    } else {
        RateRecommendation {
            low: 5.0,
            medium: 15.0,
            high: 25.0,
        }
    }
}

/// Display formatting for money amounts. Non-finite values render as $0.00.
pub fn format_currency(value: f64) -> String {
    if value.is_finite() {
        format!("${:.2}", value)
    } else {
        "$0.00".to_string()
    }
}

/// Parse a user-typed money string. Tolerates surrounding whitespace, a
/// leading dollar sign, and comma separators. Negative amounts are rejected.
pub fn parse_money_input(input: &str) -> Option<f64> {
    let cleaned = input.trim().trim_start_matches('$').replace(',', "");
    let value: f64 = cleaned.trim().parse().ok()?;
    (value.is_finite() && value >= 0.0).then_some(value)
}

/// A stored listing record that may predate forward pricing; either money
/// field may be missing on old rows.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct DraftListing {
    pub seller_ask: Option<f64>,
    pub sale_price: Option<f64>,
    pub commission: Option<CommissionSpec>,
}

/// A listing with a consistent ask/price pair.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PricedListing {
    pub seller_ask: f64,
    pub sale_price: f64,
    pub commission: Option<CommissionSpec>,
}

/// Resolve a draft into a consistent priced listing. An explicit seller ask
/// wins; otherwise the ask is recovered from the displayed price. The sale
/// price is always recomputed from the resolved ask.
pub fn price_listing(schedule: &FeeSchedule, draft: &DraftListing) -> PricedListing {
    let commission = draft.commission;

    let seller_ask = match draft.seller_ask {
        Some(ask) if ask.is_finite() && ask > 0.0 => round_to_cents(ask),
        _ => match draft.sale_price {
            Some(price) => inverse_price(schedule, price, commission.as_ref()).seller_ask,
            None => 0.0,
        },
    };

    let sale_price = forward_price(schedule, seller_ask, commission.as_ref());

    PricedListing {
        seller_ask,
        sale_price,
        commission,
    }
}
