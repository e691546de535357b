//! Payout distribution: split a finalized sale's proceeds to the cent.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::FeeSchedule;
use crate::engine::rates::{platform_rate, platform_surcharge};
use crate::engine::rounding::{round_to_cents, round_up_to_cents};
use crate::types::{CommissionSpec, SaleContext};

/// Per-party settlement amounts for one finalized sale.
///
/// Invariants: the seller payout, affiliate commission, referral bonus,
/// platform net, and processor fee sum to the sale price within rounding
/// slack, and `platform_net + referral_bonus == platform_gross`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PayoutResult {
    pub sale_price: f64,
    pub seller_payout: f64,
    pub affiliate_commission: f64,
    pub referral_bonus: f64,
    pub platform_gross: f64,
    pub platform_net: f64,
    pub processor_fee: f64,
}

/// Partition a finalized sale. The seller receives exactly the ask rounded
/// to the nearest cent; every fee component rounds upward so rounding slack
/// lands on the platform side, never on the seller.
pub fn distribute(
    schedule: &FeeSchedule,
    sale_price: f64,
    seller_ask: f64,
    context: &SaleContext,
) -> PayoutResult {
    let sale_price = round_to_cents(sale_price);
    let ask = if seller_ask.is_finite() && seller_ask > 0.0 {
        seller_ask
    } else {
        0.0
    };

    let affiliate_commission = if context.has_affiliate {
        let spec = context
            .commission
            .unwrap_or(CommissionSpec::Percent(schedule.default_affiliate_percent));
        round_up_to_cents(spec.amount(ask, schedule))
    } else {
        0.0
    };

    let platform_gross =
        round_up_to_cents(ask * platform_rate(schedule, ask) + platform_surcharge(schedule, ask));

    let referral_bonus = if context.has_affiliate_referrer && platform_gross > 0.0 {
        round_up_to_cents(platform_gross * schedule.referral_rate)
    } else {
        0.0
    };

    let platform_net = round_up_to_cents((platform_gross - referral_bonus).max(0.0));
    let processor_fee =
        round_up_to_cents(sale_price * schedule.processor_percent + schedule.processor_flat);
    let seller_payout = round_to_cents(ask);

    debug!(
        sale_price,
        seller_payout,
        affiliate_commission,
        referral_bonus,
        platform_net,
        processor_fee,
        "payout split"
    );

    PayoutResult {
        sale_price,
        seller_payout,
        affiliate_commission,
        referral_bonus,
        platform_gross,
        platform_net,
        processor_fee,
    }
}
