//! Forward pricing: gross a seller ask up into a customer sale price.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::FeeSchedule;
use crate::engine::rates::{platform_rate, platform_surcharge};
use crate::engine::rounding::{round_to_cents, round_up_to_cents};
use crate::types::{commission_amount, CommissionSpec};

/// Customer sale price with every fee baked in, rounded to the nearest cent.
///
/// The gross-up is a single division: the sum of seller ask, affiliate
/// commission, platform fee, and processor flat fee, divided by one minus
/// the processor percent. Degenerate asks clamp to zero and still produce
/// the processor floor price.
pub fn forward_price(
    schedule: &FeeSchedule,
    seller_ask: f64,
    commission: Option<&CommissionSpec>,
) -> f64 {
    let ask = if seller_ask.is_finite() && seller_ask > 0.0 {
        seller_ask
    } else {
        0.0
    };

    let affiliate = commission_amount(commission, ask, schedule);
    let platform = ask * platform_rate(schedule, ask) + platform_surcharge(schedule, ask);
    let subtotal = ask + affiliate + platform + schedule.processor_flat;
    let sale_price = round_to_cents(subtotal / (1.0 - schedule.processor_percent));

    debug!(ask, affiliate, platform, sale_price, "forward price");

    sale_price
}

/// Per-component view of a priced listing, each component rounded for
/// display on authoring surfaces.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PriceBreakdown {
    pub seller_ask: f64,
    pub affiliate_amount: f64,
    pub platform_fee: f64,
    pub platform_rate: f64,
    pub processor_fee: f64,
    pub sale_price: f64,
}

pub fn price_breakdown(
    schedule: &FeeSchedule,
    seller_ask: f64,
    commission: Option<&CommissionSpec>,
) -> PriceBreakdown {
    let ask = if seller_ask.is_finite() && seller_ask > 0.0 {
        seller_ask
    } else {
        0.0
    };

    let sale_price = forward_price(schedule, ask, commission);
    let rate = platform_rate(schedule, ask);

    PriceBreakdown {
        seller_ask: round_to_cents(ask),
        affiliate_amount: round_to_cents(commission_amount(commission, ask, schedule)),
        platform_fee: round_to_cents(ask * rate + platform_surcharge(schedule, ask)),
        platform_rate: rate,
        processor_fee: round_up_to_cents(
            sale_price * schedule.processor_percent + schedule.processor_flat,
        ),
        sale_price,
    }
}
