//! Inverse pricing: recover the seller ask behind a displayed sale price.

use tracing::warn;

use crate::config::FeeSchedule;
use crate::engine::forward::forward_price;
use crate::engine::rounding::round_to_cents;
use crate::types::CommissionSpec;

/// Bisection budget. Enough for sub-cent brackets well past the default
/// search ceiling.
const MAX_ITERATIONS: u32 = 64;

/// Stop once the bracket is narrower than a tenth of a cent.
const TARGET_RESOLUTION: f64 = 0.001;

/// Result of an inverse price search.
#[derive(Debug, Clone, Copy)]
pub struct InverseQuote {
    /// Recovered seller ask, rounded to the cent
    pub seller_ask: f64,
    /// Absolute gap between the re-priced ask and the target sale price
    pub residual: f64,
    /// Whether the bracket narrowed below the target resolution
    pub converged: bool,
    /// Bisection rounds actually used
    pub iterations: u32,
}

/// Binary-search the forward pricing function for the ask that produces
/// `sale_price`. Non-positive or non-finite targets resolve to a zero ask.
pub fn inverse_price(
    schedule: &FeeSchedule,
    sale_price: f64,
    commission: Option<&CommissionSpec>,
) -> InverseQuote {
    if !sale_price.is_finite() || sale_price <= 0.0 {
        return InverseQuote {
            seller_ask: 0.0,
            residual: 0.0,
            converged: true,
            iterations: 0,
        };
    }

    let mut low = 0.0_f64;
    let mut high = sale_price.max(1000.0);
    let mut iterations = 0;

    while iterations < MAX_ITERATIONS && high - low > TARGET_RESOLUTION {
        let mid = (low + high) / 2.0;
        if forward_price(schedule, mid, commission) > sale_price {
            high = mid;
        } else {
            low = mid;
        }
        iterations += 1;
    }

    let converged = high - low <= TARGET_RESOLUTION;
    let seller_ask = round_to_cents((low + high) / 2.0);
    let residual = (forward_price(schedule, seller_ask, commission) - sale_price).abs();

    if !converged {
        warn!(
            sale_price,
            seller_ask, residual, iterations, "inverse search exhausted its iteration budget"
        );
    }

    InverseQuote {
        seller_ask,
        residual,
        converged,
        iterations,
    }
}
