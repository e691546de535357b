//! Pricing engine: forward gross-up, inverse recovery, and payout splits
//! built on shared rounding and rate primitives.

pub mod forward;
pub mod inverse;
pub mod payout;
pub mod rates;
pub mod rounding;

pub use forward::{forward_price, price_breakdown, PriceBreakdown};
pub use inverse::{inverse_price, InverseQuote};
pub use payout::{distribute, PayoutResult};
pub use rates::{platform_rate, platform_surcharge};
pub use rounding::{round_to_cents, round_up_to_cents};
