//! Core types for FeeSplit

use serde::{Deserialize, Serialize};

use crate::config::FeeSchedule;

/// Commission terms stored on a listing.
///
/// Wire shape is tagged: `{"kind": "percent", "value": 20.0}`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum CommissionSpec {
    /// Percent of the seller ask, as a whole number (20.0 = 20%)
    Percent(f64),
    /// Flat dollar amount per sale
    Flat(f64),
}

impl CommissionSpec {
    /// Repair a stored percent value. Non-finite or non-positive values fall
    /// back to the schedule default; values in (0, 1] are fractional rates
    /// and scale to whole percents.
    pub fn normalized_percent(value: f64, schedule: &FeeSchedule) -> f64 {
        if !value.is_finite() || value <= 0.0 {
            return schedule.default_affiliate_percent;
        }
        if value <= 1.0 {
            value * 100.0
        } else {
            value
        }
    }

    /// Commission in dollars for a seller ask, unrounded. Degenerate asks
    /// earn nothing; a damaged flat value contributes zero.
    pub fn amount(&self, seller_ask: f64, schedule: &FeeSchedule) -> f64 {
        if !seller_ask.is_finite() || seller_ask <= 0.0 {
            return 0.0;
        }
        match *self {
            CommissionSpec::Percent(value) => {
                seller_ask * Self::normalized_percent(value, schedule) / 100.0
            }
            CommissionSpec::Flat(value) => {
                if value.is_finite() && value > 0.0 {
                    value
                } else {
                    0.0
                }
            }
        }
    }
}

impl std::fmt::Display for CommissionSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CommissionSpec::Percent(value) => write!(f, "{}%", value),
            CommissionSpec::Flat(value) => write!(f, "${:.2}", value),
        }
    }
}

/// Commission for an optional spec. Absent terms mean no commission.
pub fn commission_amount(
    spec: Option<&CommissionSpec>,
    seller_ask: f64,
    schedule: &FeeSchedule,
) -> f64 {
    spec.map(|s| s.amount(seller_ask, schedule)).unwrap_or(0.0)
}

/// Participation flags for a finalized sale.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct SaleContext {
    /// An affiliate drove the sale
    pub has_affiliate: bool,
    /// The affiliate was referred onto the platform by a third party
    pub has_affiliate_referrer: bool,
    /// Commission terms stored on the listing, if any
    pub commission: Option<CommissionSpec>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percent_normalization_repairs_bad_values() {
        let schedule = FeeSchedule::default();
        assert_eq!(CommissionSpec::normalized_percent(f64::NAN, &schedule), 20.0);
        assert_eq!(CommissionSpec::normalized_percent(0.0, &schedule), 20.0);
        assert_eq!(CommissionSpec::normalized_percent(-5.0, &schedule), 20.0);
        assert_eq!(CommissionSpec::normalized_percent(0.25, &schedule), 25.0);
        assert_eq!(CommissionSpec::normalized_percent(1.0, &schedule), 100.0);
        assert_eq!(CommissionSpec::normalized_percent(25.0, &schedule), 25.0);
    }

    #[test]
    fn amount_is_zero_for_degenerate_ask() {
        let schedule = FeeSchedule::default();
        assert_eq!(CommissionSpec::Percent(20.0).amount(0.0, &schedule), 0.0);
        assert_eq!(CommissionSpec::Percent(20.0).amount(f64::NAN, &schedule), 0.0);
        assert_eq!(CommissionSpec::Flat(15.0).amount(-1.0, &schedule), 0.0);
    }

    #[test]
    fn damaged_flat_value_contributes_zero() {
        let schedule = FeeSchedule::default();
        assert_eq!(CommissionSpec::Flat(-3.0).amount(50.0, &schedule), 0.0);
        assert_eq!(CommissionSpec::Flat(f64::NAN).amount(50.0, &schedule), 0.0);
        assert_eq!(CommissionSpec::Flat(15.0).amount(50.0, &schedule), 15.0);
    }

    #[test]
    fn serde_wire_shape_is_tagged() {
        let json = serde_json::to_string(&CommissionSpec::Percent(20.0)).unwrap();
        assert_eq!(json, r#"{"kind":"percent","value":20.0}"#);
        let back: CommissionSpec = serde_json::from_str(&json).unwrap();
        assert_eq!(back, CommissionSpec::Percent(20.0));
    }
}
