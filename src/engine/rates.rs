//! Rate resolution: platform take rate and small-item surcharge by ask tier.

use crate::config::FeeSchedule;

/// Platform take rate for a seller ask. Asks at or above the tier threshold
/// pay the reduced rate; degenerate asks pay the standard rate.
pub fn platform_rate(schedule: &FeeSchedule, seller_ask: f64) -> f64 {
    if seller_ask.is_finite() && seller_ask >= schedule.rate_tier_threshold {
        schedule.reduced_rate
    } else {
        schedule.standard_rate
    }
}

/// Flat surcharge on low-priced items. Applies when 0 < ask <= threshold,
/// inclusive at the boundary.
pub fn platform_surcharge(schedule: &FeeSchedule, seller_ask: f64) -> f64 {
    if seller_ask.is_finite() && seller_ask > 0.0 && seller_ask <= schedule.surcharge_threshold {
        schedule.surcharge_amount
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rate_steps_down_at_tier_threshold() {
        let schedule = FeeSchedule::default();
        assert_eq!(platform_rate(&schedule, 99.99), 0.15);
        assert_eq!(platform_rate(&schedule, 100.0), 0.10);
        assert_eq!(platform_rate(&schedule, 250.0), 0.10);
        assert_eq!(platform_rate(&schedule, f64::NAN), 0.15);
    }

    #[test]
    fn surcharge_boundary_is_inclusive() {
        let schedule = FeeSchedule::default();
        assert_eq!(platform_surcharge(&schedule, 20.0), 1.0);
        assert_eq!(platform_surcharge(&schedule, 20.01), 0.0);
        assert_eq!(platform_surcharge(&schedule, 0.0), 0.0);
        assert_eq!(platform_surcharge(&schedule, 5.0), 1.0);
        assert_eq!(platform_surcharge(&schedule, f64::NAN), 0.0);
    }
}
