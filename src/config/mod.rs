//! Configuration management for FeeSplit
//!
//! Loads from config files + environment variables via .env

use anyhow::{bail, Context, Result};
use config::{Config, Environment, File};
use serde::Deserialize;

/// Immutable fee constants shared by every pricing computation.
///
/// Loaded once at startup and passed by reference; nothing mutates it after
/// validation.
#[derive(Debug, Clone, Deserialize)]
pub struct FeeSchedule {
    /// Processor percentage of the sale price (0.029 = 2.9%)
    pub processor_percent: f64,
    /// Processor flat fee per transaction in dollars
    pub processor_flat: f64,
    /// Platform rate for asks below the tier threshold
    pub standard_rate: f64,
    /// Platform rate for asks at or above the tier threshold
    pub reduced_rate: f64,
    /// Seller ask at which the reduced rate kicks in
    pub rate_tier_threshold: f64,
    /// Largest seller ask that still pays the small-item surcharge (inclusive)
    pub surcharge_threshold: f64,
    /// Small-item surcharge in dollars
    pub surcharge_amount: f64,
    /// Referrer share of the platform gross (0.05 = 5%)
    pub referral_rate: f64,
    /// Affiliate percent applied when a sale has an affiliate but no stored terms
    pub default_affiliate_percent: f64,
}

impl Default for FeeSchedule {
    fn default() -> Self {
        Self {
            processor_percent: 0.029,
            processor_flat: 0.60,
            standard_rate: 0.15,
            reduced_rate: 0.10,
            rate_tier_threshold: 100.0,
            surcharge_threshold: 20.0,
            surcharge_amount: 1.00,
            referral_rate: 0.05,
            default_affiliate_percent: 20.0,
        }
    }
}

impl FeeSchedule {
    /// Sanity-check the constants before any pricing runs against them.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..1.0).contains(&self.processor_percent) {
            bail!("processor_percent must be in [0, 1) to keep the settlement denominator positive");
        }
        if self.processor_flat < 0.0 || self.surcharge_amount < 0.0 {
            bail!("flat fee amounts cannot be negative");
        }
        if !(0.0..1.0).contains(&self.standard_rate) || !(0.0..1.0).contains(&self.reduced_rate) {
            bail!("platform rates must be in [0, 1)");
        }
        if self.rate_tier_threshold <= 0.0 || self.surcharge_threshold <= 0.0 {
            bail!("tier thresholds must be positive");
        }
        if !(0.0..=1.0).contains(&self.referral_rate) {
            bail!("referral_rate must be in [0, 1]");
        }
        if !(0.0..=100.0).contains(&self.default_affiliate_percent) {
            bail!("default_affiliate_percent must be in [0, 100]");
        }
        Ok(())
    }
}

/// Main application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub fees: FeeSchedule,
    pub ledger: LedgerConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LedgerConfig {
    /// Data directory for the payout ledger CSV
    pub data_dir: String,
    /// Enable CSV ledger writing
    pub csv_enabled: bool,
}

impl AppConfig {
    /// Load configuration from file and environment
    pub fn load() -> Result<Self> {
        // Load .env file first
        dotenvy::dotenv().ok();

        let config = Config::builder()
            // Fee schedule defaults
            .set_default("fees.processor_percent", 0.029)?
            .set_default("fees.processor_flat", 0.60)?
            .set_default("fees.standard_rate", 0.15)?
            .set_default("fees.reduced_rate", 0.10)?
            .set_default("fees.rate_tier_threshold", 100.0)?
            .set_default("fees.surcharge_threshold", 20.0)?
            .set_default("fees.surcharge_amount", 1.00)?
            .set_default("fees.referral_rate", 0.05)?
            .set_default("fees.default_affiliate_percent", 20.0)?
            // Ledger defaults
            .set_default("ledger.data_dir", "./data")?
            .set_default("ledger.csv_enabled", true)?
            // Load config file if exists
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // Override with environment variables (FEESPLIT_*)
            .add_source(Environment::with_prefix("FEESPLIT").separator("__"))
            .build()
            .context("Failed to build configuration")?;

        let app_config: AppConfig = config
            .try_deserialize()
            .context("Failed to deserialize configuration")?;

        app_config.fees.validate()?;

        Ok(app_config)
    }

    /// Generate a digest of the config for logging
    pub fn digest(&self) -> String {
        format!(
            "rates={:.2}/{:.2}@{:.0} surcharge={:.2}<={:.0} processor={:.3}+{:.2} referral={:.2} csv={}",
            self.fees.standard_rate,
            self.fees.reduced_rate,
            self.fees.rate_tier_threshold,
            self.fees.surcharge_amount,
            self.fees.surcharge_threshold,
            self.fees.processor_percent,
            self.fees.processor_flat,
            self.fees.referral_rate,
            self.ledger.csv_enabled
        )
    }
}

impl std::fmt::Display for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.digest())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_schedule_is_valid() {
        assert!(FeeSchedule::default().validate().is_ok());
    }

    #[test]
    fn rejects_degenerate_denominator() {
        let schedule = FeeSchedule {
            processor_percent: 1.0,
            ..FeeSchedule::default()
        };
        assert!(schedule.validate().is_err());
    }

    #[test]
    fn rejects_negative_flat_fee() {
        let schedule = FeeSchedule {
            processor_flat: -0.60,
            ..FeeSchedule::default()
        };
        assert!(schedule.validate().is_err());
    }
}
