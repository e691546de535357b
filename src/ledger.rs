//! Append-only CSV ledger for finalized sales.
//!
//! One row per participating recipient, keyed by transaction id.

use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Utc;
use csv::WriterBuilder;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::engine::PayoutResult;

/// Payout destination for a single ledger row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Recipient {
    Seller,
    Affiliate,
    Referrer,
    Platform,
    Processor,
}

impl std::fmt::Display for Recipient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Recipient::Seller => "seller",
            Recipient::Affiliate => "affiliate",
            Recipient::Referrer => "referrer",
            Recipient::Platform => "platform",
            Recipient::Processor => "processor",
        };
        write!(f, "{}", name)
    }
}

/// One settlement row in the payout ledger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerRecord {
    pub transaction_id: String,
    /// Unix timestamp in milliseconds
    pub timestamp: i64,
    pub recipient: Recipient,
    pub amount: f64,
}

pub fn new_transaction_id() -> String {
    Uuid::new_v4().to_string()
}

/// Expand a payout into one row per participating recipient. Optional
/// recipients with zero amounts are omitted; the mandatory seller, platform,
/// and processor rows are always present.
pub fn ledger_records(transaction_id: &str, payout: &PayoutResult) -> Vec<LedgerRecord> {
    let timestamp = Utc::now().timestamp_millis();
    let row = |recipient: Recipient, amount: f64| LedgerRecord {
        transaction_id: transaction_id.to_string(),
        timestamp,
        recipient,
        amount,
    };

    let mut records = vec![row(Recipient::Seller, payout.seller_payout)];
    if payout.affiliate_commission > 0.0 {
        records.push(row(Recipient::Affiliate, payout.affiliate_commission));
    }
    if payout.referral_bonus > 0.0 {
        records.push(row(Recipient::Referrer, payout.referral_bonus));
    }
    records.push(row(Recipient::Platform, payout.platform_net));
    records.push(row(Recipient::Processor, payout.processor_fee));
    records
}

/// Append-only CSV writer for ledger rows. The file gains a header on first
/// write and is never rewritten afterward.
pub struct LedgerWriter {
    path: PathBuf,
}

impl LedgerWriter {
    const FILE_NAME: &'static str = "payout_ledger.csv";

    pub fn new(data_dir: &Path) -> Result<Self> {
        fs::create_dir_all(data_dir).with_context(|| {
            format!("Failed to create data directory {}", data_dir.display())
        })?;
        Ok(Self {
            path: data_dir.join(Self::FILE_NAME),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append a batch of records, returning how many were written. Rows with
    /// non-finite or negative amounts are skipped with a warning.
    pub fn append(&self, records: &[LedgerRecord]) -> Result<usize> {
        let file_has_data = self.path.exists()
            && fs::metadata(&self.path).map(|m| m.len() > 0).unwrap_or(false);

        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .append(true)
            .open(&self.path)
            .context("Failed to open ledger file")?;

        let mut writer = WriterBuilder::new()
            .has_headers(!file_has_data)
            .from_writer(file);

        let mut written = 0;
        for record in records {
            if !record.amount.is_finite() || record.amount < 0.0 {
                warn!(
                    transaction_id = %record.transaction_id,
                    recipient = %record.recipient,
                    amount = record.amount,
                    "skipping degenerate ledger row"
                );
                continue;
            }
            writer
                .serialize(record)
                .context("Failed to write ledger record")?;
            written += 1;
        }

        writer.flush().context("Failed to flush ledger writer")?;
        info!(written, path = %self.path.display(), "appended ledger batch");
        Ok(written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FeeSchedule;
    use crate::engine::{distribute, forward_price};
    use crate::types::{CommissionSpec, SaleContext};

    fn sample_payout() -> PayoutResult {
        let schedule = FeeSchedule::default();
        let commission = CommissionSpec::Percent(20.0);
        let price = forward_price(&schedule, 100.0, Some(&commission));
        let context = SaleContext {
            has_affiliate: true,
            has_affiliate_referrer: true,
            commission: Some(commission),
        };
        distribute(&schedule, price, 100.0, &context)
    }

    #[test]
    fn one_row_per_participating_recipient() {
        let payout = sample_payout();
        let records = ledger_records("tx-1", &payout);

        let recipients: Vec<Recipient> = records.iter().map(|r| r.recipient).collect();
        assert_eq!(
            recipients,
            vec![
                Recipient::Seller,
                Recipient::Affiliate,
                Recipient::Referrer,
                Recipient::Platform,
                Recipient::Processor
            ]
        );

        let total: f64 = records.iter().map(|r| r.amount).sum();
        let expected = payout.seller_payout
            + payout.affiliate_commission
            + payout.referral_bonus
            + payout.platform_net
            + payout.processor_fee;
        assert!((total - expected).abs() < 1e-9);
    }

    #[test]
    fn zero_amount_optional_recipients_are_omitted() {
        let schedule = FeeSchedule::default();
        let price = forward_price(&schedule, 50.0, None);
        let payout = distribute(&schedule, price, 50.0, &SaleContext::default());
        let records = ledger_records("tx-2", &payout);

        let recipients: Vec<Recipient> = records.iter().map(|r| r.recipient).collect();
        assert_eq!(
            recipients,
            vec![Recipient::Seller, Recipient::Platform, Recipient::Processor]
        );
    }

    #[test]
    fn append_writes_rows_and_skips_degenerate_amounts() {
        let dir = std::env::temp_dir().join(format!("feesplit-ledger-{}", Uuid::new_v4()));
        let writer = LedgerWriter::new(&dir).unwrap();

        let payout = sample_payout();
        let tx = new_transaction_id();
        let mut records = ledger_records(&tx, &payout);
        records.push(LedgerRecord {
            transaction_id: tx.clone(),
            timestamp: 0,
            recipient: Recipient::Platform,
            amount: f64::NAN,
        });

        let written = writer.append(&records).unwrap();
        assert_eq!(written, 5);

        let mut reader = csv::Reader::from_path(writer.path()).unwrap();
        let rows: Vec<LedgerRecord> = reader
            .deserialize()
            .collect::<std::result::Result<_, _>>()
            .unwrap();
        assert_eq!(rows.len(), 5);
        assert_eq!(rows[0].recipient, Recipient::Seller);
        assert_eq!(rows[0].transaction_id, tx);

        // A second batch appends without duplicating the header
        writer.append(&ledger_records(&tx, &payout)).unwrap();
        let mut reader = csv::Reader::from_path(writer.path()).unwrap();
        let rows: Vec<LedgerRecord> = reader
            .deserialize()
            .collect::<std::result::Result<_, _>>()
            .unwrap();
        assert_eq!(rows.len(), 10);

        fs::remove_dir_all(&dir).ok();
    }
}
