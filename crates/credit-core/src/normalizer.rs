//! Record normalizer
//!
//! Flattens raw protocol records into [`NormalizedTransaction`] rows,
//! correcting token amounts for decimals and coercing malformed fields
//! instead of failing the batch.

use chrono::{DateTime, Utc};

use crate::error::{ScoreError, ScoreResult};
use crate::models::{NormalizedTransaction, RawNumber, RawTransaction};
use crate::tokens::TokenDecimals;

/// Columns every batch must populate at least once.
pub const REQUIRED_COLUMNS: [&str; 5] = ["wallet", "action", "amount", "asset", "timestamp"];

/// Normalize a batch of raw records, preserving length and order.
///
/// Fails only when one of [`REQUIRED_COLUMNS`] is absent from every record
/// of the batch. An empty batch is missing all of them.
pub fn normalize(
    raw: &[RawTransaction],
    decimals: &TokenDecimals,
) -> ScoreResult<Vec<NormalizedTransaction>> {
    let mut presence = ColumnPresence::default();

    let rows: Vec<NormalizedTransaction> = raw
        .iter()
        .map(|record| {
            presence.observe(record);
            normalize_record(record, decimals)
        })
        .collect();

    let missing = presence.missing();
    if !missing.is_empty() {
        tracing::warn!(missing = ?missing, records = raw.len(), "Batch is missing required columns");
        return Err(ScoreError::MissingColumns(missing));
    }

    Ok(rows)
}

fn normalize_record(record: &RawTransaction, decimals: &TokenDecimals) -> NormalizedTransaction {
    let data = record.action_data.as_ref();
    let asset = data.and_then(|d| d.asset_symbol.clone());
    let raw_amount = data
        .and_then(|d| d.amount.as_ref())
        .map(coerce_amount)
        .unwrap_or(0.0);

    NormalizedTransaction {
        wallet: record.user_wallet.clone(),
        action: record.action.clone(),
        amount: decimals.scale(raw_amount, asset.as_deref()),
        asset,
        timestamp: record.timestamp.as_ref().and_then(coerce_timestamp),
    }
}

fn coerce_amount(raw: &RawNumber) -> f64 {
    match raw.as_f64() {
        Some(amount) if amount.is_finite() && amount >= 0.0 => amount,
        _ => {
            tracing::warn!(amount = ?raw, "Unusable amount, treating as zero");
            0.0
        }
    }
}

/// Epoch seconds to a UTC instant; `None` for anything that does not decode.
fn coerce_timestamp(raw: &RawNumber) -> Option<DateTime<Utc>> {
    let decoded = raw.as_f64().filter(|s| s.is_finite()).and_then(|secs| {
        let whole = secs.floor();
        if whole < i64::MIN as f64 || whole > i64::MAX as f64 {
            return None;
        }
        let nanos = (((secs - whole) * 1e9).round() as u32).min(999_999_999);
        DateTime::from_timestamp(whole as i64, nanos)
    });

    if decoded.is_none() {
        tracing::debug!(timestamp = ?raw, "Malformed timestamp, coercing to null");
    }
    decoded
}

/// Tracks which canonical columns the batch populated at least once.
#[derive(Debug, Default)]
struct ColumnPresence {
    wallet: bool,
    action: bool,
    timestamp: bool,
    // amount and asset are written for every record
    rows: bool,
}

impl ColumnPresence {
    fn observe(&mut self, record: &RawTransaction) {
        self.rows = true;
        self.wallet |= record.user_wallet.is_some();
        self.action |= record.action.is_some();
        self.timestamp |= record.timestamp.is_some();
    }

    fn missing(&self) -> Vec<String> {
        REQUIRED_COLUMNS
            .iter()
            .filter(|column| match **column {
                "wallet" => !self.wallet,
                "action" => !self.action,
                "timestamp" => !self.timestamp,
                _ => !self.rows,
            })
            .map(|column| column.to_string())
            .collect()
    }
}
