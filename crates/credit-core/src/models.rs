//! Data models for the scoring pipeline
//!
//! Raw protocol exports come in as [`RawTransaction`], get flattened into
//! [`NormalizedTransaction`] rows, fold into one [`WalletFeatures`] per
//! wallet and leave as [`ScoredWallet`].

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};

// =============================================================================
// Raw Input
// =============================================================================

/// One transaction record as exported from the lending protocol.
///
/// Every field is optional: exports are heterogeneous and missing data is
/// handled by the normalizer, not by deserialization. Unknown fields such as
/// `txHash`, `network` or `blockNumber` are ignored, and text fields of the
/// wrong JSON type are coerced rather than rejected.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawTransaction {
    /// Wallet address (exported as `userWallet`)
    #[serde(default, deserialize_with = "lenient_text")]
    pub user_wallet: Option<String>,

    /// Protocol action, e.g. "deposit" or "liquidationcall"
    #[serde(default, deserialize_with = "lenient_text")]
    pub action: Option<String>,

    /// Action-specific payload
    #[serde(default)]
    pub action_data: Option<ActionData>,

    /// Unix epoch seconds
    #[serde(default)]
    pub timestamp: Option<RawNumber>,
}

/// Action-specific payload of a [`RawTransaction`].
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionData {
    /// Token ticker (e.g. "USDC", "WMATIC")
    #[serde(default, deserialize_with = "lenient_text")]
    pub asset_symbol: Option<String>,

    /// Amount in the token's smallest unit
    #[serde(default)]
    pub amount: Option<RawNumber>,
}

/// Strings pass through, numbers keep their JSON text, anything else is
/// treated as absent.
fn lenient_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::String(s)) => Some(s),
        Some(serde_json::Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

/// A numeric field that exports encode either as a JSON number or a string.
///
/// Anything else is kept as `Other` so a single odd record can be coerced
/// instead of failing the whole batch.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RawNumber {
    Number(f64),
    Text(String),
    Other(serde_json::Value),
}

impl RawNumber {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            RawNumber::Number(n) => Some(*n),
            RawNumber::Text(s) => s.trim().parse::<f64>().ok(),
            RawNumber::Other(_) => None,
        }
    }
}

impl From<f64> for RawNumber {
    fn from(value: f64) -> Self {
        RawNumber::Number(value)
    }
}

impl From<&str> for RawNumber {
    fn from(value: &str) -> Self {
        RawNumber::Text(value.to_string())
    }
}

// =============================================================================
// Normalized Rows
// =============================================================================

/// A flat, typed transaction row with decimal-corrected amount.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedTransaction {
    pub wallet: Option<String>,
    pub action: Option<String>,
    /// Asset ticker, `None` when the record carried none
    pub asset: Option<String>,
    /// Human-scale amount, always finite and non-negative
    pub amount: f64,
    /// `None` when the raw timestamp was missing or malformed
    pub timestamp: Option<DateTime<Utc>>,
}

impl NormalizedTransaction {
    pub fn kind(&self) -> Option<Action> {
        self.action.as_deref().and_then(Action::from_wire)
    }

    /// Calendar date (UTC) of the transaction, if the timestamp decoded.
    pub fn date(&self) -> Option<NaiveDate> {
        self.timestamp.map(|ts| ts.date_naive())
    }
}

/// The lending-protocol actions that feed named feature buckets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Deposit,
    Borrow,
    Repay,
    RedeemUnderlying,
    LiquidationCall,
}

impl Action {
    /// Parse the exact wire string. No case folding, no synonyms.
    pub fn from_wire(s: &str) -> Option<Self> {
        match s {
            "deposit" => Some(Action::Deposit),
            "borrow" => Some(Action::Borrow),
            "repay" => Some(Action::Repay),
            "redeemunderlying" => Some(Action::RedeemUnderlying),
            "liquidationcall" => Some(Action::LiquidationCall),
            _ => None,
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Deposit => write!(f, "deposit"),
            Action::Borrow => write!(f, "borrow"),
            Action::Repay => write!(f, "repay"),
            Action::RedeemUnderlying => write!(f, "redeemunderlying"),
            Action::LiquidationCall => write!(f, "liquidationcall"),
        }
    }
}

// =============================================================================
// Wallet Features & Scores
// =============================================================================

/// Behavioral statistics for one wallet, computed once per batch.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WalletFeatures {
    pub wallet: String,

    // Counts
    pub total_txns: u64,
    pub num_deposits: u64,
    pub num_borrows: u64,
    pub num_repays: u64,
    pub num_redeems: u64,
    pub num_liquidations: u64,

    // Volumes
    pub total_deposit_amt: f64,
    pub total_borrow_amt: f64,
    pub avg_deposit_amt: f64,
    pub avg_borrow_amt: f64,

    /// Repaid volume over borrowed volume, 0 when nothing was borrowed
    pub repay_borrow_ratio: f64,

    /// Distinct UTC calendar dates with activity
    pub active_days: u64,
    pub txn_per_day: f64,

    /// Distinct asset tickers touched
    pub unique_assets: u64,

    /// Borrowed volume over deposited volume, 0 when nothing was deposited
    pub borrow_deposit_ratio: f64,
}

/// Final output row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredWallet {
    pub wallet: String,
    /// Score in `[0, 1000]`, rounded to two decimals
    pub score: f64,
}
