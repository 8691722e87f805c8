//! Batch-relative wallet scoring
//!
//! Every feature is min-max scaled against the whole batch, so a score
//! ranks a wallet within its snapshot and is not comparable across runs.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::math::{robust_minmax, round_dp2};
use crate::models::{ScoredWallet, WalletFeatures};

/// Upper bound of the score scale.
pub const MAX_SCORE: f64 = 1000.0;

/// Feature columns that take part in batch normalization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FeatureColumn {
    TotalTxns,
    NumDeposits,
    NumBorrows,
    NumRepays,
    NumRedeems,
    NumLiquidations,
    TotalDepositAmt,
    TotalBorrowAmt,
    RepayBorrowRatio,
    ActiveDays,
    TxnPerDay,
    UniqueAssets,
    BorrowDepositRatio,
}

impl FeatureColumn {
    pub const ALL: [FeatureColumn; 13] = [
        FeatureColumn::TotalTxns,
        FeatureColumn::NumDeposits,
        FeatureColumn::NumBorrows,
        FeatureColumn::NumRepays,
        FeatureColumn::NumRedeems,
        FeatureColumn::NumLiquidations,
        FeatureColumn::TotalDepositAmt,
        FeatureColumn::TotalBorrowAmt,
        FeatureColumn::RepayBorrowRatio,
        FeatureColumn::ActiveDays,
        FeatureColumn::TxnPerDay,
        FeatureColumn::UniqueAssets,
        FeatureColumn::BorrowDepositRatio,
    ];

    pub fn value(&self, f: &WalletFeatures) -> f64 {
        match self {
            FeatureColumn::TotalTxns => f.total_txns as f64,
            FeatureColumn::NumDeposits => f.num_deposits as f64,
            FeatureColumn::NumBorrows => f.num_borrows as f64,
            FeatureColumn::NumRepays => f.num_repays as f64,
            FeatureColumn::NumRedeems => f.num_redeems as f64,
            FeatureColumn::NumLiquidations => f.num_liquidations as f64,
            FeatureColumn::TotalDepositAmt => f.total_deposit_amt,
            FeatureColumn::TotalBorrowAmt => f.total_borrow_amt,
            FeatureColumn::RepayBorrowRatio => f.repay_borrow_ratio,
            FeatureColumn::ActiveDays => f.active_days as f64,
            FeatureColumn::TxnPerDay => f.txn_per_day,
            FeatureColumn::UniqueAssets => f.unique_assets as f64,
            FeatureColumn::BorrowDepositRatio => f.borrow_deposit_ratio,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            FeatureColumn::TotalTxns => "total_txns",
            FeatureColumn::NumDeposits => "num_deposits",
            FeatureColumn::NumBorrows => "num_borrows",
            FeatureColumn::NumRepays => "num_repays",
            FeatureColumn::NumRedeems => "num_redeems",
            FeatureColumn::NumLiquidations => "num_liquidations",
            FeatureColumn::TotalDepositAmt => "total_deposit_amt",
            FeatureColumn::TotalBorrowAmt => "total_borrow_amt",
            FeatureColumn::RepayBorrowRatio => "repay_borrow_ratio",
            FeatureColumn::ActiveDays => "active_days",
            FeatureColumn::TxnPerDay => "txn_per_day",
            FeatureColumn::UniqueAssets => "unique_assets",
            FeatureColumn::BorrowDepositRatio => "borrow_deposit_ratio",
        }
    }
}

/// Per-column normalized values, indexed like the feature slice they came from.
#[derive(Debug, Clone)]
pub struct NormalizedFeatures {
    columns: HashMap<FeatureColumn, Vec<f64>>,
}

impl NormalizedFeatures {
    pub fn from_features(features: &[WalletFeatures]) -> Self {
        let columns = FeatureColumn::ALL
            .iter()
            .map(|column| {
                let raw: Vec<f64> = features.iter().map(|f| column.value(f)).collect();
                (*column, robust_minmax(&raw))
            })
            .collect();

        Self { columns }
    }

    pub fn column(&self, column: FeatureColumn) -> &[f64] {
        self.columns.get(&column).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn get(&self, column: FeatureColumn, index: usize) -> f64 {
        self.column(column).get(index).copied().unwrap_or_default()
    }
}

/// Linear weights of the score formula.
///
/// Rewards and penalties are both positive numbers; penalties are
/// subtracted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreWeights {
    pub deposit_volume: f64,
    pub repay_ratio: f64,
    pub active_days: f64,
    pub asset_diversity: f64,
    pub repay_count: f64,
    pub liquidation_penalty: f64,
    pub leverage_penalty: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            deposit_volume: 0.30,
            repay_ratio: 0.25,
            active_days: 0.15,
            asset_diversity: 0.10,
            repay_count: 0.10,
            liquidation_penalty: 0.05,
            leverage_penalty: 0.05,
        }
    }
}

impl ScoreWeights {
    /// Weighted sum for the wallet at `index`, before scaling.
    pub fn raw_score(&self, norm: &NormalizedFeatures, index: usize) -> f64 {
        self.deposit_volume * norm.get(FeatureColumn::TotalDepositAmt, index)
            + self.repay_ratio * norm.get(FeatureColumn::RepayBorrowRatio, index)
            + self.active_days * norm.get(FeatureColumn::ActiveDays, index)
            + self.asset_diversity * norm.get(FeatureColumn::UniqueAssets, index)
            + self.repay_count * norm.get(FeatureColumn::NumRepays, index)
            - self.liquidation_penalty * norm.get(FeatureColumn::NumLiquidations, index)
            - self.leverage_penalty * norm.get(FeatureColumn::BorrowDepositRatio, index)
    }
}

/// Score every wallet in the batch. Output order follows `features`.
pub fn score_wallets(features: &[WalletFeatures], weights: &ScoreWeights) -> Vec<ScoredWallet> {
    let norm = NormalizedFeatures::from_features(features);

    features
        .iter()
        .enumerate()
        .map(|(index, f)| {
            let raw = weights.raw_score(&norm, index);
            let raw = if raw.is_finite() { raw } else { 0.0 };
            let score = round_dp2((raw * MAX_SCORE).clamp(0.0, MAX_SCORE));
            tracing::trace!(wallet = %f.wallet, raw, score, "Scored wallet");

            ScoredWallet {
                wallet: f.wallet.clone(),
                score,
            }
        })
        .collect()
}
