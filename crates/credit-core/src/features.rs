//! Per-wallet feature aggregation
//!
//! A single pass folds every normalized row into a running
//! [`WalletAccumulator`] keyed by wallet; derived ratios are finalized
//! afterwards.

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;

use crate::math::{safe_ratio, saturating_add};
use crate::models::{Action, NormalizedTransaction, WalletFeatures};

/// Running aggregate for one wallet.
#[derive(Debug, Clone, Default)]
pub struct WalletAccumulator {
    total_txns: u64,
    num_deposits: u64,
    num_borrows: u64,
    num_repays: u64,
    num_redeems: u64,
    num_liquidations: u64,
    total_deposit_amt: f64,
    total_borrow_amt: f64,
    total_repaid: f64,
    active_dates: BTreeSet<NaiveDate>,
    assets: BTreeSet<String>,
}

impl WalletAccumulator {
    pub fn push(&mut self, tx: &NormalizedTransaction) {
        self.total_txns += 1;

        match tx.kind() {
            Some(Action::Deposit) => {
                self.num_deposits += 1;
                self.total_deposit_amt = saturating_add(self.total_deposit_amt, tx.amount);
            }
            Some(Action::Borrow) => {
                self.num_borrows += 1;
                self.total_borrow_amt = saturating_add(self.total_borrow_amt, tx.amount);
            }
            Some(Action::Repay) => {
                self.num_repays += 1;
                self.total_repaid = saturating_add(self.total_repaid, tx.amount);
            }
            Some(Action::RedeemUnderlying) => self.num_redeems += 1,
            Some(Action::LiquidationCall) => self.num_liquidations += 1,
            None => {}
        }

        if let Some(date) = tx.date() {
            self.active_dates.insert(date);
        }
        if let Some(asset) = &tx.asset {
            self.assets.insert(asset.clone());
        }
    }

    pub fn finish(self, wallet: String) -> WalletFeatures {
        let active_days = self.active_dates.len() as u64;

        WalletFeatures {
            wallet,
            total_txns: self.total_txns,
            num_deposits: self.num_deposits,
            num_borrows: self.num_borrows,
            num_repays: self.num_repays,
            num_redeems: self.num_redeems,
            num_liquidations: self.num_liquidations,
            total_deposit_amt: self.total_deposit_amt,
            total_borrow_amt: self.total_borrow_amt,
            avg_deposit_amt: safe_ratio(self.total_deposit_amt, self.num_deposits as f64),
            avg_borrow_amt: safe_ratio(self.total_borrow_amt, self.num_borrows as f64),
            repay_borrow_ratio: safe_ratio(self.total_repaid, self.total_borrow_amt),
            active_days,
            txn_per_day: safe_ratio(self.total_txns as f64, active_days as f64),
            unique_assets: self.assets.len() as u64,
            borrow_deposit_ratio: safe_ratio(self.total_borrow_amt, self.total_deposit_amt),
        }
    }
}

/// Build one feature vector per distinct wallet, sorted by wallet.
///
/// Wallets are grouped by exact string equality. Rows without a wallet do
/// not belong to any group and are skipped.
pub fn aggregate(transactions: &[NormalizedTransaction]) -> Vec<WalletFeatures> {
    let mut wallets: BTreeMap<&str, WalletAccumulator> = BTreeMap::new();
    let mut orphaned = 0usize;

    for tx in transactions {
        match tx.wallet.as_deref() {
            Some(wallet) => wallets.entry(wallet).or_default().push(tx),
            None => orphaned += 1,
        }
    }

    if orphaned > 0 {
        tracing::debug!(orphaned, "Skipped transactions without a wallet");
    }

    wallets
        .into_iter()
        .map(|(wallet, acc)| acc.finish(wallet.to_string()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;

    fn make_tx(wallet: &str, action: &str, asset: Option<&str>, amount: f64, ts: Option<i64>) -> NormalizedTransaction {
        NormalizedTransaction {
            wallet: Some(wallet.to_string()),
            action: Some(action.to_string()),
            asset: asset.map(str::to_string),
            amount,
            timestamp: ts.and_then(|secs| DateTime::from_timestamp(secs, 0)),
        }
    }

    #[test]
    fn test_deposit_then_repay() {
        let txs = vec![
            make_tx("0xA", "deposit", Some("USDC"), 2.0, Some(0)),
            make_tx("0xA", "repay", Some("USDC"), 1.0, Some(86_400)),
        ];
        let features = aggregate(&txs);

        assert_eq!(features.len(), 1);
        let f = &features[0];
        assert_eq!(f.wallet, "0xA");
        assert_eq!(f.total_txns, 2);
        assert_eq!(f.num_deposits, 1);
        assert_eq!(f.num_repays, 1);
        assert_eq!(f.total_deposit_amt, 2.0);
        assert_eq!(f.total_borrow_amt, 0.0);
        assert_eq!(f.repay_borrow_ratio, 0.0);
        assert_eq!(f.borrow_deposit_ratio, 0.0);
        assert_eq!(f.active_days, 2);
        assert_eq!(f.txn_per_day, 1.0);
        assert_eq!(f.unique_assets, 1);
    }

    #[test]
    fn test_ratios_and_means() {
        let txs = vec![
            make_tx("0xB", "deposit", Some("WETH"), 10.0, Some(100)),
            make_tx("0xB", "deposit", Some("WETH"), 30.0, Some(200)),
            make_tx("0xB", "borrow", Some("USDC"), 8.0, Some(300)),
            make_tx("0xB", "repay", Some("USDC"), 6.0, Some(400)),
        ];
        let f = &aggregate(&txs)[0];

        assert_eq!(f.avg_deposit_amt, 20.0);
        assert_eq!(f.avg_borrow_amt, 8.0);
        assert_eq!(f.repay_borrow_ratio, 0.75);
        assert_eq!(f.borrow_deposit_ratio, 0.2);
        assert_eq!(f.active_days, 1);
        assert_eq!(f.txn_per_day, 4.0);
        assert_eq!(f.unique_assets, 2);
    }

    #[test]
    fn test_huge_volumes_stay_finite() {
        let txs = vec![
            make_tx("0xA", "deposit", Some("FOO"), 1e308, Some(0)),
            make_tx("0xA", "deposit", Some("FOO"), 1e308, Some(0)),
            make_tx("0xA", "borrow", Some("FOO"), 1e308, Some(0)),
            make_tx("0xA", "borrow", Some("FOO"), 1e308, Some(0)),
        ];
        let f = &aggregate(&txs)[0];

        assert_eq!(f.total_deposit_amt, f64::MAX);
        assert_eq!(f.total_borrow_amt, f64::MAX);
        assert!(f.avg_deposit_amt.is_finite());
        assert_eq!(f.borrow_deposit_ratio, 1.0);
    }

    #[test]
    fn test_borrow_without_deposit() {
        let txs = vec![make_tx("0xC", "borrow", Some("DAI"), 5.0, Some(0))];
        let f = &aggregate(&txs)[0];

        assert_eq!(f.borrow_deposit_ratio, 0.0);
        assert_eq!(f.avg_deposit_amt, 0.0);
        assert_eq!(f.repay_borrow_ratio, 0.0);
    }

    #[test]
    fn test_action_buckets_are_literal() {
        let txs = vec![
            make_tx("0xD", "Deposit", Some("USDC"), 1.0, Some(0)),
            make_tx("0xD", "redeemunderlying", Some("USDC"), 1.0, Some(0)),
            make_tx("0xD", "liquidationcall", Some("USDC"), 1.0, Some(0)),
            make_tx("0xD", "flashloan", Some("USDC"), 1.0, Some(0)),
        ];
        let f = &aggregate(&txs)[0];

        assert_eq!(f.total_txns, 4);
        assert_eq!(f.num_deposits, 0);
        assert_eq!(f.total_deposit_amt, 0.0);
        assert_eq!(f.num_redeems, 1);
        assert_eq!(f.num_liquidations, 1);
    }

    #[test]
    fn test_null_timestamps_do_not_advance_active_days() {
        let txs = vec![
            make_tx("0xE", "deposit", None, 1.0, None),
            make_tx("0xE", "deposit", None, 1.0, None),
        ];
        let f = &aggregate(&txs)[0];

        assert_eq!(f.total_txns, 2);
        assert_eq!(f.active_days, 0);
        assert_eq!(f.txn_per_day, 0.0);
        assert_eq!(f.unique_assets, 0);
    }

    #[test]
    fn test_one_row_per_wallet() {
        let mut orphan = make_tx("0xA", "deposit", None, 1.0, Some(0));
        orphan.wallet = None;
        let txs = vec![
            make_tx("0xb", "deposit", None, 1.0, Some(0)),
            make_tx("0xB", "deposit", None, 1.0, Some(0)),
            make_tx("0xb", "borrow", None, 1.0, Some(0)),
            orphan,
        ];
        let features = aggregate(&txs);

        let wallets: Vec<_> = features.iter().map(|f| f.wallet.as_str()).collect();
        assert_eq!(wallets, vec!["0xB", "0xb"]);
        assert_eq!(features[1].total_txns, 2);
    }
}
