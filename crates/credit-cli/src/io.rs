//! Load/save boundary: JSON transaction exports in, CSV tables out.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use credit_core::{RawTransaction, ScoredWallet};
use serde::Serialize;

use crate::error::AppResult;

/// Read a JSON array of raw transaction records.
pub fn load_transactions(path: &Path) -> AppResult<Vec<RawTransaction>> {
    let reader = BufReader::new(File::open(path)?);
    let records: Vec<RawTransaction> = serde_json::from_reader(reader)?;
    tracing::debug!(path = %path.display(), records = records.len(), "Loaded transactions");
    Ok(records)
}

/// Write rows as CSV with a header derived from the row's field names.
pub fn write_csv<T: Serialize>(path: &Path, rows: &[T]) -> AppResult<()> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(true)
        .from_path(path)?;

    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;

    tracing::debug!(path = %path.display(), rows = rows.len(), "Wrote CSV");
    Ok(())
}

/// Score table row as written to disk: scores always carry two decimals.
#[derive(Serialize)]
struct ScoreRow<'a> {
    wallet: &'a str,
    score: String,
}

/// Write the `wallet,score` table.
pub fn write_scores(path: &Path, scores: &[ScoredWallet]) -> AppResult<()> {
    let rows: Vec<ScoreRow<'_>> = scores
        .iter()
        .map(|s| ScoreRow {
            wallet: &s.wallet,
            score: format!("{:.2}", s.score),
        })
        .collect();
    write_csv(path, &rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use credit_core::WalletFeatures;
    use crate::error::AppError;

    #[test]
    fn test_load_transactions() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("txns.json");
        std::fs::write(
            &path,
            r#"[{"userWallet": "0xA", "action": "deposit", "timestamp": 1629178166,
                 "actionData": {"assetSymbol": "USDC", "amount": "1000000"}}]"#,
        )
        .unwrap();

        let records = load_transactions(&path).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].user_wallet.as_deref(), Some("0xA"));
    }

    #[test]
    fn test_load_rejects_non_array() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("txns.json");
        std::fs::write(&path, r#"{"userWallet": "0xA"}"#).unwrap();

        assert!(matches!(load_transactions(&path), Err(AppError::Json(_))));
    }

    #[test]
    fn test_write_scores() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scores.csv");
        let scores = vec![
            ScoredWallet { wallet: "0xA".to_string(), score: 400.0 },
            ScoredWallet { wallet: "0xB".to_string(), score: 12.5 },
        ];

        write_scores(&path, &scores).unwrap();
        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(written, "wallet,score\n0xA,400.00\n0xB,12.50\n");
    }

    #[test]
    fn test_write_features_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("features.csv");
        let features = vec![WalletFeatures {
            wallet: "0xA".to_string(),
            total_txns: 2,
            num_deposits: 1,
            num_borrows: 0,
            num_repays: 1,
            num_redeems: 0,
            num_liquidations: 0,
            total_deposit_amt: 2.0,
            total_borrow_amt: 0.0,
            avg_deposit_amt: 2.0,
            avg_borrow_amt: 0.0,
            repay_borrow_ratio: 0.0,
            active_days: 2,
            txn_per_day: 1.0,
            unique_assets: 1,
            borrow_deposit_ratio: 0.0,
        }];

        write_csv(&path, &features).unwrap();
        let written = std::fs::read_to_string(&path).unwrap();
        let header = written.lines().next().unwrap();
        assert!(header.starts_with("wallet,total_txns,num_deposits"));
        assert!(header.ends_with("unique_assets,borrow_deposit_ratio"));
        assert_eq!(written.lines().count(), 2);
    }
}
