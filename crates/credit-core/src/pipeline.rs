//! End-to-end scoring pipeline
//!
//! raw records → normalizer → aggregator → scorer. Each run is a stateless
//! full-batch recomputation.

use crate::error::ScoreResult;
use crate::features::aggregate;
use crate::models::{RawTransaction, ScoredWallet, WalletFeatures};
use crate::normalizer::normalize;
use crate::scoring::{score_wallets, ScoreWeights};
use crate::tokens::TokenDecimals;

/// Everything one run produces, one entry per wallet in both vectors.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineOutput {
    pub features: Vec<WalletFeatures>,
    pub scores: Vec<ScoredWallet>,
}

#[derive(Debug, Clone, Default)]
pub struct ScoringPipeline {
    pub decimals: TokenDecimals,
    pub weights: ScoreWeights,
}

impl ScoringPipeline {
    pub fn new(decimals: TokenDecimals, weights: ScoreWeights) -> Self {
        Self { decimals, weights }
    }

    pub fn run(&self, raw: &[RawTransaction]) -> ScoreResult<PipelineOutput> {
        tracing::info!(records = raw.len(), "Normalizing transactions");
        let transactions = normalize(raw, &self.decimals)?;

        tracing::info!("Engineering features");
        let features = aggregate(&transactions);

        tracing::info!(wallets = features.len(), "Calculating scores");
        let scores = score_wallets(&features, &self.weights);

        Ok(PipelineOutput { features, scores })
    }
}
