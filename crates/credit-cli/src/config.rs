//! Configuration management for the scoring CLI

use std::path::Path;

use config::{Config, ConfigError, Environment, File};
use credit_core::{ScoreWeights, ScoringPipeline, TokenDecimals};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub scoring: ScoringConfig,
    /// Token decimals table; replaces the built-in table when set
    #[serde(default = "default_tokens")]
    pub tokens: Vec<TokenConfig>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScoringConfig {
    #[serde(default)]
    pub weights: ScoreWeights,
}

/// One entry of the decimals table. Kept as a list so tickers keep their case.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TokenConfig {
    pub symbol: String,
    pub decimals: u32,
}

fn default_tokens() -> Vec<TokenConfig> {
    [("USDC", 6), ("WMATIC", 18), ("WETH", 18), ("DAI", 18), ("USDT", 6)]
        .into_iter()
        .map(|(symbol, decimals)| TokenConfig {
            symbol: symbol.to_string(),
            decimals,
        })
        .collect()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            scoring: ScoringConfig::default(),
            tokens: default_tokens(),
        }
    }
}

impl AppConfig {
    /// Defaults, then `credit-score.{toml,yaml,json}` (or an explicit
    /// required file), then `CREDIT_SCORE__*` environment variables.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let weights = ScoreWeights::default();

        let builder = Config::builder()
            .set_default("scoring.weights.deposit_volume", weights.deposit_volume)?
            .set_default("scoring.weights.repay_ratio", weights.repay_ratio)?
            .set_default("scoring.weights.active_days", weights.active_days)?
            .set_default("scoring.weights.asset_diversity", weights.asset_diversity)?
            .set_default("scoring.weights.repay_count", weights.repay_count)?
            .set_default("scoring.weights.liquidation_penalty", weights.liquidation_penalty)?
            .set_default("scoring.weights.leverage_penalty", weights.leverage_penalty)?;

        let builder = match path {
            Some(path) => builder.add_source(File::from(path).required(true)),
            None => builder.add_source(File::with_name("credit-score").required(false)),
        };

        let config = builder
            // CREDIT_SCORE__SCORING__WEIGHTS__DEPOSIT_VOLUME, etc.
            .add_source(
                Environment::with_prefix("CREDIT_SCORE")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }

    pub fn token_decimals(&self) -> TokenDecimals {
        self.tokens
            .iter()
            .map(|token| (token.symbol.clone(), token.decimals))
            .collect()
    }

    pub fn pipeline(&self) -> ScoringPipeline {
        ScoringPipeline::new(self.token_decimals(), self.scoring.weights.clone())
    }
}
