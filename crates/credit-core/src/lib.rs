//! # Credit Core
//!
//! Behavioral credit scoring for lending-protocol wallets.
//!
//! Raw protocol events (deposits, borrows, repayments, redemptions and
//! liquidations) are normalized into a flat typed table, folded into one
//! feature vector per wallet, and combined into a bounded score in
//! `[0, 1000]` relative to the rest of the batch.

pub mod error;
pub mod features;
pub mod math;
pub mod models;
pub mod normalizer;
pub mod pipeline;
pub mod scoring;
pub mod tokens;

pub use error::*;
pub use features::{aggregate, WalletAccumulator};
pub use models::*;
pub use normalizer::normalize;
pub use pipeline::{PipelineOutput, ScoringPipeline};
pub use scoring::{score_wallets, FeatureColumn, NormalizedFeatures, ScoreWeights};
pub use tokens::TokenDecimals;
