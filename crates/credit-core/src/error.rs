//! Error types for Credit Core

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScoreError {
    /// One or more canonical columns never appeared anywhere in the batch.
    #[error("Missing columns in input data: {}", .0.join(", "))]
    MissingColumns(Vec<String>),
}

pub type ScoreResult<T> = Result<T, ScoreError>;
