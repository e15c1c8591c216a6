//! Shared error kinds.

use thiserror::Error;

/// Errors produced by the core types and surfaced through the index crates.
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },

    #[error("Dataset is empty")]
    EmptyDataset,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type CoreResult<T> = Result<T, CoreError>;
