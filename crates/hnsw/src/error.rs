//! HNSW error types.

use proxima_core::CoreError;
use thiserror::Error;

/// HNSW-related errors.
#[derive(Error, Debug)]
pub enum HnswError {
    #[error("Invalid parameters: {0}")]
    InvalidParams(String),

    #[error("Index is empty")]
    EmptyIndex,

    #[error(transparent)]
    Core(#[from] CoreError),
}

pub type HnswResult<T> = Result<T, HnswError>;
