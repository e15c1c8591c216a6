//! Tree index error types.

use proxima_core::CoreError;
use thiserror::Error;

/// Errors from tree index construction and search.
#[derive(Error, Debug)]
pub enum TreeError {
    #[error("Invalid parameters: {0}")]
    InvalidParams(String),

    #[error("Index has not been built")]
    NotBuilt,

    #[error(transparent)]
    Core(#[from] CoreError),
}

pub type TreeResult<T> = Result<T, TreeError>;
