//! Core vector and dataset primitives for the proxima k-NN indexes.
//!
//! Every index in the workspace speaks in terms of two types defined here:
//! [`Vector`], a dense `f64` vector with the arithmetic the search
//! traversals need, and [`Dataset`], an ordered collection of vectors whose
//! positions serve as stable point identities.

pub mod dataset;
pub mod error;
pub mod vector;

pub use dataset::Dataset;
pub use error::{CoreError, CoreResult};
pub use vector::Vector;
