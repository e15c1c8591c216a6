//! Ordered collections of vectors and the CSV loader that produces them.

use crate::error::{CoreError, CoreResult};
use crate::vector::Vector;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::ops::Index;
use std::path::Path;

/// An ordered collection of vectors.
///
/// A vector's position in the dataset is its stable identity inside any
/// index built from it. Rows loaded from a CSV may be ragged; the indexes
/// call [`check_uniform`](Dataset::check_uniform) at build time and reject
/// mixed dimensions.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    vectors: Vec<Vector>,
}

impl Dataset {
    /// Create an empty dataset.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a dataset from a list of vectors.
    pub fn from_vectors(vectors: Vec<Vector>) -> Self {
        Self { vectors }
    }

    /// Load a dataset from a CSV file.
    ///
    /// The first line is a header and skipped. Every following non-empty
    /// line becomes one vector: fields are comma-separated, each field is
    /// parsed as `f64`, and non-numeric fields are silently dropped. A row
    /// is kept as long as at least one numeric field survives.
    pub fn from_csv_path(path: impl AsRef<Path>) -> CoreResult<Self> {
        let file = File::open(path.as_ref())?;
        let reader = BufReader::new(file);

        let mut vectors = Vec::new();
        for (line_num, line) in reader.lines().enumerate() {
            let line = line?;
            // First line is the header.
            if line_num == 0 {
                continue;
            }
            if line.trim().is_empty() {
                continue;
            }

            let mut row = Vector::default();
            for token in line.split(',') {
                if let Ok(value) = token.trim().parse::<f64>() {
                    row.push(value);
                }
            }
            if !row.is_empty() {
                vectors.push(row);
            }
        }

        tracing::info!(
            "parsed {} vectors with dimension {}",
            vectors.len(),
            vectors.first().map_or(0, Vector::len)
        );

        Ok(Self { vectors })
    }

    /// Number of vectors.
    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    /// True if the dataset holds no vectors.
    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }

    /// Get a vector by position.
    pub fn get(&self, index: usize) -> Option<&Vector> {
        self.vectors.get(index)
    }

    /// View the vectors as a slice.
    pub fn vectors(&self) -> &[Vector] {
        &self.vectors
    }

    /// Consume the dataset, returning its vectors.
    pub fn into_vectors(self) -> Vec<Vector> {
        self.vectors
    }

    /// Iterate over the vectors.
    pub fn iter(&self) -> std::slice::Iter<'_, Vector> {
        self.vectors.iter()
    }

    /// Append a vector.
    pub fn push(&mut self, vector: Vector) {
        self.vectors.push(vector);
    }

    /// Dimension of the first vector, if any.
    pub fn dim(&self) -> Option<usize> {
        self.vectors.first().map(Vector::len)
    }

    /// Verify that every vector shares one dimension, returning it.
    ///
    /// This is the build-time entry check for all indexes: an empty dataset
    /// is [`CoreError::EmptyDataset`], a ragged one is
    /// [`CoreError::DimensionMismatch`].
    pub fn check_uniform(&self) -> CoreResult<usize> {
        let expected = self.dim().ok_or(CoreError::EmptyDataset)?;
        for vector in &self.vectors {
            if vector.len() != expected {
                return Err(CoreError::DimensionMismatch {
                    expected,
                    got: vector.len(),
                });
            }
        }
        Ok(expected)
    }
}

impl Index<usize> for Dataset {
    type Output = Vector;

    fn index(&self, index: usize) -> &Vector {
        &self.vectors[index]
    }
}

impl FromIterator<Vector> for Dataset {
    fn from_iter<I: IntoIterator<Item = Vector>>(iter: I) -> Self {
        Self {
            vectors: iter.into_iter().collect(),
        }
    }
}
