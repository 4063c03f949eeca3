//! Sparse vector builder

use super::{FeatureBuilder, FeatureSink};

/// A sparse feature vector: the total dimension plus `(index, value)` pairs
/// for the cells that were actually emitted, in emission order.
#[derive(Debug, Clone, PartialEq)]
pub struct SparseEntries {
    pub dimension: usize,
    pub entries: Vec<(usize, f64)>,
}

/// Builds a [`SparseEntries`]; skipped cells advance the position without
/// occupying storage.
#[derive(Debug, Clone, Default)]
pub struct SparseVector {
    dimension: usize,
    position: usize,
    entries: Vec<(usize, f64)>,
}

impl SparseVector {
    pub fn new() -> Self {
        Self::default()
    }
}

impl FeatureSink for SparseVector {
    fn add(&mut self, _name: &str, value: f64) {
        self.entries.push((self.position, value));
        self.position += 1;
    }

    fn skip(&mut self) {
        self.position += 1;
    }

    fn skip_n(&mut self, n: usize) {
        self.position += n;
    }
}

impl FeatureBuilder for SparseVector {
    type Output = SparseEntries;

    fn init(&mut self, dimension: usize) {
        self.dimension = dimension;
        self.position = 0;
        self.entries.clear();
    }

    fn build(&mut self) -> SparseEntries {
        debug_assert_eq!(
            self.position, self.dimension,
            "emitted cell count disagrees with the init dimension"
        );
        SparseEntries {
            dimension: self.dimension,
            entries: std::mem::take(&mut self.entries),
        }
    }

    fn fresh(&self) -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sparse_positions() {
        let mut b = SparseVector::new();
        b.init(5);
        b.add("a", 1.0);
        b.skip_n(2);
        b.add("b", 3.0);
        b.skip();
        let out = b.build();
        assert_eq!(out.dimension, 5);
        assert_eq!(out.entries, vec![(0, 1.0), (3, 3.0)]);
    }
}
