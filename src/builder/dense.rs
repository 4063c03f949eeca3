//! Dense vector builders

use super::{FeatureBuilder, FeatureSink};

/// Builds a dense `Vec<f64>`, materializing skipped cells as a fill value.
#[derive(Debug, Clone)]
pub struct DenseVector {
    fill: f64,
    values: Vec<f64>,
}

impl DenseVector {
    /// Create a builder whose skipped cells become `0.0`.
    pub fn new() -> Self {
        Self::with_fill(0.0)
    }

    /// Create a builder whose skipped cells become `fill`.
    pub fn with_fill(fill: f64) -> Self {
        DenseVector {
            fill,
            values: Vec::new(),
        }
    }
}

impl Default for DenseVector {
    fn default() -> Self {
        Self::new()
    }
}

impl FeatureSink for DenseVector {
    fn add(&mut self, _name: &str, value: f64) {
        self.values.push(value);
    }

    fn skip(&mut self) {
        self.values.push(self.fill);
    }
}

impl FeatureBuilder for DenseVector {
    type Output = Vec<f64>;

    fn init(&mut self, dimension: usize) {
        self.values.clear();
        self.values.reserve(dimension);
    }

    fn build(&mut self) -> Vec<f64> {
        std::mem::take(&mut self.values)
    }

    fn fresh(&self) -> Self {
        Self::with_fill(self.fill)
    }
}

/// Builds a `Vec<Option<f64>>`, keeping skipped cells observable as `None`.
#[derive(Debug, Clone, Default)]
pub struct DenseOptionVector {
    values: Vec<Option<f64>>,
}

impl DenseOptionVector {
    pub fn new() -> Self {
        Self::default()
    }
}

impl FeatureSink for DenseOptionVector {
    fn add(&mut self, _name: &str, value: f64) {
        self.values.push(Some(value));
    }

    fn skip(&mut self) {
        self.values.push(None);
    }
}

impl FeatureBuilder for DenseOptionVector {
    type Output = Vec<Option<f64>>;

    fn init(&mut self, dimension: usize) {
        self.values.clear();
        self.values.reserve(dimension);
    }

    fn build(&mut self) -> Vec<Option<f64>> {
        std::mem::take(&mut self.values)
    }

    fn fresh(&self) -> Self {
        Self::new()
    }
}
