//! Stateless threshold and bucket transformers

use std::collections::BTreeMap;

use super::Transformer;
use crate::builder::FeatureSink;
use crate::core::error::Result;

/// Thresholds a scalar: emits `1.0` when `x > threshold`, else `0.0`.
#[derive(Debug, Clone)]
pub struct Binarizer {
    name: String,
    threshold: f64,
}

impl Binarizer {
    pub fn new(name: impl Into<String>, threshold: f64) -> Self {
        Binarizer {
            name: name.into(),
            threshold,
        }
    }
}

impl Transformer for Binarizer {
    type Input = f64;
    type State = ();
    type Summary = ();

    fn name(&self) -> &str {
        &self.name
    }

    fn prepare(&self, _input: &f64) {}

    fn combine(&self, _lhs: (), _rhs: ()) {}

    fn present(&self, _state: ()) -> Result<()> {
        Ok(())
    }

    fn feature_dimension(&self, _summary: &()) -> usize {
        1
    }

    fn feature_names(&self, _summary: &()) -> Vec<String> {
        vec![self.name.clone()]
    }

    fn build_features(&self, input: Option<&f64>, _summary: &(), sink: &mut dyn FeatureSink) {
        match input {
            Some(x) => sink.add(&self.name, if *x > self.threshold { 1.0 } else { 0.0 }),
            None => sink.skip(),
        }
    }

    fn encode_aggregator(&self, _summary: &()) -> String {
        String::new()
    }

    fn decode_aggregator(&self, _encoded: &str) -> Result<()> {
        Ok(())
    }

    fn params(&self) -> BTreeMap<String, String> {
        BTreeMap::from([("threshold".to_string(), self.threshold.to_string())])
    }
}

/// One-hot over user-supplied bucket boundaries.
///
/// `boundaries` must be ascending; `n` boundaries define `n - 1` buckets,
/// each closed on the left and open on the right except the last, which is
/// closed on both ends. Values outside the boundary range emit all skips.
#[derive(Debug, Clone)]
pub struct Bucketizer {
    name: String,
    boundaries: Vec<f64>,
}

impl Bucketizer {
    pub fn new(name: impl Into<String>, boundaries: Vec<f64>) -> Self {
        debug_assert!(
            boundaries.windows(2).all(|w| w[0] < w[1]),
            "bucket boundaries must be strictly ascending"
        );
        Bucketizer {
            name: name.into(),
            boundaries,
        }
    }

    fn buckets(&self) -> usize {
        self.boundaries.len().saturating_sub(1)
    }

    fn bucket_of(&self, x: f64) -> Option<usize> {
        let n = self.buckets();
        if n == 0 {
            return None;
        }
        if x == self.boundaries[n] {
            return Some(n - 1);
        }
        self.boundaries
            .windows(2)
            .position(|w| w[0] <= x && x < w[1])
    }
}

impl Transformer for Bucketizer {
    type Input = f64;
    type State = ();
    type Summary = ();

    fn name(&self) -> &str {
        &self.name
    }

    fn prepare(&self, _input: &f64) {}

    fn combine(&self, _lhs: (), _rhs: ()) {}

    fn present(&self, _state: ()) -> Result<()> {
        Ok(())
    }

    fn feature_dimension(&self, _summary: &()) -> usize {
        self.buckets()
    }

    fn feature_names(&self, _summary: &()) -> Vec<String> {
        (0..self.buckets())
            .map(|i| format!("{}_bucket_{}", self.name, i))
            .collect()
    }

    fn build_features(&self, input: Option<&f64>, _summary: &(), sink: &mut dyn FeatureSink) {
        let n = self.buckets();
        match input.and_then(|x| self.bucket_of(*x)) {
            Some(i) => {
                sink.skip_n(i);
                sink.add(&format!("{}_bucket_{}", self.name, i), 1.0);
                sink.skip_n(n - i - 1);
            }
            None => sink.skip_n(n),
        }
    }

    fn encode_aggregator(&self, _summary: &()) -> String {
        String::new()
    }

    fn decode_aggregator(&self, _encoded: &str) -> Result<()> {
        Ok(())
    }

    fn params(&self) -> BTreeMap<String, String> {
        let joined = self
            .boundaries
            .iter()
            .map(|b| b.to_string())
            .collect::<Vec<_>>()
            .join(",");
        BTreeMap::from([("boundaries".to_string(), joined)])
    }
}
