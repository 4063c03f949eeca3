//! Approximate quantile bucketing

use std::collections::BTreeMap;

use super::{decode_f64, Transformer};
use crate::builder::FeatureSink;
use crate::core::error::{Error, Result};

/// Retained sample size per partial state. Merges beyond this size are
/// thinned by uniform striding, keeping the sketch bounded.
const SAMPLE_CAP: usize = 1024;

/// Sorted bounded sample of observed values.
#[derive(Debug, Clone, PartialEq)]
pub struct QuantileSample {
    values: Vec<f64>,
}

impl QuantileSample {
    fn merge(self, other: QuantileSample) -> QuantileSample {
        let mut merged = Vec::with_capacity(self.values.len() + other.values.len());
        let (mut a, mut b) = (self.values.into_iter().peekable(), other.values.into_iter().peekable());
        loop {
            match (a.peek(), b.peek()) {
                (Some(x), Some(y)) => {
                    if x <= y {
                        merged.push(a.next().unwrap());
                    } else {
                        merged.push(b.next().unwrap());
                    }
                }
                (Some(_), None) => merged.push(a.next().unwrap()),
                (None, Some(_)) => merged.push(b.next().unwrap()),
                (None, None) => break,
            }
        }
        if merged.len() > SAMPLE_CAP {
            let len = merged.len();
            let thinned = (0..SAMPLE_CAP).map(|i| merged[i * len / SAMPLE_CAP]).collect();
            merged = thinned;
        }
        QuantileSample { values: merged }
    }

    fn quantile(&self, q: f64) -> f64 {
        let n = self.values.len();
        let idx = ((n - 1) as f64 * q).round() as usize;
        self.values[idx]
    }
}

/// One-hot over learned approximate quantile buckets.
///
/// Boundaries are estimated from a bounded sorted sample; past the sample
/// cap the estimate is approximate and mildly sensitive to merge order,
/// which is the usual trade for a mergeable sketch. Replay values outside
/// the fitted range land in the nearest edge bucket.
#[derive(Debug, Clone)]
pub struct QuantileDiscretizer {
    name: String,
    buckets: usize,
}

impl QuantileDiscretizer {
    pub fn new(name: impl Into<String>, buckets: usize) -> Self {
        debug_assert!(buckets >= 1, "need at least one bucket");
        QuantileDiscretizer {
            name: name.into(),
            buckets,
        }
    }

    fn bucket_of(&self, boundaries: &[f64], x: f64) -> usize {
        let k = self.buckets;
        if x <= boundaries[0] {
            return 0;
        }
        if x >= boundaries[k] {
            return k - 1;
        }
        boundaries
            .windows(2)
            .position(|w| w[0] <= x && x < w[1])
            .unwrap_or(k - 1)
    }
}

impl Transformer for QuantileDiscretizer {
    type Input = f64;
    type State = QuantileSample;
    /// Bucket boundaries, `buckets + 1` ascending values.
    type Summary = Vec<f64>;

    fn name(&self) -> &str {
        &self.name
    }

    fn prepare(&self, input: &f64) -> QuantileSample {
        QuantileSample {
            values: vec![*input],
        }
    }

    fn combine(&self, lhs: QuantileSample, rhs: QuantileSample) -> QuantileSample {
        lhs.merge(rhs)
    }

    fn present(&self, state: QuantileSample) -> Result<Vec<f64>> {
        Ok((0..=self.buckets)
            .map(|i| state.quantile(i as f64 / self.buckets as f64))
            .collect())
    }

    fn feature_dimension(&self, _summary: &Vec<f64>) -> usize {
        self.buckets
    }

    fn feature_names(&self, _summary: &Vec<f64>) -> Vec<String> {
        (0..self.buckets)
            .map(|i| format!("{}_q_{}", self.name, i))
            .collect()
    }

    fn build_features(
        &self,
        input: Option<&f64>,
        summary: &Vec<f64>,
        sink: &mut dyn FeatureSink,
    ) {
        match input {
            Some(x) => {
                let i = self.bucket_of(summary, *x);
                sink.skip_n(i);
                sink.add(&format!("{}_q_{}", self.name, i), 1.0);
                sink.skip_n(self.buckets - i - 1);
            }
            None => sink.skip_n(self.buckets),
        }
    }

    fn encode_aggregator(&self, summary: &Vec<f64>) -> String {
        summary
            .iter()
            .map(|b| b.to_string())
            .collect::<Vec<_>>()
            .join(",")
    }

    fn decode_aggregator(&self, encoded: &str) -> Result<Vec<f64>> {
        let boundaries: Vec<f64> = encoded
            .split(',')
            .map(|f| decode_f64(&self.name, f))
            .collect::<Result<_>>()?;
        if boundaries.len() != self.buckets + 1 {
            return Err(Error::AggregatorDecode {
                name: self.name.clone(),
                reason: format!(
                    "expected {} boundaries, got {}",
                    self.buckets + 1,
                    boundaries.len()
                ),
            });
        }
        Ok(boundaries)
    }

    fn params(&self) -> BTreeMap<String, String> {
        BTreeMap::from([("buckets".to_string(), self.buckets.to_string())])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::{DenseOptionVector, FeatureBuilder};

    fn fit(t: &QuantileDiscretizer, xs: &[f64]) -> Vec<f64> {
        let state = xs
            .iter()
            .map(|x| t.prepare(x))
            .reduce(|a, b| t.combine(a, b))
            .unwrap();
        t.present(state).unwrap()
    }

    #[test]
    fn test_quartile_boundaries() {
        let t = QuantileDiscretizer::new("q", 4);
        let xs: Vec<f64> = (1..=100).map(|i| i as f64).collect();
        let boundaries = fit(&t, &xs);
        assert_eq!(boundaries.len(), 5);
        assert_eq!(boundaries[0], 1.0);
        assert_eq!(boundaries[4], 100.0);
        assert!((boundaries[2] - 50.0).abs() <= 1.0);
    }

    #[test]
    fn test_bucket_assignment_and_edges() {
        let t = QuantileDiscretizer::new("q", 2);
        let boundaries = fit(&t, &[0.0, 1.0, 2.0, 3.0, 4.0]);

        let mut b = DenseOptionVector::new();
        b.init(2);
        t.build_features(Some(&0.5), &boundaries, &mut b);
        assert_eq!(b.build(), vec![Some(1.0), None]);

        // Out-of-range replay values clamp to the edge buckets.
        b.init(2);
        t.build_features(Some(&99.0), &boundaries, &mut b);
        assert_eq!(b.build(), vec![None, Some(1.0)]);
    }

    #[test]
    fn test_sample_cap_bounds_state() {
        let t = QuantileDiscretizer::new("q", 4);
        let state = (0..10_000)
            .map(|i| t.prepare(&(i as f64)))
            .reduce(|a, b| t.combine(a, b))
            .unwrap();
        assert!(state.values.len() <= SAMPLE_CAP);
        let boundaries = t.present(state).unwrap();
        assert!((boundaries[2] - 5_000.0).abs() < 200.0);
    }
}
