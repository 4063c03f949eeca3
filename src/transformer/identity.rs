//! Pass-through transformers

use super::{decode_u64, Transformer};
use crate::builder::FeatureSink;
use crate::core::error::Result;

/// Emits the raw scalar unchanged. Stateless; width 1.
#[derive(Debug, Clone)]
pub struct Identity {
    name: String,
}

impl Identity {
    pub fn new(name: impl Into<String>) -> Self {
        Identity { name: name.into() }
    }
}

impl Transformer for Identity {
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
            Some(x) => sink.add(&self.name, *x),
            None => sink.skip(),
        }
    }

    fn encode_aggregator(&self, _summary: &()) -> String {
        String::new()
    }

    fn decode_aggregator(&self, _encoded: &str) -> Result<()> {
        Ok(())
    }
}

/// Emits a fixed-length numeric vector unchanged.
///
/// The vector length is learned during the fit pass; a record whose vector
/// length disagrees with the learned one emits all skips and is logged.
#[derive(Debug, Clone)]
pub struct VectorIdentity {
    name: String,
}

impl VectorIdentity {
    pub fn new(name: impl Into<String>) -> Self {
        VectorIdentity { name: name.into() }
    }
}

impl Transformer for VectorIdentity {
    type Input = Vec<f64>;
    type State = u64;
    type Summary = usize;

    fn name(&self) -> &str {
        &self.name
    }

    fn prepare(&self, input: &Vec<f64>) -> u64 {
        input.len() as u64
    }

    fn combine(&self, lhs: u64, rhs: u64) -> u64 {
        // Disagreeing lengths are surfaced at emission time, per record.
        lhs.max(rhs)
    }

    fn present(&self, state: u64) -> Result<usize> {
        Ok(state as usize)
    }

    fn feature_dimension(&self, summary: &usize) -> usize {
        *summary
    }

    fn feature_names(&self, summary: &usize) -> Vec<String> {
        (0..*summary).map(|i| format!("{}_{}", self.name, i)).collect()
    }

    fn build_features(
        &self,
        input: Option<&Vec<f64>>,
        summary: &usize,
        sink: &mut dyn FeatureSink,
    ) {
        match input {
            Some(xs) if xs.len() == *summary => {
                for (i, x) in xs.iter().enumerate() {
                    sink.add(&format!("{}_{}", self.name, i), *x);
                }
            }
            Some(xs) => {
                log::warn!(
                    "{}: vector length {} does not match learned length {}, skipping",
                    self.name,
                    xs.len(),
                    summary
                );
                sink.skip_n(*summary);
            }
            None => sink.skip_n(*summary),
        }
    }

    fn encode_aggregator(&self, summary: &usize) -> String {
        summary.to_string()
    }

    fn decode_aggregator(&self, encoded: &str) -> Result<usize> {
        Ok(decode_u64(&self.name, encoded)? as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::{DenseOptionVector, FeatureBuilder};

    #[test]
    fn test_identity_emits_value() {
        let t = Identity::new("id");
        let mut b = DenseOptionVector::new();
        b.init(1);
        t.build_features(Some(&3.5), &(), &mut b);
        assert_eq!(b.build(), vec![Some(3.5)]);
    }

    #[test]
    fn test_identity_missing_skips() {
        let t = Identity::new("id");
        let mut b = DenseOptionVector::new();
        b.init(1);
        t.build_features(None, &(), &mut b);
        assert_eq!(b.build(), vec![None]);
    }

    #[test]
    fn test_vector_identity_length_mismatch_skips() {
        let t = VectorIdentity::new("v");
        let summary = t.present(t.prepare(&vec![1.0, 2.0, 3.0])).unwrap();
        assert_eq!(t.feature_dimension(&summary), 3);

        let mut b = DenseOptionVector::new();
        b.init(3);
        t.build_features(Some(&vec![1.0, 2.0]), &summary, &mut b);
        assert_eq!(b.build(), vec![None, None, None]);
    }
}
