//! Categorical encoders with a learned vocabulary

use std::collections::BTreeSet;

use super::{escape_label, unescape_label, Transformer};
use crate::builder::FeatureSink;
use crate::core::error::Result;

fn category_names(name: &str, categories: &[String]) -> Vec<String> {
    categories.iter().map(|c| format!("{}_{}", name, c)).collect()
}

fn encode_categories(categories: &[String]) -> String {
    categories
        .iter()
        .map(|c| escape_label(c))
        .collect::<Vec<_>>()
        .join("\n")
}

fn decode_categories(name: &str, encoded: &str) -> Result<Vec<String>> {
    if encoded.is_empty() {
        return Ok(Vec::new());
    }
    encoded
        .split('\n')
        .map(|label| unescape_label(name, label))
        .collect()
}

/// One-hot over the categories observed during the fit pass.
///
/// The learned vocabulary is sorted so the emitted block is deterministic.
/// A seen category emits `1.0` at its column and skips elsewhere; a category
/// unseen at fit time emits all skips.
#[derive(Debug, Clone)]
pub struct OneHotEncoder {
    name: String,
}

impl OneHotEncoder {
    pub fn new(name: impl Into<String>) -> Self {
        OneHotEncoder { name: name.into() }
    }
}

impl Transformer for OneHotEncoder {
    type Input = String;
    type State = BTreeSet<String>;
    type Summary = Vec<String>;

    fn name(&self) -> &str {
        &self.name
    }

    fn prepare(&self, input: &String) -> BTreeSet<String> {
        BTreeSet::from([input.clone()])
    }

    fn combine(&self, mut lhs: BTreeSet<String>, rhs: BTreeSet<String>) -> BTreeSet<String> {
        lhs.extend(rhs);
        lhs
    }

    fn present(&self, state: BTreeSet<String>) -> Result<Vec<String>> {
        Ok(state.into_iter().collect())
    }

    fn feature_dimension(&self, summary: &Vec<String>) -> usize {
        summary.len()
    }

    fn feature_names(&self, summary: &Vec<String>) -> Vec<String> {
        category_names(&self.name, summary)
    }

    fn build_features(
        &self,
        input: Option<&String>,
        summary: &Vec<String>,
        sink: &mut dyn FeatureSink,
    ) {
        let n = summary.len();
        match input.and_then(|x| summary.binary_search(x).ok()) {
            Some(i) => {
                sink.skip_n(i);
                sink.add(&format!("{}_{}", self.name, summary[i]), 1.0);
                sink.skip_n(n - i - 1);
            }
            None => sink.skip_n(n),
        }
    }

    fn encode_aggregator(&self, summary: &Vec<String>) -> String {
        encode_categories(summary)
    }

    fn decode_aggregator(&self, encoded: &str) -> Result<Vec<String>> {
        decode_categories(&self.name, encoded)
    }
}

/// N-hot over a set-valued input: every matching category column gets `1.0`,
/// the rest skip. Categories unseen at fit time are ignored.
#[derive(Debug, Clone)]
pub struct NHotEncoder {
    name: String,
}

impl NHotEncoder {
    pub fn new(name: impl Into<String>) -> Self {
        NHotEncoder { name: name.into() }
    }
}

impl Transformer for NHotEncoder {
    type Input = Vec<String>;
    type State = BTreeSet<String>;
    type Summary = Vec<String>;

    fn name(&self) -> &str {
        &self.name
    }

    fn prepare(&self, input: &Vec<String>) -> BTreeSet<String> {
        input.iter().cloned().collect()
    }

    fn combine(&self, mut lhs: BTreeSet<String>, rhs: BTreeSet<String>) -> BTreeSet<String> {
        lhs.extend(rhs);
        lhs
    }

    fn present(&self, state: BTreeSet<String>) -> Result<Vec<String>> {
        Ok(state.into_iter().collect())
    }

    fn feature_dimension(&self, summary: &Vec<String>) -> usize {
        summary.len()
    }

    fn feature_names(&self, summary: &Vec<String>) -> Vec<String> {
        category_names(&self.name, summary)
    }

    fn build_features(
        &self,
        input: Option<&Vec<String>>,
        summary: &Vec<String>,
        sink: &mut dyn FeatureSink,
    ) {
        match input {
            Some(xs) => {
                for category in summary {
                    if xs.contains(category) {
                        sink.add(&format!("{}_{}", self.name, category), 1.0);
                    } else {
                        sink.skip();
                    }
                }
            }
            None => sink.skip_n(summary.len()),
        }
    }

    fn encode_aggregator(&self, summary: &Vec<String>) -> String {
        encode_categories(summary)
    }

    fn decode_aggregator(&self, encoded: &str) -> Result<Vec<String>> {
        decode_categories(&self.name, encoded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::{DenseOptionVector, FeatureBuilder};

    fn fit(t: &OneHotEncoder, xs: &[&str]) -> Vec<String> {
        let state = xs
            .iter()
            .map(|x| t.prepare(&x.to_string()))
            .reduce(|a, b| t.combine(a, b))
            .unwrap();
        t.present(state).unwrap()
    }

    #[test]
    fn test_one_hot_sorted_vocabulary() {
        let t = OneHotEncoder::new("c");
        let summary = fit(&t, &["b", "a", "c", "a"]);
        assert_eq!(summary, vec!["a", "b", "c"]);
        assert_eq!(t.feature_names(&summary), vec!["c_a", "c_b", "c_c"]);
    }

    #[test]
    fn test_one_hot_unseen_category_skips() {
        let t = OneHotEncoder::new("c");
        let summary = fit(&t, &["a", "b", "c"]);

        let mut b = DenseOptionVector::new();
        b.init(3);
        t.build_features(Some(&"z".to_string()), &summary, &mut b);
        assert_eq!(b.build(), vec![None, None, None]);

        b.init(3);
        t.build_features(Some(&"b".to_string()), &summary, &mut b);
        assert_eq!(b.build(), vec![None, Some(1.0), None]);
    }

    #[test]
    fn test_one_hot_aggregator_round_trip() {
        let t = OneHotEncoder::new("c");
        let summary = vec!["plain".to_string(), "with\nnewline".to_string()];
        let decoded = t.decode_aggregator(&t.encode_aggregator(&summary)).unwrap();
        assert_eq!(decoded, summary);
    }

    #[test]
    fn test_n_hot_matches() {
        let t = NHotEncoder::new("tags");
        let state = t.combine(
            t.prepare(&vec!["x".to_string(), "y".to_string()]),
            t.prepare(&vec!["z".to_string()]),
        );
        let summary = t.present(state).unwrap();
        assert_eq!(summary, vec!["x", "y", "z"]);

        let mut b = DenseOptionVector::new();
        b.init(3);
        t.build_features(Some(&vec!["z".to_string(), "x".to_string()]), &summary, &mut b);
        assert_eq!(b.build(), vec![Some(1.0), None, Some(1.0)]);
    }
}
