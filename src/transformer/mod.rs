//! Transformer contract and the shipped transformer set
//!
//! A transformer is a named feature transformation with three semantic types:
//! the raw input it reads (`Input`), the partial aggregation state it
//! accumulates over a dataset (`State`), and the presented summary the
//! emission phase consumes (`Summary`). Stateless transformers use `()` for
//! both `State` and `Summary`.
//!
//! The fit pass runs `prepare` on every extracted input, merges the partial
//! states with the associative `combine`, and finishes with `present`. The
//! emission pass then asks the transformer for its width and feature names
//! (both may depend on the summary, e.g. a one-hot encoder's width is the
//! learned category count) and has it write one block of cells per record
//! through a [`FeatureSink`].

use std::collections::BTreeMap;

use crate::builder::FeatureSink;
use crate::core::error::{Error, Result};

mod binarize;
mod identity;
mod one_hot;
mod quantile;
mod scaling;

pub use binarize::{Binarizer, Bucketizer};
pub use identity::{Identity, VectorIdentity};
pub use one_hot::{NHotEncoder, OneHotEncoder};
pub use quantile::QuantileDiscretizer;
pub use scaling::{MaxAbsScaler, MinMaxScaler, StandardScaler};

/// A named feature transformation.
///
/// Implementations must keep `combine` associative and `feature_names`
/// stable and duplicate-free for a given summary. `build_features` must emit
/// exactly `feature_dimension(summary)` cells, in the order declared by
/// `feature_names`; when the input is `None` it must emit that many skips.
pub trait Transformer: Send + Sync + 'static {
    /// Raw input extracted from a record.
    type Input: Send + Sync + 'static;
    /// Partial aggregation state; merged across dataset partitions.
    type State: Clone + Send + Sync + 'static;
    /// Presented summary the emission phase consumes.
    type Summary: Send + Sync + 'static;

    /// Unique identifier within a spec.
    fn name(&self) -> &str;

    /// Lifts one raw input into a partial state. Never fails.
    fn prepare(&self, input: &Self::Input) -> Self::State;

    /// Merges two partial states. Must be associative; implementations whose
    /// summaries depend on merge order must document it.
    fn combine(&self, lhs: Self::State, rhs: Self::State) -> Self::State;

    /// Turns the final state into the presented summary. Only called after
    /// at least one `prepare` contributed, or on a decoded settings state.
    fn present(&self, state: Self::State) -> Result<Self::Summary>;

    /// Emitted width for the given summary.
    fn feature_dimension(&self, summary: &Self::Summary) -> usize;

    /// Ordered feature names, of length `feature_dimension(summary)`.
    fn feature_names(&self, summary: &Self::Summary) -> Vec<String>;

    /// Emits one block of cells for one record. `input` is `None` when the
    /// record had no value for this feature and no default was declared.
    fn build_features(
        &self,
        input: Option<&Self::Input>,
        summary: &Self::Summary,
        sink: &mut dyn FeatureSink,
    );

    /// Encodes the summary as an opaque string for the settings blob.
    fn encode_aggregator(&self, summary: &Self::Summary) -> String;

    /// Decodes a summary previously produced by [`encode_aggregator`].
    ///
    /// [`encode_aggregator`]: Transformer::encode_aggregator
    fn decode_aggregator(&self, encoded: &str) -> Result<Self::Summary>;

    /// Transformer parameters recorded in the settings blob for provenance.
    fn params(&self) -> BTreeMap<String, String> {
        BTreeMap::new()
    }
}

/// Parses one float field of an encoded aggregator string.
pub(crate) fn decode_f64(name: &str, field: &str) -> Result<f64> {
    field.parse::<f64>().map_err(|_| Error::AggregatorDecode {
        name: name.to_string(),
        reason: format!("not a number: {:?}", field),
    })
}

/// Parses one unsigned integer field of an encoded aggregator string.
pub(crate) fn decode_u64(name: &str, field: &str) -> Result<u64> {
    field.parse::<u64>().map_err(|_| Error::AggregatorDecode {
        name: name.to_string(),
        reason: format!("not an integer: {:?}", field),
    })
}

/// Escapes a category label for embedding in a newline-joined encoding.
pub(crate) fn escape_label(label: &str) -> String {
    let mut out = String::with_capacity(label.len());
    for c in label.chars() {
        match c {
            '%' => out.push_str("%25"),
            '\n' => out.push_str("%0A"),
            _ => out.push(c),
        }
    }
    out
}

/// Reverses [`escape_label`].
pub(crate) fn unescape_label(name: &str, label: &str) -> Result<String> {
    let mut out = String::with_capacity(label.len());
    let mut chars = label.chars();
    while let Some(c) = chars.next() {
        if c != '%' {
            out.push(c);
            continue;
        }
        let hex: String = chars.by_ref().take(2).collect();
        match hex.as_str() {
            "25" => out.push('%'),
            "0A" => out.push('\n'),
            other => {
                return Err(Error::AggregatorDecode {
                    name: name.to_string(),
                    reason: format!("bad escape: %{}", other),
                })
            }
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_escape_round_trip() {
        for label in ["plain", "with%percent", "with\nnewline", "%0A", ""] {
            let encoded = escape_label(label);
            assert!(!encoded.contains('\n'));
            assert_eq!(unescape_label("t", &encoded).unwrap(), label);
        }
    }

    #[test]
    fn test_bad_escape_rejected() {
        assert!(unescape_label("t", "%zz").is_err());
    }
}
