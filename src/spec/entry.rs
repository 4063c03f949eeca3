//! Type-erased feature entries
//!
//! A spec holds transformers with differing input/state/summary types in one
//! positionally indexed array. The erasure boundary is the [`FeatureEntry`]
//! trait: every operation reads from and writes to the single slot position
//! assigned to the entry, and the engine steps all slots through the same
//! phase transition in lockstep, so the dynamic type inside a slot is always
//! the one the current phase expects.

use std::any::Any;
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::builder::FeatureSink;
use crate::core::error::Result;
use crate::transformer::Transformer;

/// One positional cell of the state arrays. The dynamic type advances with
/// the pipeline phase: raw input, then partial state, then summary.
pub(crate) type Slot = Arc<dyn Any + Send + Sync>;

/// Parallel array of optional slots, positionally aligned to entries.
pub(crate) type SlotVec = Vec<Option<Slot>>;

fn cast<X: 'static>(slot: &Slot) -> &X {
    slot.downcast_ref::<X>()
        .expect("slot holds a value from a different pipeline phase")
}

/// Object-safe adapter over one `(extractor, default, transformer)` triple.
pub(crate) trait FeatureEntry<T>: Send + Sync {
    fn name(&self) -> &str;
    fn params(&self) -> BTreeMap<String, String>;

    /// Extracts the raw input, falling back to the declared default.
    fn raw(&self, record: &T) -> Option<Slot>;

    /// Input slot to partial-state slot.
    fn prepare(&self, raw: &Slot) -> Slot;

    /// Merges two partial-state slots. Associative.
    fn combine(&self, lhs: &Slot, rhs: &Slot) -> Slot;

    /// Partial-state slot to summary slot.
    fn present(&self, state: &Slot) -> Result<Slot>;

    fn dimension(&self, summary: &Slot) -> usize;
    fn names(&self, summary: &Slot) -> Vec<String>;
    fn build_features(&self, raw: Option<&Slot>, summary: &Slot, sink: &mut dyn FeatureSink);
    fn encode(&self, summary: &Slot) -> String;
    fn decode(&self, encoded: &str) -> Result<Slot>;
}

/// The one concrete [`FeatureEntry`] implementation, pairing a user extractor
/// function with a transformer.
pub(crate) struct TransformerEntry<T, TR: Transformer> {
    transformer: TR,
    extract: Box<dyn Fn(&T) -> Option<TR::Input> + Send + Sync>,
    default: Option<TR::Input>,
}

impl<T, TR: Transformer> TransformerEntry<T, TR> {
    pub(crate) fn new(
        extract: impl Fn(&T) -> Option<TR::Input> + Send + Sync + 'static,
        default: Option<TR::Input>,
        transformer: TR,
    ) -> Self {
        TransformerEntry {
            transformer,
            extract: Box::new(extract),
            default,
        }
    }
}

impl<T, TR> FeatureEntry<T> for TransformerEntry<T, TR>
where
    T: Send + Sync,
    TR: Transformer,
    TR::Input: Clone,
{
    fn name(&self) -> &str {
        self.transformer.name()
    }

    fn params(&self) -> BTreeMap<String, String> {
        self.transformer.params()
    }

    fn raw(&self, record: &T) -> Option<Slot> {
        (self.extract)(record)
            .or_else(|| self.default.clone())
            .map(|input| Arc::new(input) as Slot)
    }

    fn prepare(&self, raw: &Slot) -> Slot {
        Arc::new(self.transformer.prepare(cast::<TR::Input>(raw))) as Slot
    }

    fn combine(&self, lhs: &Slot, rhs: &Slot) -> Slot {
        let merged = self.transformer.combine(
            cast::<TR::State>(lhs).clone(),
            cast::<TR::State>(rhs).clone(),
        );
        Arc::new(merged) as Slot
    }

    fn present(&self, state: &Slot) -> Result<Slot> {
        let summary = self.transformer.present(cast::<TR::State>(state).clone())?;
        Ok(Arc::new(summary) as Slot)
    }

    fn dimension(&self, summary: &Slot) -> usize {
        self.transformer.feature_dimension(cast::<TR::Summary>(summary))
    }

    fn names(&self, summary: &Slot) -> Vec<String> {
        self.transformer.feature_names(cast::<TR::Summary>(summary))
    }

    fn build_features(&self, raw: Option<&Slot>, summary: &Slot, sink: &mut dyn FeatureSink) {
        self.transformer.build_features(
            raw.map(cast::<TR::Input>),
            cast::<TR::Summary>(summary),
            sink,
        );
    }

    fn encode(&self, summary: &Slot) -> String {
        self.transformer.encode_aggregator(cast::<TR::Summary>(summary))
    }

    fn decode(&self, encoded: &str) -> Result<Slot> {
        let summary = self.transformer.decode_aggregator(encoded)?;
        Ok(Arc::new(summary) as Slot)
    }
}
