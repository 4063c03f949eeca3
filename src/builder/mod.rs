//! Feature builders
//!
//! A feature builder is the sink one record's feature vector is assembled
//! into. The extraction engine drives it through a fixed protocol per record:
//! `init(dimension)` once, then for every transformer block `prepare_block`
//! followed by a run of `add` / `skip` calls, and finally `build()` to take
//! the assembled output. The total number of cells received through `add` and
//! `skip` must equal the `init` dimension; builders may assert on violations
//! since they indicate a programmer error in a transformer.
//!
//! Builders decide what a skipped cell means for their output shape: a dense
//! vector substitutes a fill value, a sparse vector simply omits the index,
//! a map omits the key.

use crate::core::error::{Error, Result};

mod dense;
mod map;
mod sparse;

pub use dense::{DenseOptionVector, DenseVector};
pub use map::NamedMap;
pub use sparse::{SparseEntries, SparseVector};

/// The narrow, object-safe surface transformers emit through.
///
/// Transformer `build_features` implementations only ever append cells; the
/// rest of the builder protocol is driven by the engine.
pub trait FeatureSink {
    /// Emit one numeric cell under the given feature name.
    fn add(&mut self, name: &str, value: f64);

    /// Emit one hole.
    fn skip(&mut self);

    /// Emit `n` holes.
    fn skip_n(&mut self, n: usize) {
        for _ in 0..n {
            self.skip();
        }
    }
}

/// Sink that assembles a typed output from one record's emission events.
pub trait FeatureBuilder: FeatureSink {
    /// The assembled per-record output type.
    type Output;

    /// Begin a record of the given total dimension. Clears any state left
    /// over from a previous record, making the builder reusable.
    fn init(&mut self, dimension: usize);

    /// Called before each transformer's emission block with the transformer
    /// name. Builders may record per-block metadata; the default ignores it.
    fn prepare_block(&mut self, _name: &str) {}

    /// Bulk emission: equivalent to zipped `add` calls, in order.
    /// Fails fast when the two lengths disagree.
    fn add_all(&mut self, names: &[String], values: &[f64]) -> Result<()> {
        if names.len() != values.len() {
            return Err(Error::LengthMismatch {
                expected: names.len(),
                actual: values.len(),
            });
        }
        for (name, value) in names.iter().zip(values.iter()) {
            self.add(name, *value);
        }
        Ok(())
    }

    /// Terminal: returns the assembled output. The builder accepts a new
    /// record after the next `init`.
    fn build(&mut self) -> Self::Output;

    /// Constructs a fresh, independent instance with the same configuration.
    /// The multi-spec path uses this to fan emission out over several
    /// parallel outputs.
    fn fresh(&self) -> Self
    where
        Self: Sized;
}
