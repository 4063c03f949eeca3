//! Feature specification DSL
//!
//! A [`FeatureSpec`] is built fluently by naming the raw fields to extract
//! from a record type and the transformer to apply to each:
//!
//! ```
//! use featrs::spec::FeatureSpec;
//! use featrs::transformer::{Identity, MinMaxScaler};
//!
//! struct Point { x: f64, y: Option<f64> }
//!
//! let spec = FeatureSpec::<Point>::of()
//!     .required(|p: &Point| p.x, MinMaxScaler::new("x"))
//!     .optional(|p: &Point| p.y, Identity::new("y"))
//!     .cross(("x", "y"), |a, b| a * b);
//! ```
//!
//! Structural validation (duplicate names, unknown cross endpoints) happens
//! when the spec is turned into a feature set by one of the extract entry
//! points, before any data is read.

pub(crate) mod entry;
pub(crate) mod feature_set;
mod multi;

use std::sync::Arc;

use crate::collection::CollectionDriver;
use crate::core::error::{Error, Result};
use crate::extract::FeatureExtractor;
use crate::transformer::Transformer;

use entry::{FeatureEntry, TransformerEntry};
use feature_set::FeatureSet;

pub use feature_set::cross_name;
pub use multi::MultiFeatureSpec;

pub(crate) type CrossFn = Arc<dyn Fn(f64, f64) -> f64 + Send + Sync>;

/// A declared crossing, kept unresolved until feature-set construction.
#[derive(Clone)]
pub(crate) struct CrossDecl {
    pub(crate) left: String,
    pub(crate) right: String,
    pub(crate) combine: CrossFn,
}

/// Declarative feature specification over a record type `T`.
pub struct FeatureSpec<T: 'static> {
    pub(crate) entries: Vec<Arc<dyn FeatureEntry<T>>>,
    pub(crate) crossings: Vec<CrossDecl>,
}

impl<T: 'static> Clone for FeatureSpec<T> {
    fn clone(&self) -> Self {
        FeatureSpec {
            entries: self.entries.clone(),
            crossings: self.crossings.clone(),
        }
    }
}

impl<T: Send + Sync + 'static> Default for FeatureSpec<T> {
    fn default() -> Self {
        Self::of()
    }
}

impl<T: Send + Sync + 'static> FeatureSpec<T> {
    /// An empty spec.
    pub fn of() -> Self {
        FeatureSpec {
            entries: Vec::new(),
            crossings: Vec::new(),
        }
    }

    /// Declares a field that is present on every record.
    pub fn required<TR, F>(mut self, extract: F, transformer: TR) -> Self
    where
        TR: Transformer,
        TR::Input: Clone,
        F: Fn(&T) -> TR::Input + Send + Sync + 'static,
    {
        self.entries.push(Arc::new(TransformerEntry::new(
            move |record: &T| Some(extract(record)),
            None,
            transformer,
        )));
        self
    }

    /// Declares a field that may be absent. Records where the extractor
    /// returns `None` contribute nothing to the aggregation and emit skips.
    pub fn optional<TR, F>(self, extract: F, transformer: TR) -> Self
    where
        TR: Transformer,
        TR::Input: Clone,
        F: Fn(&T) -> Option<TR::Input> + Send + Sync + 'static,
    {
        self.optional_entry(extract, None, transformer)
    }

    /// Declares a field that may be absent, substituting `default` when it is.
    pub fn optional_or<TR, F>(self, extract: F, default: TR::Input, transformer: TR) -> Self
    where
        TR: Transformer,
        TR::Input: Clone,
        F: Fn(&T) -> Option<TR::Input> + Send + Sync + 'static,
    {
        self.optional_entry(extract, Some(default), transformer)
    }

    fn optional_entry<TR, F>(mut self, extract: F, default: Option<TR::Input>, transformer: TR) -> Self
    where
        TR: Transformer,
        TR::Input: Clone,
        F: Fn(&T) -> Option<TR::Input> + Send + Sync + 'static,
    {
        self.entries
            .push(Arc::new(TransformerEntry::new(extract, default, transformer)));
        self
    }

    /// Declares a cross between two previously declared transformers. Each
    /// pair of scalar outputs is combined with `combine`, producing a
    /// `w_left * w_right` block after all single blocks.
    pub fn cross<F>(mut self, names: (&str, &str), combine: F) -> Self
    where
        F: Fn(f64, f64) -> f64 + Send + Sync + 'static,
    {
        self.crossings.push(CrossDecl {
            left: names.0.to_string(),
            right: names.1.to_string(),
            combine: Arc::new(combine),
        });
        self
    }

    /// Concatenates several specs into one, preserving declaration order.
    /// Name uniqueness is still enforced at extraction.
    pub fn combine(specs: Vec<FeatureSpec<T>>) -> Result<FeatureSpec<T>> {
        if specs.is_empty() {
            return Err(Error::EmptySpec);
        }
        let mut entries = Vec::new();
        let mut crossings = Vec::new();
        for spec in specs {
            entries.extend(spec.entries);
            crossings.extend(spec.crossings);
        }
        Ok(FeatureSpec { entries, crossings })
    }

    pub(crate) fn feature_set(&self) -> Result<FeatureSet<T>> {
        FeatureSet::new(
            self.entries.clone(),
            self.crossings
                .iter()
                .map(|c| (c.left.clone(), c.right.clone(), c.combine.clone()))
                .collect(),
        )
    }
}

impl<T: Clone + Send + Sync + 'static> FeatureSpec<T> {
    /// Fits this spec against a dataset, returning an extractor whose
    /// aggregation runs lazily on first use.
    pub fn extract<D: CollectionDriver>(&self, input: D::Coll<T>) -> Result<FeatureExtractor<D, T>> {
        Ok(FeatureExtractor::new(Arc::new(self.feature_set()?), input, None))
    }

    /// Replays a previously fitted spec: summaries are re-hydrated from the
    /// settings blob and no reduce runs over the dataset.
    pub fn extract_with_settings<D: CollectionDriver>(
        &self,
        input: D::Coll<T>,
        settings: &str,
    ) -> Result<FeatureExtractor<D, T>> {
        Ok(FeatureExtractor::new(
            Arc::new(self.feature_set()?),
            input,
            Some(settings.to_string()),
        ))
    }
}
