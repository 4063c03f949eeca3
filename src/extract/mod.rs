//! Extractors: the lazily evaluated phase graph
//!
//! An extractor holds the validated feature set, the input dataset, and an
//! optional settings blob. Every terminal query (names, settings, values)
//! materializes its pipeline prefix on first use and memoizes it, so a
//! failure in one query leaves earlier results valid:
//!
//! ```text
//! raw       = input.map(|t| (t, raw_slots(t)))
//! aggregate = settings? decode : raw.map(prepare).reduce(combine).present
//! names     = aggregate.map(feature_names)
//! settings  = given | aggregate.map(feature_settings)
//! values    = raw.cross(aggregate).map(feature_values)
//! ```
//!
//! In the replay path the aggregate is parsed from the settings string and
//! no reduce runs over the data.

mod multi;

use std::sync::{Arc, OnceLock};

use crate::builder::FeatureBuilder;
use crate::collection::CollectionDriver;
use crate::core::error::{Error, Result};
use crate::settings;
use crate::spec::entry::SlotVec;
use crate::spec::feature_set::FeatureSet;

pub use multi::MultiFeatureExtractor;

/// A fitted (or replayed) spec bound to a dataset.
pub struct FeatureExtractor<D: CollectionDriver, T: Clone + Send + Sync + 'static> {
    feature_set: Arc<FeatureSet<T>>,
    input: D::Coll<T>,
    settings: Option<String>,
    raw: OnceLock<D::Coll<(T, SlotVec)>>,
    aggregate: OnceLock<Result<D::Coll<SlotVec>>>,
}

impl<D: CollectionDriver, T: Clone + Send + Sync + 'static> FeatureExtractor<D, T> {
    pub(crate) fn new(
        feature_set: Arc<FeatureSet<T>>,
        input: D::Coll<T>,
        settings: Option<String>,
    ) -> Self {
        FeatureExtractor {
            feature_set,
            input,
            settings,
            raw: OnceLock::new(),
            aggregate: OnceLock::new(),
        }
    }

    pub(crate) fn feature_set(&self) -> &Arc<FeatureSet<T>> {
        &self.feature_set
    }

    /// Records paired with their extracted raw slots.
    pub(crate) fn raw_coll(&self) -> &D::Coll<(T, SlotVec)> {
        self.raw.get_or_init(|| {
            let set = self.feature_set.clone();
            D::map(&self.input, move |record| {
                (record.clone(), set.raw_slots(record))
            })
        })
    }

    /// The presented summary array, as a one-element collection.
    pub(crate) fn aggregate(&self) -> Result<&D::Coll<SlotVec>> {
        let result = self.aggregate.get_or_init(|| self.compute_aggregate());
        match result {
            Ok(coll) => Ok(coll),
            Err(e) => Err(e.clone()),
        }
    }

    fn compute_aggregate(&self) -> Result<D::Coll<SlotVec>> {
        match &self.settings {
            Some(json) => {
                let parsed = settings::from_json(json)?;
                let summaries = self.feature_set.decode_aggregators(&parsed)?;
                log::debug!(
                    "replayed aggregation for {} transformers from settings",
                    self.feature_set.len()
                );
                Ok(D::pure(summaries))
            }
            None => {
                let set = self.feature_set.clone();
                let prepared = D::map(self.raw_coll(), move |(_, raws)| set.prepare_slots(raws));
                let set = self.feature_set.clone();
                let reduced = D::reduce(&prepared, move |lhs, rhs| set.combine_slots(&lhs, &rhs))
                    .ok_or(Error::EmptyAggregation)?;
                let summaries = self.feature_set.present_slots(&reduced)?;
                log::debug!(
                    "computed aggregation for {} transformers",
                    self.feature_set.len()
                );
                Ok(D::pure(summaries))
            }
        }
    }

    /// Emitted feature names, as a one-element collection.
    pub fn feature_names(&self) -> Result<D::Coll<Vec<String>>> {
        let set = self.feature_set.clone();
        Ok(D::map(self.aggregate()?, move |summaries| {
            set.feature_names(summaries)
        }))
    }

    /// Total emitted width, as a one-element collection.
    pub fn feature_dimension(&self) -> Result<D::Coll<usize>> {
        let set = self.feature_set.clone();
        Ok(D::map(self.aggregate()?, move |summaries| {
            set.feature_dimension(summaries)
        }))
    }

    /// The settings blob: the one this extractor replays, or the one fitted
    /// from the data.
    pub fn feature_settings(&self) -> Result<D::Coll<String>> {
        match &self.settings {
            Some(json) => Ok(D::pure(json.clone())),
            None => {
                let set = self.feature_set.clone();
                Ok(D::map(self.aggregate()?, move |summaries| {
                    settings::to_json(&set.feature_settings(summaries))
                }))
            }
        }
    }

    /// Per-record feature vectors assembled with fresh instances of the
    /// given builder.
    pub fn feature_values<B>(&self, builder: &B) -> Result<D::Coll<B::Output>>
    where
        B: FeatureBuilder + Sync,
        B::Output: Send + Sync + 'static,
    {
        let set = self.feature_set.clone();
        let paired = D::cross(self.raw_coll(), self.aggregate()?);
        Ok(D::map(&paired, move |((_, raws), summaries)| {
            let mut b = builder.fresh();
            set.feature_values(raws, summaries, &mut b)
        }))
    }

    /// Like [`feature_values`], pairing each output with its source record.
    ///
    /// [`feature_values`]: FeatureExtractor::feature_values
    pub fn feature_values_with_original<B>(&self, builder: &B) -> Result<D::Coll<(B::Output, T)>>
    where
        B: FeatureBuilder + Sync,
        B::Output: Send + Sync + 'static,
    {
        let set = self.feature_set.clone();
        let paired = D::cross(self.raw_coll(), self.aggregate()?);
        Ok(D::map(&paired, move |((record, raws), summaries)| {
            let mut b = builder.fresh();
            (set.feature_values(raws, summaries, &mut b), record.clone())
        }))
    }
}
