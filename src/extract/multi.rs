//! Multi-spec extractor: one extraction pass, G parallel outputs

use std::sync::Arc;

use crate::builder::FeatureBuilder;
use crate::collection::CollectionDriver;
use crate::core::error::Result;
use crate::spec::entry::SlotVec;
use crate::spec::feature_set::FeatureSet;

use super::FeatureExtractor;

/// Extractor for a [`MultiFeatureSpec`]: extraction and aggregation run once
/// over the union spec; every query buckets its result by group.
///
/// [`MultiFeatureSpec`]: crate::spec::MultiFeatureSpec
pub struct MultiFeatureExtractor<D: CollectionDriver, T: Clone + Send + Sync + 'static> {
    inner: FeatureExtractor<D, T>,
    groups: Arc<Vec<usize>>,
    num_groups: usize,
}

impl<D: CollectionDriver, T: Clone + Send + Sync + 'static> MultiFeatureExtractor<D, T> {
    pub(crate) fn new(
        feature_set: Arc<FeatureSet<T>>,
        input: D::Coll<T>,
        settings: Option<String>,
        groups: Arc<Vec<usize>>,
        num_groups: usize,
    ) -> Self {
        MultiFeatureExtractor {
            inner: FeatureExtractor::new(feature_set, input, settings),
            groups,
            num_groups,
        }
    }

    /// Feature names per group, in group order.
    pub fn feature_names(&self) -> Result<D::Coll<Vec<Vec<String>>>> {
        let set = self.inner.feature_set().clone();
        let groups = self.groups.clone();
        let num_groups = self.num_groups;
        Ok(D::map(self.inner.aggregate()?, move |summaries| {
            set.grouped_names(summaries, &groups, num_groups)
        }))
    }

    /// Emitted width per group, in group order.
    pub fn feature_dimensions(&self) -> Result<D::Coll<Vec<usize>>> {
        let set = self.inner.feature_set().clone();
        let groups = self.groups.clone();
        let num_groups = self.num_groups;
        Ok(D::map(self.inner.aggregate()?, move |summaries| {
            set.grouped_dimensions(summaries, &groups, num_groups)
        }))
    }

    /// Settings blob for the union spec.
    pub fn feature_settings(&self) -> Result<D::Coll<String>> {
        self.inner.feature_settings()
    }

    /// Per-record outputs, one per group in group order, each assembled
    /// with an independent fresh instance of the given builder.
    pub fn feature_values<B>(&self, builder: &B) -> Result<D::Coll<Vec<B::Output>>>
    where
        B: FeatureBuilder + Sync,
        B::Output: Send + Sync + 'static,
    {
        let set = self.inner.feature_set().clone();
        let groups = self.groups.clone();
        let num_groups = self.num_groups;
        let paired = D::cross(self.inner.raw_coll(), self.inner.aggregate()?);
        Ok(D::map(&paired, move |((_, raws), summaries)| {
            emit_grouped(&set, raws, summaries, &groups, num_groups, builder)
        }))
    }
}

fn emit_grouped<T, B>(
    set: &FeatureSet<T>,
    raws: &SlotVec,
    summaries: &SlotVec,
    groups: &[usize],
    num_groups: usize,
    prototype: &B,
) -> Vec<B::Output>
where
    B: FeatureBuilder,
{
    let mut builders: Vec<B> = (0..num_groups).map(|_| prototype.fresh()).collect();
    set.emit(raws, summaries, groups, &mut builders);
    builders.iter_mut().map(|b| b.build()).collect()
}
