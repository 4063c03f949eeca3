//! Multi-spec: several specs sharing one extraction pass
//!
//! A [`MultiFeatureSpec`] bundles G specs into one, remembering each entry's
//! group. Extraction and aggregation run once over the union; emission routes
//! each entry's block to its group's builder, producing G parallel outputs
//! per record in group order.

use std::sync::Arc;

use crate::collection::CollectionDriver;
use crate::core::error::{Error, Result};
use crate::extract::MultiFeatureExtractor;
use crate::settings;

use super::entry::FeatureEntry;
use super::feature_set::FeatureSet;
use super::{CrossDecl, FeatureSpec};

/// A group-aware bundle of feature specs.
pub struct MultiFeatureSpec<T: 'static> {
    entries: Vec<Arc<dyn FeatureEntry<T>>>,
    crossings: Vec<CrossDecl>,
    /// Group id per entry, parallel to `entries`.
    groups: Vec<usize>,
    num_groups: usize,
}

impl<T: 'static> Clone for MultiFeatureSpec<T> {
    fn clone(&self) -> Self {
        MultiFeatureSpec {
            entries: self.entries.clone(),
            crossings: self.crossings.clone(),
            groups: self.groups.clone(),
            num_groups: self.num_groups,
        }
    }
}

impl<T: Send + Sync + 'static> MultiFeatureSpec<T> {
    /// Bundles the given specs; group ids follow the argument order.
    ///
    /// Fails on an empty list, on duplicate transformer names across the
    /// union, on cross declarations referencing unknown names, and on
    /// crossings whose endpoints land in different groups.
    pub fn new(specs: Vec<FeatureSpec<T>>) -> Result<Self> {
        if specs.is_empty() {
            return Err(Error::EmptySpec);
        }
        let num_groups = specs.len();
        let mut entries = Vec::new();
        let mut crossings = Vec::new();
        let mut groups = Vec::new();
        for (group, spec) in specs.into_iter().enumerate() {
            groups.extend(std::iter::repeat(group).take(spec.entries.len()));
            entries.extend(spec.entries);
            crossings.extend(spec.crossings);
        }
        let multi = MultiFeatureSpec {
            entries,
            crossings,
            groups,
            num_groups,
        };
        // Surface structural errors at construction, before any data.
        let set = multi.feature_set()?;
        set.check_same_group_crossings(&multi.groups)?;
        Ok(multi)
    }

    /// Number of parallel output vectors.
    pub fn num_groups(&self) -> usize {
        self.num_groups
    }

    /// Derives a multi-spec retaining only the entries whose name matches
    /// the predicate. Crossings with a removed endpoint are pruned; group
    /// ids of the survivors are preserved, so the output arity is unchanged
    /// and a group whose entries were all removed emits empty vectors.
    pub fn filter(&self, predicate: impl Fn(&str) -> bool) -> MultiFeatureSpec<T> {
        let mut entries = Vec::new();
        let mut groups = Vec::new();
        for (entry, group) in self.entries.iter().zip(self.groups.iter()) {
            if predicate(entry.name()) {
                entries.push(entry.clone());
                groups.push(*group);
            }
        }
        let kept = |name: &str| entries.iter().any(|e| e.name() == name);
        let crossings = self
            .crossings
            .iter()
            .filter(|c| kept(&c.left) && kept(&c.right))
            .cloned()
            .collect();
        MultiFeatureSpec {
            entries,
            crossings,
            groups,
            num_groups: self.num_groups,
        }
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

impl<T: Clone + Send + Sync + 'static> MultiFeatureSpec<T> {
    /// Fits the union spec against a dataset.
    pub fn extract<D: CollectionDriver>(
        &self,
        input: D::Coll<T>,
    ) -> Result<MultiFeatureExtractor<D, T>> {
        let set = Arc::new(self.feature_set()?);
        Ok(MultiFeatureExtractor::new(
            set,
            input,
            None,
            Arc::new(self.groups.clone()),
            self.num_groups,
        ))
    }

    /// Replays previously fitted settings; no reduce runs.
    pub fn extract_with_settings<D: CollectionDriver>(
        &self,
        input: D::Coll<T>,
        settings: &str,
    ) -> Result<MultiFeatureExtractor<D, T>> {
        let set = Arc::new(self.feature_set()?);
        Ok(MultiFeatureExtractor::new(
            set,
            input,
            Some(settings.to_string()),
            Arc::new(self.groups.clone()),
            self.num_groups,
        ))
    }

    /// Replays settings that cover only a subset of this spec's
    /// transformers: the spec is first filtered to the transformers the
    /// settings mention, then replayed.
    pub fn extract_with_subset_settings<D: CollectionDriver>(
        &self,
        input: D::Coll<T>,
        settings_json: &str,
    ) -> Result<MultiFeatureExtractor<D, T>> {
        let parsed = settings::from_json(settings_json)?;
        let set = self.feature_set()?;
        let known = set.known_names(&parsed);
        let filtered = self.filter(|name| known.contains(name));
        filtered.extract_with_settings(input, settings_json)
    }
}
