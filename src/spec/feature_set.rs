//! Feature set: the per-record and per-dataset workflows
//!
//! A feature set is the validated form of a spec: an ordered array of
//! type-erased entries plus the cross declarations resolved to entry
//! indices. It owns every phase of the pipeline: per-record extraction into
//! raw slots, prepare, the associative slot-wise combine the dataset reduce
//! runs on, present, and the per-record emission pass with cross products.
//!
//! Emission is group-aware so the multi-spec path can route entries into
//! parallel builders; the single-spec path is the one-group case.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use crate::aggregator::combine_options;
use crate::builder::{FeatureBuilder, FeatureSink};
use crate::core::error::{Error, Result};
use crate::settings::TransformerSettings;

use super::entry::{FeatureEntry, Slot, SlotVec};

/// Joins two feature names into a cross-product column name.
///
/// The combining string is injective over names sanitized to
/// `[A-Za-z0-9_]`, so cross names cannot collide with transformer names.
pub fn cross_name(left: &str, right: &str) -> String {
    format!("{}_x_{}", left, right)
}

/// A cross declaration resolved to entry positions.
pub(crate) struct Crossing {
    pub(crate) left: usize,
    pub(crate) right: usize,
    pub(crate) combine: Arc<dyn Fn(f64, f64) -> f64 + Send + Sync>,
}

/// Ordered entries plus crossings; immutable once constructed.
pub(crate) struct FeatureSet<T> {
    entries: Vec<Arc<dyn FeatureEntry<T>>>,
    crossings: Vec<Crossing>,
    // All-zero group assignment used by the single-spec emission path.
    single_group: Vec<usize>,
}

/// Sink wrapper that forwards to the underlying builder while recording the
/// block's cells, so cross products can be computed without re-running the
/// transformer.
struct TapSink<'a, S: FeatureSink> {
    inner: &'a mut S,
    tap: Vec<Option<f64>>,
}

impl<S: FeatureSink> FeatureSink for TapSink<'_, S> {
    fn add(&mut self, name: &str, value: f64) {
        self.inner.add(name, value);
        self.tap.push(Some(value));
    }

    fn skip(&mut self) {
        self.inner.skip();
        self.tap.push(None);
    }
}

impl<T> FeatureSet<T> {
    /// Validates and resolves a spec. Fails on duplicate transformer names
    /// and on cross declarations referencing unknown names.
    pub(crate) fn new(
        entries: Vec<Arc<dyn FeatureEntry<T>>>,
        crossings: Vec<(String, String, Arc<dyn Fn(f64, f64) -> f64 + Send + Sync>)>,
    ) -> Result<Self> {
        let mut index = HashMap::with_capacity(entries.len());
        for (i, entry) in entries.iter().enumerate() {
            if index.insert(entry.name().to_string(), i).is_some() {
                return Err(Error::DuplicateTransformer(entry.name().to_string()));
            }
        }

        let mut resolved = Vec::with_capacity(crossings.len());
        for (left, right, combine) in crossings {
            let l = *index
                .get(&left)
                .ok_or_else(|| Error::TransformerNotFound(left.clone()))?;
            let r = *index
                .get(&right)
                .ok_or_else(|| Error::TransformerNotFound(right.clone()))?;
            resolved.push(Crossing {
                left: l,
                right: r,
                combine,
            });
        }

        let single_group = vec![0; entries.len()];
        Ok(FeatureSet {
            entries,
            crossings: resolved,
            single_group,
        })
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    /// Per-record extraction: position `i` holds entry `i`'s raw input.
    pub(crate) fn raw_slots(&self, record: &T) -> SlotVec {
        self.entries.iter().map(|e| e.raw(record)).collect()
    }

    /// Maps raw slots to partial-state slots.
    pub(crate) fn prepare_slots(&self, raws: &SlotVec) -> SlotVec {
        self.entries
            .iter()
            .zip(raws.iter())
            .map(|(e, raw)| raw.as_ref().map(|r| e.prepare(r)))
            .collect()
    }

    /// Element-wise option-combine of two partial-state arrays. Associative,
    /// so the dataset reduce may apply it in any tree shape.
    pub(crate) fn combine_slots(&self, lhs: &SlotVec, rhs: &SlotVec) -> SlotVec {
        self.entries
            .iter()
            .zip(lhs.iter().zip(rhs.iter()))
            .map(|(e, (l, r))| {
                combine_options(|a: Slot, b: Slot| e.combine(&a, &b), l.clone(), r.clone())
            })
            .collect()
    }

    /// Maps partial-state slots to summary slots.
    pub(crate) fn present_slots(&self, states: &SlotVec) -> Result<SlotVec> {
        self.entries
            .iter()
            .zip(states.iter())
            .map(|(e, state)| state.as_ref().map(|s| e.present(s)).transpose())
            .collect()
    }

    /// Per-entry widths; an absent summary has width zero.
    fn widths(&self, summaries: &SlotVec) -> Vec<usize> {
        self.entries
            .iter()
            .zip(summaries.iter())
            .map(|(e, s)| s.as_ref().map(|c| e.dimension(c)).unwrap_or(0))
            .collect()
    }

    /// Per-group total widths: each group sums its entries' widths plus
    /// `w_left * w_right` for each of its crossings.
    pub(crate) fn grouped_dimensions(
        &self,
        summaries: &SlotVec,
        groups: &[usize],
        num_groups: usize,
    ) -> Vec<usize> {
        let widths = self.widths(summaries);
        let mut dims = vec![0usize; num_groups];
        for (i, w) in widths.iter().enumerate() {
            dims[groups[i]] += w;
        }
        for c in &self.crossings {
            dims[groups[c.left]] += widths[c.left] * widths[c.right];
        }
        dims
    }

    /// Total emitted width.
    pub(crate) fn feature_dimension(&self, summaries: &SlotVec) -> usize {
        self.grouped_dimensions(summaries, &self.single_group, 1)[0]
    }

    /// Per-group name sequences: entry blocks in declaration order, then
    /// cross blocks in declaration order, each cross block the left-major
    /// product of its endpoint names.
    pub(crate) fn grouped_names(
        &self,
        summaries: &SlotVec,
        groups: &[usize],
        num_groups: usize,
    ) -> Vec<Vec<String>> {
        let widths = self.widths(summaries);
        let mut names = vec![Vec::new(); num_groups];
        for (i, entry) in self.entries.iter().enumerate() {
            if let Some(summary) = summaries[i].as_ref() {
                names[groups[i]].extend(entry.names(summary));
            }
        }
        for c in &self.crossings {
            if widths[c.left] == 0 || widths[c.right] == 0 {
                continue;
            }
            let left = self.block_names(c.left, summaries);
            let right = self.block_names(c.right, summaries);
            let out = &mut names[groups[c.left]];
            for l in &left {
                for r in &right {
                    out.push(cross_name(l, r));
                }
            }
        }
        names
    }

    /// Emitted feature names, in emission order.
    pub(crate) fn feature_names(&self, summaries: &SlotVec) -> Vec<String> {
        self.grouped_names(summaries, &self.single_group, 1)
            .pop()
            .unwrap_or_default()
    }

    fn block_names(&self, i: usize, summaries: &SlotVec) -> Vec<String> {
        summaries[i]
            .as_ref()
            .map(|s| self.entries[i].names(s))
            .unwrap_or_default()
    }

    /// Routed emission pass: initializes each group's builder to its width,
    /// walks entries in declaration order dispatching each block to its
    /// group's builder, then emits cross blocks. Callers take each builder's
    /// output afterwards.
    pub(crate) fn emit<B: FeatureBuilder>(
        &self,
        raws: &SlotVec,
        summaries: &SlotVec,
        groups: &[usize],
        builders: &mut [B],
    ) {
        let widths = self.widths(summaries);
        let dims = self.grouped_dimensions(summaries, groups, builders.len());
        for (builder, dim) in builders.iter_mut().zip(dims.iter()) {
            builder.init(*dim);
        }

        let mut crossed = vec![false; self.entries.len()];
        for c in &self.crossings {
            crossed[c.left] = true;
            crossed[c.right] = true;
        }

        // Buffered cells of crossed blocks, indexed by entry position.
        let mut taps: Vec<Option<Vec<Option<f64>>>> = vec![None; self.entries.len()];

        for (i, entry) in self.entries.iter().enumerate() {
            let Some(summary) = summaries[i].as_ref() else {
                continue;
            };
            let builder = &mut builders[groups[i]];
            builder.prepare_block(entry.name());
            if crossed[i] {
                let mut tap = TapSink {
                    inner: builder,
                    tap: Vec::with_capacity(widths[i]),
                };
                entry.build_features(raws[i].as_ref(), summary, &mut tap);
                taps[i] = Some(tap.tap);
            } else {
                entry.build_features(raws[i].as_ref(), summary, builder);
            }
        }

        for c in &self.crossings {
            let (wl, wr) = (widths[c.left], widths[c.right]);
            if wl == 0 || wr == 0 {
                continue;
            }
            let builder = &mut builders[groups[c.left]];
            let left = taps[c.left].as_ref().expect("crossed block was emitted");
            let right = taps[c.right].as_ref().expect("crossed block was emitted");
            if left.iter().all(Option::is_none) || right.iter().all(Option::is_none) {
                builder.skip_n(wl * wr);
                continue;
            }
            let left_names = self.block_names(c.left, summaries);
            let right_names = self.block_names(c.right, summaries);
            for (li, l) in left.iter().enumerate() {
                for (ri, r) in right.iter().enumerate() {
                    match (l, r) {
                        (Some(a), Some(b)) => builder.add(
                            &cross_name(&left_names[li], &right_names[ri]),
                            (c.combine)(*a, *b),
                        ),
                        _ => builder.skip(),
                    }
                }
            }
        }
    }

    /// Single-output emission.
    pub(crate) fn feature_values<B: FeatureBuilder>(
        &self,
        raws: &SlotVec,
        summaries: &SlotVec,
        builder: &mut B,
    ) -> B::Output {
        self.emit(raws, summaries, &self.single_group, std::slice::from_mut(builder));
        builder.build()
    }

    /// Serializable per-transformer settings, in entry order.
    pub(crate) fn feature_settings(&self, summaries: &SlotVec) -> Vec<TransformerSettings> {
        self.entries
            .iter()
            .zip(summaries.iter())
            .map(|(e, summary)| TransformerSettings {
                name: e.name().to_string(),
                params: e.params(),
                aggregators: summary.as_ref().map(|s| e.encode(s)),
            })
            .collect()
    }

    /// Rebuilds the summary array from parsed settings, matching by name.
    /// Every declared transformer must be present in the settings.
    pub(crate) fn decode_aggregators(&self, settings: &[TransformerSettings]) -> Result<SlotVec> {
        let by_name: HashMap<&str, &TransformerSettings> =
            settings.iter().map(|s| (s.name.as_str(), s)).collect();
        self.entries
            .iter()
            .map(|entry| {
                let s = by_name
                    .get(entry.name())
                    .ok_or_else(|| Error::MissingSettings(entry.name().to_string()))?;
                s.aggregators
                    .as_deref()
                    .map(|encoded| entry.decode(encoded))
                    .transpose()
            })
            .collect()
    }

    /// Checks that no crossing spans two groups.
    pub(crate) fn check_same_group_crossings(&self, groups: &[usize]) -> Result<()> {
        for c in &self.crossings {
            if groups[c.left] != groups[c.right] {
                return Err(Error::CrossGroup {
                    left: self.entries[c.left].name().to_string(),
                    right: self.entries[c.right].name().to_string(),
                });
            }
        }
        Ok(())
    }

    /// Names mentioned by a settings blob that also exist in this set.
    pub(crate) fn known_names(&self, settings: &[TransformerSettings]) -> HashSet<String> {
        let declared: HashSet<&str> = self.entries.iter().map(|e| e.name()).collect();
        settings
            .iter()
            .filter(|s| declared.contains(s.name.as_str()))
            .map(|s| s.name.clone())
            .collect()
    }
}
