//! Name-keyed map builder

use std::collections::HashMap;

use super::{FeatureBuilder, FeatureSink};

/// Builds a `HashMap<String, f64>` keyed by feature name; skipped cells are
/// omitted entirely.
#[derive(Debug, Clone, Default)]
pub struct NamedMap {
    values: HashMap<String, f64>,
}

impl NamedMap {
    pub fn new() -> Self {
        Self::default()
    }
}

impl FeatureSink for NamedMap {
    fn add(&mut self, name: &str, value: f64) {
        self.values.insert(name.to_string(), value);
    }

    fn skip(&mut self) {}

    fn skip_n(&mut self, _n: usize) {}
}

impl FeatureBuilder for NamedMap {
    type Output = HashMap<String, f64>;

    fn init(&mut self, _dimension: usize) {
        self.values.clear();
    }

    fn build(&mut self) -> HashMap<String, f64> {
        std::mem::take(&mut self.values)
    }

    fn fresh(&self) -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_named_map_omits_skips() {
        let mut b = NamedMap::new();
        b.init(3);
        b.add("x", 1.5);
        b.skip();
        b.add("y", 2.5);
        let out = b.build();
        assert_eq!(out.len(), 2);
        assert_eq!(out["x"], 1.5);
        assert_eq!(out["y"], 2.5);
    }
}
