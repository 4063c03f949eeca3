//! Scalers with learned range or moment statistics

use std::collections::BTreeMap;

use super::{decode_f64, decode_u64, Transformer};
use crate::builder::FeatureSink;
use crate::core::error::{Error, Result};

/// Scales values into a target range using the observed `(min, max)`.
///
/// The default target range is `[0, 1]`. A degenerate observed range
/// (`min == max`) emits the lower bound of the target range. Replay values
/// outside the fitted range are scaled linearly and may fall outside the
/// target range; no clamping is applied.
#[derive(Debug, Clone)]
pub struct MinMaxScaler {
    name: String,
    lo: f64,
    hi: f64,
}

/// Observed value range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValueRange {
    pub min: f64,
    pub max: f64,
}

impl MinMaxScaler {
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_range(name, 0.0, 1.0)
    }

    /// Target output range `[lo, hi]`.
    pub fn with_range(name: impl Into<String>, lo: f64, hi: f64) -> Self {
        MinMaxScaler {
            name: name.into(),
            lo,
            hi,
        }
    }
}

impl Transformer for MinMaxScaler {
    type Input = f64;
    type State = ValueRange;
    type Summary = ValueRange;

    fn name(&self) -> &str {
        &self.name
    }

    fn prepare(&self, input: &f64) -> ValueRange {
        ValueRange {
            min: *input,
            max: *input,
        }
    }

    fn combine(&self, lhs: ValueRange, rhs: ValueRange) -> ValueRange {
        ValueRange {
            min: lhs.min.min(rhs.min),
            max: lhs.max.max(rhs.max),
        }
    }

    fn present(&self, state: ValueRange) -> Result<ValueRange> {
        Ok(state)
    }

    fn feature_dimension(&self, _summary: &ValueRange) -> usize {
        1
    }

    fn feature_names(&self, _summary: &ValueRange) -> Vec<String> {
        vec![self.name.clone()]
    }

    fn build_features(
        &self,
        input: Option<&f64>,
        summary: &ValueRange,
        sink: &mut dyn FeatureSink,
    ) {
        match input {
            Some(x) => {
                let span = summary.max - summary.min;
                let scaled = if span > 0.0 {
                    (x - summary.min) / span * (self.hi - self.lo) + self.lo
                } else {
                    self.lo
                };
                sink.add(&self.name, scaled);
            }
            None => sink.skip(),
        }
    }

    fn encode_aggregator(&self, summary: &ValueRange) -> String {
        format!("{},{}", summary.min, summary.max)
    }

    fn decode_aggregator(&self, encoded: &str) -> Result<ValueRange> {
        let (min, max) = encoded.split_once(',').ok_or_else(|| Error::AggregatorDecode {
            name: self.name.clone(),
            reason: "expected two comma-separated fields".to_string(),
        })?;
        Ok(ValueRange {
            min: decode_f64(&self.name, min)?,
            max: decode_f64(&self.name, max)?,
        })
    }

    fn params(&self) -> BTreeMap<String, String> {
        BTreeMap::from([
            ("min".to_string(), self.lo.to_string()),
            ("max".to_string(), self.hi.to_string()),
        ])
    }
}

/// Running moments, merged with the parallel Welford update.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Moments {
    pub count: u64,
    pub mean: f64,
    pub m2: f64,
}

impl Moments {
    fn merge(self, other: Moments) -> Moments {
        if self.count == 0 {
            return other;
        }
        if other.count == 0 {
            return self;
        }
        let count = self.count + other.count;
        let delta = other.mean - self.mean;
        let mean = self.mean + delta * other.count as f64 / count as f64;
        let m2 = self.m2
            + other.m2
            + delta * delta * self.count as f64 * other.count as f64 / count as f64;
        Moments { count, mean, m2 }
    }

    fn std_dev(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            (self.m2 / self.count as f64).sqrt()
        }
    }
}

/// Standardizes values using learned moments.
///
/// By default divides by the population standard deviation without centering,
/// so that replayed sparse data keeps its zero point. Enable centering with
/// [`with_mean`]. A zero observed variance emits `0.0`.
///
/// [`with_mean`]: StandardScaler::with_mean
#[derive(Debug, Clone)]
pub struct StandardScaler {
    name: String,
    with_mean: bool,
    with_std: bool,
}

impl StandardScaler {
    pub fn new(name: impl Into<String>) -> Self {
        StandardScaler {
            name: name.into(),
            with_mean: false,
            with_std: true,
        }
    }

    pub fn with_mean(mut self, with_mean: bool) -> Self {
        self.with_mean = with_mean;
        self
    }

    pub fn with_std(mut self, with_std: bool) -> Self {
        self.with_std = with_std;
        self
    }
}

impl Transformer for StandardScaler {
    type Input = f64;
    type State = Moments;
    type Summary = Moments;

    fn name(&self) -> &str {
        &self.name
    }

    fn prepare(&self, input: &f64) -> Moments {
        Moments {
            count: 1,
            mean: *input,
            m2: 0.0,
        }
    }

    fn combine(&self, lhs: Moments, rhs: Moments) -> Moments {
        lhs.merge(rhs)
    }

    fn present(&self, state: Moments) -> Result<Moments> {
        Ok(state)
    }

    fn feature_dimension(&self, _summary: &Moments) -> usize {
        1
    }

    fn feature_names(&self, _summary: &Moments) -> Vec<String> {
        vec![self.name.clone()]
    }

    fn build_features(&self, input: Option<&f64>, summary: &Moments, sink: &mut dyn FeatureSink) {
        match input {
            Some(x) => {
                let centered = if self.with_mean { x - summary.mean } else { *x };
                let value = if self.with_std {
                    let std = summary.std_dev();
                    if std > 0.0 {
                        centered / std
                    } else {
                        0.0
                    }
                } else {
                    centered
                };
                sink.add(&self.name, value);
            }
            None => sink.skip(),
        }
    }

    fn encode_aggregator(&self, summary: &Moments) -> String {
        format!("{},{},{}", summary.count, summary.mean, summary.m2)
    }

    fn decode_aggregator(&self, encoded: &str) -> Result<Moments> {
        let fields: Vec<&str> = encoded.split(',').collect();
        if fields.len() != 3 {
            return Err(Error::AggregatorDecode {
                name: self.name.clone(),
                reason: "expected three comma-separated fields".to_string(),
            });
        }
        Ok(Moments {
            count: decode_u64(&self.name, fields[0])?,
            mean: decode_f64(&self.name, fields[1])?,
            m2: decode_f64(&self.name, fields[2])?,
        })
    }

    fn params(&self) -> BTreeMap<String, String> {
        BTreeMap::from([
            ("withMean".to_string(), self.with_mean.to_string()),
            ("withStd".to_string(), self.with_std.to_string()),
        ])
    }
}

/// Divides values by the observed `max(|x|)`, mapping into `[-1, 1]` for the
/// fitted data. A degenerate maximum of zero emits `0.0`.
#[derive(Debug, Clone)]
pub struct MaxAbsScaler {
    name: String,
}

impl MaxAbsScaler {
    pub fn new(name: impl Into<String>) -> Self {
        MaxAbsScaler { name: name.into() }
    }
}

impl Transformer for MaxAbsScaler {
    type Input = f64;
    type State = f64;
    type Summary = f64;

    fn name(&self) -> &str {
        &self.name
    }

    fn prepare(&self, input: &f64) -> f64 {
        input.abs()
    }

    fn combine(&self, lhs: f64, rhs: f64) -> f64 {
        lhs.max(rhs)
    }

    fn present(&self, state: f64) -> Result<f64> {
        Ok(state)
    }

    fn feature_dimension(&self, _summary: &f64) -> usize {
        1
    }

    fn feature_names(&self, _summary: &f64) -> Vec<String> {
        vec![self.name.clone()]
    }

    fn build_features(&self, input: Option<&f64>, summary: &f64, sink: &mut dyn FeatureSink) {
        match input {
            Some(x) => {
                let value = if *summary > 0.0 { x / summary } else { 0.0 };
                sink.add(&self.name, value);
            }
            None => sink.skip(),
        }
    }

    fn encode_aggregator(&self, summary: &f64) -> String {
        summary.to_string()
    }

    fn decode_aggregator(&self, encoded: &str) -> Result<f64> {
        decode_f64(&self.name, encoded)
    }
}
