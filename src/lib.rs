//! # featrs
//!
//! Declarative feature extraction and transformation for machine learning
//! pipelines.
//!
//! A feature specification names the raw fields to extract from a record
//! type and the transformer to apply to each. Extraction runs in two
//! phases: a distributed-friendly reduce over the dataset computes
//! per-transformer summary statistics, then a map emits numeric feature
//! vectors using those summaries. A fitted specification serializes to a
//! settings blob and can be replayed against new data without re-running
//! the reduce.
//!
//! ```
//! use featrs::builder::DenseVector;
//! use featrs::collection::InMemory;
//! use featrs::spec::FeatureSpec;
//! use featrs::transformer::MinMaxScaler;
//!
//! let spec = FeatureSpec::<f64>::of().required(|x: &f64| *x, MinMaxScaler::new("x"));
//! let extractor = spec.extract::<InMemory>(vec![0.0, 5.0, 10.0]).unwrap();
//! let values = extractor.feature_values(&DenseVector::new()).unwrap();
//! assert_eq!(values, vec![vec![0.0], vec![0.5], vec![1.0]]);
//! ```

// Core module with fundamental types and error handling
pub mod core;

// Monoidal aggregation primitives
pub mod aggregator;

// Feature builders: per-record output sinks
pub mod builder;

// Collection capability and the shipped drivers
pub mod collection;

// Extractors: the lazily evaluated phase graph
pub mod extract;

// Settings blob schema and codec
pub mod settings;

// Specification DSL, feature sets, multi-specs
pub mod spec;

// Transformer contract and the shipped transformer set
pub mod transformer;

// Re-export core types
pub use crate::core::error::{Error, Result};

// Re-export the user-facing surface
pub use builder::{
    DenseOptionVector, DenseVector, FeatureBuilder, FeatureSink, NamedMap, SparseEntries,
    SparseVector,
};
pub use collection::{CollectionDriver, InMemory};
#[cfg(feature = "parallel")]
pub use collection::Threaded;
pub use extract::{FeatureExtractor, MultiFeatureExtractor};
pub use settings::TransformerSettings;
pub use spec::{cross_name, FeatureSpec, MultiFeatureSpec};
pub use transformer::{
    Binarizer, Bucketizer, Identity, MaxAbsScaler, MinMaxScaler, NHotEncoder, OneHotEncoder,
    QuantileDiscretizer, StandardScaler, Transformer, VectorIdentity,
};

// Export version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
