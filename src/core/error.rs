use thiserror::Error;

/// Error type definitions
///
/// The enum is `Clone` so that memoized pipeline results can replay a failure
/// to every caller of a terminal query.
#[derive(Error, Debug, Clone)]
pub enum Error {
    #[error("Duplicate transformer name: {0}")]
    DuplicateTransformer(String),

    #[error("Transformer not found: {0}")]
    TransformerNotFound(String),

    #[error("Cannot combine an empty list of specs")]
    EmptySpec,

    #[error("Crossing spans two groups: {left} and {right}")]
    CrossGroup { left: String, right: String },

    #[error("Settings JSON error: {0}")]
    SettingsJson(String),

    #[error("Settings missing for transformer: {0}")]
    MissingSettings(String),

    #[error("Aggregator decode failed for {name}: {reason}")]
    AggregatorDecode { name: String, reason: String },

    #[error("Empty aggregation: no records contributed and no settings were supplied")]
    EmptyAggregation,

    #[error("Length mismatch: expected {expected}, actual {actual}")]
    LengthMismatch { expected: usize, actual: usize },

    #[error("Dimension mismatch: expected {expected}, actual {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Invalid value: {0}")]
    InvalidValue(String),

    #[error("Invalid operation: {0}")]
    InvalidOperation(String),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::SettingsJson(err.to_string())
    }
}
