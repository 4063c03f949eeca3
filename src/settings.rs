//! Settings blob schema and JSON codec
//!
//! A fitted spec serializes to a JSON array with one object per transformer,
//! in entry order:
//!
//! ```json
//! [{ "name": "x", "params": { "min": "0", "max": "1" }, "aggregators": "0,10" }]
//! ```
//!
//! `aggregators` is the transformer-defined encoding of its presented
//! summary, opaque to the engine; it is `null` when the transformer's slot
//! never received a value during the fit pass. Unknown extra fields are
//! tolerated on read so settings written by newer versions stay loadable.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::core::error::Result;

/// One transformer's serialized state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransformerSettings {
    pub name: String,
    #[serde(default)]
    pub params: BTreeMap<String, String>,
    #[serde(default)]
    pub aggregators: Option<String>,
}

/// Parses a settings blob.
pub fn from_json(json: &str) -> Result<Vec<TransformerSettings>> {
    Ok(serde_json::from_str(json)?)
}

/// Serializes a settings blob.
pub fn to_json(settings: &[TransformerSettings]) -> String {
    serde_json::to_string(settings).expect("settings serialize to plain JSON values")
}
