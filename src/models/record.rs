//! Canonical records mapped out of raw search-index hits.

use serde::Serialize;
use serde_json::Value;

/// A normalized record built from one Elasticsearch hit carrying a BeSt
/// `addendum.best` payload.
///
/// Equality is structural; [`CanonicalRecord::dedup_key`] gives a stable key
/// for first-seen-order deduplication (serde_json object keys serialize
/// sorted, so the key is canonical regardless of upstream field order).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CanonicalRecord {
    pub properties: RecordProperties,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub geometry: Option<RecordGeometry>,
    pub name: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecordProperties {
    pub addendum: RecordAddendum,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecordAddendum {
    /// Decoded BeSt payload (stored serialized in the index).
    pub best: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecordGeometry {
    pub coordinates: Value,
}

impl CanonicalRecord {
    pub fn new(best: Value, coordinates: Option<Value>, name: Value) -> Self {
        Self {
            properties: RecordProperties {
                addendum: RecordAddendum { best },
            },
            geometry: coordinates.map(|coordinates| RecordGeometry { coordinates }),
            name,
        }
    }

    /// Stable structural key used for deduplication.
    pub fn dedup_key(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }
}
