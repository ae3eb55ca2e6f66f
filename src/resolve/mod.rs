//! Resolution of BeSt identifiers and city searches against the search index.

pub mod best_id;
pub mod city;

use std::collections::HashSet;

use serde_json::Value;
use tracing::debug;

use crate::models::CanonicalRecord;

pub use best_id::{parse_best_id, resolve_by_id, EntityType, ParsedBestId};
pub use city::search_city;

/// Map one raw index hit into a canonical record.
///
/// Hits without a serialized `addendum.best` payload carry nothing we can
/// normalize and are skipped.
fn record_from_hit(hit: &Value) -> Option<CanonicalRecord> {
    let source = hit.get("_source")?;
    let best_raw = source.get("addendum")?.get("best")?.as_str()?;

    let best = match serde_json::from_str::<Value>(best_raw) {
        Ok(best) => best,
        Err(err) => {
            debug!("unparseable best payload skipped: {}", err);
            return None;
        }
    };

    Some(CanonicalRecord::new(
        best,
        source.get("center_point").cloned(),
        source.get("name").cloned().unwrap_or(Value::Null),
    ))
}

/// Drop structurally-equal repeats, keeping the first occurrence of each
/// record in its original position.
fn dedup(records: Vec<CanonicalRecord>) -> Vec<CanonicalRecord> {
    let mut seen = HashSet::new();
    records
        .into_iter()
        .filter(|record| seen.insert(record.dedup_key()))
        .collect()
}
