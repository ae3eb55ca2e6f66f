//! City-level search by postal code and/or name.

use serde_json::{json, Value};
use tracing::debug;

use crate::elasticsearch::EsClient;
use crate::error::GatewayError;
use crate::models::CanonicalRecord;

/// Build the locality-layer boolean query for a city search.
///
/// With neither field given the query degenerates to "all locality
/// documents"; callers are expected to avoid that, but it is not rejected
/// here.
pub fn build_city_query(post_code: Option<&str>, post_name: Option<&str>) -> Value {
    let mut must = vec![json!({ "term": { "layer": "locality" } })];

    if let Some(post_code) = post_code {
        must.push(json!({ "term": { "address_parts.zip": post_code } }));
    }
    if let Some(post_name) = post_name {
        // Lucene syntax: embedded backslashes and quotes would otherwise
        // terminate the phrase early.
        let escaped = post_name.replace('\\', "\\\\").replace('"', "\\\"");
        must.push(json!({
            "query_string": { "query": format!("name.default:\"{escaped}\"") }
        }));
    }

    json!({ "query": { "bool": { "must": must } } })
}

/// Search localities matching a post code and/or post name, deduplicated.
pub async fn search_city(
    es: &EsClient,
    post_code: Option<&str>,
    post_name: Option<&str>,
) -> Result<Vec<CanonicalRecord>, GatewayError> {
    debug!("search city: {:?} / {:?}", post_code, post_name);

    let hits = es.search(build_city_query(post_code, post_name)).await?;
    let records = hits.iter().filter_map(super::record_from_hit).collect();

    Ok(super::dedup(records))
}
