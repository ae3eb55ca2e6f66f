//! Bookkeeping produced by one orchestrated geocoding request.

use serde::Serialize;
use serde_json::Value;

/// Which request shape won the cascade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CallType {
    Struct,
    Unstruct,
}

/// Result of one inbound geocoding request.
///
/// `items` is the winning attempt's candidate list exactly as Pelias returned
/// it; candidates from different attempts are never merged or re-ranked.
#[derive(Debug, Clone)]
pub struct GeocodeOutcome {
    pub items: Vec<Value>,
    /// Raw Pelias response of the winning (or last successful) attempt.
    pub pelias_raw: Value,
    pub call_type: CallType,
    /// The exact payload sent to Pelias for the winning attempt.
    pub in_addr: Value,
    /// Number of Pelias calls actually issued, including errored ones.
    pub pelias_call_count: u32,
    /// Ordered strategy names applied before the winning attempt was sent.
    pub transformers: Vec<String>,
}
