//! Mode-driven geocoding dispatch with fallback cascades.
//!
//! Each mode maps to an ordered list of attempt specs via the pure
//! [`plan`] function; a single generic executor sends them one at a time and
//! stops at the first attempt whose candidate list is non-empty. Candidates
//! from different attempts are never merged or re-ranked: the winning
//! attempt's list is returned untouched.

use tracing::{debug, warn};

use crate::compose::{build_address, build_city, clean_street};
use crate::error::GatewayError;
use crate::models::{AddressQuery, CallType, GeocodeMode, GeocodeOutcome};
use crate::pelias::{features, GeocodeRequest, PeliasClient, PeliasError};

/// One planned call to Pelias: the request shape plus the strategy names
/// that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttemptSpec {
    pub request: GeocodeRequest,
    pub transformers: Vec<&'static str>,
}

/// Map a query and mode to the ordered attempt cascade.
///
/// Variants that collapse to a request already planned (e.g. cleaning a
/// street that needs no cleaning) are dropped so the cascade never repeats
/// an identical upstream call.
pub fn plan(query: &AddressQuery, mode: GeocodeMode) -> Vec<AttemptSpec> {
    let specs = match mode {
        GeocodeMode::Basic | GeocodeMode::PeliasStruct => {
            vec![structured(query, query.street_name.as_deref(), true, &[])]
        }
        GeocodeMode::PeliasStructNoloc => {
            vec![structured(query, query.street_name.as_deref(), false, &[])]
        }
        GeocodeMode::PeliasUnstruct => {
            vec![unstructured(query, true, &[])]
        }
        GeocodeMode::Simple => vec![
            structured(query, query.street_name.as_deref(), true, &["struct"]),
            unstructured(query, true, &["unstruct"]),
        ],
        GeocodeMode::Advanced => {
            let cleaned = query.street_name.as_deref().map(clean_street);
            vec![
                structured(query, query.street_name.as_deref(), true, &[]),
                structured(query, cleaned.as_deref(), true, &["clean"]),
                structured(query, cleaned.as_deref(), false, &["clean", "no_city"]),
                unstructured(query, true, &["unstruct"]),
                unstructured(query, false, &["unstruct", "no_city_name"]),
            ]
        }
    };

    let mut deduped: Vec<AttemptSpec> = Vec::with_capacity(specs.len());
    for spec in specs {
        if !deduped.iter().any(|seen| seen.request == spec.request) {
            deduped.push(spec);
        }
    }
    deduped
}

fn structured(
    query: &AddressQuery,
    street: Option<&str>,
    with_locality: bool,
    transformers: &[&'static str],
) -> AttemptSpec {
    AttemptSpec {
        request: GeocodeRequest::Structured {
            address: build_address(street, query.house_number.as_deref()),
            postalcode: query.post_code.clone(),
            locality: if with_locality {
                query.post_name.clone()
            } else {
                None
            },
        },
        transformers: transformers.to_vec(),
    }
}

fn unstructured(
    query: &AddressQuery,
    with_city_name: bool,
    transformers: &[&'static str],
) -> AttemptSpec {
    let address = build_address(query.street_name.as_deref(), query.house_number.as_deref());
    let city = build_city(
        query.post_code.as_deref(),
        if with_city_name {
            query.post_name.as_deref()
        } else {
            None
        },
    );

    let text = [address, city]
        .into_iter()
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(", ");

    AttemptSpec {
        request: GeocodeRequest::Unstructured(text),
        transformers: transformers.to_vec(),
    }
}

/// Drive the cascade for one request.
///
/// Attempts are issued strictly one at a time; an errored attempt still
/// counts but the cascade moves on. The call only fails when every attempt
/// errored. An exhausted cascade with zero candidates is a normal, empty
/// outcome.
pub async fn resolve(
    pelias: &PeliasClient,
    query: &AddressQuery,
    mode: GeocodeMode,
) -> Result<GeocodeOutcome, GatewayError> {
    let mut call_count = 0u32;
    let mut last_empty: Option<(AttemptSpec, serde_json::Value)> = None;
    let mut last_error: Option<PeliasError> = None;

    for spec in plan(query, mode) {
        call_count += 1;
        debug!("attempt {}: {:?}", call_count, spec.transformers);

        match pelias.geocode(&spec.request).await {
            Ok(body) => {
                if !features(&body).is_empty() {
                    return Ok(outcome(spec, body, call_count));
                }
                last_empty = Some((spec, body));
            }
            Err(err) => {
                warn!("geocode attempt failed: {}", err);
                last_error = Some(err);
            }
        }
    }

    match (last_empty, last_error) {
        (Some((spec, body)), _) => Ok(outcome(spec, body, call_count)),
        (None, Some(err)) => Err(GatewayError::Upstream(err)),
        // plan() always yields at least one attempt, so this is unreachable,
        // but the types require an arm.
        (None, None) => Err(GatewayError::Upstream(PeliasError::Status {
            status: 0,
            body: "no attempt was planned".into(),
        })),
    }
}

fn outcome(spec: AttemptSpec, body: serde_json::Value, call_count: u32) -> GeocodeOutcome {
    GeocodeOutcome {
        items: features(&body).to_vec(),
        in_addr: spec.request.payload(),
        call_type: match spec.request {
            GeocodeRequest::Structured { .. } => CallType::Struct,
            GeocodeRequest::Unstructured(_) => CallType::Unstruct,
        },
        pelias_raw: body,
        pelias_call_count: call_count,
        transformers: spec.transformers.iter().map(|t| t.to_string()).collect(),
    }
}
