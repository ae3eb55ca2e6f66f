//! BeSt identifier parsing, classification, and index lookup.
//!
//! Identifiers look like `https://databrussels.be/id/address/219307/4` and
//! arrive URL-encoded in transit. Parsing is an explicit grammar: split on
//! the literal `/id/` segment, require a `.be`-suffixed domain before it and
//! a `/`-terminated type token after it, and fail closed on anything else.

use percent_encoding::percent_decode_str;
use serde_json::json;
use tracing::debug;

use crate::elasticsearch::EsClient;
use crate::error::GatewayError;
use crate::models::CanonicalRecord;

/// Entity type classified from a BeSt id's type token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityType {
    Address,
    Street,
    Locality,
}

impl EntityType {
    /// Classify a (lower-cased) type token via the bilingual alias table.
    fn from_token(token: &str) -> Option<Self> {
        match token {
            "address" | "adres" => Some(Self::Address),
            "streetname" | "straatnaam" => Some(Self::Street),
            "municipality" | "gemeente" => Some(Self::Locality),
            _ => None,
        }
    }

    /// The search index's layer value for this entity type.
    pub fn layer(self) -> &'static str {
        match self {
            Self::Address => "address",
            Self::Street => "street",
            Self::Locality => "locality",
        }
    }
}

/// A decoded and classified BeSt identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedBestId {
    /// The `.be`-suffixed domain preceding `/id/`.
    pub domain: String,
    pub entity_type: EntityType,
    /// Lower-cased full identifier, as stored in the index's `source_id`.
    pub canonical: String,
}

/// Parse an opaque, possibly URL-encoded BeSt identifier.
pub fn parse_best_id(raw: &str) -> Result<ParsedBestId, GatewayError> {
    let decoded = if raw.contains("%2F") || raw.contains("%2f") {
        percent_decode_str(raw).decode_utf8_lossy().into_owned()
    } else {
        raw.to_string()
    };

    let canonical = decoded.to_lowercase();

    let id_pos = canonical
        .find("/id/")
        .ok_or_else(|| GatewayError::MalformedIdentifier(decoded.clone()))?;

    // Domain: the host-like run of [a-z0-9.-] directly before "/id/", which
    // must end in ".be".
    let before = &canonical[..id_pos];
    let domain_start = before
        .rfind(|c: char| !(c.is_ascii_alphanumeric() || c == '.' || c == '-'))
        .map(|i| i + 1)
        .unwrap_or(0);
    let domain = &before[domain_start..];
    if !domain.ends_with(".be") {
        return Err(GatewayError::MalformedIdentifier(decoded));
    }

    // Type token: the segment after "/id/", which must be slash-terminated.
    let after = &canonical[id_pos + "/id/".len()..];
    let token = match after.find('/') {
        Some(end) if end > 0 => &after[..end],
        _ => return Err(GatewayError::MalformedIdentifier(decoded)),
    };

    let entity_type = EntityType::from_token(token).ok_or_else(|| GatewayError::UnsupportedType {
        token: token.to_string(),
        id: decoded.clone(),
    })?;

    Ok(ParsedBestId {
        domain: domain.to_string(),
        entity_type,
        canonical,
    })
}

/// Look a BeSt id up in the search index and map its hits into canonical
/// records. Zero hits is a normal, empty outcome.
pub async fn resolve_by_id(
    es: &EsClient,
    raw: &str,
) -> Result<Vec<CanonicalRecord>, GatewayError> {
    let parsed = parse_best_id(raw)?;
    debug!("get by id: {} ({})", parsed.canonical, parsed.entity_type.layer());

    let body = json!({
        "query": {
            "bool": {
                "must": [
                    { "term": { "layer": parsed.entity_type.layer() } },
                    { "prefix": { "source_id": { "value": parsed.canonical } } }
                ]
            }
        }
    });

    let hits = es.search(body).await?;
    let records = hits.iter().filter_map(super::record_from_hit).collect();

    Ok(super::dedup(records))
}
