//! HTTP client for the Pelias geocoding engine and its interpolation service.

use reqwest::Client;
use serde_json::{json, Value};
use thiserror::Error;
use tracing::debug;
use url::Url;

/// Fixed known-good address used by the startup test and the health probe.
pub const PROBE_ADDRESS: &str = "20, Avenue Fonsny, 1060 Bruxelles";

#[derive(Debug, Error)]
pub enum PeliasError {
    #[error("pelias transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("pelias returned status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("invalid pelias URL: {0}")]
    BadUrl(#[from] url::ParseError),
}

/// One outbound geocoding payload.
///
/// For structured calls, absent fields are omitted from the query string
/// entirely; an omitted locality is not the same thing as an empty one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GeocodeRequest {
    Structured {
        address: String,
        postalcode: Option<String>,
        locality: Option<String>,
    },
    Unstructured(String),
}

impl GeocodeRequest {
    /// JSON rendering of the exact payload sent, for result bookkeeping.
    pub fn payload(&self) -> Value {
        match self {
            Self::Structured {
                address,
                postalcode,
                locality,
            } => {
                let mut map = serde_json::Map::new();
                map.insert("address".into(), json!(address));
                if let Some(postalcode) = postalcode {
                    map.insert("postalcode".into(), json!(postalcode));
                }
                if let Some(locality) = locality {
                    map.insert("locality".into(), json!(locality));
                }
                Value::Object(map)
            }
            Self::Unstructured(text) => json!(text),
        }
    }
}

/// Health-probe verdict for the geocoding engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeResult {
    Up,
    /// Transport failure or non-2xx response.
    NoAnswer(String),
    /// 2xx response whose body is not a geocoding result.
    Unexpected(String),
}

/// Client for Pelias' search API and the address interpolation service.
#[derive(Clone)]
pub struct PeliasClient {
    client: Client,
    base_url: Url,
    interpolation_url: Url,
}

impl PeliasClient {
    pub fn new(base_url: &str, interpolation_url: &str) -> Result<Self, PeliasError> {
        Ok(Self {
            client: Client::new(),
            base_url: Url::parse(base_url)?,
            interpolation_url: Url::parse(interpolation_url)?,
        })
    }

    /// Send one geocoding request and return the parsed response body.
    pub async fn geocode(&self, request: &GeocodeRequest) -> Result<Value, PeliasError> {
        let mut url = match request {
            GeocodeRequest::Structured { .. } => self.base_url.join("v1/search/structured")?,
            GeocodeRequest::Unstructured(_) => self.base_url.join("v1/search")?,
        };

        {
            let mut pairs = url.query_pairs_mut();
            match request {
                GeocodeRequest::Structured {
                    address,
                    postalcode,
                    locality,
                } => {
                    pairs.append_pair("address", address);
                    if let Some(postalcode) = postalcode {
                        pairs.append_pair("postalcode", postalcode);
                    }
                    if let Some(locality) = locality {
                        pairs.append_pair("locality", locality);
                    }
                }
                GeocodeRequest::Unstructured(text) => {
                    pairs.append_pair("text", text);
                }
            }
        }

        debug!("Pelias call: {}", url);

        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(PeliasError::Status {
                status: status.as_u16(),
                body: response.text().await.unwrap_or_default(),
            });
        }

        Ok(response.json::<Value>().await?)
    }

    /// Query the interpolation service for a geometry at a given point.
    pub async fn interpolate(
        &self,
        lat: f64,
        lon: f64,
        number: &str,
        street: &str,
    ) -> Result<Value, PeliasError> {
        let mut url = self.interpolation_url.join("search/geojson")?;
        url.query_pairs_mut()
            .append_pair("lat", &lat.to_string())
            .append_pair("lon", &lon.to_string())
            .append_pair("number", number)
            .append_pair("street", street);

        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(PeliasError::Status {
                status: status.as_u16(),
                body: response.text().await.unwrap_or_default(),
            });
        }

        Ok(response.json::<Value>().await?)
    }

    /// Lightweight liveness probe: geocode the fixed known-good address and
    /// classify the answer. Never fails; failures become probe verdicts.
    pub async fn check(&self) -> ProbeResult {
        let request = GeocodeRequest::Unstructured(PROBE_ADDRESS.to_string());
        match self.geocode(&request).await {
            Ok(body) => {
                if body.get("features").map(Value::is_array).unwrap_or(false) {
                    ProbeResult::Up
                } else {
                    ProbeResult::Unexpected(body.to_string())
                }
            }
            Err(err) => ProbeResult::NoAnswer(err.to_string()),
        }
    }
}

/// The candidate list of a Pelias response, empty when absent.
pub fn features(response: &Value) -> &[Value] {
    response
        .get("features")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default()
}
