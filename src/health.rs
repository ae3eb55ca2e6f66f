//! Composite health aggregation over the geocoder and interpolation probes.
//!
//! DOWN dominates DEGRADED: if the primary geocode probe fails, the
//! interpolation probe is never consulted. Every check re-probes live; no
//! state is cached between invocations.

use serde::Serialize;
use tracing::warn;

use crate::pelias::{PeliasClient, ProbeResult};

/// Interpolation probe fixture: a point on Avenue Fonsny, Saint-Gilles.
const PROBE_LAT: f64 = 50.83582;
const PROBE_LON: f64 = 4.33844;
const PROBE_NUMBER: &str = "20";
const PROBE_STREET: &str = "Avenue Fonsny";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HealthStatus {
    Up,
    Degraded,
    Down,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthDetail {
    pub error_message: String,
    pub details: String,
}

/// One service-level verdict, computed fresh per probe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HealthReport {
    pub status: HealthStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<HealthDetail>,
}

impl HealthReport {
    fn up() -> Self {
        Self {
            status: HealthStatus::Up,
            details: None,
        }
    }

    fn down(error_message: &str, details: String) -> Self {
        Self {
            status: HealthStatus::Down,
            details: Some(HealthDetail {
                error_message: error_message.to_string(),
                details,
            }),
        }
    }

    fn degraded(error_message: &str, details: String) -> Self {
        Self {
            status: HealthStatus::Degraded,
            details: Some(HealthDetail {
                error_message: error_message.to_string(),
                details,
            }),
        }
    }
}

/// Probe the geocoder, then its interpolation sub-capability, and combine
/// both into one verdict. Probe failures never escape as errors.
pub async fn check(pelias: &PeliasClient) -> HealthReport {
    match pelias.check().await {
        ProbeResult::NoAnswer(details) => {
            warn!("Pelias not up & running: {}", details);
            return HealthReport::down(
                "Pelias server does not answer",
                "Pelias server does not answer".to_string(),
            );
        }
        ProbeResult::Unexpected(answer) => {
            return HealthReport::down(
                "Pelias server answers, but gives an unexpected answer",
                format!("Pelias answer: {answer}"),
            );
        }
        ProbeResult::Up => {}
    }

    match pelias
        .interpolate(PROBE_LAT, PROBE_LON, PROBE_NUMBER, PROBE_STREET)
        .await
    {
        Err(err) => {
            warn!("interpolation probe failed: {}", err);
            HealthReport::degraded(
                "Interpolation server does not answer",
                "Interpolation server does not answer".to_string(),
            )
        }
        Ok(answer) if answer.get("geometry").is_none() => HealthReport::degraded(
            "Interpolation server answers, but gives an unexpected answer",
            format!("Interpolation answer: {answer}"),
        ),
        Ok(_) => HealthReport::up(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_serialization() {
        let report = HealthReport::down("Pelias server does not answer", "details".into());
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["status"], "DOWN");
        assert_eq!(json["details"]["errorMessage"], "Pelias server does not answer");

        let up = serde_json::to_value(HealthReport::up()).unwrap();
        assert_eq!(up["status"], "UP");
        assert!(up.get("details").is_none());
    }
}
