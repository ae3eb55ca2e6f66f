//! bePelias - a geocoding gateway for Belgian BeSt addresses on top of Pelias
//!
//! This library provides the orchestration core shared by the HTTP server:
//! mode-driven geocoding with fallback cascades, composite health probing,
//! and BeSt-id / city resolution against the Pelias Elasticsearch index.

pub mod compose;
pub mod elasticsearch;
pub mod error;
pub mod format;
pub mod health;
pub mod models;
pub mod orchestrator;
pub mod pelias;
pub mod resolve;

pub use error::GatewayError;
pub use models::{AddressQuery, CallType, CanonicalRecord, GeocodeMode, GeocodeOutcome};
