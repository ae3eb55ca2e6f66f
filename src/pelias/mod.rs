//! Pelias geocoding engine client.

mod client;

pub use client::{features, GeocodeRequest, PeliasClient, PeliasError, ProbeResult, PROBE_ADDRESS};
