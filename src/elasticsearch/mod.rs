//! Elasticsearch client and operations against the Pelias index.

mod client;

pub use client::EsClient;
