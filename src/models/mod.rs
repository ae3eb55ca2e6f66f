//! Core data models for the gateway.

pub mod address;
pub mod outcome;
pub mod record;

pub use address::{AddressQuery, GeocodeMode};
pub use outcome::{CallType, GeocodeOutcome};
pub use record::{CanonicalRecord, RecordAddendum, RecordGeometry, RecordProperties};
