//! Error taxonomy for the gateway core.
//!
//! Input-validation failures (`InvalidMode`, `MalformedIdentifier`,
//! `UnsupportedType`) are raised before any upstream call is made. Zero
//! results are never an error; they are signalled as empty sequences.

use thiserror::Error;

use crate::pelias::PeliasError;

#[derive(Debug, Error)]
pub enum GatewayError {
    /// The requested geocoding mode is not one of the enumerated values.
    #[error("invalid mode '{0}'")]
    InvalidMode(String),

    /// The BeSt id does not match `<domain>.be/id/<type-token>/...`.
    #[error("cannot parse best id '{0}'")]
    MalformedIdentifier(String),

    /// The BeSt id parsed, but its type token is not a recognized alias.
    #[error("object type '{token}' not supported in '{id}'")]
    UnsupportedType { token: String, id: String },

    /// Every attempted call to the geocoding engine failed.
    #[error("geocoding engine failed: {0}")]
    Upstream(#[from] PeliasError),

    /// The search index could not be reached.
    #[error("cannot connect to Elastic: {0}")]
    SearchIndexUnavailable(String),
}
