//! Inbound address fields and geocoding modes.

use std::str::FromStr;

use crate::error::GatewayError;

/// Discrete address fields for one geocoding request.
///
/// All fields are optional; empty or whitespace-only inputs are treated as
/// absent. Immutable once constructed for an orchestration attempt.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddressQuery {
    pub street_name: Option<String>,
    pub house_number: Option<String>,
    pub post_code: Option<String>,
    pub post_name: Option<String>,
}

impl AddressQuery {
    pub fn new(
        street_name: Option<&str>,
        house_number: Option<&str>,
        post_code: Option<&str>,
        post_name: Option<&str>,
    ) -> Self {
        Self {
            street_name: normalize(street_name),
            house_number: normalize(house_number),
            post_code: normalize(post_code),
            post_name: normalize(post_name),
        }
    }
}

fn normalize(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(String::from)
}

/// How the gateway drives Pelias for one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeocodeMode {
    /// One structured call, no fallback.
    Basic,
    /// Structured call, falling back to unstructured if it yields nothing.
    Simple,
    /// Ordered cascade of field/transform variants until one yields a result.
    Advanced,
    /// Raw structured call (same shape as basic).
    PeliasStruct,
    /// Structured call with the locality field left out of the payload.
    PeliasStructNoloc,
    /// Single free-text call.
    PeliasUnstruct,
}

impl FromStr for GeocodeMode {
    type Err = GatewayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "basic" => Ok(Self::Basic),
            "simple" => Ok(Self::Simple),
            "advanced" => Ok(Self::Advanced),
            "pelias_struct" => Ok(Self::PeliasStruct),
            "pelias_struct_noloc" => Ok(Self::PeliasStructNoloc),
            "pelias_unstruct" => Ok(Self::PeliasUnstruct),
            other => Err(GatewayError::InvalidMode(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_fields_are_absent() {
        let q = AddressQuery::new(Some("  Avenue Fonsny "), Some(""), Some("   "), None);
        assert_eq!(q.street_name.as_deref(), Some("Avenue Fonsny"));
        assert_eq!(q.house_number, None);
        assert_eq!(q.post_code, None);
        assert_eq!(q.post_name, None);
    }

    #[test]
    fn test_mode_parsing() {
        assert_eq!("basic".parse::<GeocodeMode>().unwrap(), GeocodeMode::Basic);
        assert_eq!(
            "pelias_struct_noloc".parse::<GeocodeMode>().unwrap(),
            GeocodeMode::PeliasStructNoloc
        );
        assert!(matches!(
            "fancy".parse::<GeocodeMode>(),
            Err(GatewayError::InvalidMode(m)) if m == "fancy"
        ));
    }
}
