//! Request handlers, one module per resource.

use serde::{Deserialize, Deserializer};

pub mod accounts;
pub mod bank;
pub mod coins;
pub mod market;
pub mod orders;
pub mod savings;
pub mod transfers;

/// Accept a flag as either a bool or a string ("true"/"false").
///
/// Needed wherever a query struct flattens `PageQuery`: flattening routes
/// every value through serde's string-typed buffer.
pub(crate) fn de_opt_bool<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Bool(bool),
        Str(String),
    }

    match Option::<Raw>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Raw::Bool(b)) => Ok(Some(b)),
        Some(Raw::Str(s)) if s.is_empty() => Ok(None),
        Some(Raw::Str(s)) => s.parse().map(Some).map_err(serde::de::Error::custom),
    }
}
