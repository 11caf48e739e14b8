// handlers/mod.rs - HTTP handlers grouped by resource
//
// Vessel routes run behind the authentication middleware and check ownership
// per request. Cargo and user routes are public.

pub mod cargo_items;
pub mod public;
pub mod users;
pub mod vessels;

use crate::database::store::Kind;
use crate::error::ApiError;
use crate::services::DomainError;

/// Fallback for known paths hit with an unsupported method
pub async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}

/// Fallback for unknown paths
pub async fn not_found() -> ApiError {
    ApiError::not_found("The requested resource does not exist")
}

/// Path ids are parsed here so malformed ids read as missing entities
pub(crate) fn parse_id(kind: Kind, raw: &str) -> Result<u64, ApiError> {
    raw.parse::<u64>().map_err(|_| {
        ApiError::from(DomainError::not_found(format!(
            "No {} with id {} exists",
            kind.noun(),
            raw
        )))
    })
}
