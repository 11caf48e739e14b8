// handlers/vessels/mod.rs - /vessels routes (authenticated, owner-scoped)

pub mod cargo;
pub mod collection;
pub mod record;

use crate::database::models::Vessel;
use crate::database::store::Kind;
use crate::error::ApiError;
use crate::services::authorize;
use crate::state::AppState;

use super::parse_id;

/// Load a vessel and check that `subject` owns it
pub(crate) async fn owned_vessel(state: &AppState, subject: &str, raw_id: &str) -> Result<Vessel, ApiError> {
    let id = parse_id(Kind::Vessels, raw_id)?;
    let vessel = state.vessels().select_404(id).await?;
    authorize(subject, &vessel)?;
    Ok(vessel)
}
