// handlers/vessels/cargo.rs - PUT and DELETE /vessels/:vessel_id/cargo/:cargo_id

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension,
};

use super::owned_vessel;
use crate::auth::AuthSubject;
use crate::database::store::Kind;
use crate::error::ApiError;
use crate::handlers::parse_id;
use crate::state::AppState;

/// PUT - load the cargo item onto the vessel
pub async fn load(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthSubject>,
    Path((vessel_id, cargo_id)): Path<(String, String)>,
) -> Result<StatusCode, ApiError> {
    let vessel = owned_vessel(&state, &caller.subject, &vessel_id).await?;
    let cargo_id = parse_id(Kind::CargoItems, &cargo_id)?;

    state.engine().load(vessel.id, cargo_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE - unload the cargo item from the vessel
pub async fn unload(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthSubject>,
    Path((vessel_id, cargo_id)): Path<(String, String)>,
) -> Result<StatusCode, ApiError> {
    let vessel = owned_vessel(&state, &caller.subject, &vessel_id).await?;
    let cargo_id = parse_id(Kind::CargoItems, &cargo_id)?;

    state.engine().unload(vessel.id, cargo_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
