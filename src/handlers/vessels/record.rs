// handlers/vessels/record.rs - GET, PUT, PATCH and DELETE /vessels/:id

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    Extension,
};

use super::owned_vessel;
use crate::api::format::VesselView;
use crate::api::input::{VesselInput, VesselPatch};
use crate::api::{JsonBody, Links, Representer};
use crate::auth::AuthSubject;
use crate::database::models::{Vessel, VesselFields};
use crate::error::ApiError;
use crate::state::AppState;

async fn render(state: &AppState, links: &Links, vessel: Vessel) -> Result<Json<VesselView>, ApiError> {
    let view = Representer::new(state.store.clone(), links).vessel(vessel).await?;
    Ok(Json(view))
}

/// GET /vessels/:id
pub async fn show(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthSubject>,
    Path(id): Path<String>,
    links: Links,
) -> Result<Json<VesselView>, ApiError> {
    let vessel = owned_vessel(&state, &caller.subject, &id).await?;
    render(&state, &links, vessel).await
}

/// PUT /vessels/:id - replace attributes, optionally transfer, unload all cargo
pub async fn replace(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthSubject>,
    Path(id): Path<String>,
    links: Links,
    JsonBody(body): JsonBody<VesselInput>,
) -> Result<Json<VesselView>, ApiError> {
    let mut vessel = owned_vessel(&state, &caller.subject, &id).await?;
    let (fields, owner) = body.into_fields()?;
    let engine = state.engine();

    vessel.apply(fields);
    if let Some(owner) = owner {
        engine.replace_owner(&mut vessel, &owner).await?;
    }
    engine.clear_cargo(&mut vessel).await?;

    render(&state, &links, vessel).await
}

/// PATCH /vessels/:id - merge present attributes, optionally transfer or load cargo
pub async fn update(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthSubject>,
    Path(id): Path<String>,
    links: Links,
    JsonBody(patch): JsonBody<VesselPatch>,
) -> Result<Json<VesselView>, ApiError> {
    let mut vessel = owned_vessel(&state, &caller.subject, &id).await?;
    let current = VesselFields {
        name: vessel.name.clone(),
        length: vessel.length,
        date_built: vessel.date_built.clone(),
    };
    let fields = patch.merge(&current)?;
    let owner = patch.owner()?;
    let engine = state.engine();

    vessel.apply(fields);
    match owner {
        Some(owner) => engine.replace_owner(&mut vessel, &owner).await?,
        None => state.vessels().save(&vessel).await?,
    }

    if let Some(cargo_ids) = patch.cargo_ids() {
        let attached = engine.load_each(vessel.id, &cargo_ids).await?;
        tracing::debug!("Vessel {} loaded {} of {} cargo items", vessel.id, attached.len(), cargo_ids.len());
        vessel = state.vessels().select_404(vessel.id).await?;
    }

    render(&state, &links, vessel).await
}

/// DELETE /vessels/:id
pub async fn destroy(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthSubject>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let vessel = owned_vessel(&state, &caller.subject, &id).await?;
    state.engine().delete_vessel(vessel).await?;
    Ok(StatusCode::NO_CONTENT)
}
