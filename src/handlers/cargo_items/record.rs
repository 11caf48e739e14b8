// handlers/cargo_items/record.rs - GET, PUT, PATCH and DELETE /cargo_items/:id
//
// Writes here never touch `carrier_id`; loading and unloading go through
// the vessel routes.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};

use crate::api::format::CargoView;
use crate::api::input::{CargoInput, CargoPatch};
use crate::api::{JsonBody, Links, Representer};
use crate::database::models::{CargoFields, CargoItem};
use crate::database::store::Kind;
use crate::error::ApiError;
use crate::handlers::parse_id;
use crate::state::AppState;

async fn find(state: &AppState, raw_id: &str) -> Result<CargoItem, ApiError> {
    let id = parse_id(Kind::CargoItems, raw_id)?;
    Ok(state.cargo_items().select_404(id).await?)
}

async fn save_and_render(state: &AppState, links: &Links, cargo: CargoItem) -> Result<Json<CargoView>, ApiError> {
    state.cargo_items().save(&cargo).await?;
    let view = Representer::new(state.store.clone(), links).cargo_item(cargo).await?;
    Ok(Json(view))
}

/// GET /cargo_items/:id
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<String>,
    links: Links,
) -> Result<Json<CargoView>, ApiError> {
    let cargo = find(&state, &id).await?;
    let view = Representer::new(state.store.clone(), &links).cargo_item(cargo).await?;
    Ok(Json(view))
}

/// PUT /cargo_items/:id - replace attributes, keeping the carrier
pub async fn replace(
    State(state): State<AppState>,
    Path(id): Path<String>,
    links: Links,
    JsonBody(body): JsonBody<CargoInput>,
) -> Result<Json<CargoView>, ApiError> {
    let mut cargo = find(&state, &id).await?;
    cargo.apply(body.into_fields()?);
    save_and_render(&state, &links, cargo).await
}

/// PATCH /cargo_items/:id
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    links: Links,
    JsonBody(patch): JsonBody<CargoPatch>,
) -> Result<Json<CargoView>, ApiError> {
    let mut cargo = find(&state, &id).await?;
    let current = CargoFields {
        volume: cargo.volume,
        item: cargo.item.clone(),
        creation_date: cargo.creation_date.clone(),
    };
    cargo.apply(patch.merge(&current)?);
    save_and_render(&state, &links, cargo).await
}

/// DELETE /cargo_items/:id - also removes it from its carrier's list
pub async fn destroy(State(state): State<AppState>, Path(id): Path<String>) -> Result<StatusCode, ApiError> {
    let cargo = find(&state, &id).await?;
    state.engine().delete_cargo(cargo).await?;
    Ok(StatusCode::NO_CONTENT)
}
