// handlers/cargo_items/collection.rs - GET and POST /cargo_items

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::Json,
};

use crate::api::format::CargoView;
use crate::api::input::CargoInput;
use crate::api::pagination::{self, Listing, PageParams};
use crate::api::{JsonBody, Links, Representer};
use crate::database::models::CargoItem;
use crate::database::store::Kind;
use crate::error::ApiError;
use crate::state::AppState;

/// POST /cargo_items - create an unattached cargo item
pub async fn create(
    State(state): State<AppState>,
    links: Links,
    JsonBody(body): JsonBody<CargoInput>,
) -> Result<(StatusCode, Json<CargoView>), ApiError> {
    let fields = body.into_fields()?;
    let repo = state.cargo_items();

    let cargo = CargoItem::new(repo.next_id().await?, fields);
    repo.save(&cargo).await?;
    tracing::info!("Created cargo item {}", cargo.id);

    let view = Representer::new(state.store.clone(), &links).cargo_item(cargo).await?;
    Ok((StatusCode::CREATED, Json(view)))
}

/// GET /cargo_items
pub async fn list(
    State(state): State<AppState>,
    links: Links,
    Query(params): Query<PageParams>,
) -> Result<Json<Listing<CargoView>>, ApiError> {
    let window = params.resolve(&state.config.pagination)?;
    let (items, next_offset) = pagination::list(&state.cargo_items(), None, window).await?;

    let views = Representer::new(state.store.clone(), &links).cargo_items(items).await?;
    Ok(Json(Listing::new(Kind::CargoItems, views, window, next_offset, &links)))
}
