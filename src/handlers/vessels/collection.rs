// handlers/vessels/collection.rs - GET and POST /vessels

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::Json,
    Extension,
};

use crate::api::format::VesselView;
use crate::api::input::VesselInput;
use crate::api::pagination::{self, Listing, PageParams};
use crate::api::{JsonBody, Links, Representer};
use crate::auth::AuthSubject;
use crate::database::store::{Filter, Kind};
use crate::error::ApiError;
use crate::state::AppState;

/// POST /vessels - create a vessel owned by the caller
pub async fn create(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthSubject>,
    links: Links,
    JsonBody(body): JsonBody<VesselInput>,
) -> Result<(StatusCode, Json<VesselView>), ApiError> {
    let (fields, _) = body.into_fields()?;
    let vessel = state.engine().create_vessel(&caller.subject, fields).await?;

    let view = Representer::new(state.store.clone(), &links).vessel(vessel).await?;
    Ok((StatusCode::CREATED, Json(view)))
}

/// GET /vessels - the caller's vessels, one page at a time
pub async fn list(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthSubject>,
    links: Links,
    Query(params): Query<PageParams>,
) -> Result<Json<Listing<VesselView>>, ApiError> {
    let window = params.resolve(&state.config.pagination)?;
    let owner = Filter::eq("owner_subject", caller.subject.as_str());
    let (vessels, next_offset) = pagination::list(&state.vessels(), Some(owner), window).await?;

    let views = Representer::new(state.store.clone(), &links).vessels(vessels).await?;
    Ok(Json(Listing::new(Kind::Vessels, views, window, next_offset, &links)))
}
