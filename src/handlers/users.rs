// handlers/users.rs - GET /users

use axum::{
    extract::{Query, State},
    response::Json,
};

use crate::api::format::UserView;
use crate::api::pagination::{Listing, PageParams};
use crate::api::{Links, Representer};
use crate::database::store::Kind;
use crate::error::ApiError;
use crate::state::AppState;

/// GET /users - every known user with summaries of the vessels it owns
pub async fn list(
    State(state): State<AppState>,
    links: Links,
    Query(params): Query<PageParams>,
) -> Result<Json<Listing<UserView>>, ApiError> {
    let window = params.resolve(&state.config.pagination)?;
    let page = state.users().list(window.limit, window.offset).await?;
    let next_offset = window.next_offset(page.more);

    let views = Representer::new(state.store.clone(), &links).users(page.items).await?;
    Ok(Json(Listing::new(Kind::Users, views, window, next_offset, &links)))
}
