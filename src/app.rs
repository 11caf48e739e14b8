use axum::{
    http::HeaderValue,
    middleware,
    routing::{get, put},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

use crate::config::SecurityConfig;
use crate::handlers::{self, cargo_items, method_not_allowed, users, vessels};
use crate::middleware::{require_json_accept, require_subject};
use crate::state::AppState;

/// Build the full router
pub fn app(state: AppState) -> Router {
    let cors = cors_layer(&state.config.security);

    Router::new()
        // Public
        .route("/", get(handlers::public::root).fallback(method_not_allowed))
        .route("/health", get(handlers::public::health).fallback(method_not_allowed))
        .merge(vessel_routes(state.clone()))
        .merge(cargo_routes())
        .merge(user_routes())
        .fallback(handlers::not_found)
        // Global middleware, outermost first
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors)
                .layer(middleware::from_fn(require_json_accept)),
        )
        .with_state(state)
}

/// Vessel routes authenticate on every matched method. The 405 fallback is
/// left outside the auth layer.
fn vessel_routes(state: AppState) -> Router<AppState> {
    let auth = middleware::from_fn_with_state(state, require_subject);

    Router::new()
        .route(
            "/vessels",
            get(vessels::collection::list)
                .post(vessels::collection::create)
                .route_layer(auth.clone())
                .fallback(method_not_allowed),
        )
        .route(
            "/vessels/:id",
            get(vessels::record::show)
                .put(vessels::record::replace)
                .patch(vessels::record::update)
                .delete(vessels::record::destroy)
                .route_layer(auth.clone())
                .fallback(method_not_allowed),
        )
        .route(
            "/vessels/:vessel_id/cargo/:cargo_id",
            put(vessels::cargo::load)
                .delete(vessels::cargo::unload)
                .route_layer(auth)
                .fallback(method_not_allowed),
        )
}

fn cargo_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/cargo_items",
            get(cargo_items::collection::list)
                .post(cargo_items::collection::create)
                .fallback(method_not_allowed),
        )
        .route(
            "/cargo_items/:id",
            get(cargo_items::record::show)
                .put(cargo_items::record::replace)
                .patch(cargo_items::record::update)
                .delete(cargo_items::record::destroy)
                .fallback(method_not_allowed),
        )
}

fn user_routes() -> Router<AppState> {
    Router::new().route("/users", get(users::list).fallback(method_not_allowed))
}

fn cors_layer(security: &SecurityConfig) -> CorsLayer {
    if !security.enable_cors {
        return CorsLayer::new();
    }
    if security.cors_origins.iter().any(|o| o == "*") {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = security
        .cors_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(Any)
        .allow_headers(Any)
}
