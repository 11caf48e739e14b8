// handlers/public.rs - service info and health

use axum::{extract::State, http::StatusCode, response::Json};
use serde_json::{json, Value};

use crate::error::ApiError;
use crate::state::AppState;

/// GET /
pub async fn root() -> Json<Value> {
    Json(json!({
        "name": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "vessels": "/vessels",
            "cargo_items": "/cargo_items",
            "users": "/users",
            "health": "/health"
        }
    }))
}

/// GET /health - 200 while the store answers, 503 otherwise
pub async fn health(State(state): State<AppState>) -> Result<(StatusCode, Json<Value>), ApiError> {
    match state.store.health_check().await {
        Ok(()) => Ok((
            StatusCode::OK,
            Json(json!({
                "status": "healthy",
                "store": "connected",
                "timestamp": chrono::Utc::now().to_rfc3339(),
            })),
        )),
        Err(e) => {
            tracing::error!("Store health check failed: {}", e);
            Err(ApiError::service_unavailable("Store connection failed"))
        }
    }
}
