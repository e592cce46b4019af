//! API route definitions.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Router;
use serde_json::json;
use uuid::Uuid;

use crate::AppState;
use stockroom_shared::AppError;

pub mod health;
pub mod inventory;
pub mod movements;
pub mod products;

/// Creates the API router with all routes.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(health::routes())
        .merge(products::routes())
        .merge(inventory::routes())
        .merge(movements::routes())
}

/// Parses a path segment into a UUID, or produces the
/// invalid-identifier response. Malformed references are reported
/// distinctly from absent ones.
pub(crate) fn parse_id(raw: &str, label: &str) -> Result<Uuid, Response> {
    raw.parse::<Uuid>()
        .map_err(|_| boundary_error(&AppError::InvalidIdentifier(label.to_string())))
}

/// Renders a boundary error (malformed id, missing fields) as JSON.
pub(crate) fn boundary_error(err: &AppError) -> Response {
    let status =
        StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (
        status,
        Json(json!({
            "error": err.error_code(),
            "message": err.to_string(),
        })),
    )
        .into_response()
}

/// Opaque 500 response. Storage error text never reaches clients; the
/// details go to the log at the call site.
pub(crate) fn internal_error() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({
            "error": "INTERNAL_ERROR",
            "message": "An unexpected error occurred",
        })),
    )
        .into_response()
}
