//! Movement ledger routes.
//!
//! Recording a movement is not idempotent; a timed-out request has an
//! unknown outcome and must not be blindly retried.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::error;

use crate::{AppState, routes::boundary_error, routes::internal_error, routes::parse_id};
use stockroom_core::movement::{MovementMetadata, MovementType};
use stockroom_db::entities::movements;
use stockroom_db::repositories::{LedgerError, MovementRepository};
use stockroom_shared::AppError;

/// Creates the movement routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/movements", get(list_movements).post(record_movement))
        .route("/movements/range", get(movements_by_date_range))
        .route("/movements/products/{product_id}", get(movements_by_product))
        .route("/movements/{id}", get(get_movement))
}

fn movement_repo(state: &AppState) -> MovementRepository {
    MovementRepository::new(
        (*state.db).clone(),
        state.inventory.default_store_id.clone(),
    )
}

/// Request body for recording a movement.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordMovementRequest {
    /// The product being moved.
    pub product_id: Option<String>,
    /// Movement type: "IN" or "OUT".
    #[serde(rename = "type")]
    pub movement_type: Option<String>,
    /// Units moved.
    pub quantity: Option<i32>,
    /// External reference (order number, delivery note).
    pub reference: Option<String>,
    /// Free-form notes.
    pub notes: Option<String>,
    /// Unit price at the time of the movement.
    pub unit_price: Option<Decimal>,
}

/// Query parameters for listing movements.
#[derive(Debug, Deserialize)]
pub struct ListMovementsQuery {
    /// Restrict to one movement type.
    #[serde(rename = "type")]
    pub movement_type: Option<String>,
}

/// Query parameters for a date-range listing.
#[derive(Debug, Deserialize)]
pub struct DateRangeQuery {
    /// Range start (inclusive, RFC 3339).
    pub from: Option<DateTime<Utc>>,
    /// Range end (inclusive, RFC 3339).
    pub to: Option<DateTime<Utc>>,
}

/// Response for a movement. Identifiers are strings at the boundary,
/// never internal storage key types.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MovementResponse {
    /// Movement ID.
    pub id: String,
    /// The product moved.
    pub product_id: String,
    /// Movement type: "IN", "OUT" or "TRANSFER".
    #[serde(rename = "type")]
    pub movement_type: &'static str,
    /// Units moved.
    pub quantity: i32,
    /// Originating store (absent for IN).
    pub source_store_id: Option<String>,
    /// Receiving store (absent for OUT).
    pub target_store_id: Option<String>,
    /// External reference.
    pub reference: Option<String>,
    /// Free-form notes.
    pub notes: Option<String>,
    /// Unit price at the time of the movement.
    pub unit_price: Option<String>,
    /// Event timestamp.
    pub moved_at: String,
}

fn movement_response(movement: movements::Model) -> MovementResponse {
    let movement_type: MovementType = movement.movement_type.into();
    MovementResponse {
        id: movement.id.to_string(),
        product_id: movement.product_id.to_string(),
        movement_type: movement_type.as_str(),
        quantity: movement.quantity,
        source_store_id: movement.source_store_id,
        target_store_id: movement.target_store_id,
        reference: movement.reference,
        notes: movement.notes,
        unit_price: movement.unit_price.map(|p| p.to_string()),
        moved_at: movement.moved_at.to_rfc3339(),
    }
}

/// POST `/movements` - Record an IN or OUT movement at the implicit
/// store.
async fn record_movement(
    State(state): State<AppState>,
    Json(payload): Json<RecordMovementRequest>,
) -> Response {
    let mut missing = Vec::new();
    if payload.product_id.is_none() {
        missing.push("productId");
    }
    if payload.movement_type.is_none() {
        missing.push("type");
    }
    if payload.quantity.is_none() {
        missing.push("quantity");
    }
    if !missing.is_empty() {
        return boundary_error(&AppError::missing(&missing));
    }

    let (Some(raw_product_id), Some(raw_type), Some(quantity)) =
        (payload.product_id, payload.movement_type, payload.quantity)
    else {
        return boundary_error(&AppError::missing(&["productId", "type", "quantity"]));
    };

    let product_id = match parse_id(&raw_product_id, "product id") {
        Ok(id) => id,
        Err(response) => return response,
    };

    let movement_type = match raw_type.parse::<MovementType>() {
        Ok(movement_type) => movement_type,
        Err(e) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({
                    "error": e.error_code(),
                    "message": e.to_string(),
                })),
            )
                .into_response();
        }
    };

    let metadata = MovementMetadata {
        reference: payload.reference,
        notes: payload.notes,
        unit_price: payload.unit_price,
    };

    match movement_repo(&state)
        .record_movement(product_id, movement_type, quantity, metadata)
        .await
    {
        Ok(movement) => (
            StatusCode::CREATED,
            Json(json!({
                "message": "Movement created successfully",
                "id": movement.id.to_string(),
            })),
        )
            .into_response(),
        Err(e) => ledger_error_response(&e),
    }
}

/// GET `/movements/{id}` - Get a movement.
async fn get_movement(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    let id = match parse_id(&id, "movement id") {
        Ok(id) => id,
        Err(response) => return response,
    };

    match movement_repo(&state).get_movement(id).await {
        Ok(movement) => (StatusCode::OK, Json(movement_response(movement))).into_response(),
        Err(e) => ledger_error_response(&e),
    }
}

/// GET `/movements?type=` - List movements, optionally restricted to
/// one type, most recent first.
async fn list_movements(
    State(state): State<AppState>,
    Query(query): Query<ListMovementsQuery>,
) -> Response {
    let repo = movement_repo(&state);

    let result = match query.movement_type {
        Some(raw) => match raw.parse::<MovementType>() {
            Ok(movement_type) => repo.list_by_type(movement_type).await,
            Err(e) => {
                return (
                    StatusCode::BAD_REQUEST,
                    Json(json!({
                        "error": e.error_code(),
                        "message": e.to_string(),
                    })),
                )
                    .into_response();
            }
        },
        None => repo.list_all().await,
    };

    match result {
        Ok(movements) => {
            let response: Vec<MovementResponse> =
                movements.into_iter().map(movement_response).collect();
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => ledger_error_response(&e),
    }
}

/// GET `/movements/products/{product_id}` - List one product's
/// movements, most recent first.
async fn movements_by_product(
    State(state): State<AppState>,
    Path(product_id): Path<String>,
) -> Response {
    let product_id = match parse_id(&product_id, "product id") {
        Ok(id) => id,
        Err(response) => return response,
    };

    match movement_repo(&state).list_by_product(product_id).await {
        Ok(movements) => {
            let response: Vec<MovementResponse> =
                movements.into_iter().map(movement_response).collect();
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => ledger_error_response(&e),
    }
}

/// GET `/movements/range?from=&to=` - List movements in an inclusive
/// timestamp range, most recent first.
async fn movements_by_date_range(
    State(state): State<AppState>,
    Query(query): Query<DateRangeQuery>,
) -> Response {
    let mut missing = Vec::new();
    if query.from.is_none() {
        missing.push("from");
    }
    if query.to.is_none() {
        missing.push("to");
    }
    if !missing.is_empty() {
        return boundary_error(&AppError::missing(&missing));
    }
    let (Some(from), Some(to)) = (query.from, query.to) else {
        return boundary_error(&AppError::missing(&["from", "to"]));
    };

    match movement_repo(&state).list_by_date_range(from, to).await {
        Ok(movements) => {
            let response: Vec<MovementResponse> =
                movements.into_iter().map(movement_response).collect();
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => ledger_error_response(&e),
    }
}

/// Maps ledger errors to responses. Validation and business-rule
/// messages pass through verbatim; storage failures are logged and
/// masked.
fn ledger_error_response(err: &LedgerError) -> Response {
    match err {
        LedgerError::Database(_) => {
            error!(error = %err, "ledger operation failed");
            internal_error()
        }
        other => {
            let status = StatusCode::from_u16(other.http_status_code())
                .unwrap_or(StatusCode::BAD_REQUEST);
            (
                status,
                Json(json!({
                    "error": other.error_code(),
                    "message": other.to_string(),
                })),
            )
                .into_response()
        }
    }
}
