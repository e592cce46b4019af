//! Inventory routes: stock initialization, transfers, adjustments,
//! level checks and low-stock alerts.
//!
//! Transfers and movement-affecting operations are not idempotent;
//! callers must not blindly retry a timed-out request, since its
//! outcome is unknown.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::error;

use crate::{AppState, routes::boundary_error, routes::internal_error, routes::parse_id};
use stockroom_core::stock::{Adjustment, TransferRequest};
use stockroom_db::repositories::{
    InventoryError, InventoryRepository, NewInventory, StockError, StockRepository,
    StockWithProduct,
};
use stockroom_shared::AppError;

/// Creates the inventory routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/inventory", get(list_all_inventory).post(create_inventory))
        .route("/inventory/transfer", post(transfer_stock))
        .route("/inventory/bulk", put(bulk_adjust))
        .route("/inventory/alerts", get(low_stock_alerts))
        .route("/inventory/stores/{store_id}", get(store_inventory))
        .route(
            "/inventory/products/{product_id}",
            get(product_stock).put(adjust_stock),
        )
        .route("/inventory/products/{product_id}/level", get(stock_level))
}

fn inventory_repo(state: &AppState) -> InventoryRepository {
    InventoryRepository::new((*state.db).clone(), state.inventory.clone())
}

/// Request body for initializing inventory.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateInventoryRequest {
    /// The product to initialize.
    pub product_id: Option<String>,
    /// The store to initialize it in.
    pub store_id: Option<String>,
    /// Initial quantity.
    pub quantity: Option<i32>,
    /// Low-stock threshold.
    pub min_stock: Option<i32>,
}

/// Request body for a stock transfer.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferStockRequest {
    /// The product to transfer.
    pub product_id: Option<String>,
    /// The store the stock leaves.
    pub source_store_id: Option<String>,
    /// The store the stock arrives at.
    pub target_store_id: Option<String>,
    /// Units to move.
    pub quantity: Option<i32>,
}

/// Request body for a manual adjustment.
#[derive(Debug, Deserialize)]
pub struct AdjustStockRequest {
    /// The new absolute quantity.
    pub quantity: Option<i32>,
}

/// One entry of a bulk adjustment.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkAdjustEntry {
    /// The product to adjust.
    pub product_id: Option<String>,
    /// The new absolute quantity.
    pub quantity: Option<i32>,
}

/// Request body for a bulk adjustment.
#[derive(Debug, Deserialize)]
pub struct BulkAdjustRequest {
    /// The adjustments to apply, all or nothing.
    pub adjustments: Option<Vec<BulkAdjustEntry>>,
}

/// Query parameters for a stock level check.
#[derive(Debug, Deserialize)]
pub struct LevelQuery {
    /// Minimum threshold.
    pub min: Option<i32>,
    /// Maximum threshold.
    pub max: Option<i32>,
}

/// Query parameters for low-stock alerts.
#[derive(Debug, Deserialize)]
pub struct AlertsQuery {
    /// Explicit threshold applied to every record; defaults to each
    /// record's own configured minimum.
    pub threshold: Option<i32>,
}

/// Product summary embedded in stock listings.
#[derive(Debug, Serialize)]
pub struct ProductSummary {
    /// Product ID.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Stock-keeping unit.
    pub sku: String,
    /// Unit price.
    pub price: String,
}

/// One stock record joined with its product.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StockItemResponse {
    /// Stock record ID.
    pub id: String,
    /// Store label.
    pub store_id: String,
    /// Current quantity.
    pub quantity: i32,
    /// Low-stock threshold.
    pub min_stock: i32,
    /// The counted product.
    pub product: ProductSummary,
}

/// A low-stock row with its computed deficit.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LowStockAlertResponse {
    /// Stock record ID.
    pub id: String,
    /// Store label.
    pub store_id: String,
    /// Current quantity.
    pub quantity: i32,
    /// Low-stock threshold.
    pub min_stock: i32,
    /// Units missing to reach the threshold.
    pub deficit: i32,
    /// The counted product.
    pub product: ProductSummary,
}

/// Per-store entry of a product stock summary.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreQuantityResponse {
    /// Store label.
    pub store_id: String,
    /// Quantity at that store.
    pub quantity: i32,
    /// Low-stock threshold at that store.
    pub min_stock: i32,
}

/// Total product stock with the per-store breakdown.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductStockResponse {
    /// Product ID.
    pub product_id: String,
    /// Sum over all stores.
    pub total: i64,
    /// Per-store quantities.
    pub per_store: Vec<StoreQuantityResponse>,
}

fn stock_item(row: StockWithProduct) -> StockItemResponse {
    StockItemResponse {
        id: row.record.id.to_string(),
        store_id: row.record.store_id,
        quantity: row.record.quantity,
        min_stock: row.record.min_stock,
        product: ProductSummary {
            id: row.product.id.to_string(),
            name: row.product.name,
            sku: row.product.sku,
            price: row.product.price.to_string(),
        },
    }
}

/// POST `/inventory` - Initialize inventory for a product in a store.
async fn create_inventory(
    State(state): State<AppState>,
    Json(payload): Json<CreateInventoryRequest>,
) -> Response {
    let mut missing = Vec::new();
    if payload.product_id.is_none() {
        missing.push("productId");
    }
    if payload.store_id.is_none() {
        missing.push("storeId");
    }
    if payload.quantity.is_none() {
        missing.push("quantity");
    }
    if payload.min_stock.is_none() {
        missing.push("minStock");
    }
    if !missing.is_empty() {
        return boundary_error(&AppError::missing(&missing));
    }

    let (Some(raw_product_id), Some(store_id), Some(quantity), Some(min_stock)) = (
        payload.product_id,
        payload.store_id,
        payload.quantity,
        payload.min_stock,
    ) else {
        return boundary_error(&AppError::missing(&[
            "productId",
            "storeId",
            "quantity",
            "minStock",
        ]));
    };

    let product_id = match parse_id(&raw_product_id, "product id") {
        Ok(id) => id,
        Err(response) => return response,
    };

    match inventory_repo(&state)
        .create_inventory(NewInventory {
            product_id,
            store_id,
            quantity,
            min_stock,
        })
        .await
    {
        Ok(record) => (
            StatusCode::CREATED,
            Json(json!({
                "message": "Inventory created successfully",
                "id": record.id.to_string(),
            })),
        )
            .into_response(),
        Err(e) => inventory_error_response(&e),
    }
}

/// POST `/inventory/transfer` - Move stock between stores.
async fn transfer_stock(
    State(state): State<AppState>,
    Json(payload): Json<TransferStockRequest>,
) -> Response {
    let mut missing = Vec::new();
    if payload.product_id.is_none() {
        missing.push("productId");
    }
    if payload.source_store_id.is_none() {
        missing.push("sourceStoreId");
    }
    if payload.target_store_id.is_none() {
        missing.push("targetStoreId");
    }
    if payload.quantity.is_none() {
        missing.push("quantity");
    }
    if !missing.is_empty() {
        return boundary_error(&AppError::missing(&missing));
    }

    let (Some(raw_product_id), Some(source_store_id), Some(target_store_id), Some(quantity)) = (
        payload.product_id,
        payload.source_store_id,
        payload.target_store_id,
        payload.quantity,
    ) else {
        return boundary_error(&AppError::missing(&[
            "productId",
            "sourceStoreId",
            "targetStoreId",
            "quantity",
        ]));
    };

    let product_id = match parse_id(&raw_product_id, "product id") {
        Ok(id) => id,
        Err(response) => return response,
    };

    match inventory_repo(&state)
        .transfer_stock(TransferRequest {
            product_id,
            source_store_id,
            target_store_id,
            quantity,
        })
        .await
    {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({ "message": "Stock transferred successfully" })),
        )
            .into_response(),
        Err(e) => inventory_error_response(&e),
    }
}

/// PUT `/inventory/products/{product_id}` - Manually overwrite a
/// product's quantity at the implicit store.
async fn adjust_stock(
    State(state): State<AppState>,
    Path(product_id): Path<String>,
    Json(payload): Json<AdjustStockRequest>,
) -> Response {
    let product_id = match parse_id(&product_id, "product id") {
        Ok(id) => id,
        Err(response) => return response,
    };
    let Some(quantity) = payload.quantity else {
        return boundary_error(&AppError::missing(&["quantity"]));
    };

    match inventory_repo(&state).adjust_stock(product_id, quantity).await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({ "message": "Stock adjusted successfully" })),
        )
            .into_response(),
        Err(e) => inventory_error_response(&e),
    }
}

/// PUT `/inventory/bulk` - Apply a batch of absolute adjustments, all
/// or nothing.
async fn bulk_adjust(
    State(state): State<AppState>,
    Json(payload): Json<BulkAdjustRequest>,
) -> Response {
    let Some(entries) = payload.adjustments else {
        return boundary_error(&AppError::missing(&["adjustments"]));
    };

    let mut adjustments = Vec::with_capacity(entries.len());
    for entry in entries {
        let (Some(raw_id), Some(quantity)) = (entry.product_id, entry.quantity) else {
            return boundary_error(&AppError::missing(&["productId", "quantity"]));
        };
        let product_id = match parse_id(&raw_id, "product id") {
            Ok(id) => id,
            Err(response) => return response,
        };
        adjustments.push(Adjustment {
            product_id,
            quantity,
        });
    }

    match inventory_repo(&state).bulk_adjust(&adjustments).await {
        Ok(applied) => (
            StatusCode::OK,
            Json(json!({
                "message": "Stock adjusted successfully",
                "applied": applied,
            })),
        )
            .into_response(),
        Err(e) => inventory_error_response(&e),
    }
}

/// GET `/inventory/products/{product_id}` - Total stock for a product
/// with its per-store breakdown.
async fn product_stock(State(state): State<AppState>, Path(product_id): Path<String>) -> Response {
    let product_id = match parse_id(&product_id, "product id") {
        Ok(id) => id,
        Err(response) => return response,
    };

    match inventory_repo(&state).get_product_stock(product_id).await {
        Ok(stock) => {
            let response = ProductStockResponse {
                product_id: stock.product.id.to_string(),
                total: stock.total,
                per_store: stock
                    .per_store
                    .into_iter()
                    .map(|record| StoreQuantityResponse {
                        store_id: record.store_id,
                        quantity: record.quantity,
                        min_stock: record.min_stock,
                    })
                    .collect(),
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => inventory_error_response(&e),
    }
}

/// GET `/inventory/products/{product_id}/level?min=&max=` - Classify
/// the current quantity against thresholds.
async fn stock_level(
    State(state): State<AppState>,
    Path(product_id): Path<String>,
    Query(query): Query<LevelQuery>,
) -> Response {
    let product_id = match parse_id(&product_id, "product id") {
        Ok(id) => id,
        Err(response) => return response,
    };

    let mut missing = Vec::new();
    if query.min.is_none() {
        missing.push("min");
    }
    if query.max.is_none() {
        missing.push("max");
    }
    if !missing.is_empty() {
        return boundary_error(&AppError::missing(&missing));
    }
    let (Some(min), Some(max)) = (query.min, query.max) else {
        return boundary_error(&AppError::missing(&["min", "max"]));
    };

    match inventory_repo(&state)
        .validate_stock_level(product_id, min, max)
        .await
    {
        Ok(report) => (
            StatusCode::OK,
            Json(json!({
                "quantity": report.quantity,
                "minThreshold": report.min_threshold,
                "maxThreshold": report.max_threshold,
                "level": report.level.as_str(),
            })),
        )
            .into_response(),
        Err(e) => inventory_error_response(&e),
    }
}

/// GET `/inventory/stores/{store_id}` - List a store's stock joined
/// with product details.
async fn store_inventory(State(state): State<AppState>, Path(store_id): Path<String>) -> Response {
    let repo = StockRepository::new((*state.db).clone());
    match repo.list_by_store(&store_id).await {
        Ok(rows) => {
            let response: Vec<StockItemResponse> = rows.into_iter().map(stock_item).collect();
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => stock_error_response(&e),
    }
}

/// GET `/inventory` - List all stock records joined with product
/// details.
async fn list_all_inventory(State(state): State<AppState>) -> Response {
    let repo = StockRepository::new((*state.db).clone());
    match repo.list_all().await {
        Ok(rows) => {
            let response: Vec<StockItemResponse> = rows.into_iter().map(stock_item).collect();
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => stock_error_response(&e),
    }
}

/// GET `/inventory/alerts` - Stock records at or below their threshold.
async fn low_stock_alerts(
    State(state): State<AppState>,
    Query(query): Query<AlertsQuery>,
) -> Response {
    match inventory_repo(&state).low_stock_alerts(query.threshold).await {
        Ok(alerts) => {
            let response: Vec<LowStockAlertResponse> = alerts
                .into_iter()
                .map(|alert| LowStockAlertResponse {
                    id: alert.stock.record.id.to_string(),
                    store_id: alert.stock.record.store_id,
                    quantity: alert.stock.record.quantity,
                    min_stock: alert.stock.record.min_stock,
                    deficit: alert.deficit,
                    product: ProductSummary {
                        id: alert.stock.product.id.to_string(),
                        name: alert.stock.product.name,
                        sku: alert.stock.product.sku,
                        price: alert.stock.product.price.to_string(),
                    },
                })
                .collect();
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => inventory_error_response(&e),
    }
}

/// Maps coordinated inventory errors to responses. Validation and
/// business-rule messages pass through verbatim; storage failures are
/// logged and masked.
fn inventory_error_response(err: &InventoryError) -> Response {
    match err {
        InventoryError::Database(_) | InventoryError::Internal(_) => {
            error!(error = %err, "inventory operation failed");
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

/// Maps raw stock counter errors (read paths) to responses.
fn stock_error_response(err: &StockError) -> Response {
    match err {
        StockError::Database(_) => {
            error!(error = %err, "stock query failed");
            internal_error()
        }
        other => (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "INVALID_QUANTITY",
                "message": other.to_string(),
            })),
        )
            .into_response(),
    }
}
