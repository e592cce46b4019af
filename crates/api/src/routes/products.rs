//! Product catalog routes.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::error;

use crate::{AppState, routes::boundary_error, routes::internal_error, routes::parse_id};
use stockroom_core::catalog::{CatalogService, NewProduct, ProductPatch};
use stockroom_db::entities::products;
use stockroom_db::repositories::{ProductError, ProductRepository, UpdateOutcome};
use stockroom_shared::AppError;

/// Creates the product routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/products", get(list_products).post(create_product))
        .route("/products/search", get(search_products))
        .route(
            "/products/{id}",
            get(get_product).put(update_product).delete(delete_product),
        )
}

/// Request body for creating a product. Fields are all optional at the
/// parse level so every missing one can be reported at once.
#[derive(Debug, Deserialize)]
pub struct CreateProductRequest {
    /// Display name.
    pub name: Option<String>,
    /// Description.
    pub description: Option<String>,
    /// Category label.
    pub category: Option<String>,
    /// Unit price.
    pub price: Option<Decimal>,
    /// Stock-keeping unit.
    pub sku: Option<String>,
}

/// Request body for updating a product.
#[derive(Debug, Deserialize)]
pub struct UpdateProductRequest {
    /// New display name.
    pub name: Option<String>,
    /// New description.
    pub description: Option<String>,
    /// New category label.
    pub category: Option<String>,
    /// New unit price.
    pub price: Option<Decimal>,
    /// New SKU; uniqueness is re-checked.
    pub sku: Option<String>,
}

/// Query parameters for listing products.
#[derive(Debug, Deserialize)]
pub struct ListProductsQuery {
    /// Records to skip (default 0).
    pub skip: Option<u64>,
    /// Maximum records to return (default 50, capped at 200).
    pub limit: Option<u64>,
}

/// Query parameters for product search.
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    /// Case-insensitive substring matched against name, description
    /// and SKU.
    pub q: Option<String>,
}

/// Response for a product.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductResponse {
    /// Product ID.
    pub id: String,
    /// Stock-keeping unit.
    pub sku: String,
    /// Display name.
    pub name: String,
    /// Description.
    pub description: String,
    /// Category label.
    pub category: String,
    /// Unit price.
    pub price: String,
    /// Creation timestamp.
    pub created_at: String,
}

fn product_response(product: products::Model) -> ProductResponse {
    ProductResponse {
        id: product.id.to_string(),
        sku: product.sku,
        name: product.name,
        description: product.description,
        category: product.category,
        price: product.price.to_string(),
        created_at: product.created_at.to_rfc3339(),
    }
}

/// POST `/products` - Create a product.
async fn create_product(
    State(state): State<AppState>,
    Json(payload): Json<CreateProductRequest>,
) -> Response {
    let mut missing = Vec::new();
    if payload.name.is_none() {
        missing.push("name");
    }
    if payload.description.is_none() {
        missing.push("description");
    }
    if payload.category.is_none() {
        missing.push("category");
    }
    if payload.price.is_none() {
        missing.push("price");
    }
    if payload.sku.is_none() {
        missing.push("sku");
    }
    if !missing.is_empty() {
        return boundary_error(&AppError::missing(&missing));
    }

    let (Some(name), Some(description), Some(category), Some(price), Some(sku)) = (
        payload.name,
        payload.description,
        payload.category,
        payload.price,
        payload.sku,
    ) else {
        return boundary_error(&AppError::missing(&[
            "name",
            "description",
            "category",
            "price",
            "sku",
        ]));
    };

    let input = NewProduct {
        sku,
        name,
        description,
        category,
        price,
    };
    if let Err(e) = CatalogService::validate_new(&input) {
        return catalog_error_response(&e);
    }

    let repo = ProductRepository::new((*state.db).clone());
    match repo.create_product(input).await {
        Ok(product) => (
            StatusCode::CREATED,
            Json(json!({
                "message": "Product created successfully",
                "id": product.id.to_string(),
            })),
        )
            .into_response(),
        Err(e) => product_error_response(&e),
    }
}

/// GET `/products/{id}` - Get a product.
async fn get_product(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    let id = match parse_id(&id, "product id") {
        Ok(id) => id,
        Err(response) => return response,
    };

    let repo = ProductRepository::new((*state.db).clone());
    match repo.find_product_by_id(id).await {
        Ok(Some(product)) => (StatusCode::OK, Json(product_response(product))).into_response(),
        Ok(None) => product_error_response(&ProductError::NotFound(id)),
        Err(e) => product_error_response(&e),
    }
}

/// PUT `/products/{id}` - Partially update a product.
async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateProductRequest>,
) -> Response {
    let id = match parse_id(&id, "product id") {
        Ok(id) => id,
        Err(response) => return response,
    };

    let patch = ProductPatch {
        sku: payload.sku,
        name: payload.name,
        description: payload.description,
        category: payload.category,
        price: payload.price,
    };
    if let Err(e) = CatalogService::validate_patch(&patch) {
        return catalog_error_response(&e);
    }

    let repo = ProductRepository::new((*state.db).clone());
    match repo.update_product(id, patch).await {
        Ok(UpdateOutcome::Updated(_)) => (
            StatusCode::OK,
            Json(json!({ "message": "Product updated successfully" })),
        )
            .into_response(),
        Ok(UpdateOutcome::Unchanged) => (
            StatusCode::OK,
            Json(json!({ "message": "No changes made to product" })),
        )
            .into_response(),
        Err(e) => product_error_response(&e),
    }
}

/// DELETE `/products/{id}` - Delete a product with no inventory.
async fn delete_product(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    let id = match parse_id(&id, "product id") {
        Ok(id) => id,
        Err(response) => return response,
    };

    let repo = ProductRepository::new((*state.db).clone());
    match repo.delete_product(id).await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({ "message": "Product deleted successfully" })),
        )
            .into_response(),
        Err(e) => product_error_response(&e),
    }
}

/// GET `/products` - List products with skip/limit pagination.
async fn list_products(
    State(state): State<AppState>,
    Query(query): Query<ListProductsQuery>,
) -> Response {
    let skip = query.skip.unwrap_or(0);
    let limit = query.limit.unwrap_or(50).min(200);

    let repo = ProductRepository::new((*state.db).clone());
    match repo.list_products(skip, limit).await {
        Ok(products) => {
            let response: Vec<ProductResponse> =
                products.into_iter().map(product_response).collect();
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => product_error_response(&e),
    }
}

/// GET `/products/search?q=` - Case-insensitive substring search.
async fn search_products(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Response {
    let Some(q) = query.q.filter(|q| !q.trim().is_empty()) else {
        return boundary_error(&AppError::missing(&["q"]));
    };

    let repo = ProductRepository::new((*state.db).clone());
    match repo.search_products(&q).await {
        Ok(products) => {
            let response: Vec<ProductResponse> =
                products.into_iter().map(product_response).collect();
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => product_error_response(&e),
    }
}

/// Maps pure catalog validation errors to responses.
fn catalog_error_response(err: &stockroom_core::catalog::CatalogError) -> Response {
    let status =
        StatusCode::from_u16(err.http_status_code()).unwrap_or(StatusCode::BAD_REQUEST);
    (
        status,
        Json(json!({
            "error": err.error_code(),
            "message": err.to_string(),
        })),
    )
        .into_response()
}

/// Maps repository errors to responses. Validation messages pass
/// through verbatim; storage failures are logged and masked.
fn product_error_response(err: &ProductError) -> Response {
    match err {
        ProductError::DuplicateSku(_) => (
            StatusCode::CONFLICT,
            Json(json!({
                "error": "DUPLICATE_SKU",
                "message": "SKU already exists",
            })),
        )
            .into_response(),
        ProductError::NotFound(_) => (
            StatusCode::NOT_FOUND,
            Json(json!({
                "error": "PRODUCT_NOT_FOUND",
                "message": "Product not found",
            })),
        )
            .into_response(),
        ProductError::HasInventory(_) => (
            StatusCode::CONFLICT,
            Json(json!({
                "error": "HAS_INVENTORY",
                "message": "Cannot delete product that exists in inventory",
            })),
        )
            .into_response(),
        ProductError::Database(e) => {
            error!(error = %e, "product operation failed");
            internal_error()
        }
    }
}
