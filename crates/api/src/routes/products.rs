//! Product catalog endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use catalog::{CatalogCoordinator, CatalogError, ImagePayload, ProductDraft};
use common::{ProductId, ProductRecord};
use serde::{Deserialize, Serialize};
use store::{ObjectStore, RecordStore};

use crate::error::ApiError;

/// Shared application state accessible from all handlers.
pub struct AppState<O: ObjectStore, R: RecordStore> {
    pub coordinator: CatalogCoordinator<O, R>,
}

// -- Request types --

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductRequest {
    pub name: String,
    pub description: String,
    pub price: f64,
    /// Base64 data URL, e.g. `data:image/png;base64,...`.
    pub image_data: String,
}

// -- Response types --

#[derive(Serialize)]
pub struct CreateProductResponse {
    pub message: String,
    pub product: ProductRecord,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteProductResponse {
    pub message: String,
    pub product_id: String,
}

// -- Handlers --

/// POST /products — validate, upload the image, persist the record.
#[tracing::instrument(skip(state, req))]
pub async fn create<O, R>(
    State(state): State<Arc<AppState<O, R>>>,
    Json(req): Json<CreateProductRequest>,
) -> Result<(StatusCode, Json<CreateProductResponse>), ApiError>
where
    O: ObjectStore + 'static,
    R: RecordStore + 'static,
{
    let image = ImagePayload::from_data_url(&req.image_data).map_err(CatalogError::from)?;

    let draft = ProductDraft {
        name: req.name,
        description: req.description,
        price: req.price,
        image,
    };

    let product = state.coordinator.create_product(draft).await?;

    Ok((
        StatusCode::CREATED,
        Json(CreateProductResponse {
            message: "Product created successfully".to_string(),
            product,
        }),
    ))
}

/// GET /products — list all products, newest first.
#[tracing::instrument(skip(state))]
pub async fn list<O, R>(
    State(state): State<Arc<AppState<O, R>>>,
) -> Result<Json<Vec<ProductRecord>>, ApiError>
where
    O: ObjectStore + 'static,
    R: RecordStore + 'static,
{
    let products = state.coordinator.list_products().await?;
    Ok(Json(products))
}

/// DELETE /products/:id — delete a product and its image.
#[tracing::instrument(skip(state))]
pub async fn delete<O, R>(
    State(state): State<Arc<AppState<O, R>>>,
    Path(id): Path<String>,
) -> Result<Json<DeleteProductResponse>, ApiError>
where
    O: ObjectStore + 'static,
    R: RecordStore + 'static,
{
    let product_id = id
        .parse::<ProductId>()
        .map_err(|e| ApiError::BadRequest(format!("Invalid product id: {e}")))?;

    let deleted = state.coordinator.delete_product(product_id).await?;

    Ok(Json(DeleteProductResponse {
        message: "Product deleted successfully".to_string(),
        product_id: deleted.to_string(),
    }))
}
