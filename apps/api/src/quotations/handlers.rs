use axum::{extract::State, http::StatusCode, Json};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use crate::document::Document;
use crate::errors::AppError;
use crate::extract::{AppJson, AppPath};
use crate::layout::handlers::{check_item_count, render_document};
use crate::models::line_item::LineItem;
use crate::models::quotation::QuotationRow;
use crate::quotations::store::NewQuotation;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct CreateQuotationRequest {
    #[serde(default)]
    pub title: String,
    pub customer_name: Option<String>,
    #[serde(default)]
    pub items: Vec<LineItem>,
}

#[derive(Deserialize)]
pub struct UpdateItemsRequest {
    #[serde(default)]
    pub items: Vec<LineItem>,
}

/// POST /api/v1/quotations
pub async fn handle_create(
    State(state): State<AppState>,
    AppJson(req): AppJson<CreateQuotationRequest>,
) -> Result<(StatusCode, Json<QuotationRow>), AppError> {
    let title = req.title.trim();
    if title.is_empty() {
        return Err(AppError::Validation("title must not be blank".to_string()));
    }
    check_item_count(&req.items)?;

    let row = state
        .quotations
        .create(NewQuotation {
            title: title.to_string(),
            customer_name: req.customer_name,
            items: req.items,
        })
        .await?;
    info!(quotation_id = %row.id, items = row.items.len(), "Quotation created");
    Ok((StatusCode::CREATED, Json(row)))
}

/// GET /api/v1/quotations/:id
pub async fn handle_get(
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
) -> Result<Json<QuotationRow>, AppError> {
    let row = find(&state, id).await?;
    Ok(Json(row))
}

/// PUT /api/v1/quotations/:id/items
pub async fn handle_update_items(
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
    AppJson(req): AppJson<UpdateItemsRequest>,
) -> Result<Json<QuotationRow>, AppError> {
    check_item_count(&req.items)?;
    let row = state
        .quotations
        .update_items(id, req.items)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Quotation {id} not found")))?;
    info!(quotation_id = %id, items = row.items.len(), "Quotation items updated");
    Ok(Json(row))
}

/// GET /api/v1/quotations/:id/document
pub async fn handle_document(
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
) -> Result<Json<Document>, AppError> {
    let row = find(&state, id).await?;
    let document = render_document(row.items.0, state.geometry.clone()).await?;
    Ok(Json(document))
}

async fn find(state: &AppState, id: Uuid) -> Result<QuotationRow, AppError> {
    state
        .quotations
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Quotation {id} not found")))
}
