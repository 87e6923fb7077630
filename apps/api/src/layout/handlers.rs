use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::billing::words::to_words;
use crate::document::{build_document, Document};
use crate::errors::AppError;
use crate::extract::{AppJson, AppPath};
use crate::layout::geometry::PageGeometry;
use crate::models::line_item::LineItem;
use crate::state::AppState;

/// Upper bound on items in a single layout request.
pub const MAX_ITEMS: usize = 1000;

#[derive(Deserialize)]
pub struct PreviewRequest {
    #[serde(default)]
    pub items: Vec<LineItem>,
}

#[derive(Serialize)]
pub struct AmountInWordsResponse {
    pub amount: u64,
    pub words: String,
}

pub(crate) fn check_item_count(items: &[LineItem]) -> Result<(), AppError> {
    if items.len() > MAX_ITEMS {
        return Err(AppError::Validation(format!(
            "A document may hold at most {MAX_ITEMS} items, got {}",
            items.len()
        )));
    }
    Ok(())
}

/// Builds the document on the blocking pool; layout is CPU-bound.
pub(crate) async fn render_document(
    items: Vec<LineItem>,
    geometry: PageGeometry,
) -> Result<Document, AppError> {
    tokio::task::spawn_blocking(move || build_document(&items, &geometry))
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("spawn_blocking failed in layout: {e}")))
}

/// POST /api/v1/layout/preview
pub async fn handle_preview(
    State(state): State<AppState>,
    AppJson(req): AppJson<PreviewRequest>,
) -> Result<Json<Document>, AppError> {
    check_item_count(&req.items)?;
    let document = render_document(req.items, state.geometry.clone()).await?;
    Ok(Json(document))
}

/// GET /api/v1/amount-in-words/:amount
pub async fn handle_amount_in_words(
    AppPath(amount): AppPath<u64>,
) -> Result<Json<AmountInWordsResponse>, AppError> {
    Ok(Json(AmountInWordsResponse {
        amount,
        words: to_words(amount),
    }))
}
