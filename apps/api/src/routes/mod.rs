pub mod health;

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::layout::handlers as layout;
use crate::quotations::handlers as quotations;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Stateless layout (live preview while editing)
        .route("/api/v1/layout/preview", post(layout::handle_preview))
        .route(
            "/api/v1/amount-in-words/:amount",
            get(layout::handle_amount_in_words),
        )
        // Quotation records
        .route("/api/v1/quotations", post(quotations::handle_create))
        .route("/api/v1/quotations/:id", get(quotations::handle_get))
        .route(
            "/api/v1/quotations/:id/items",
            put(quotations::handle_update_items),
        )
        .route(
            "/api/v1/quotations/:id/document",
            get(quotations::handle_document),
        )
        .with_state(state)
}
