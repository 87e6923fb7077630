use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

use crate::models::line_item::LineItem;

/// A stored quotation. Only the raw items are kept; pages, totals and words
/// are derived whenever the document is requested.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct QuotationRow {
    pub id: Uuid,
    pub title: String,
    pub customer_name: Option<String>,
    pub items: Json<Vec<LineItem>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
