//! Quotation storage — pluggable, trait-based persistence for raw item lists.
//!
//! `AppState` holds an `Arc<dyn QuotationStore>`. Production uses
//! `PgQuotationStore`; tests swap in an in-memory store.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::line_item::LineItem;
use crate::models::quotation::QuotationRow;

/// Fields needed to create a quotation.
#[derive(Debug, Clone)]
pub struct NewQuotation {
    pub title: String,
    pub customer_name: Option<String>,
    pub items: Vec<LineItem>,
}

#[async_trait]
pub trait QuotationStore: Send + Sync {
    async fn create(&self, new: NewQuotation) -> Result<QuotationRow, AppError>;

    async fn get(&self, id: Uuid) -> Result<Option<QuotationRow>, AppError>;

    /// Replaces the item list. Returns `None` if the quotation does not exist.
    async fn update_items(
        &self,
        id: Uuid,
        items: Vec<LineItem>,
    ) -> Result<Option<QuotationRow>, AppError>;
}

// ────────────────────────────────────────────────────────────────────────────
// PostgreSQL
// ────────────────────────────────────────────────────────────────────────────

pub struct PgQuotationStore {
    pool: PgPool,
}

impl PgQuotationStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl QuotationStore for PgQuotationStore {
    async fn create(&self, new: NewQuotation) -> Result<QuotationRow, AppError> {
        let now = Utc::now();
        let row: QuotationRow = sqlx::query_as(
            r#"
            INSERT INTO quotations (id, title, customer_name, items, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $5)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&new.title)
        .bind(&new.customer_name)
        .bind(Json(&new.items))
        .bind(now)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn get(&self, id: Uuid) -> Result<Option<QuotationRow>, AppError> {
        let row = sqlx::query_as("SELECT * FROM quotations WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn update_items(
        &self,
        id: Uuid,
        items: Vec<LineItem>,
    ) -> Result<Option<QuotationRow>, AppError> {
        let row = sqlx::query_as(
            r#"
            UPDATE quotations
            SET items = $1, updated_at = $2
            WHERE id = $3
            RETURNING *
            "#,
        )
        .bind(Json(&items))
        .bind(Utc::now())
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// In-memory (tests)
// ────────────────────────────────────────────────────────────────────────────
