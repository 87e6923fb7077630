//! Document assembly — everything the renderer needs for one quotation.
//!
//! Pages, totals and the amount in words are all derived from the same raw
//! item list on every call. Nothing here is persisted.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::billing::totals::{round_currency, row_amounts, totals, RowAmount, Totals};
use crate::billing::words::amount_to_words;
use crate::layout::allocator::{allocate_with, Page};
use crate::layout::geometry::PageGeometry;
use crate::models::line_item::LineItem;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub pages: Vec<Page>,
    pub totals: Totals,
    pub rows: Vec<RowAmount>,
    /// Grand total rounded to whole currency units.
    pub rounded_total: f64,
    pub amount_in_words: String,
}

pub fn build_document(items: &[LineItem], geometry: &PageGeometry) -> Document {
    let pages = allocate_with(items, geometry);
    let totals = totals(items);
    let rounded_total = round_currency(totals.grand_total);

    if rounded_total < 0.0 {
        warn!(
            grand_total = totals.grand_total,
            "Negative grand total; amount in words reads Zero"
        );
    }

    debug!(
        items = items.len(),
        pages = pages.len(),
        grand_total = totals.grand_total,
        "Built quotation document"
    );

    Document {
        pages,
        rows: row_amounts(items),
        rounded_total,
        amount_in_words: amount_to_words(rounded_total),
        totals,
    }
}
