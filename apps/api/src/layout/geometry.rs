//! Fixed page geometry for quotation documents.
//!
//! All capacities are in abstract space units (see `layout::weight`). The
//! numbers are tuned against the renderer's A4 page template: the first page
//! loses room to the letterhead and receiver block, continuation pages only
//! carry a condensed header.

use serde::{Deserialize, Serialize};

// ────────────────────────────────────────────────────────────────────────────
// A4 constants
// ────────────────────────────────────────────────────────────────────────────

pub const FIRST_PAGE_CAPACITY: f64 = 18.0;
pub const CONTINUATION_PAGE_CAPACITY: f64 = 30.0;
/// Space the totals/signature block needs below the last item row.
pub const FOOTER_RESERVE: f64 = 6.0;
/// A split is only attempted when more than this much space is left.
pub const SPLIT_MIN_REMAINING: f64 = 2.5;
/// Average characters per rendered description line.
pub const CHARS_PER_LINE: usize = 34;
/// Cost of each line after the first when estimating an item's weight.
pub const WEIGHT_PER_EXTRA_LINE: f64 = 0.75;
/// Per-line cost used when working out how many lines fit before a split.
pub const SPLIT_COST_PER_LINE: f64 = 0.45;

// ────────────────────────────────────────────────────────────────────────────
// Page geometry
// ────────────────────────────────────────────────────────────────────────────

/// Capacity class of a page. Only the first page of a document is `First`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CapacityClass {
    First,
    Continuation,
}

/// Layout parameters shared by the weight estimator and the page allocator.
///
/// The two per-line costs are intentionally different; together with the
/// capacities they form a contract with the renderer's page template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageGeometry {
    pub first_page_capacity: f64,
    pub continuation_page_capacity: f64,
    pub footer_reserve: f64,
    pub split_min_remaining: f64,
    pub chars_per_line: usize,
    pub weight_per_extra_line: f64,
    pub split_cost_per_line: f64,
}

impl PageGeometry {
    /// The A4 template every quotation is printed on.
    pub fn a4() -> Self {
        Self {
            first_page_capacity: FIRST_PAGE_CAPACITY,
            continuation_page_capacity: CONTINUATION_PAGE_CAPACITY,
            footer_reserve: FOOTER_RESERVE,
            split_min_remaining: SPLIT_MIN_REMAINING,
            chars_per_line: CHARS_PER_LINE,
            weight_per_extra_line: WEIGHT_PER_EXTRA_LINE,
            split_cost_per_line: SPLIT_COST_PER_LINE,
        }
    }

    pub fn capacity(&self, class: CapacityClass) -> f64 {
        match class {
            CapacityClass::First => self.first_page_capacity,
            CapacityClass::Continuation => self.continuation_page_capacity,
        }
    }
}

impl Default for PageGeometry {
    fn default() -> Self {
        Self::a4()
    }
}
