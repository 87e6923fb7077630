//! Quotation totals.
//!
//! Computed from the raw item list, independently of pagination. Everything
//! stays in `f64`; rounding to whole currency units happens only when the
//! amount is printed or converted to words.

use serde::{Deserialize, Serialize};

use crate::models::line_item::LineItem;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Totals {
    pub subtotal: f64,
    pub tax_total: f64,
    pub grand_total: f64,
}

/// Amounts for one input row, keyed by its serial.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RowAmount {
    pub serial: u32,
    pub base: f64,
    pub tax: f64,
    pub total: f64,
}

impl RowAmount {
    fn of(serial: u32, item: &LineItem) -> Self {
        let base = item.qty * item.rate;
        let tax = base * (item.gst_percent / 100.0);
        RowAmount {
            serial,
            base,
            tax,
            total: base + tax,
        }
    }
}

pub fn row_amounts(items: &[LineItem]) -> Vec<RowAmount> {
    items
        .iter()
        .enumerate()
        .map(|(i, item)| RowAmount::of(i as u32 + 1, item))
        .collect()
}

pub fn totals(items: &[LineItem]) -> Totals {
    let (subtotal, tax_total) = items.iter().fold((0.0, 0.0), |(sub, tax), item| {
        let row = RowAmount::of(0, item);
        (sub + row.base, tax + row.tax)
    });
    Totals {
        subtotal,
        tax_total,
        grand_total: subtotal + tax_total,
    }
}

/// Rounds to whole currency units, halves away from zero.
pub fn round_currency(amount: f64) -> f64 {
    amount.round()
}
