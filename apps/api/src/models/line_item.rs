//! Line items as they arrive from the editing UI, and the fragments the
//! page allocator produces from them.
//!
//! Decoding is deliberately forgiving: the editor sends whatever the form
//! currently holds, so numeric fields may be numbers, numeric strings, empty
//! strings or absent. Anything that is not a finite number becomes `0`.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One quotation/invoice row as entered by the user.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawLineItem")]
pub struct LineItem {
    pub description: String,
    pub make: String,
    pub hsn: String,
    pub qty: f64,
    pub rate: f64,
    #[serde(rename = "gst")]
    pub gst_percent: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl LineItem {
    #[cfg(test)]
    pub fn new(description: impl Into<String>, qty: f64, rate: f64, gst_percent: f64) -> Self {
        Self {
            description: description.into(),
            qty,
            rate,
            gst_percent,
            ..Default::default()
        }
    }
}

/// Wire shape of a line item. Every key is optional and untyped; `rate`
/// and `gst` win over their `price` and `gstPercent` spellings when both
/// are present.
#[derive(Deserialize)]
struct RawLineItem {
    #[serde(default)]
    description: Option<Value>,
    #[serde(default)]
    make: Option<Value>,
    #[serde(default)]
    hsn: Option<Value>,
    #[serde(default)]
    qty: Option<Value>,
    #[serde(default)]
    rate: Option<Value>,
    #[serde(default)]
    price: Option<Value>,
    #[serde(default)]
    gst: Option<Value>,
    #[serde(default, rename = "gstPercent")]
    gst_percent: Option<Value>,
    #[serde(default)]
    image: Option<Value>,
}

impl From<RawLineItem> for LineItem {
    fn from(raw: RawLineItem) -> Self {
        LineItem {
            description: coerce_string(raw.description.as_ref()),
            make: coerce_string(raw.make.as_ref()),
            hsn: coerce_string(raw.hsn.as_ref()),
            qty: raw.qty.as_ref().map(coerce_number).unwrap_or(0.0),
            rate: raw
                .rate
                .as_ref()
                .or(raw.price.as_ref())
                .map(coerce_number)
                .unwrap_or(0.0),
            gst_percent: raw
                .gst
                .as_ref()
                .or(raw.gst_percent.as_ref())
                .map(coerce_number)
                .unwrap_or(0.0),
            image: match raw.image {
                Some(Value::String(s)) => Some(s),
                _ => None,
            },
        }
    }
}

/// A line item (or a fragment of one) positioned on a page.
///
/// `serial` is the item's 1-based position in the input list, or `None` for
/// continuation fragments, which render without a serial number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AugmentedItem {
    #[serde(flatten)]
    pub item: LineItem,
    pub serial: Option<u32>,
    pub is_partial: bool,
    pub is_continuation: bool,
}

impl AugmentedItem {
    /// Wraps an input item with its serial. Not a fragment.
    pub fn whole(item: LineItem, serial: u32) -> Self {
        Self {
            item,
            serial: Some(serial),
            is_partial: false,
            is_continuation: false,
        }
    }

    #[cfg(test)]
    pub fn is_fragment(&self) -> bool {
        self.is_partial || self.is_continuation
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Coercion
// ────────────────────────────────────────────────────────────────────────────

fn coerce_string(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    }
}

/// Numbers pass through, numeric strings are parsed, everything else is 0.
fn coerce_number(value: &Value) -> f64 {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.filter(|v| v.is_finite()).unwrap_or(0.0)
}
