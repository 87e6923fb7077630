//! Weight estimation: how much vertical space an item row takes on a page.
//!
//! This is a characters-per-line heuristic, not typesetting. A description is
//! charged one full unit for the row itself (padding, serial, amounts) and a
//! reduced cost for every extra wrapped or explicit line.

use crate::layout::geometry::PageGeometry;

/// Estimated number of rendered lines for a description.
///
/// The larger of the explicit newline-separated segment count and the wrap
/// estimate `ceil(chars / chars_per_line)`. Never less than 1.
pub fn estimate_lines(description: &str, geometry: &PageGeometry) -> usize {
    let raw_lines = description.split('\n').count();
    let wrap_lines = description
        .chars()
        .count()
        .div_ceil(geometry.chars_per_line.max(1));
    raw_lines.max(wrap_lines).max(1)
}

/// Space units consumed by an item with this description. Always ≥ 1.
pub fn weight(description: &str, geometry: &PageGeometry) -> f64 {
    let lines = estimate_lines(description, geometry);
    1.0 + (lines - 1) as f64 * geometry.weight_per_extra_line
}
