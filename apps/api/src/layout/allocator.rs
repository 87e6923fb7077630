//! Page Allocation — packs weighted line items onto fixed-capacity pages.
//!
//! # Algorithm
//! A single greedy pass over a work queue seeded with the input items (each
//! tagged with its 1-based serial). Each queue head either:
//! - fits on the current page and is placed whole,
//! - is split: the head of its description goes on the current page as a
//!   `partial` fragment, the page closes, and the remainder is pushed back to
//!   the front of the queue as a `continuation` fragment (which may split again),
//! - or is deferred whole to a fresh page when too little space is left to split.
//!
//! After the queue drains, a blank footer-reserve page is appended when the
//! last content page cannot host the totals block, followed by an unconditional
//! blank closing page.
//!
//! # Purity
//! `allocate` owns all of its working state. The same items always produce a
//! structurally identical page list, so callers may re-run it on every edit.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::layout::geometry::{CapacityClass, PageGeometry};
use crate::layout::weight::weight;
use crate::models::line_item::{AugmentedItem, LineItem};

// ────────────────────────────────────────────────────────────────────────────
// Output types
// ────────────────────────────────────────────────────────────────────────────

/// What the renderer should paint on a page besides its item rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PageRole {
    /// Carries item rows (possibly none, for an empty document).
    Items,
    /// Blank page inserted because the last content page had no room for totals.
    FooterReserve,
    /// Trailing page for terms and signature.
    Closing,
}

/// One printable page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
    pub index: usize,
    pub capacity: CapacityClass,
    /// Item-weight budget of this page's capacity class.
    pub limit: f64,
    /// Weight of the whole items and continuations placed here. A partial
    /// fragment that closes the page is not counted.
    pub usage: f64,
    pub role: PageRole,
    pub items: Vec<AugmentedItem>,
}

impl Page {
    fn blank(index: usize, role: PageRole, geometry: &PageGeometry) -> Self {
        Page {
            index,
            capacity: CapacityClass::Continuation,
            limit: geometry.capacity(CapacityClass::Continuation),
            usage: 0.0,
            role,
            items: Vec::new(),
        }
    }

    #[cfg(test)]
    pub fn is_blank(&self) -> bool {
        self.items.is_empty()
    }

    pub fn spare(&self) -> f64 {
        self.limit - self.usage
    }

    /// True if this page ends with a partial fragment of a split item.
    #[cfg(test)]
    pub fn ends_with_partial(&self) -> bool {
        self.items.last().is_some_and(|i| i.is_partial)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Public entry points
// ────────────────────────────────────────────────────────────────────────────

/// Lays out `items` on A4 quotation pages. The service itself goes through
/// `allocate_with` with the geometry held in `AppState`.
#[allow(dead_code)]
pub fn allocate(items: &[LineItem]) -> Vec<Page> {
    allocate_with(items, &PageGeometry::a4())
}

/// Lays out `items` using the given geometry.
pub fn allocate_with(items: &[LineItem], geometry: &PageGeometry) -> Vec<Page> {
    let mut queue: VecDeque<AugmentedItem> = items
        .iter()
        .cloned()
        .enumerate()
        .map(|(i, item)| AugmentedItem::whole(item, i as u32 + 1))
        .collect();

    let mut packer = Packer::new(geometry);
    while let Some(entry) = queue.pop_front() {
        if let Some(requeued) = packer.place(entry) {
            queue.push_front(requeued);
        }
    }
    packer.finish()
}

// ────────────────────────────────────────────────────────────────────────────
// Packing state
// ────────────────────────────────────────────────────────────────────────────

struct Packer<'a> {
    geometry: &'a PageGeometry,
    pages: Vec<Page>,
    current: Vec<AugmentedItem>,
    usage: f64,
    class: CapacityClass,
}

impl<'a> Packer<'a> {
    fn new(geometry: &'a PageGeometry) -> Self {
        Self {
            geometry,
            pages: Vec::new(),
            current: Vec::new(),
            usage: 0.0,
            class: CapacityClass::First,
        }
    }

    fn limit(&self) -> f64 {
        self.geometry.capacity(self.class)
    }

    /// Places `entry` on the current page or closes it. Returns the entry (or
    /// its continuation) when it has to be retried on the next page.
    fn place(&mut self, entry: AugmentedItem) -> Option<AugmentedItem> {
        let w = weight(&entry.item.description, self.geometry);
        let remaining = self.limit() - self.usage;

        if w <= remaining {
            self.current.push(entry);
            self.usage += w;
            return None;
        }

        if remaining > self.geometry.split_min_remaining {
            let available_lines =
                ((remaining - 1.0) / self.geometry.split_cost_per_line).floor() as usize;
            if available_lines >= 1 {
                let approx_chars = available_lines * self.geometry.chars_per_line.max(1);
                let (partial, continuation) = split_item(entry, approx_chars);
                debug!(
                    page = self.pages.len(),
                    serial = ?partial.serial,
                    weight = w,
                    remaining,
                    approx_chars,
                    "Splitting item across page boundary"
                );
                self.current.push(partial);
                self.close_page();
                return Some(continuation);
            }
        }

        if self.current.is_empty() {
            // A fresh page that can neither hold nor split the item: place it
            // anyway so the queue keeps draining.
            warn!(
                page = self.pages.len(),
                serial = ?entry.serial,
                weight = w,
                limit = self.limit(),
                "Item overflows an empty page"
            );
            self.current.push(entry);
            self.usage += w;
            return None;
        }

        debug!(
            page = self.pages.len(),
            serial = ?entry.serial,
            weight = w,
            remaining,
            "Deferring item to a fresh page"
        );
        self.close_page();
        Some(entry)
    }

    fn close_page(&mut self) {
        let page = Page {
            index: self.pages.len(),
            capacity: self.class,
            limit: self.limit(),
            usage: self.usage,
            role: PageRole::Items,
            items: std::mem::take(&mut self.current),
        };
        self.pages.push(page);
        self.usage = 0.0;
        self.class = CapacityClass::Continuation;
    }

    fn finish(mut self) -> Vec<Page> {
        if !self.current.is_empty() || self.pages.is_empty() {
            self.close_page();
        }

        let needs_footer_page = self
            .pages
            .last()
            .is_some_and(|last| last.spare() < self.geometry.footer_reserve);
        if needs_footer_page {
            let index = self.pages.len();
            self.pages
                .push(Page::blank(index, PageRole::FooterReserve, self.geometry));
        }

        let index = self.pages.len();
        self.pages
            .push(Page::blank(index, PageRole::Closing, self.geometry));
        self.pages
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Splitting
// ────────────────────────────────────────────────────────────────────────────

/// Splits an item's description roughly `approx_chars` characters in.
///
/// The partial fragment keeps the serial and carries no money; the
/// continuation keeps the quantity, rate and GST so the row total is printed
/// where the description ends.
fn split_item(entry: AugmentedItem, approx_chars: usize) -> (AugmentedItem, AugmentedItem) {
    let text = &entry.item.description;
    let cut = find_cut(text, approx_chars);
    let head = format!("{} ", text[..cut].trim_end());
    let tail = text[cut..].trim();
    let tail = if tail.is_empty() {
        String::new()
    } else {
        format!(" {tail}")
    };

    let partial = AugmentedItem {
        item: LineItem {
            description: head,
            qty: 0.0,
            rate: 0.0,
            gst_percent: 0.0,
            ..entry.item.clone()
        },
        serial: entry.serial,
        is_partial: true,
        is_continuation: entry.is_continuation,
    };

    let continuation = AugmentedItem {
        item: LineItem {
            description: tail,
            image: None,
            ..entry.item
        },
        serial: None,
        is_partial: false,
        is_continuation: true,
    };

    (partial, continuation)
}

/// Byte offset at which to cut `text` so the head holds about `approx_chars`
/// characters.
///
/// Prefers the last newline at or before `approx_chars` unless it would leave
/// the head shorter than half of that; then the last space; otherwise a hard
/// cut at `approx_chars`. Separators at position 0 are ignored so every cut
/// makes progress.
pub(crate) fn find_cut(text: &str, approx_chars: usize) -> usize {
    let byte_at = |n: usize| {
        text.char_indices()
            .nth(n)
            .map(|(i, _)| i)
            .unwrap_or(text.len())
    };

    let window = &text[..byte_at(approx_chars + 1)];

    if let Some(nl) = window.rfind('\n').filter(|&b| b > 0) {
        let nl_chars = window[..nl].chars().count();
        if nl_chars as f64 >= approx_chars as f64 * 0.5 {
            return nl;
        }
    }

    if let Some(sp) = window.rfind(' ').filter(|&b| b > 0) {
        return sp;
    }

    byte_at(approx_chars)
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn short(desc: &str) -> LineItem {
        LineItem::new(desc, 1.0, 100.0, 18.0)
    }

    fn shorts(n: usize) -> Vec<LineItem> {
        (0..n).map(|i| short(&format!("Item {i}"))).collect()
    }

    /// ~40 wrapped lines of space-separated words.
    fn long_description() -> String {
        "cable tray ".repeat(124).trim_end().to_string()
    }

    fn fragments(pages: &[Page]) -> Vec<&AugmentedItem> {
        pages.iter().flat_map(|p| p.items.iter()).collect()
    }

    fn normalize(s: &str) -> String {
        s.split_whitespace().collect::<Vec<_>>().join(" ")
    }

    // ── degenerate inputs ───────────────────────────────────────────────────

    #[test]
    fn test_empty_items_yield_content_and_closing_page() {
        let pages = allocate(&[]);
        assert_eq!(pages.len(), 2);
        assert_eq!(pages[0].capacity, CapacityClass::First);
        assert_eq!(pages[0].role, PageRole::Items);
        assert!(pages[0].is_blank());
        assert_eq!(pages[1].role, PageRole::Closing);
        assert!(pages[1].is_blank());
    }

    #[test]
    fn test_single_short_item() {
        let pages = allocate(&[short("Distribution board 8 way")]);
        assert_eq!(pages.len(), 2, "roomy first page needs no footer page");
        assert_eq!(pages[0].items.len(), 1);
        assert_eq!(pages[0].items[0].serial, Some(1));
        assert!(!pages[0].items[0].is_fragment());
        assert_eq!(pages[0].usage, 1.0);
        assert_eq!(pages[1].role, PageRole::Closing);
    }

    // ── footer pages ────────────────────────────────────────────────────────

    #[test]
    fn test_tight_last_page_gets_footer_reserve_page() {
        // 13 units used on an 18-unit page leaves 5 < 6.
        let pages = allocate(&shorts(13));
        let roles: Vec<PageRole> = pages.iter().map(|p| p.role).collect();
        assert_eq!(
            roles,
            vec![PageRole::Items, PageRole::FooterReserve, PageRole::Closing]
        );
        assert_eq!(pages[1].index, 1);
        assert_eq!(pages[2].index, 2);
    }

    #[test]
    fn test_exactly_footer_reserve_left_needs_no_extra_page() {
        // 12 units used leaves exactly 6.
        let pages = allocate(&shorts(12));
        assert_eq!(pages.len(), 2);
        assert_eq!(pages[1].role, PageRole::Closing);
    }

    // ── deferral ────────────────────────────────────────────────────────────

    #[test]
    fn test_full_first_page_defers_next_item() {
        let pages = allocate(&shorts(19));
        assert_eq!(pages[0].items.len(), 18);
        assert_eq!(pages[0].usage, 18.0);
        assert_eq!(pages[1].capacity, CapacityClass::Continuation);
        assert_eq!(pages[1].limit, 30.0);
        assert_eq!(pages[1].items.len(), 1);
        assert_eq!(pages[1].items[0].serial, Some(19));
        assert!(!pages[1].items[0].is_fragment());
        assert_eq!(pages.len(), 3);
    }

    #[test]
    fn test_too_little_room_to_split_defers_whole_item() {
        let mut items = shorts(16);
        // 3 lines → weight 2.5, more than the 2 units left, and 2 ≤ 2.5 blocks a split.
        let wide = "x".repeat(80);
        assert_eq!(weight(&wide, &PageGeometry::a4()), 2.5);
        items.push(short(&wide));

        let pages = allocate(&items);
        assert_eq!(pages[0].items.len(), 16);
        assert_eq!(pages[1].items.len(), 1);
        let moved = &pages[1].items[0];
        assert_eq!(moved.serial, Some(17));
        assert_eq!(moved.item.description, wide);
        assert!(!moved.is_fragment());
    }

    // ── splitting ───────────────────────────────────────────────────────────

    #[test]
    fn test_forced_split_of_long_item() {
        let mut items = shorts(10);
        let original = long_description();
        items.push(LineItem::new(original.clone(), 4.0, 250.0, 18.0));

        let pages = allocate(&items);
        let frags: Vec<&AugmentedItem> = fragments(&pages)
            .into_iter()
            .filter(|f| f.is_fragment())
            .collect();
        assert!(frags.len() >= 2);

        let partial = frags[0];
        assert!(partial.is_partial);
        assert_eq!(partial.serial, Some(11));
        assert_eq!(partial.item.qty, 0.0);
        assert_eq!(partial.item.rate, 0.0);
        assert_eq!(partial.item.gst_percent, 0.0);
        assert!(pages[0].ends_with_partial());

        let last = frags[frags.len() - 1];
        assert!(last.is_continuation);
        assert_eq!(last.serial, None);
        assert_eq!(last.item.qty, 4.0);
        assert_eq!(last.item.rate, 250.0);
        assert_eq!(last.item.gst_percent, 18.0);

        let pages_with_fragments = pages
            .iter()
            .filter(|p| p.items.iter().any(|i| i.is_fragment()))
            .count();
        assert!(pages_with_fragments >= 2);

        let rebuilt: Vec<&str> = frags.iter().map(|f| f.item.description.trim()).collect();
        assert_eq!(rebuilt.join(" "), original);
    }

    #[test]
    fn test_split_fragment_keeps_make_and_hsn() {
        let mut items = shorts(10);
        items.push(LineItem {
            make: "Havells".to_string(),
            hsn: "8536".to_string(),
            image: Some("mccb.png".to_string()),
            ..LineItem::new(long_description(), 1.0, 10.0, 5.0)
        });
        let pages = allocate(&items);
        let frags: Vec<&AugmentedItem> = fragments(&pages)
            .into_iter()
            .filter(|f| f.is_fragment())
            .collect();
        for f in &frags {
            assert_eq!(f.item.make, "Havells");
            assert_eq!(f.item.hsn, "8536");
        }
        assert_eq!(frags[0].item.image.as_deref(), Some("mccb.png"));
        assert_eq!(frags[1].item.image, None);
    }

    #[test]
    fn test_image_prints_once_on_split_item() {
        let item = LineItem {
            image: Some("panel.jpg".to_string()),
            ..LineItem::new("cable tray ".repeat(700).trim_end().to_string(), 1.0, 10.0, 18.0)
        };
        let pages = allocate(&[item]);
        let frags = fragments(&pages);
        assert!(frags.len() >= 3);

        let with_image: Vec<&AugmentedItem> =
            frags.iter().copied().filter(|f| f.item.image.is_some()).collect();
        assert_eq!(with_image.len(), 1);
        assert!(with_image[0].is_partial && !with_image[0].is_continuation);

        for f in frags.iter().filter(|f| f.is_continuation) {
            let json = serde_json::to_value(f).unwrap();
            assert!(json.get("image").is_none());
        }
    }

    #[test]
    fn test_very_long_item_splits_repeatedly() {
        let original = "conduit ".repeat(625).trim_end().to_string();
        let pages = allocate(&[LineItem::new(original.clone(), 2.0, 50.0, 12.0)]);
        let frags = fragments(&pages);
        assert!(frags.len() >= 3, "expected several fragments, got {}", frags.len());

        let serials: Vec<Option<u32>> = frags.iter().map(|f| f.serial).collect();
        assert_eq!(serials[0], Some(1));
        assert!(serials[1..].iter().all(|s| s.is_none()));

        // Only the final fragment carries money.
        let (last, rest) = frags.split_last().unwrap();
        assert_eq!(last.item.qty, 2.0);
        assert!(rest.iter().all(|f| f.item.qty == 0.0 && f.is_partial));
        // Re-split continuations remain marked as continuations.
        assert!(rest[1..].iter().all(|f| f.is_continuation));

        let rebuilt: Vec<&str> = frags.iter().map(|f| f.item.description.trim()).collect();
        assert_eq!(rebuilt.join(" "), original);
    }

    #[test]
    fn test_unbroken_token_is_hard_cut_without_loss() {
        let original = "X".repeat(3000);
        let pages = allocate(&[LineItem::new(original.clone(), 1.0, 1.0, 0.0)]);
        let rebuilt: String = fragments(&pages)
            .iter()
            .map(|f| f.item.description.trim())
            .collect();
        assert_eq!(rebuilt, original);
    }

    #[test]
    fn test_newline_cut_reconstructs_modulo_whitespace() {
        let line = "Earthing strip GI 25x3 mm with clamps";
        let original = vec![line; 60].join("\n");
        let mut items = shorts(5);
        items.push(LineItem::new(original.clone(), 1.0, 1.0, 0.0));
        let pages = allocate(&items);
        let rebuilt: Vec<&str> = fragments(&pages)
            .iter()
            .filter(|f| f.is_fragment())
            .map(|f| f.item.description.trim())
            .collect();
        assert_eq!(normalize(&rebuilt.join(" ")), normalize(&original));
    }

    // ── find_cut ────────────────────────────────────────────────────────────

    #[test]
    fn test_cut_prefers_late_newline() {
        let text = format!("{}\n{}", "a".repeat(30), "b ".repeat(40));
        assert_eq!(find_cut(&text, 34), 30);
    }

    #[test]
    fn test_cut_skips_early_newline_for_space() {
        let text = format!("ab\n{} tail", "c".repeat(30));
        // Newline at 2 is before half of 34; the space at 33 wins.
        assert_eq!(find_cut(&text, 34), 33);
    }

    #[test]
    fn test_cut_counts_separator_at_limit() {
        let text = format!("{} rest", "a".repeat(34));
        assert_eq!(find_cut(&text, 34), 34);
    }

    #[test]
    fn test_cut_falls_back_to_hard_cut() {
        let text = "z".repeat(100);
        assert_eq!(find_cut(&text, 34), 34);
        assert_eq!(find_cut(" zzzz", 2), 2, "leading space is not a cut point");
    }

    #[test]
    fn test_cut_uses_char_positions() {
        let text = "é".repeat(50);
        let cut = find_cut(&text, 10);
        assert_eq!(&text[..cut], "é".repeat(10));
    }

    // ── global properties ───────────────────────────────────────────────────

    fn mixed_items() -> Vec<LineItem> {
        let mut items = Vec::new();
        for i in 0..40 {
            let desc = match i % 4 {
                0 => format!("Item {i}"),
                1 => "Supply of armoured cable ".repeat(i % 7 + 1),
                2 => "line\n".repeat(i % 5 + 1),
                _ => "panel fabrication and testing ".repeat(i % 13 + 2),
            };
            items.push(LineItem::new(desc, i as f64, 10.0, 18.0));
        }
        items
    }

    #[test]
    fn test_no_item_lost_and_serials_complete() {
        let items = mixed_items();
        let pages = allocate(&items);
        let frags = fragments(&pages);
        assert!(frags.len() >= items.len());

        let mut serials: Vec<u32> = frags.iter().filter_map(|f| f.serial).collect();
        serials.sort_unstable();
        let expected: Vec<u32> = (1..=items.len() as u32).collect();
        assert_eq!(serials, expected);
    }

    #[test]
    fn test_order_preserved() {
        let pages = allocate(&mixed_items());
        let serials: Vec<u32> = fragments(&pages).iter().filter_map(|f| f.serial).collect();
        assert!(serials.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_idempotent() {
        let items = mixed_items();
        assert_eq!(allocate(&items), allocate(&items));
    }

    #[test]
    fn test_capacity_respected() {
        let geometry = PageGeometry::a4();
        let pages = allocate(&mixed_items());
        for page in &pages {
            assert!(page.usage <= page.limit, "page {} over budget", page.index);
            if !page.ends_with_partial() {
                let total: f64 = page
                    .items
                    .iter()
                    .map(|i| weight(&i.item.description, &geometry))
                    .sum();
                assert!(total <= page.limit, "page {} holds {total}", page.index);
                assert!((total - page.usage).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn test_only_first_page_is_first_class() {
        let pages = allocate(&mixed_items());
        assert_eq!(pages[0].capacity, CapacityClass::First);
        assert!(pages[1..]
            .iter()
            .all(|p| p.capacity == CapacityClass::Continuation));
        for (i, p) in pages.iter().enumerate() {
            assert_eq!(p.index, i);
        }
    }

    #[test]
    fn test_money_preserved_across_fragments() {
        let items = mixed_items();
        let pages = allocate(&items);
        let laid_out: f64 = fragments(&pages)
            .iter()
            .map(|f| f.item.qty * f.item.rate)
            .sum();
        let input: f64 = items.iter().map(|i| i.qty * i.rate).sum();
        assert!((laid_out - input).abs() < 1e-9);
    }

    #[test]
    fn test_tiny_geometry_still_terminates() {
        let geometry = PageGeometry {
            first_page_capacity: 2.0,
            continuation_page_capacity: 2.0,
            ..PageGeometry::a4()
        };
        let items = vec![short("a\nb\nc\nd"), short("e"), short("f\ng\nh\ni")];
        let pages = allocate_with(&items, &geometry);
        let serials: Vec<u32> = fragments(&pages).iter().filter_map(|f| f.serial).collect();
        assert_eq!(serials, vec![1, 2, 3]);
    }
}
