//! Amount in words, Indian numbering (Hundred, Thousand, Lakh, Crore).
//!
//! 12,34,567 → "Twelve Lakh Thirty Four Thousand Five Hundred Sixty Seven".
//! Groups that are zero add nothing, so 1000 is "One Thousand".

const ONES: [&str; 20] = [
    "", "One", "Two", "Three", "Four", "Five", "Six", "Seven", "Eight", "Nine", "Ten", "Eleven",
    "Twelve", "Thirteen", "Fourteen", "Fifteen", "Sixteen", "Seventeen", "Eighteen", "Nineteen",
];

const TENS: [&str; 10] = [
    "", "", "Twenty", "Thirty", "Forty", "Fifty", "Sixty", "Seventy", "Eighty", "Ninety",
];

const THOUSAND: u64 = 1_000;
const LAKH: u64 = 100_000;
const CRORE: u64 = 10_000_000;

/// Converts a non-negative whole amount to words.
pub fn to_words(n: u64) -> String {
    if n == 0 {
        return "Zero".to_string();
    }
    let mut parts = Vec::new();
    push_words(n, &mut parts);
    parts.join(" ")
}

fn push_words(n: u64, parts: &mut Vec<&'static str>) {
    if n >= CRORE {
        // Crores recurse on the full converter, so "One Hundred Crore" works.
        push_words(n / CRORE, parts);
        parts.push("Crore");
        push_words(n % CRORE, parts);
    } else if n >= LAKH {
        push_words(n / LAKH, parts);
        parts.push("Lakh");
        push_words(n % LAKH, parts);
    } else if n >= THOUSAND {
        push_words(n / THOUSAND, parts);
        parts.push("Thousand");
        push_words(n % THOUSAND, parts);
    } else {
        push_below_thousand(n, parts);
    }
}

fn push_below_thousand(n: u64, parts: &mut Vec<&'static str>) {
    let hundreds = n / 100;
    let rest = n % 100;
    if hundreds > 0 {
        parts.push(ONES[hundreds as usize]);
        parts.push("Hundred");
    }
    if rest >= 20 {
        parts.push(TENS[(rest / 10) as usize]);
        if rest % 10 > 0 {
            parts.push(ONES[(rest % 10) as usize]);
        }
    } else if rest > 0 {
        parts.push(ONES[rest as usize]);
    }
}

/// Words for a rounded currency amount. Negative or non-finite amounts
/// read as "Zero".
pub fn amount_to_words(rounded: f64) -> String {
    if rounded.is_finite() && rounded > 0.0 {
        to_words(rounded as u64)
    } else {
        to_words(0)
    }
}
