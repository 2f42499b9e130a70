//! Line-item extraction cascade.
//!
//! Three strategies, tried in order by the orchestrator until one yields
//! items: column-anchored extraction over clustered detection rows,
//! plain-text heuristics over reconstructed lines, and a loose
//! last-number-as-price fallback.

use tracing::debug;

use crate::models::LineItem;
use crate::ocr::{detect_header, ColumnRole, Detection, LineClusterer};

use super::rules::numbers::{classify_tokens, parse_number, NumericToken};
use super::rules::patterns::{
    HAS_LETTER, INTEGER, LOOSE_NUMBER, MULTI_SPACE, NUMBER, QTY_TIMES_PREFIX, QTY_TIMES_SUFFIX,
    TRAILING_NUMBER,
};

/// Minimum line length considered for item extraction.
const MIN_LINE_LEN: usize = 5;

/// Summary/footer keywords that disqualify a line from item extraction.
const EXCLUDED_KEYWORDS: [&str; 20] = [
    "total",
    "subtotal",
    "tax",
    "vat",
    "gst",
    "amount due",
    "balance due",
    "grand total",
    "change",
    "cash",
    "card",
    "thank you",
    "paid",
    "payment",
    "tender",
    "invoice",
    "date",
    "time",
    "table",
    "server",
];

/// Truncated keyword prefixes, for OCR-clipped headers and footers.
const TRUNCATED_PREFIXES: [&str; 8] = ["tot", "tax", "vat", "gst", "amt", "due", "bal", "sub"];

/// Common OCR manglings of "total"/"tax" seen in the wild.
const MANGLED_KEYWORDS: [&str; 4] = ["tex", "totd", "tota", "totl"];

/// Table header vocabulary; lines naming columns are not items.
const TABLE_HEADER_WORDS: [&str; 8] = [
    "description",
    "qty",
    "quantity",
    "price",
    "total",
    "subtotal",
    "tax",
    "amount",
];

/// Unit keywords that introduce a quantity.
const UNIT_KEYWORDS: [&str; 5] = ["qty", "quantity", "pcs", "pc", "ea"];

/// True when a line belongs to the document's summary/footer region.
fn is_excluded_line(text: &str) -> bool {
    let lower = text.to_lowercase();

    if EXCLUDED_KEYWORDS.iter().any(|k| lower.contains(k)) {
        return true;
    }

    let letters: String = lower.chars().filter(char::is_ascii_lowercase).collect();
    if TRUNCATED_PREFIXES.iter().any(|p| letters.starts_with(p)) {
        return true;
    }

    MANGLED_KEYWORDS.contains(&letters.as_str())
}

/// True when a line names table columns rather than an item.
fn is_table_header_line(text: &str) -> bool {
    let lower = text.to_lowercase();
    TABLE_HEADER_WORDS.iter().any(|k| lower.contains(k))
}

/// Strategy A: column-anchored extraction over clustered detection rows.
///
/// Requires a detected header row with at least one anchor; without one
/// the strategy yields nothing and the cascade falls through to the text
/// heuristics.
pub fn extract_from_boxes(detections: &[Detection]) -> Vec<LineItem> {
    let mut items = Vec::new();
    if detections.is_empty() {
        return items;
    }

    let bands = LineClusterer::new().cluster(detections);
    let header = match detect_header(&bands) {
        Some(h) if !h.columns.is_empty() => h,
        _ => return items,
    };

    debug!(header_band = header.band_index, "using column-anchored extraction");

    for (index, band) in bands.iter().enumerate() {
        if index == header.band_index {
            continue;
        }

        let line_text = band.text();
        if line_text.len() < MIN_LINE_LEN {
            continue;
        }
        if is_table_header_line(&line_text) || is_excluded_line(&line_text) {
            continue;
        }

        let mut item_text = String::new();
        let mut qty: Option<f64> = None;
        let mut unit_price: Option<f64> = None;
        let mut line_total: Option<f64> = None;

        for fragment in &band.fragments {
            match header.columns.nearest_role(fragment.x) {
                Some(ColumnRole::Item) | None => {
                    if !item_text.is_empty() {
                        item_text.push(' ');
                    }
                    item_text.push_str(fragment.text.trim());
                }
                Some(role) => {
                    if let Some(value) = parse_number(&fragment.text) {
                        match role {
                            ColumnRole::Qty => qty = Some(value),
                            ColumnRole::Price => unit_price = Some(value),
                            ColumnRole::Total => line_total = Some(value),
                            ColumnRole::Item => unreachable!(),
                        }
                    }
                }
            }
        }

        let item_text = item_text.trim().to_string();
        if item_text.is_empty() || (qty.is_none() && unit_price.is_none() && line_total.is_none())
        {
            continue;
        }

        let quantity = qty.map(|q| q.round().max(1.0) as u32).unwrap_or(1);

        // Two numeric cells with inverted roles: a row reading "5.00 50.00"
        // under swapped anchors would report a total below its unit price.
        if let (Some(unit), Some(total)) = (unit_price, line_total) {
            if quantity == 1 && total < unit {
                unit_price = Some(total);
                line_total = Some(unit);
            }
        }

        let price = line_total.or(unit_price).unwrap_or(0.0);

        let mut item = LineItem::new(item_text, quantity, price);
        if let Some(unit) = unit_price {
            if unit != price {
                item.unit_price = Some(unit);
            }
        }
        items.push(item);
    }

    items
}

/// Strategy B: plain-text heuristics over reconstructed lines.
///
/// A line first gets a column split on runs of two-plus spaces; failing
/// that, whitespace tokens are classified numeric/non-numeric and
/// quantity/price roles assigned by keyword, multiplier notation, and
/// magnitude.
pub fn extract_from_text(text: &str) -> Vec<LineItem> {
    let mut items = Vec::new();

    for raw_line in text.lines() {
        let line = raw_line.trim();
        if line.len() < MIN_LINE_LEN {
            continue;
        }
        if is_table_header_line(line) || is_excluded_line(line) {
            continue;
        }

        let parts: Vec<&str> = MULTI_SPACE.split(line).collect();
        if parts.len() >= 3 {
            let item = parts[0].trim();
            let quantity = INTEGER
                .find(parts[1])
                .and_then(|m| m.as_str().parse::<u32>().ok());
            let price = NUMBER
                .find(parts[parts.len() - 1])
                .and_then(|m| m.as_str().parse::<f64>().ok());

            if let (Some(quantity), Some(price)) = (quantity, price) {
                if !item.is_empty() {
                    items.push(LineItem::new(item, quantity.max(1), price));
                }
            }
            // A columnar line without usable numbers is not retried as
            // token soup.
            continue;
        }

        let tokens: Vec<&str> = line.split_whitespace().collect();
        if tokens.len() < 3 {
            continue;
        }

        let numeric = classify_tokens(&tokens);
        if numeric.len() < 2 {
            continue;
        }

        let first_numeric_index = numeric[0].index;
        if first_numeric_index == 0 {
            continue;
        }
        let item = tokens[..first_numeric_index].join(" ");

        let quantity = resolve_quantity(&tokens, &numeric);
        let price = numeric
            .iter()
            .rev()
            .find(|n| n.has_decimal)
            .map(|n| n.value)
            .unwrap_or_else(|| {
                numeric
                    .iter()
                    .map(|n| n.value)
                    .fold(f64::NEG_INFINITY, f64::max)
            });

        items.push(LineItem::new(item, quantity.round().max(1.0) as u32, price));
    }

    items
}

/// Quantity resolution for the token path, in priority order: a number
/// following a unit keyword, multiplier notation, the smallest small
/// integer, then the first numeric token verbatim.
fn resolve_quantity(tokens: &[&str], numeric: &[NumericToken]) -> f64 {
    for (index, token) in tokens.iter().enumerate() {
        if !UNIT_KEYWORDS.contains(&token.to_lowercase().as_str()) {
            continue;
        }
        if let Some(n) = numeric.iter().find(|n| n.index > index) {
            return n.value;
        }
    }

    for token in tokens {
        let lower = token.to_lowercase();
        if let Some(caps) = QTY_TIMES_SUFFIX
            .captures(&lower)
            .or_else(|| QTY_TIMES_PREFIX.captures(&lower))
        {
            if let Ok(value) = caps[1].parse() {
                return value;
            }
        }
    }

    let small_ints: Vec<f64> = numeric
        .iter()
        .map(|n| n.value)
        .filter(|v| v.fract() == 0.0 && (1.0..=100.0).contains(v))
        .collect();
    if let Some(smallest) = small_ints.iter().cloned().reduce(f64::min) {
        return smallest;
    }

    numeric[0].value
}

/// Strategy C: loose fallback using only the trailing numbers of a line.
pub fn extract_loose(text: &str) -> Vec<LineItem> {
    let mut items = Vec::new();

    for raw_line in text.lines() {
        let line = raw_line.trim();
        if line.len() < MIN_LINE_LEN {
            continue;
        }
        if is_table_header_line(line) {
            continue;
        }
        if !HAS_LETTER.is_match(line) {
            continue;
        }

        let cleaned = line.replace(',', "");
        let numbers: Vec<f64> = LOOSE_NUMBER
            .find_iter(&cleaned)
            .filter_map(|m| m.as_str().parse().ok())
            .collect();
        if numbers.is_empty() {
            continue;
        }

        let price = *numbers.last().unwrap();
        let quantity = if numbers.len() >= 2 {
            (numbers[0].trunc() as u32).max(1)
        } else {
            1
        };

        let stripped = TRAILING_NUMBER.replace(line, "");
        let item = stripped.trim_matches([' ', '-', '|', ':']);
        let item = if item.is_empty() { line } else { item };

        items.push(LineItem::new(item, quantity, price));
    }

    items
}
