//! Numeric token classification.
//!
//! OCR fragments carry currency glyphs, thousands separators, and plain
//! noise. Classification is pure: a fragment either cleans up to an
//! unsigned integer/decimal and yields its value, or it is not numeric.
//! Nothing here ever errors.

use super::patterns::NUMERIC_TOKEN;

/// A token classified as numeric, with its position in the source line.
#[derive(Debug, Clone, PartialEq)]
pub struct NumericToken {
    /// Token index in the whitespace-split line.
    pub index: usize,
    /// Original token text.
    pub raw: String,
    /// Parsed value.
    pub value: f64,
    /// Whether the cleaned token carried a decimal point. Distinguishes
    /// price-shaped tokens from quantity-shaped ones.
    pub has_decimal: bool,
}

/// Strip thousands separators and currency markers from a token.
fn strip_currency(token: &str) -> String {
    token
        .replace(',', "")
        .replace('$', "")
        .replace('₹', "")
        .replace("Rs", "")
        .replace("rs", "")
}

/// Parse a fragment as a currency/quantity number.
///
/// Returns the value only when the cleaned string fully matches an
/// unsigned integer-or-decimal pattern.
pub fn parse_number(token: &str) -> Option<f64> {
    let cleaned = strip_currency(token);
    if NUMERIC_TOKEN.is_match(&cleaned) {
        cleaned.parse().ok()
    } else {
        None
    }
}

/// Classify every token of a whitespace-split line.
pub fn classify_tokens(tokens: &[&str]) -> Vec<NumericToken> {
    tokens
        .iter()
        .enumerate()
        .filter_map(|(index, token)| {
            let cleaned = strip_currency(token);
            if !NUMERIC_TOKEN.is_match(&cleaned) {
                return None;
            }
            Some(NumericToken {
                index,
                raw: (*token).to_string(),
                value: cleaned.parse().ok()?,
                has_decimal: cleaned.contains('.'),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_number_strips_separators_and_currency() {
        assert_eq!(parse_number("1,234.50"), Some(1234.5));
        assert_eq!(parse_number("$12"), Some(12.0));
        assert_eq!(parse_number("₹99.99"), Some(99.99));
        assert_eq!(parse_number("Rs450"), Some(450.0));
    }

    #[test]
    fn test_parse_number_rejects_non_numeric() {
        assert_eq!(parse_number("abc"), None);
        assert_eq!(parse_number("12a"), None);
        assert_eq!(parse_number(""), None);
        assert_eq!(parse_number("-5"), None);
        assert_eq!(parse_number("1.2.3"), None);
    }

    #[test]
    fn test_classify_tokens_tracks_index_and_decimal() {
        let tokens = ["Coffee", "2", "$4.50"];
        let numeric = classify_tokens(&tokens);

        assert_eq!(numeric.len(), 2);
        assert_eq!(numeric[0].index, 1);
        assert_eq!(numeric[0].value, 2.0);
        assert!(!numeric[0].has_decimal);
        assert_eq!(numeric[1].index, 2);
        assert_eq!(numeric[1].value, 4.5);
        assert!(numeric[1].has_decimal);
    }

    #[test]
    fn test_classify_tokens_keeps_raw_text() {
        let numeric = classify_tokens(&["$4.50"]);
        assert_eq!(numeric[0].raw, "$4.50");
    }
}
