//! Document-level field extractors.
//!
//! Each extractor scans the full reconstructed text with an ordered
//! pattern list; the first pattern in priority order that matches wins, so
//! specific phrasing beats generic ("balance due" over a bare trailing
//! amount). A miss is `None`, never an error.

use regex::Regex;

use super::patterns::{
    BILL_NUMBER, DATE_DMY, DATE_YMD, DECIMAL_AMOUNT, GRAND_TOTAL, INVOICE_NUMBER,
    INVOICE_NUMBER_SHORT, TOTAL_AMOUNT, TOTAL_DUE,
};

/// Header lines that cannot be a merchant name.
const MERCHANT_IGNORE: [&str; 6] = [
    "invoice",
    "bill to",
    "ship to",
    "date",
    "invoice no",
    "invoice number",
];

/// Maximum token count for a plausible merchant-name line.
const MERCHANT_MAX_TOKENS: usize = 6;

/// Extract the invoice/bill identifier.
pub fn extract_invoice_number(text: &str) -> Option<String> {
    let patterns: [&Regex; 3] = [&INVOICE_NUMBER, &INVOICE_NUMBER_SHORT, &BILL_NUMBER];

    for pattern in patterns {
        if let Some(caps) = pattern.captures(text) {
            if let Some(m) = caps.get(1) {
                return Some(m.as_str().to_string());
            }
        }
    }

    None
}

/// Extract the document date as matched, without calendar validation.
pub fn extract_date(text: &str) -> Option<String> {
    DATE_DMY
        .find(text)
        .or_else(|| DATE_YMD.find(text))
        .map(|m| m.as_str().to_string())
}

/// Extract the total amount due.
///
/// Labeled totals take priority; failing those, the last decimal-formatted
/// number anywhere in the text is used (totals are usually the last amount
/// printed).
pub fn extract_total_amount(text: &str) -> Option<f64> {
    let patterns: [&Regex; 3] = [&TOTAL_DUE, &GRAND_TOTAL, &TOTAL_AMOUNT];

    for pattern in patterns {
        if let Some(caps) = pattern.captures(text) {
            if let Some(amount) = caps.get(1).and_then(|m| m.as_str().parse().ok()) {
                return Some(amount);
            }
        }
    }

    DECIMAL_AMOUNT
        .captures_iter(text)
        .last()
        .and_then(|caps| caps.get(1)?.as_str().parse().ok())
}

/// Detect the currency from glyphs or code mentions.
pub fn extract_currency(text: &str) -> Option<String> {
    let lower = text.to_lowercase();

    if text.contains('₹') || lower.contains("rs") || lower.contains("inr") {
        return Some("INR".to_string());
    }
    if text.contains('$') || lower.contains("usd") {
        return Some("USD".to_string());
    }

    None
}

/// Extract the merchant name from the document header.
///
/// The first of the top five non-empty lines that carries no header
/// keyword and at most six tokens is taken as the name.
pub fn extract_merchant_name(text: &str) -> Option<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .take(5)
        .find(|line| {
            let lower = line.to_lowercase();
            !MERCHANT_IGNORE.iter().any(|k| lower.contains(k))
                && line.split_whitespace().count() <= MERCHANT_MAX_TOKENS
        })
        .map(String::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invoice_number_labeled_forms() {
        assert_eq!(
            extract_invoice_number("Invoice No: INV-2024-001"),
            Some("INV-2024-001".to_string())
        );
        assert_eq!(
            extract_invoice_number("invoice number 12345"),
            Some("12345".to_string())
        );
        assert_eq!(
            extract_invoice_number("INV: A-99"),
            Some("A-99".to_string())
        );
        assert_eq!(
            extract_invoice_number("Bill No: 778"),
            Some("778".to_string())
        );
        assert_eq!(extract_invoice_number("no identifiers here"), None);
    }

    #[test]
    fn test_date_formats() {
        assert_eq!(
            extract_date("Date: 01/02/2024 paid"),
            Some("01/02/2024".to_string())
        );
        assert_eq!(
            extract_date("issued 2024-02-01"),
            Some("2024-02-01".to_string())
        );
        assert_eq!(extract_date("Feb 1st"), None);
    }

    #[test]
    fn test_day_first_date_wins_over_year_first() {
        let text = "2024-02-01 then 15/03/2024";
        assert_eq!(extract_date(text), Some("15/03/2024".to_string()));
    }

    #[test]
    fn test_total_amount_priority() {
        let text = "Total Amount: 10.00\nGrand Total: 20.00\nBalance Due: $30.00";
        assert_eq!(extract_total_amount(text), Some(30.0));

        let text = "Total Amount: 10.00\nGrand Total: 20.00";
        assert_eq!(extract_total_amount(text), Some(20.0));
    }

    #[test]
    fn test_total_amount_falls_back_to_last_decimal() {
        let text = "Coffee 4.50\nBagel 3.25\n12.99";
        assert_eq!(extract_total_amount(text), Some(12.99));
        assert_eq!(extract_total_amount("nothing numeric"), None);
    }

    #[test]
    fn test_currency_detection() {
        assert_eq!(extract_currency("Total ₹500"), Some("INR".to_string()));
        assert_eq!(extract_currency("Rs 500 net"), Some("INR".to_string()));
        assert_eq!(extract_currency("Total $45.50"), Some("USD".to_string()));
        assert_eq!(extract_currency("amount in usd"), Some("USD".to_string()));
        assert_eq!(extract_currency("500 EUR"), None);
    }

    #[test]
    fn test_merchant_name_skips_header_keywords() {
        let text = "INVOICE\nBill To: Someone\nFresh Mart\nmore text";
        assert_eq!(extract_merchant_name(text), Some("Fresh Mart".to_string()));
    }

    #[test]
    fn test_merchant_name_rejects_long_lines() {
        let text = "one two three four five six seven\nCorner Shop";
        assert_eq!(extract_merchant_name(text), Some("Corner Shop".to_string()));
    }

    #[test]
    fn test_merchant_name_only_scans_top_lines() {
        let text = "invoice\ninvoice\ninvoice\ninvoice\ninvoice\nFresh Mart";
        assert_eq!(extract_merchant_name(text), None);
    }
}
