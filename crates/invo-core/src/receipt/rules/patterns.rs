//! Common regex patterns for invoice field extraction.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Numeric token shape after currency stripping: unsigned int or decimal
    pub static ref NUMERIC_TOKEN: Regex = Regex::new(
        r"^\d+(?:\.\d+)?$"
    ).unwrap();

    // Invoice number patterns, in priority order
    pub static ref INVOICE_NUMBER: Regex = Regex::new(
        r"(?i)invoice\s*(?:no|number)?\s*[:\-]?\s*([A-Z0-9\-]+)"
    ).unwrap();

    pub static ref INVOICE_NUMBER_SHORT: Regex = Regex::new(
        r"(?i)inv\s*[:\-]?\s*([A-Z0-9\-]+)"
    ).unwrap();

    pub static ref BILL_NUMBER: Regex = Regex::new(
        r"(?i)bill\s*no\s*[:\-]?\s*([A-Z0-9\-]+)"
    ).unwrap();

    // Date patterns, day-first tried before year-first
    pub static ref DATE_DMY: Regex = Regex::new(
        r"\d{2}[/-]\d{2}[/-]\d{4}"
    ).unwrap();

    pub static ref DATE_YMD: Regex = Regex::new(
        r"\d{4}[/-]\d{2}[/-]\d{2}"
    ).unwrap();

    // Total amount patterns, specific phrasing before generic
    pub static ref TOTAL_DUE: Regex = Regex::new(
        r"(?i)(?:balance\s*due|amount\s*due)\s*[:\-]?\s*[₹$]?\s*(\d+\.?\d*)"
    ).unwrap();

    pub static ref GRAND_TOTAL: Regex = Regex::new(
        r"(?i)grand\s*total\s*[:\-]?\s*[₹$]?\s*(\d+\.?\d*)"
    ).unwrap();

    pub static ref TOTAL_AMOUNT: Regex = Regex::new(
        r"(?i)total\s*amount\s*[:\-]?\s*[₹$]?\s*(\d+\.?\d*)"
    ).unwrap();

    // Any decimal-formatted amount, optionally currency-prefixed
    pub static ref DECIMAL_AMOUNT: Regex = Regex::new(
        r"[₹$]?\s*(\d+\.\d{2})"
    ).unwrap();

    // Line-item tokenization helpers
    pub static ref MULTI_SPACE: Regex = Regex::new(
        r"\s{2,}"
    ).unwrap();

    pub static ref INTEGER: Regex = Regex::new(
        r"\d+"
    ).unwrap();

    pub static ref NUMBER: Regex = Regex::new(
        r"\d+\.?\d*"
    ).unwrap();

    pub static ref LOOSE_NUMBER: Regex = Regex::new(
        r"\d+(?:\.\d+)?"
    ).unwrap();

    pub static ref TRAILING_NUMBER: Regex = Regex::new(
        r"\d+(?:\.\d+)?\s*$"
    ).unwrap();

    pub static ref HAS_LETTER: Regex = Regex::new(
        r"[A-Za-z]"
    ).unwrap();

    // Multiplier notation: "2x" / "x2"
    pub static ref QTY_TIMES_SUFFIX: Regex = Regex::new(
        r"^(\d+)\s*x$"
    ).unwrap();

    pub static ref QTY_TIMES_PREFIX: Regex = Regex::new(
        r"^x\s*(\d+)$"
    ).unwrap();
}
