//! Rule-based field extraction for invoices and receipts.

pub mod fields;
pub mod numbers;
pub mod patterns;

pub use fields::{
    extract_currency, extract_date, extract_invoice_number, extract_merchant_name,
    extract_total_amount,
};
pub use numbers::{classify_tokens, parse_number, NumericToken};
