//! Output record types for extracted invoice/receipt data.

use serde::{Deserialize, Serialize};

/// A single purchased item recovered from the document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    /// Item description. Never empty.
    pub item: String,

    /// Purchased quantity. Defaults to 1 when no quantity cell was found.
    pub quantity: u32,

    /// Line price. Always populated: the line total when known, otherwise
    /// the unit price, otherwise 0.0.
    pub price: f64,

    /// Unit price, kept only when it is distinguishable from `price`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit_price: Option<f64>,
}

impl LineItem {
    /// Create a line item without a separate unit price.
    pub fn new(item: impl Into<String>, quantity: u32, price: f64) -> Self {
        Self {
            item: item.into(),
            quantity,
            price,
            unit_price: None,
        }
    }
}

/// The extraction result for one input document.
///
/// The five scalar fields always serialize (as `null` when absent) so the
/// output key set is identical for every document; only a line item's
/// `unit_price` key is conditional.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvoiceRecord {
    /// Merchant or issuer name from the document header.
    pub merchant_name: Option<String>,

    /// Invoice/bill identifier.
    pub invoice_number: Option<String>,

    /// Document date, as matched in the text. No calendar validation.
    pub date: Option<String>,

    /// Total amount due.
    pub total_amount: Option<f64>,

    /// ISO currency code (INR or USD) when detectable.
    pub currency: Option<String>,

    /// Purchased line items in reading order.
    pub line_items: Vec<LineItem>,
}

impl InvoiceRecord {
    /// Create a record with every field absent.
    pub fn empty() -> Self {
        Self {
            merchant_name: None,
            invoice_number: None,
            date: None,
            total_amount: None,
            currency: None,
            line_items: Vec::new(),
        }
    }
}

impl Default for InvoiceRecord {
    fn default() -> Self {
        Self::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_serializes_stable_key_set() {
        let record = InvoiceRecord::empty();
        let json = serde_json::to_value(&record).unwrap();
        let keys: Vec<&str> = json.as_object().unwrap().keys().map(|k| k.as_str()).collect();

        assert_eq!(
            keys,
            vec![
                "merchant_name",
                "invoice_number",
                "date",
                "total_amount",
                "currency",
                "line_items"
            ]
        );
        assert!(json["merchant_name"].is_null());
        assert!(json["line_items"].as_array().unwrap().is_empty());
    }

    #[test]
    fn test_unit_price_key_only_when_present() {
        let plain = serde_json::to_value(LineItem::new("Widget", 2, 22.75)).unwrap();
        assert!(plain.get("unit_price").is_none());

        let mut with_unit = LineItem::new("Widget", 10, 50.0);
        with_unit.unit_price = Some(5.0);
        let json = serde_json::to_value(&with_unit).unwrap();
        assert_eq!(json["unit_price"], 5.0);
    }
}
