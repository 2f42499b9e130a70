//! Column inference for table rows.
//!
//! A document gets at most one header row. The first band naming the item
//! and qty columns (plus price or total) fixes a horizontal anchor per
//! column role; later rows assign each fragment to the nearest anchor.

use super::Band;

/// Role of a table column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnRole {
    /// Item description column.
    Item,
    /// Quantity column.
    Qty,
    /// Unit price column.
    Price,
    /// Line total column.
    Total,
}

impl ColumnRole {
    /// All roles in left-to-right table order.
    pub const ALL: [ColumnRole; 4] = [
        ColumnRole::Item,
        ColumnRole::Qty,
        ColumnRole::Price,
        ColumnRole::Total,
    ];

    /// Map a header cell's text to a role.
    pub fn from_header_cell(text: &str) -> Option<Self> {
        match text.trim().to_lowercase().as_str() {
            "item" | "items" | "description" => Some(ColumnRole::Item),
            "qty" | "quantity" => Some(ColumnRole::Qty),
            "price" | "rate" | "unit" => Some(ColumnRole::Price),
            "total" | "amount" => Some(ColumnRole::Total),
            _ => None,
        }
    }

    fn index(self) -> usize {
        match self {
            ColumnRole::Item => 0,
            ColumnRole::Qty => 1,
            ColumnRole::Price => 2,
            ColumnRole::Total => 3,
        }
    }
}

/// Horizontal anchors for inferred table columns, at most one per role.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ColumnMap {
    anchors: [Option<f32>; 4],
}

impl ColumnMap {
    /// True when no role has an anchor.
    pub fn is_empty(&self) -> bool {
        self.anchors.iter().all(Option::is_none)
    }

    /// Record a role's anchor. A repeated role keeps the newest position.
    pub fn set_anchor(&mut self, role: ColumnRole, x: f32) {
        self.anchors[role.index()] = Some(x);
    }

    /// The anchor recorded for a role, if any.
    pub fn anchor(&self, role: ColumnRole) -> Option<f32> {
        self.anchors[role.index()]
    }

    /// Classify a fragment position to the role with the nearest anchor.
    ///
    /// Equidistant ties resolve to the leftmost role in item/qty/price/total
    /// order (strict `<` while scanning in that order).
    pub fn nearest_role(&self, x: f32) -> Option<ColumnRole> {
        let mut best: Option<(ColumnRole, f32)> = None;

        for role in ColumnRole::ALL {
            if let Some(anchor) = self.anchor(role) {
                let distance = (x - anchor).abs();
                if best.is_none_or(|(_, d)| distance < d) {
                    best = Some((role, distance));
                }
            }
        }

        best.map(|(role, _)| role)
    }
}

/// A detected header row with its column anchors.
#[derive(Debug, Clone, PartialEq)]
pub struct TableHeader {
    /// Index of the header band in the clustered band list.
    pub band_index: usize,
    /// Column anchors recorded from the header cells.
    pub columns: ColumnMap,
}

/// Scan bands for the first table header row.
///
/// A band qualifies when its joined lowercase text names the item column
/// ("item" or "description"), the quantity column ("qty" or "quantity"),
/// and either "price" or "total", all as substrings. Only the first match
/// is used; a document is assumed to carry a single header.
pub fn detect_header(bands: &[Band]) -> Option<TableHeader> {
    for (band_index, band) in bands.iter().enumerate() {
        let joined = band.text().to_lowercase();

        let names_columns = (joined.contains("item") || joined.contains("description"))
            && (joined.contains("qty") || joined.contains("quantity"))
            && (joined.contains("price") || joined.contains("total"));
        if !names_columns {
            continue;
        }

        let mut columns = ColumnMap::default();
        for fragment in &band.fragments {
            if let Some(role) = ColumnRole::from_header_cell(&fragment.text) {
                columns.set_anchor(role, fragment.x);
            }
        }

        return Some(TableHeader {
            band_index,
            columns,
        });
    }

    None
}
