//! Page geometry: the single source of truth for every fixed offset
//!
//! All positioning in the layout engine is absolute-offset based. The two
//! offset sets (item-table columns and totals label/value columns) live here
//! so the renderers cannot drift apart.

use pdf_canvas::Color;

/// A4 portrait page width in points
pub const PAGE_WIDTH: f64 = 595.28;
/// Uniform page margin in points
pub const MARGIN: f64 = 40.0;

/// Item-table column X offsets
pub mod table {
    /// Item name column (left margin)
    pub const ITEM: f64 = super::MARGIN;
    /// Quantity column
    pub const QTY: f64 = 260.0;
    /// Unit net price column
    pub const UNIT_NET: f64 = 290.0;
    /// Total net column
    pub const TOTAL_NET: f64 = 360.0;
    /// Tax rate column
    pub const TAX: f64 = 430.0;
    /// Total gross column
    pub const GROSS: f64 = 480.0;
    /// Gutter kept clear between the item name and the quantity column
    pub const ITEM_GUTTER: f64 = 10.0;
}

/// Totals-block label/value column X offsets
pub mod totals {
    /// Label column
    pub const LABEL: f64 = super::table::TOTAL_NET + 18.0;
    /// Value column
    pub const VALUE: f64 = super::table::GROSS;
}

/// Seller/buyer two-column split
pub mod party {
    /// Left (seller) column X
    pub const LEFT_X: f64 = super::MARGIN;
    /// Right (buyer) column X; the content width splits at this point
    pub const SPLIT: f64 = 290.0;
}

/// Title font size in points
pub const TITLE_SIZE: f32 = 24.0;
/// Body font size in points
pub const BODY_SIZE: f32 = 9.0;
/// Table header font size in points
pub const TABLE_HEADER_SIZE: f32 = BODY_SIZE - 1.0;

/// Spacing between body lines (dates, addresses, wrapped item names)
pub const BODY_LINE_HEIGHT: f64 = 15.0;
/// Advance per totals-block line
pub const TOTALS_LINE_HEIGHT: f64 = 20.0;
/// Bottom padding after each item row
pub const ROW_PAD: f64 = 10.0;
/// Gap between the item table and the notes/totals section
pub const ITEMS_TO_NOTES_GAP: f64 = 52.0;
/// Absolute Y of the footer line
pub const FOOTER_Y: f64 = 800.0;

/// Full-black emphasis
pub const BLACK: Color = Color { r: 0.0, g: 0.0, b: 0.0 };
/// Gray used for field labels
pub const LABEL_GRAY: Color = Color {
    r: 100.0 / 255.0,
    g: 100.0 / 255.0,
    b: 100.0 / 255.0,
};
/// Gray used for totals labels and party headings
pub const HEADING_GRAY: Color = Color {
    r: 75.0 / 255.0,
    g: 75.0 / 255.0,
    b: 75.0 / 255.0,
};
/// Gray used for secondary body text
pub const BODY_GRAY: Color = Color {
    r: 55.0 / 255.0,
    g: 55.0 / 255.0,
    b: 55.0 / 255.0,
};
/// Divider stroke gray
pub const DIVIDER_GRAY: Color = Color {
    r: 225.0 / 255.0,
    g: 225.0 / 255.0,
    b: 225.0 / 255.0,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_columns_are_ordered_left_to_right() {
        assert!(table::ITEM < table::QTY);
        assert!(table::QTY < table::UNIT_NET);
        assert!(table::UNIT_NET < table::TOTAL_NET);
        assert!(table::TOTAL_NET < table::TAX);
        assert!(table::TAX < table::GROSS);
        assert!(table::GROSS < PAGE_WIDTH - MARGIN);
    }

    #[test]
    fn test_totals_columns_sit_right_of_the_table_net_column() {
        assert_eq!(totals::LABEL, 378.0);
        assert_eq!(totals::VALUE, table::GROSS);
    }
}
