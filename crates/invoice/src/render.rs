//! Invoice layout: the section-writer pipeline
//!
//! One strict top-to-bottom pass over the canvas cursor:
//! logo → header block → seller/buyer columns → table header → divider →
//! item rows → notes/totals → footer. Every writer picks the cursor up where
//! the previous writer left it; only the party-column writer captures and
//! restores Y explicitly.

use crate::currency;
use crate::geometry::*;
use crate::lang::LanguagePack;
use crate::model::{split_lines, Invoice, LineItem};
use crate::wrap::wrap_text;
use pdf_canvas::{Canvas, FontWeight, ImageScaleMode};

/// Font family every writer draws with
pub const FONT_FAMILY: &str = "inter";

/// Invoice totals, computed once from the accumulated subtotal
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Totals {
    pub subtotal: f64,
    pub tax_amount: f64,
    pub total_gross: f64,
    pub total_due: f64,
}

/// Apply the flat tax, discount and paid amount to the subtotal
///
/// Tax and discount apply once to the subtotal, not per item. The due amount
/// is never clamped; overpayment yields a negative total due.
pub fn compute_totals(subtotal: f64, tax_rate: f64, discount: f64, paid: f64) -> Totals {
    let tax_amount = subtotal * tax_rate;
    let total_gross = subtotal + tax_amount - discount;
    Totals {
        subtotal,
        tax_amount,
        total_gross,
        total_due: total_gross - paid,
    }
}

/// Renders one invoice onto one canvas
pub struct InvoiceRenderer<'a> {
    invoice: &'a Invoice,
    lang: &'a LanguagePack,
}

impl<'a> InvoiceRenderer<'a> {
    pub fn new(invoice: &'a Invoice, lang: &'a LanguagePack) -> Self {
        Self { invoice, lang }
    }

    /// Run the full section-writer pipeline
    pub fn render(&self, canvas: &mut Canvas) -> pdf_canvas::Result<()> {
        self.write_logo(canvas);
        self.write_header_block(canvas)?;
        self.write_party_columns(canvas)?;
        self.write_table_header(canvas)?;
        self.write_divider(canvas);

        let mut subtotal = 0.0;
        for item in self.invoice.line_items() {
            self.write_row(canvas, &item)?;
            subtotal += item.net();
        }

        canvas.br(ITEMS_TO_NOTES_GAP);
        let section_y = canvas.y();
        if self.has_notes() {
            self.write_notes(canvas)?;
        }
        self.write_totals(canvas, section_y, subtotal)?;
        self.write_footer(canvas)?;

        Ok(())
    }

    /// Logo, right-aligned against the top margin
    ///
    /// Degraded-but-non-fatal: an unreadable or undecodable image is logged
    /// and skipped. The cursor is restored to the content origin either way.
    fn write_logo(&self, canvas: &mut Canvas) {
        let path = &self.invoice.logo;
        if path.is_empty() {
            return;
        }

        let scaled_width = self.invoice.logo_scale;
        let x = PAGE_WIDTH - MARGIN - scaled_width;

        match std::fs::read(path) {
            Ok(data) => {
                if let Err(e) =
                    canvas.image(&data, x, MARGIN, scaled_width, 0.0, ImageScaleMode::FitWidth)
                {
                    log::warn!("{path}: {e}");
                }
            }
            Err(e) => log::warn!("{path}: {e}"),
        }

        canvas.set_xy(MARGIN, MARGIN);
    }

    /// Title, invoice number and the three date lines
    ///
    /// Post-condition: cursor sits below the full-width divider, X at the
    /// left margin.
    fn write_header_block(&self, canvas: &mut Canvas) -> pdf_canvas::Result<()> {
        // The invoice-supplied title wins; the language pack provides the
        // visible default.
        let title = if self.invoice.title.is_empty() {
            &self.lang.title
        } else {
            &self.invoice.title
        };

        canvas.set_font(FONT_FAMILY, TITLE_SIZE)?;
        canvas.set_font_weight(FontWeight::Bold)?;
        canvas.set_text_color(BLACK);
        canvas.cell(title)?;
        canvas.br(38.0);

        canvas.set_font(FONT_FAMILY, BODY_SIZE)?;
        canvas.set_font_weight(FontWeight::Regular)?;
        canvas.set_text_color(LABEL_GRAY);
        let inv_no = format!("{} ", self.lang.inv_no);
        canvas.cell(&inv_no)?;
        let label_width = canvas.text_width(&inv_no)?;
        canvas.set_x(canvas.x() + label_width);
        canvas.cell(&self.invoice.id)?;
        canvas.br(32.0);

        // Sale date falls back silently to the issue date
        let sale_date = if self.invoice.sale_date.is_empty() {
            &self.invoice.date
        } else {
            &self.invoice.sale_date
        };

        self.write_date_line(canvas, &self.lang.issue_date, &self.invoice.date)?;
        canvas.br(BODY_LINE_HEIGHT);
        self.write_date_line(canvas, &self.lang.sale_date, sale_date)?;
        canvas.br(BODY_LINE_HEIGHT);
        self.write_date_line(canvas, &self.lang.due_date, &self.invoice.due)?;
        if !self.invoice.billing_period.is_empty() {
            canvas.br(BODY_LINE_HEIGHT);
            self.write_date_line(
                canvas,
                &self.lang.billing_period,
                &self.invoice.billing_period,
            )?;
        }
        canvas.br(38.0);

        self.write_divider(canvas);
        canvas.br(36.0);

        Ok(())
    }

    /// One "Label: value" line: gray label, black value
    fn write_date_line(
        &self,
        canvas: &mut Canvas,
        label: &str,
        value: &str,
    ) -> pdf_canvas::Result<()> {
        let label = format!("{label}: ");
        canvas.set_text_color(LABEL_GRAY);
        canvas.cell(&label)?;

        let label_width = canvas.text_width(&label)?;
        canvas.set_x(canvas.x() + label_width);
        canvas.set_text_color(BLACK);
        canvas.cell(value)?;

        Ok(())
    }

    /// Seller (left) and buyer (right) blocks, started at the same Y
    ///
    /// Post-condition: cursor Y is below the taller of the two columns, so
    /// the columns can never overlap what follows.
    fn write_party_columns(&self, canvas: &mut Canvas) -> pdf_canvas::Result<()> {
        let start_y = canvas.y();

        canvas.set_font(FONT_FAMILY, BODY_SIZE)?;
        canvas.set_font_weight(FontWeight::Regular)?;

        // Left column: seller
        canvas.set_x(party::LEFT_X);
        canvas.set_text_color(HEADING_GRAY);
        canvas.cell(&self.lang.seller)?;
        canvas.br(24.0);
        canvas.set_text_color(BODY_GRAY);
        for line in split_lines(&self.invoice.from) {
            canvas.set_x(party::LEFT_X);
            canvas.cell(&line)?;
            canvas.br(BODY_LINE_HEIGHT);
        }
        let left_bottom = canvas.y();

        // Right column: buyer, first body line in full-black emphasis
        canvas.set_xy(party::SPLIT, start_y);
        canvas.set_text_color(HEADING_GRAY);
        canvas.cell(&self.lang.buyer)?;
        canvas.br(24.0);
        for (i, line) in split_lines(&self.invoice.to).iter().enumerate() {
            canvas.set_x(party::SPLIT);
            canvas.set_text_color(if i == 0 { BLACK } else { BODY_GRAY });
            canvas.cell(line)?;
            canvas.br(BODY_LINE_HEIGHT);
        }
        let right_bottom = canvas.y();

        // The taller column wins
        canvas.set_y(left_bottom.max(right_bottom));
        canvas.set_x(MARGIN);
        canvas.br(48.0);

        Ok(())
    }

    /// Uppercased column labels above the item table
    fn write_table_header(&self, canvas: &mut Canvas) -> pdf_canvas::Result<()> {
        canvas.set_font(FONT_FAMILY, TABLE_HEADER_SIZE)?;
        canvas.set_font_weight(FontWeight::Regular)?;
        canvas.set_text_color(BODY_GRAY);

        canvas.cell(&self.lang.item.to_uppercase())?;
        canvas.set_x(table::QTY);
        canvas.cell(&self.lang.qty.to_uppercase())?;
        canvas.set_x(table::UNIT_NET);
        canvas.cell(&self.lang.unit_net.to_uppercase())?;
        canvas.set_x(table::TOTAL_NET);
        canvas.cell(&self.lang.total_net.to_uppercase())?;
        canvas.set_x(table::TAX);
        canvas.cell(&self.tax_label().to_uppercase())?;
        canvas.set_x(table::GROSS);
        canvas.cell(&self.lang.total_gross.to_uppercase())?;
        canvas.br(24.0);

        Ok(())
    }

    /// Light horizontal divider across the content width at the current Y
    fn write_divider(&self, canvas: &mut Canvas) {
        canvas.set_stroke_color(DIVIDER_GRAY);
        let y = canvas.y();
        canvas.line(MARGIN, y, PAGE_WIDTH - MARGIN, y);
        canvas.br(BODY_LINE_HEIGHT);
    }

    /// Shorter divider used in the totals block
    fn write_narrow_divider(&self, canvas: &mut Canvas) {
        canvas.set_stroke_color(DIVIDER_GRAY);
        let y = canvas.y();
        canvas.line(table::TOTAL_NET, y, PAGE_WIDTH - MARGIN, y);
        canvas.br(10.0);
    }

    /// One item row: wrapped name plus quantity/rate/net/tax/gross cells
    ///
    /// Post-condition: cursor sits below every wrapped name line plus the
    /// row pad, X at the left margin.
    fn write_row(&self, canvas: &mut Canvas, item: &LineItem<'_>) -> pdf_canvas::Result<()> {
        canvas.set_font(FONT_FAMILY, BODY_SIZE)?;
        canvas.set_font_weight(FontWeight::Regular)?;
        canvas.set_text_color(BLACK);

        let net = item.net();
        let gross = net + net * self.invoice.tax;
        let currency_code = &self.invoice.currency;

        // Wrap the item name so it cannot run into the quantity column
        let max_width = table::QTY - table::ITEM_GUTTER - canvas.margin_left();
        // The body font is set above; measurement cannot fail here
        let lines = wrap_text(item.name, max_width, |s| {
            canvas.text_width(s).unwrap_or(0.0)
        });

        canvas.set_x(table::ITEM);
        canvas.cell(&lines[0])?;
        canvas.set_x(table::QTY);
        canvas.cell(&item.quantity.to_string())?;
        canvas.set_x(table::UNIT_NET);
        canvas.cell(&currency::format_amount(currency_code, item.rate))?;
        canvas.set_x(table::TOTAL_NET);
        canvas.cell(&currency::format_amount(currency_code, net))?;
        canvas.set_x(table::TAX);
        canvas.cell(&self.tax_rate_text())?;
        canvas.set_x(table::GROSS);
        canvas.cell(&currency::format_amount(currency_code, gross))?;
        canvas.br(BODY_LINE_HEIGHT);

        // Continuation lines carry no numeric cells
        for line in &lines[1..] {
            canvas.set_x(table::ITEM);
            canvas.cell(line)?;
            canvas.br(BODY_LINE_HEIGHT);
        }

        // Keep rows visually separated regardless of wrap depth
        canvas.br(ROW_PAD);

        Ok(())
    }

    /// Notes block: payment metadata lines, then the free-text note
    fn write_notes(&self, canvas: &mut Canvas) -> pdf_canvas::Result<()> {
        let inv = self.invoice;

        canvas.set_font(FONT_FAMILY, BODY_SIZE)?;
        canvas.set_font_weight(FontWeight::Regular)?;
        canvas.set_text_color(BODY_GRAY);
        canvas.cell(&self.lang.notes)?;
        canvas.br(24.0);
        canvas.set_text_color(BLACK);

        let payment_fields = [
            (&self.lang.payment, &inv.payment_method),
            (&self.lang.bank, &inv.bank),
            (&self.lang.swift, &inv.swift),
            (&self.lang.account_no, &inv.account_no),
        ];
        let has_payment = payment_fields.iter().any(|(_, value)| !value.is_empty());

        if has_payment {
            for (label, value) in payment_fields {
                if value.is_empty() {
                    continue;
                }
                canvas.cell(&format!("{label}: {value}"))?;
                canvas.br(BODY_LINE_HEIGHT);
            }
            if !inv.note.is_empty() {
                canvas.br(BODY_LINE_HEIGHT);
            }
        }

        if !inv.note.is_empty() {
            for line in split_lines(&inv.note) {
                canvas.cell(&line)?;
                canvas.br(BODY_LINE_HEIGHT);
            }
        }

        canvas.br(48.0);

        Ok(())
    }

    /// Totals block, anchored at the Y where the notes section began
    fn write_totals(
        &self,
        canvas: &mut Canvas,
        start_y: f64,
        subtotal: f64,
    ) -> pdf_canvas::Result<()> {
        let inv = self.invoice;
        let totals = compute_totals(subtotal, inv.tax, inv.discount, inv.paid);

        canvas.set_y(start_y);
        self.write_total_with_code(canvas, &self.lang.total_net_price, totals.subtotal, false)?;

        let tax_rate_label = format!("{} {}", self.tax_label(), self.lang.rate);
        self.write_total_raw(canvas, &tax_rate_label, &self.tax_rate_text())?;

        // Tax amount is always shown, even when it is zero
        let tax_amount_label = format!("{} {}", self.tax_label(), self.lang.amount);
        self.write_total_with_code(canvas, &tax_amount_label, totals.tax_amount, false)?;

        if inv.discount > 0.0 {
            self.write_total_with_code(canvas, &self.lang.discount, inv.discount, false)?;
        }

        self.write_total_with_code(canvas, &self.lang.total_gross_price, totals.total_gross, false)?;

        if inv.paid != 0.0 {
            self.write_total_with_code(canvas, &self.lang.paid, inv.paid, false)?;
        }

        self.write_narrow_divider(canvas);
        self.write_total_with_code(canvas, &self.lang.total_due, totals.total_due, true)?;

        Ok(())
    }

    /// One totals line in "12.34 USD" form; bold marks the total-due line
    fn write_total_with_code(
        &self,
        canvas: &mut Canvas,
        label: &str,
        value: f64,
        bold: bool,
    ) -> pdf_canvas::Result<()> {
        canvas.set_font(FONT_FAMILY, BODY_SIZE)?;
        canvas.set_font_weight(if bold {
            FontWeight::Bold
        } else {
            FontWeight::Regular
        })?;

        canvas.set_text_color(HEADING_GRAY);
        canvas.set_x(totals::LABEL);
        canvas.cell(label)?;

        canvas.set_text_color(BLACK);
        canvas.set_x(totals::VALUE);
        canvas.cell(&currency::format_amount_with_code(
            &self.invoice.currency,
            value,
        ))?;
        canvas.br(TOTALS_LINE_HEIGHT);

        Ok(())
    }

    /// One totals line with a pre-formatted value (percentages, "N/A")
    fn write_total_raw(
        &self,
        canvas: &mut Canvas,
        label: &str,
        value: &str,
    ) -> pdf_canvas::Result<()> {
        canvas.set_font(FONT_FAMILY, BODY_SIZE)?;
        canvas.set_font_weight(FontWeight::Regular)?;

        canvas.set_text_color(HEADING_GRAY);
        canvas.set_x(totals::LABEL);
        canvas.cell(label)?;

        canvas.set_text_color(BLACK);
        canvas.set_x(totals::VALUE);
        canvas.cell(value)?;
        canvas.br(TOTALS_LINE_HEIGHT);

        Ok(())
    }

    /// Footer pinned near the bottom of the page
    fn write_footer(&self, canvas: &mut Canvas) -> pdf_canvas::Result<()> {
        canvas.set_y(FOOTER_Y);

        canvas.set_font(FONT_FAMILY, BODY_SIZE)?;
        canvas.set_font_weight(FontWeight::Regular)?;
        canvas.set_text_color(BODY_GRAY);
        canvas.cell(&self.invoice.id)?;

        let id_width = canvas.text_width(&self.invoice.id)?;
        let x = canvas.x();
        let y = canvas.y();
        canvas.set_stroke_color(DIVIDER_GRAY);
        canvas.line(x + id_width + 10.0, y + 6.0, 550.0, y + 6.0);

        Ok(())
    }

    /// Tax label: the invoice override, else the language pack default
    fn tax_label(&self) -> &str {
        if self.invoice.tax_name.is_empty() {
            &self.lang.tax
        } else {
            &self.invoice.tax_name
        }
    }

    /// Per-item and totals tax-rate display value
    fn tax_rate_text(&self) -> String {
        if self.invoice.tax == 0.0 {
            self.lang.na.clone()
        } else {
            format!("{:.2}%", self.invoice.tax * 100.0)
        }
    }

    fn has_notes(&self) -> bool {
        let inv = self.invoice;
        !inv.note.is_empty()
            || !inv.payment_method.is_empty()
            || !inv.bank.is_empty()
            || !inv.swift.is_empty()
            || !inv.account_no.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_totals_without_tax_discount_paid() {
        let totals = compute_totals(50.0, 0.0, 0.0, 0.0);
        assert_eq!(
            totals,
            Totals {
                subtotal: 50.0,
                tax_amount: 0.0,
                total_gross: 50.0,
                total_due: 50.0,
            }
        );
    }

    #[test]
    fn test_totals_with_tax_discount_paid() {
        let totals = compute_totals(50.0, 0.2, 5.0, 10.0);
        assert_eq!(totals.tax_amount, 10.0);
        assert_eq!(totals.total_gross, 55.0);
        assert_eq!(totals.total_due, 45.0);
    }

    #[test]
    fn test_total_due_can_go_negative() {
        // Overpayment is preserved, not clamped
        let totals = compute_totals(50.0, 0.0, 0.0, 80.0);
        assert_eq!(totals.total_due, -30.0);
    }

    #[test]
    fn test_tax_applies_once_to_subtotal() {
        let totals = compute_totals(100.0, 0.23, 0.0, 0.0);
        assert_eq!(totals.tax_amount, 23.0);
        assert_eq!(totals.total_gross, 123.0);
    }
}
