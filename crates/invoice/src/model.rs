//! Invoice data model

use chrono::{Duration, Local};
use serde::{Deserialize, Serialize};

/// A fully populated invoice record
///
/// Items, quantities and rates are independently sized lists aligned by
/// index, matching the JSON/CLI input contract. Use [`Invoice::line_items`]
/// for the resolved view.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Invoice {
    pub id: String,
    pub title: String,

    pub logo: String,
    pub logo_scale: f64,

    pub from: String,
    pub to: String,

    pub date: String,
    pub sale_date: String,
    pub due: String,
    pub billing_period: String,

    pub items: Vec<String>,
    pub quantities: Vec<u32>,
    pub rates: Vec<f64>,

    /// Flat tax fraction (e.g. 0.2 for 20%)
    pub tax: f64,
    /// Label override for the tax lines (e.g. "VAT")
    pub tax_name: String,
    /// Absolute discount amount
    pub discount: f64,
    /// Amount already paid
    pub paid: f64,
    pub currency: String,

    pub lang: String,

    pub payment_method: String,
    pub bank: String,
    pub swift: String,
    pub account_no: String,

    pub note: String,
}

impl Default for Invoice {
    fn default() -> Self {
        let today = Local::now().date_naive();
        Self {
            id: today.format("%Y%m%d").to_string(),
            title: String::new(),
            logo: String::new(),
            logo_scale: 100.0,
            from: "Project Folded, Inc.".to_string(),
            to: "Untitled Corporation, Inc.".to_string(),
            date: today.format("%Y-%m-%d").to_string(),
            sale_date: today.format("%Y-%m-%d").to_string(),
            due: (today + Duration::days(7)).format("%Y-%m-%d").to_string(),
            billing_period: String::new(),
            items: vec!["Paper Cranes".to_string()],
            quantities: vec![2],
            rates: vec![25.0],
            tax: 0.0,
            tax_name: String::new(),
            discount: 0.0,
            paid: 0.0,
            currency: "USD".to_string(),
            lang: "en".to_string(),
            payment_method: String::new(),
            bank: String::new(),
            swift: String::new(),
            account_no: String::new(),
            note: String::new(),
        }
    }
}

/// A resolved line item: quantity defaulted, rate defaulted
#[derive(Debug, Clone, PartialEq)]
pub struct LineItem<'a> {
    pub name: &'a str,
    pub quantity: u32,
    pub rate: f64,
}

impl LineItem<'_> {
    /// Net amount for this item
    pub fn net(&self) -> f64 {
        self.quantity as f64 * self.rate
    }
}

impl Invoice {
    /// Resolved line items in order
    ///
    /// Quantity defaults to 1 when the quantities list is shorter than the
    /// items list; an explicit quantity of 0 drops the item entirely. Rate
    /// defaults to 0 when the rates list is shorter.
    pub fn line_items(&self) -> impl Iterator<Item = LineItem<'_>> {
        self.items.iter().enumerate().filter_map(|(i, name)| {
            let quantity = self.quantities.get(i).copied().unwrap_or(1);
            if quantity == 0 {
                return None;
            }
            let rate = self.rates.get(i).copied().unwrap_or(0.0);
            Some(LineItem {
                name,
                quantity,
                rate,
            })
        })
    }

    /// Sum of net amounts over the resolved (non-dropped) items
    pub fn subtotal(&self) -> f64 {
        self.line_items().map(|item| item.net()).sum()
    }
}

/// Resolve the escaped-newline marker into literal lines
///
/// Free-text fields (from/to/note) carry multi-line content as a literal
/// two-character `\n` sequence. The split happens here, at the data-model
/// boundary; the layout engine only ever sees finished lines.
pub fn split_lines(text: &str) -> Vec<String> {
    text.replace("\\n", "\n").split('\n').map(String::from).collect()
}
