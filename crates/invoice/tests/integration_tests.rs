//! Integration tests for the invoice crate
//!
//! These cover the end-to-end arithmetic and naming contracts plus the
//! shipped language packs. Full PDF generation is exercised only when the
//! Inter font files are present, since font binaries are not checked in.

use invoice::{compute_totals, currency, lang, output, GenerateOptions, Invoice};
use pretty_assertions::assert_eq;
use std::path::{Path, PathBuf};

fn repo_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../..")
}

fn lang_dir() -> PathBuf {
    repo_root().join("lang")
}

/// Unique scratch directory per test
fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("invoice-test-{}-{name}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

fn paper_cranes() -> Invoice {
    Invoice {
        id: "INV-1".to_string(),
        items: vec!["Paper Cranes".to_string()],
        quantities: vec![2],
        rates: vec![25.0],
        tax: 0.0,
        discount: 0.0,
        paid: 0.0,
        currency: "USD".to_string(),
        lang: "en".to_string(),
        ..Invoice::default()
    }
}

#[test]
fn test_paper_cranes_without_tax() {
    let invoice = paper_cranes();

    let item = invoice.line_items().next().unwrap();
    assert_eq!(item.net(), 50.0);
    // Per-item gross equals net when the flat tax is zero
    assert_eq!(item.net() + item.net() * invoice.tax, 50.0);

    let totals = compute_totals(invoice.subtotal(), invoice.tax, invoice.discount, invoice.paid);
    assert_eq!(
        currency::format_amount_with_code(&invoice.currency, totals.subtotal),
        "50.00 USD"
    );
    assert_eq!(
        currency::format_amount_with_code(&invoice.currency, totals.tax_amount),
        "0.00 USD"
    );
    assert_eq!(
        currency::format_amount_with_code(&invoice.currency, totals.total_gross),
        "50.00 USD"
    );
    assert_eq!(
        currency::format_amount_with_code(&invoice.currency, totals.total_due),
        "50.00 USD"
    );
}

#[test]
fn test_paper_cranes_with_tax_discount_paid() {
    let invoice = Invoice {
        tax: 0.2,
        discount: 5.0,
        paid: 10.0,
        ..paper_cranes()
    };

    let totals = compute_totals(invoice.subtotal(), invoice.tax, invoice.discount, invoice.paid);
    assert_eq!(
        currency::format_amount_with_code(&invoice.currency, totals.tax_amount),
        "10.00 USD"
    );
    assert_eq!(
        currency::format_amount_with_code(&invoice.currency, totals.total_gross),
        "55.00 USD"
    );
    assert_eq!(
        currency::format_amount_with_code(&invoice.currency, invoice.paid),
        "10.00 USD"
    );
    assert_eq!(
        currency::format_amount_with_code(&invoice.currency, totals.total_due),
        "45.00 USD"
    );
}

#[test]
fn test_unregistered_currency_cells() {
    let invoice = Invoice {
        currency: "XYZ".to_string(),
        ..paper_cranes()
    };

    let item = invoice.line_items().next().unwrap();
    // Per-item cells: bare value, no symbol
    assert_eq!(currency::format_amount(&invoice.currency, item.net()), "50.00");
    // Totals cells: code suffix
    assert_eq!(
        currency::format_amount_with_code(&invoice.currency, item.net()),
        "50.00 XYZ"
    );
}

#[test]
fn test_zero_quantity_items_never_contribute() {
    let invoice = Invoice {
        items: vec!["visible".to_string(), "hidden".to_string()],
        quantities: vec![2, 0],
        rates: vec![25.0, 999.0],
        ..paper_cranes()
    };

    assert_eq!(invoice.line_items().count(), 1);
    assert_eq!(invoice.subtotal(), 50.0);
}

#[test]
fn test_sanitize_contract() {
    assert_eq!(output::sanitize_filename(""), "invoice");

    let out = output::sanitize_filename("Invoice #1 2024");
    assert!(out
        .chars()
        .all(|c| matches!(c, 'a'..='z' | '0'..='9' | '.' | '_' | '-')));
    assert!(!out.contains("--"));
    assert_eq!(out, out.to_lowercase());
}

#[test]
fn test_shipped_language_packs_are_complete() {
    for code in ["en", "pl", "de"] {
        let pack = lang::load_language(&lang_dir(), code)
            .unwrap_or_else(|e| panic!("pack {code}: {e}"));
        assert!(pack.missing_keys().is_empty());
    }
}

#[test]
fn test_blank_language_code_loads_base_pack() {
    let pack = lang::load_language(&lang_dir(), "").unwrap();
    assert_eq!(pack.title, "INVOICE");
}

#[test]
fn test_missing_base_pack_is_fatal() {
    let dir = scratch_dir("no-base");
    let err = lang::load_language(&dir, "en").unwrap_err();
    assert!(matches!(err, lang::LangError::Missing { .. }));
}

#[test]
fn test_incomplete_pack_names_missing_keys() {
    let dir = scratch_dir("incomplete");

    // Valid base pack
    let en = std::fs::read_to_string(lang_dir().join("en.json")).unwrap();
    std::fs::write(dir.join("en.json"), &en).unwrap();

    // Requested pack lacking two keys
    let broken = en
        .replace("\"_qty\": \"Qty\",", "")
        .replace("\"_paid\": \"Paid\",", "");
    std::fs::write(dir.join("xx.json"), broken).unwrap();

    let err = lang::load_language(&dir, "xx").unwrap_err();
    let message = err.to_string();
    assert!(message.contains("_qty"));
    assert!(message.contains("_paid"));
    assert!(!message.contains("_title"));
}

#[test]
fn test_unparseable_pack_is_fatal() {
    let dir = scratch_dir("unparseable");

    let en = std::fs::read_to_string(lang_dir().join("en.json")).unwrap();
    std::fs::write(dir.join("en.json"), &en).unwrap();
    std::fs::write(dir.join("xx.json"), "{ not json").unwrap();

    let err = lang::load_language(&dir, "xx").unwrap_err();
    assert!(matches!(err, lang::LangError::Parse { .. }));
}

#[test]
fn test_import_json_roundtrip() {
    let json = r#"{
        "id": "Invoice #1 2024",
        "items": ["Design work", "Hosting"],
        "quantities": [10, 0],
        "rates": [80.0, 5.0],
        "tax": 0.23,
        "currency": "PLN",
        "lang": "pl"
    }"#;

    let invoice: Invoice = serde_json::from_str(json).unwrap();
    assert_eq!(invoice.line_items().count(), 1);
    assert_eq!(invoice.subtotal(), 800.0);
    assert_eq!(
        output::output_path(Path::new("output"), &invoice.id, &invoice.lang),
        Path::new("output").join("invoice-1-2024-pl.pdf")
    );
}

#[test]
fn test_generate_writes_pdf_when_fonts_present() {
    let font_dir = repo_root().join("fonts");
    if !font_dir.join("Inter.ttf").exists() || !font_dir.join("Inter-Bold.ttf").exists() {
        eprintln!("skipping: font assets not present");
        return;
    }

    let out_dir = scratch_dir("generate");
    let invoice = Invoice {
        tax: 0.2,
        discount: 5.0,
        paid: 10.0,
        note: "Thank you for your business\\nWire transfer preferred".to_string(),
        bank: "First Paper Bank".to_string(),
        ..paper_cranes()
    };
    let opts = GenerateOptions {
        lang_dir: lang_dir(),
        font_dir,
        output_dir: out_dir.clone(),
    };

    let path = invoice::generate(&invoice, &opts).unwrap();
    assert_eq!(path, out_dir.join("inv-1-en.pdf"));

    let bytes = std::fs::read(path).unwrap();
    assert!(bytes.starts_with(b"%PDF"));
}
