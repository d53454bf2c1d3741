use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use invoice::{GenerateOptions, Invoice};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "invoice", about = "Invoice generates invoices from the command line.")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate an invoice
    Generate(GenerateArgs),
}

#[derive(Args)]
struct GenerateArgs {
    /// Imported file (.json)
    #[arg(long)]
    import: Option<PathBuf>,

    /// ID
    #[arg(long)]
    id: Option<String>,

    /// Title
    #[arg(long)]
    title: Option<String>,

    /// Items
    #[arg(short = 'i', long = "item")]
    items: Vec<String>,

    /// Quantities
    #[arg(short = 'q', long = "quantity")]
    quantities: Vec<u32>,

    /// Rates
    #[arg(short = 'r', long = "rate")]
    rates: Vec<f64>,

    /// Company logo image path
    #[arg(short = 'l', long)]
    logo: Option<String>,

    /// Logo scale (width in points, default 100)
    #[arg(long)]
    logo_scale: Option<f64>,

    /// Issuing company
    #[arg(short = 'f', long)]
    from: Option<String>,

    /// Recipient company
    #[arg(short = 't', long)]
    to: Option<String>,

    /// Issue date
    #[arg(long)]
    date: Option<String>,

    /// Sale date (defaults to issue date)
    #[arg(long)]
    sale_date: Option<String>,

    /// Payment due date
    #[arg(long)]
    due: Option<String>,

    /// Billing period (optional, shown below due date)
    #[arg(long)]
    billing_period: Option<String>,

    /// Tax fraction (e.g. 0.2)
    #[arg(long)]
    tax: Option<f64>,

    /// Tax label (e.g. VAT)
    #[arg(long)]
    tax_name: Option<String>,

    /// Discount amount
    #[arg(short = 'd', long)]
    discount: Option<f64>,

    /// Amount already paid
    #[arg(long)]
    paid: Option<f64>,

    /// Currency
    #[arg(short = 'c', long)]
    currency: Option<String>,

    /// Language code (e.g. en)
    #[arg(long)]
    lang: Option<String>,

    /// Method of payment
    #[arg(long)]
    payment_method: Option<String>,

    /// Bank
    #[arg(long)]
    bank: Option<String>,

    /// SWIFT
    #[arg(long)]
    swift: Option<String>,

    /// Account no
    #[arg(long)]
    account_no: Option<String>,

    /// Note
    #[arg(short = 'n', long)]
    note: Option<String>,

    /// Language pack directory
    #[arg(long, default_value = "lang")]
    lang_dir: PathBuf,

    /// Directory holding Inter.ttf and Inter-Bold.ttf
    #[arg(long, default_value = "fonts")]
    font_dir: PathBuf,

    /// Output directory
    #[arg(long, default_value = "output")]
    output: PathBuf,
}

/// Start from the default record, overlay an imported file, then let
/// explicitly passed flags win.
fn build_invoice(args: &GenerateArgs) -> anyhow::Result<Invoice> {
    let mut invoice = match &args.import {
        Some(path) => {
            let data = std::fs::read_to_string(path)
                .with_context(|| format!("unable to read {}", path.display()))?;
            serde_json::from_str(&data)
                .with_context(|| format!("unable to parse {}", path.display()))?
        }
        None => Invoice::default(),
    };

    if let Some(v) = &args.id {
        invoice.id = v.clone();
    }
    if let Some(v) = &args.title {
        invoice.title = v.clone();
    }
    if !args.items.is_empty() {
        invoice.items = args.items.clone();
    }
    if !args.quantities.is_empty() {
        invoice.quantities = args.quantities.clone();
    }
    if !args.rates.is_empty() {
        invoice.rates = args.rates.clone();
    }
    if let Some(v) = &args.logo {
        invoice.logo = v.clone();
    }
    if let Some(v) = args.logo_scale {
        invoice.logo_scale = v;
    }
    if let Some(v) = &args.from {
        invoice.from = v.clone();
    }
    if let Some(v) = &args.to {
        invoice.to = v.clone();
    }
    if let Some(v) = &args.date {
        invoice.date = v.clone();
    }
    if let Some(v) = &args.sale_date {
        invoice.sale_date = v.clone();
    }
    if let Some(v) = &args.due {
        invoice.due = v.clone();
    }
    if let Some(v) = &args.billing_period {
        invoice.billing_period = v.clone();
    }
    if let Some(v) = args.tax {
        invoice.tax = v;
    }
    if let Some(v) = &args.tax_name {
        invoice.tax_name = v.clone();
    }
    if let Some(v) = args.discount {
        invoice.discount = v;
    }
    if let Some(v) = args.paid {
        invoice.paid = v;
    }
    if let Some(v) = &args.currency {
        invoice.currency = v.clone();
    }
    if let Some(v) = &args.lang {
        invoice.lang = v.clone();
    }
    if let Some(v) = &args.payment_method {
        invoice.payment_method = v.clone();
    }
    if let Some(v) = &args.bank {
        invoice.bank = v.clone();
    }
    if let Some(v) = &args.swift {
        invoice.swift = v.clone();
    }
    if let Some(v) = &args.account_no {
        invoice.account_no = v.clone();
    }
    if let Some(v) = &args.note {
        invoice.note = v.clone();
    }

    Ok(invoice)
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Generate(args) => {
            let invoice = build_invoice(&args)?;
            let opts = GenerateOptions {
                lang_dir: args.lang_dir.clone(),
                font_dir: args.font_dir.clone(),
                output_dir: args.output.clone(),
            };
            let path = invoice::generate(&invoice, &opts)?;
            println!("Generated {}", path.display());
        }
    }

    Ok(())
}
