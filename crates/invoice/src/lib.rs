//! invoice - generate invoices from the command line
//!
//! The crate turns an [`Invoice`] record plus a language pack into a single
//! A4 PDF. The layout engine in [`render`] owns all of the interesting
//! logic: column geometry, word wrap, cursor bookkeeping, and the totals
//! arithmetic. Drawing goes through the `pdf-canvas` crate.

pub mod currency;
pub mod geometry;
pub mod lang;
pub mod model;
pub mod output;
pub mod render;
pub mod wrap;

pub use lang::{load_language, LangError, LanguagePack};
pub use model::{Invoice, LineItem};
pub use render::{compute_totals, InvoiceRenderer, Totals};

use pdf_canvas::{Canvas, FontFamilyBuilder};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that abort an invoice run
#[derive(Debug, Error)]
pub enum InvoiceError {
    #[error(transparent)]
    Lang(#[from] LangError),

    #[error(transparent)]
    Canvas(#[from] pdf_canvas::CanvasError),

    #[error("unable to read font file {}: {source}", path.display())]
    FontRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("unable to create output directory {}: {source}", path.display())]
    OutputDir {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Result type for invoice generation
pub type Result<T> = std::result::Result<T, InvoiceError>;

/// Where inputs are found and the artifact is written
#[derive(Debug, Clone)]
pub struct GenerateOptions {
    /// Directory of `<code>.json` language packs
    pub lang_dir: PathBuf,
    /// Directory holding `Inter.ttf` and `Inter-Bold.ttf`
    pub font_dir: PathBuf,
    /// Output directory, created on demand
    pub output_dir: PathBuf,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            lang_dir: PathBuf::from("lang"),
            font_dir: PathBuf::from("fonts"),
            output_dir: PathBuf::from("output"),
        }
    }
}

fn read_font(path: &Path) -> Result<Vec<u8>> {
    std::fs::read(path).map_err(|source| InvoiceError::FontRead {
        path: path.to_path_buf(),
        source,
    })
}

/// Render `invoice` and write the PDF artifact
///
/// Fatal conditions (language pack, fonts, output directory, canvas save)
/// abort the run before any partial artifact exists. Returns the path of the
/// written file.
pub fn generate(invoice: &Invoice, opts: &GenerateOptions) -> Result<PathBuf> {
    let lang = load_language(&opts.lang_dir, &invoice.lang)?;

    let mut canvas = Canvas::a4(geometry::MARGIN);

    let regular = read_font(&opts.font_dir.join("Inter.ttf"))?;
    let bold = read_font(&opts.font_dir.join("Inter-Bold.ttf"))?;
    canvas.register_font_family(
        render::FONT_FAMILY,
        FontFamilyBuilder::new().regular(regular).bold(bold),
    )?;

    InvoiceRenderer::new(invoice, &lang).render(&mut canvas)?;

    std::fs::create_dir_all(&opts.output_dir).map_err(|source| InvoiceError::OutputDir {
        path: opts.output_dir.clone(),
        source,
    })?;

    let path = output::output_path(&opts.output_dir, &invoice.id, &invoice.lang);
    canvas.save(&path)?;
    log::info!("wrote {}", path.display());

    Ok(path)
}
