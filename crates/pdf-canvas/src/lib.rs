//! pdf-canvas - Cursor-based single-page PDF output
//!
//! This crate provides the drawing surface the invoice layout engine writes
//! to. It owns no invoice knowledge; it exposes:
//! - A fresh A4 page with a mutable (X, Y) cursor
//! - TrueType font embedding (regular/bold) with glyph subsetting
//! - Text drawn at the cursor, text width measurement
//! - Straight lines and JPEG/PNG image placement
//!
//! # Example
//!
//! ```ignore
//! use pdf_canvas::{Canvas, Color, FontFamilyBuilder};
//!
//! let mut canvas = Canvas::a4(40.0);
//! canvas.register_font_family("inter", FontFamilyBuilder::new().regular(ttf_bytes))?;
//! canvas.set_font("inter", 9.0)?;
//! canvas.cell("Hello, World!")?;
//! canvas.br(15.0);
//! canvas.save("output.pdf")?;
//! ```

mod canvas;
mod font;
mod graphics;
mod image;

pub use canvas::{Canvas, Color, A4_HEIGHT, A4_WIDTH};
pub use font::{FontData, FontFamily, FontFamilyBuilder, FontWeight};
pub use image::ImageScaleMode;

use thiserror::Error;

/// Errors that can occur while drawing or finalizing a page
#[derive(Debug, Error)]
pub enum CanvasError {
    #[error("Failed to save PDF: {0}")]
    Save(String),

    #[error("Font not found: {0}")]
    FontNotFound(String),

    #[error("Font already exists: {0}")]
    FontAlreadyExists(String),

    #[error("Failed to parse font: {0}")]
    FontParse(String),

    #[error("Font subset error: {0}")]
    FontSubset(String),

    #[error("Image error: {0}")]
    Image(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Lopdf error: {0}")]
    Lopdf(#[from] lopdf::Error),
}

/// Result type for canvas operations
pub type Result<T> = std::result::Result<T, CanvasError>;
