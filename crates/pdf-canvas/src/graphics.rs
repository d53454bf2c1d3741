//! Content stream operator generation

use crate::canvas::Color;

/// Context for rendering a run of text
pub struct TextRenderContext {
    /// PDF font resource name (e.g., "F1")
    pub font_name: String,
    /// Font size in points
    pub font_size: f32,
    /// Text color (RGB)
    pub color: Color,
}

/// Generate PDF operators for text insertion
///
/// Creates the PDF text operators (BT, rg, Tf, Td, Tj, ET) to render
/// hex-encoded text at a specific position.
///
/// # Arguments
/// * `text_hex` - Hex-encoded text (e.g., "<0041004200>")
/// * `x` - X coordinate in points (PDF coordinates, from left)
/// * `y` - Y coordinate in points (PDF coordinates, from bottom)
/// * `ctx` - Text rendering context
pub fn generate_text_operators(text_hex: &str, x: f64, y: f64, ctx: &TextRenderContext) -> Vec<u8> {
    let mut ops = String::new();

    ops.push_str("BT\n");

    // Non-stroking color
    ops.push_str(&format!(
        "{} {} {} rg\n",
        ctx.color.r, ctx.color.g, ctx.color.b
    ));

    // Font and size: /F1 9 Tf
    ops.push_str(&format!("/{} {} Tf\n", ctx.font_name, ctx.font_size));

    // Position: x y Td
    ops.push_str(&format!("{x} {y} Td\n"));

    // Show text: <hex> Tj
    ops.push_str(&format!("{text_hex} Tj\n"));

    ops.push_str("ET\n");

    ops.into_bytes()
}

/// Generate PDF operators for a straight line
///
/// # Arguments
/// * `x1`, `y1` - Start point (PDF coordinates, from bottom)
/// * `x2`, `y2` - End point
/// * `color` - Stroke color
/// * `width` - Line width in points
pub fn generate_line_operators(
    x1: f64,
    y1: f64,
    x2: f64,
    y2: f64,
    color: Color,
    width: f64,
) -> Vec<u8> {
    format!(
        "q\n{} {} {} RG\n{width} w\n{x1} {y1} m\n{x2} {y2} l\nS\nQ\n",
        color.r, color.g, color.b
    )
    .into_bytes()
}

/// Generate operators to draw an image XObject at a position
///
/// # Arguments
/// * `image_name` - Image resource name (e.g., "Im1")
/// * `x` - X coordinate in points
/// * `y` - Y coordinate in points (from bottom, PDF coordinates)
/// * `width` - Image width in points
/// * `height` - Image height in points
pub fn generate_image_operators(
    image_name: &str,
    x: f64,
    y: f64,
    width: f64,
    height: f64,
) -> Vec<u8> {
    // q                        - Save graphics state
    // width 0 0 height x y cm  - Concatenate transformation matrix
    // /Im1 Do                  - Draw image
    // Q                        - Restore graphics state
    format!("q\n{width} 0 0 {height} {x} {y} cm\n/{image_name} Do\nQ\n").into_bytes()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_text_operators() {
        let ctx = TextRenderContext {
            font_name: "F1".to_string(),
            font_size: 9.0,
            color: Color::black(),
        };

        let ops = generate_text_operators("<00480065006C006C006F>", 40.0, 700.0, &ctx);
        let ops_str = String::from_utf8(ops).unwrap();

        assert!(ops_str.contains("BT"));
        assert!(ops_str.contains("/F1 9 Tf"));
        assert!(ops_str.contains("40 700 Td"));
        assert!(ops_str.contains("<00480065006C006C006F> Tj"));
        assert!(ops_str.contains("ET"));
    }

    #[test]
    fn test_generate_text_operators_empty_text() {
        let ctx = TextRenderContext {
            font_name: "F1".to_string(),
            font_size: 12.0,
            color: Color::black(),
        };

        let ops = generate_text_operators("<>", 100.0, 700.0, &ctx);
        let ops_str = String::from_utf8(ops).unwrap();

        assert!(ops_str.contains("<> Tj"));
    }

    #[test]
    fn test_generate_text_operators_with_color() {
        let ctx = TextRenderContext {
            font_name: "F2".to_string(),
            font_size: 24.0,
            color: Color::from_rgb(255, 0, 0),
        };

        let ops = generate_text_operators("<0041>", 40.0, 64.0, &ctx);
        let ops_str = String::from_utf8(ops).unwrap();

        assert!(ops_str.contains("1 0 0 rg"));
        assert!(ops_str.contains("/F2 24 Tf"));
    }

    #[test]
    fn test_generate_line_operators() {
        let ops = generate_line_operators(40.0, 600.0, 555.28, 600.0, Color::black(), 1.0);
        let ops_str = String::from_utf8(ops).unwrap();

        assert!(ops_str.contains("0 0 0 RG"));
        assert!(ops_str.contains("40 600 m"));
        assert!(ops_str.contains("555.28 600 l"));
        assert!(ops_str.contains("S"));
    }

    #[test]
    fn test_generate_line_operators_gray() {
        let gray = Color::from_rgb(225, 225, 225);
        let ops = generate_line_operators(360.0, 200.0, 555.28, 200.0, gray, 1.0);
        let ops_str = String::from_utf8(ops).unwrap();

        // 225/255 ≈ 0.88235294
        assert!(ops_str.contains("RG"));
        assert!(ops_str.starts_with("q\n"));
        assert!(ops_str.ends_with("Q\n"));
    }

    #[test]
    fn test_generate_image_operators() {
        let ops = generate_image_operators("Im1", 455.28, 700.0, 100.0, 50.0);
        let ops_str = String::from_utf8(ops).unwrap();

        assert!(ops_str.contains("q"));
        assert!(ops_str.contains("100 0 0 50 455.28 700 cm"));
        assert!(ops_str.contains("/Im1 Do"));
        assert!(ops_str.contains("Q"));
    }
}
