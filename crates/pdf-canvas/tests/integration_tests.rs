//! Integration tests for pdf-canvas
//!
//! These verify that a finalized canvas is a well-formed single-page PDF by
//! reloading the produced bytes with lopdf.

use pdf_canvas::{Canvas, Color, ImageScaleMode, A4_HEIGHT, A4_WIDTH};
use pretty_assertions::assert_eq;
use std::io::Cursor;

fn make_png(width: u32, height: u32) -> Vec<u8> {
    let img = image::RgbImage::from_pixel(width, height, image::Rgb([40, 40, 200]));
    let mut bytes = Vec::new();
    image::DynamicImage::ImageRgb8(img)
        .write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
        .unwrap();
    bytes
}

#[test]
fn test_finalized_canvas_is_a_single_a4_page() {
    let mut canvas = Canvas::a4(40.0);
    let bytes = canvas.to_bytes().unwrap();

    let doc = lopdf::Document::load_mem(&bytes).unwrap();
    let pages = doc.get_pages();
    assert_eq!(pages.len(), 1);

    let page_id = pages[&1];
    let page = doc.get_object(page_id).unwrap().as_dict().unwrap();
    let media_box = page.get(b"MediaBox").unwrap().as_array().unwrap();
    assert_eq!(media_box.len(), 4);
    assert_eq!(media_box[2].as_f32().unwrap(), A4_WIDTH as f32);
    assert_eq!(media_box[3].as_f32().unwrap(), A4_HEIGHT as f32);
}

#[test]
fn test_lines_survive_the_roundtrip() {
    let mut canvas = Canvas::a4(40.0);
    canvas.set_stroke_color(Color::from_rgb(225, 225, 225));
    canvas.line(40.0, 300.0, A4_WIDTH - 40.0, 300.0);
    canvas.line(360.0, 500.0, A4_WIDTH - 40.0, 500.0);

    let bytes = canvas.to_bytes().unwrap();
    let doc = lopdf::Document::load_mem(&bytes).unwrap();

    let content = doc.get_page_content(doc.get_pages()[&1]).unwrap();
    let content_str = String::from_utf8_lossy(&content);
    // Two stroked paths, each one moveto/lineto pair
    assert_eq!(content_str.matches("S\n").count(), 2);
    assert_eq!(content_str.matches(" m\n").count(), 2);
    assert_eq!(content_str.matches(" l\n").count(), 2);
}

#[test]
fn test_image_resource_is_registered() {
    let mut canvas = Canvas::a4(40.0);
    let png = make_png(64, 32);
    canvas
        .image(&png, 455.28, 40.0, 100.0, 0.0, ImageScaleMode::FitWidth)
        .unwrap();

    let bytes = canvas.to_bytes().unwrap();
    let doc = lopdf::Document::load_mem(&bytes).unwrap();

    let page_id = doc.get_pages()[&1];
    let page = doc.get_object(page_id).unwrap().as_dict().unwrap();
    let resources = page.get(b"Resources").unwrap().as_dict().unwrap();
    let xobjects = resources.get(b"XObject").unwrap().as_dict().unwrap();
    assert!(xobjects.get(b"Im1").is_ok());

    let content = doc.get_page_content(page_id).unwrap();
    let content_str = String::from_utf8_lossy(&content);
    assert!(content_str.contains("/Im1 Do"));
}

#[test]
fn test_cursor_state_is_independent_of_drawing() {
    let mut canvas = Canvas::a4(40.0);
    canvas.set_xy(290.0, 160.0);
    canvas.line(40.0, 200.0, 100.0, 200.0);

    // Drawing never moves the cursor; only set_* and br do
    assert_eq!((canvas.x(), canvas.y()), (290.0, 160.0));
}
