//! Image embedding for the canvas

use crate::{CanvasError, Result};
use image::{DynamicImage, ImageDecoder, ImageReader};
use lopdf::{Dictionary, Stream};
use std::io::Cursor;

impl From<image::ImageError> for CanvasError {
    fn from(err: image::ImageError) -> Self {
        CanvasError::Image(err.to_string())
    }
}

/// How an image is fitted into its target box
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImageScaleMode {
    /// Stretch to exact target dimensions
    #[default]
    Stretch,
    /// Scale proportionally based on the target width, height follows
    FitWidth,
}

/// Calculate display dimensions based on scaling mode
///
/// # Arguments
/// * `original_width` - Original image width in pixels
/// * `original_height` - Original image height in pixels
/// * `target_width` - Target width in points
/// * `target_height` - Target height in points (ignored for FitWidth)
///
/// # Returns
/// (actual_width, actual_height) in points
pub fn calculate_scaled_dimensions(
    original_width: u32,
    original_height: u32,
    target_width: f64,
    target_height: f64,
    mode: ImageScaleMode,
) -> (f64, f64) {
    match mode {
        ImageScaleMode::Stretch => (target_width, target_height),
        ImageScaleMode::FitWidth => {
            let aspect = original_height as f64 / original_width as f64;
            (target_width, target_width * aspect)
        }
    }
}

/// Image XObject ready for PDF embedding
#[derive(Debug, Clone)]
pub struct ImageXObject {
    /// Image width in pixels
    pub width: u32,
    /// Image height in pixels
    pub height: u32,
    /// Color space ("DeviceRGB", "DeviceGray")
    pub color_space: String,
    /// Bits per component
    pub bits_per_component: u8,
    /// PDF filter ("DCTDecode" for JPEG, "FlateDecode" for PNG)
    pub filter: String,
    /// Encoded image data
    pub data: Vec<u8>,
}

impl ImageXObject {
    /// Decode image bytes into an embeddable XObject
    ///
    /// JPEG data passes through with DCTDecode; anything else goes through
    /// the image crate and is re-encoded as Flate-compressed raw samples.
    pub fn decode(data: &[u8]) -> Result<Self> {
        if is_jpeg(data) {
            Self::from_jpeg(data)
        } else {
            Self::from_raster(data)
        }
    }

    /// Create an XObject from JPEG data
    ///
    /// JPEG images embed directly with the DCTDecode filter; only the
    /// dimensions and component count are read from the SOF marker.
    pub fn from_jpeg(data: &[u8]) -> Result<Self> {
        let (width, height, num_components) = parse_jpeg_header(data)?;

        let color_space = if num_components == 1 {
            "DeviceGray".to_string()
        } else {
            "DeviceRGB".to_string()
        };

        Ok(Self {
            width,
            height,
            color_space,
            bits_per_component: 8,
            filter: "DCTDecode".to_string(),
            data: data.to_vec(),
        })
    }

    /// Create an XObject by fully decoding the image (PNG path)
    ///
    /// Alpha channels are blended against a white background, matching how
    /// the page itself renders.
    pub fn from_raster(data: &[u8]) -> Result<Self> {
        let reader = ImageReader::new(Cursor::new(data)).with_guessed_format()?;
        let decoder = reader.into_decoder()?;

        let (width, height) = decoder.dimensions();
        let color_type = decoder.color_type();
        let decoded = DynamicImage::from_decoder(decoder)?;

        let (raw, color_space) = match color_type {
            image::ColorType::L8 | image::ColorType::L16 => {
                (decoded.to_luma8().into_raw(), "DeviceGray")
            }
            image::ColorType::La8 | image::ColorType::La16 => {
                let la = decoded.to_luma_alpha8();
                let mut gray = Vec::with_capacity((width * height) as usize);
                for px in la.pixels() {
                    let a = px[1] as f32 / 255.0;
                    gray.push((px[0] as f32 * a + 255.0 * (1.0 - a)) as u8);
                }
                (gray, "DeviceGray")
            }
            image::ColorType::Rgba8 | image::ColorType::Rgba16 => {
                let rgba = decoded.to_rgba8();
                let mut rgb = Vec::with_capacity((width * height * 3) as usize);
                for px in rgba.pixels() {
                    let a = px[3] as f32 / 255.0;
                    rgb.push((px[0] as f32 * a + 255.0 * (1.0 - a)) as u8);
                    rgb.push((px[1] as f32 * a + 255.0 * (1.0 - a)) as u8);
                    rgb.push((px[2] as f32 * a + 255.0 * (1.0 - a)) as u8);
                }
                (rgb, "DeviceRGB")
            }
            _ => (decoded.to_rgb8().into_raw(), "DeviceRGB"),
        };

        // FlateDecode is zlib
        let mut encoder =
            flate2::write::ZlibEncoder::new(Vec::new(), flate2::Compression::default());
        std::io::Write::write_all(&mut encoder, &raw)?;
        let compressed = encoder.finish()?;

        Ok(Self {
            width,
            height,
            color_space: color_space.to_string(),
            bits_per_component: 8,
            filter: "FlateDecode".to_string(),
            data: compressed,
        })
    }

    /// Convert to a lopdf Stream object
    pub fn to_pdf_stream(&self) -> Stream {
        let mut dict = Dictionary::new();

        dict.set("Type", lopdf::Object::Name(b"XObject".to_vec()));
        dict.set("Subtype", lopdf::Object::Name(b"Image".to_vec()));
        dict.set("Width", self.width as i64);
        dict.set("Height", self.height as i64);
        dict.set(
            "ColorSpace",
            lopdf::Object::Name(self.color_space.as_bytes().to_vec()),
        );
        dict.set("BitsPerComponent", self.bits_per_component as i64);
        dict.set(
            "Filter",
            lopdf::Object::Name(self.filter.as_bytes().to_vec()),
        );
        dict.set("Length", self.data.len() as i64);

        Stream::new(dict, self.data.clone())
    }
}

fn is_jpeg(data: &[u8]) -> bool {
    data.len() >= 3 && data[0] == 0xFF && data[1] == 0xD8 && data[2] == 0xFF
}

/// Parse a JPEG SOF marker for (width, height, components)
///
/// SOF segment: marker (FF C0-CF), length (2), precision (1), height (2),
/// width (2), component count (1).
fn parse_jpeg_header(data: &[u8]) -> Result<(u32, u32, u8)> {
    let mut i = 2;
    while i + 10 < data.len() {
        if data[i] != 0xFF {
            i += 1;
            continue;
        }

        let marker = data[i + 1];
        if (0xC0..=0xCF).contains(&marker) && marker != 0xC4 && marker != 0xC8 && marker != 0xCC {
            let height = u16::from_be_bytes([data[i + 5], data[i + 6]]) as u32;
            let width = u16::from_be_bytes([data[i + 7], data[i + 8]]) as u32;
            return Ok((width, height, data[i + 9]));
        }

        let length = u16::from_be_bytes([data[i + 2], data[i + 3]]) as usize;
        if length < 2 {
            break;
        }
        i += 2 + length;
    }

    Err(CanvasError::Image(
        "Could not parse JPEG header".to_string(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    /// Encode a small solid-color PNG in memory
    fn make_png(width: u32, height: u32) -> Vec<u8> {
        let img = image::RgbImage::from_pixel(width, height, image::Rgb([10, 20, 30]));
        let mut bytes = Vec::new();
        image::DynamicImage::ImageRgb8(img)
            .write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
            .unwrap();
        bytes
    }

    #[test]
    fn test_is_jpeg() {
        assert!(is_jpeg(&[0xFF, 0xD8, 0xFF, 0xE0]));
        assert!(!is_jpeg(&[0x89, 0x50, 0x4E, 0x47]));
        assert!(!is_jpeg(&[]));
    }

    #[test]
    fn test_decode_png() {
        let png = make_png(120, 60);
        let xobj = ImageXObject::decode(&png).unwrap();

        assert_eq!(xobj.width, 120);
        assert_eq!(xobj.height, 60);
        assert_eq!(xobj.filter, "FlateDecode");
        assert_eq!(xobj.color_space, "DeviceRGB");
    }

    #[test]
    fn test_decode_garbage_fails() {
        let result = ImageXObject::decode(&[0u8; 16]);
        assert!(result.is_err());
    }

    #[test]
    fn test_scaled_dimensions_stretch() {
        let (w, h) = calculate_scaled_dimensions(200, 100, 50.0, 25.0, ImageScaleMode::Stretch);
        assert_eq!((w, h), (50.0, 25.0));
    }

    #[test]
    fn test_scaled_dimensions_fit_width() {
        // 200x100 scaled to width 100 keeps the 2:1 aspect ratio
        let (w, h) = calculate_scaled_dimensions(200, 100, 100.0, 0.0, ImageScaleMode::FitWidth);
        assert_eq!((w, h), (100.0, 50.0));
    }

    #[test]
    fn test_to_pdf_stream() {
        let png = make_png(8, 8);
        let xobj = ImageXObject::decode(&png).unwrap();
        let stream = xobj.to_pdf_stream();

        assert_eq!(
            stream.dict.get(b"Width").unwrap().as_i64().unwrap(),
            8,
        );
        assert!(!stream.content.is_empty());
    }
}
