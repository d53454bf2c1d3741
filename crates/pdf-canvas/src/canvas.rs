//! The drawing surface: one fresh page, one cursor

use crate::font::{FontData, FontFamily, FontFamilyBuilder, FontWeight};
use crate::graphics::{
    generate_image_operators, generate_line_operators, generate_text_operators, TextRenderContext,
};
use crate::image::{calculate_scaled_dimensions, ImageScaleMode, ImageXObject};
use crate::{CanvasError, Result};
use lopdf::{dictionary, Dictionary, Object, Stream};
use std::collections::HashMap;
use std::path::Path;

/// A4 portrait width in points
pub const A4_WIDTH: f64 = 595.28;
/// A4 portrait height in points
pub const A4_HEIGHT: f64 = 841.89;

/// RGB Color (values 0.0 - 1.0)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    /// Create a new RGB color (values 0.0 - 1.0)
    pub fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Create color from RGB values (0-255)
    pub fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        Self {
            r: r as f32 / 255.0,
            g: g as f32 / 255.0,
            b: b as f32 / 255.0,
        }
    }

    /// Black color
    pub fn black() -> Self {
        Self::rgb(0.0, 0.0, 0.0)
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::black()
    }
}

/// A buffered text operation for deferred encoding
///
/// Text is buffered during layout and encoded during save, after fonts have
/// been subsetted and glyph IDs remapped.
#[derive(Debug, Clone)]
struct BufferedTextOp {
    /// The text to render
    text: String,
    /// Variant font name (e.g., "inter-bold")
    font_name: String,
    /// Font resource name (e.g., "F1")
    font_resource_name: String,
    /// X coordinate in points
    x: f64,
    /// Y coordinate in points (PDF coordinates, already converted)
    y: f64,
    /// Font size in points
    font_size: f32,
    /// Text color
    color: Color,
}

/// A single-page canvas with a mutable cursor
///
/// The cursor Y grows downward from the top of the page; conversion to the
/// PDF bottom-origin coordinate space happens internally. `br` advances the
/// cursor vertically and resets X to the left margin; `cell` draws at the
/// cursor without moving it.
pub struct Canvas {
    /// Page width in points
    width: f64,
    /// Page height in points
    height: f64,
    /// Uniform page margin in points
    margin: f64,
    /// Cursor X (from left)
    x: f64,
    /// Cursor Y (from top)
    y: f64,
    /// Registered font families
    font_families: HashMap<String, FontFamily>,
    /// Current font family name
    current_family: Option<String>,
    /// Current font weight
    current_weight: FontWeight,
    /// Current font size
    current_font_size: f32,
    /// Current text color
    text_color: Color,
    /// Current stroke color
    stroke_color: Color,
    /// Buffered graphics operators (lines, images)
    content: Vec<u8>,
    /// Buffered text operations (encoded during save after font subsetting)
    buffered_text_ops: Vec<BufferedTextOp>,
    /// Font resource names (variant name -> "F1")
    font_resources: HashMap<String, String>,
    /// Next font resource number
    next_font_resource: u32,
    /// Embedded images in draw order ("Im1" -> XObject)
    images: Vec<(String, ImageXObject)>,
    /// Next image resource number
    next_image_resource: u32,
}

impl Canvas {
    /// Create a fresh A4 portrait canvas with a uniform margin
    ///
    /// The cursor starts at the top-left content origin (margin, margin).
    pub fn a4(margin: f64) -> Self {
        Self {
            width: A4_WIDTH,
            height: A4_HEIGHT,
            margin,
            x: margin,
            y: margin,
            font_families: HashMap::new(),
            current_family: None,
            current_weight: FontWeight::default(),
            current_font_size: 12.0,
            text_color: Color::default(),
            stroke_color: Color::default(),
            content: Vec::new(),
            buffered_text_ops: Vec::new(),
            font_resources: HashMap::new(),
            next_font_resource: 1,
            images: Vec::new(),
            next_image_resource: 1,
        }
    }

    /// Page width in points
    pub fn width(&self) -> f64 {
        self.width
    }

    /// Page height in points
    pub fn height(&self) -> f64 {
        self.height
    }

    /// Left (and right/top/bottom) margin in points
    pub fn margin_left(&self) -> f64 {
        self.margin
    }

    /// Cursor X position
    pub fn x(&self) -> f64 {
        self.x
    }

    /// Cursor Y position (from the top of the page)
    pub fn y(&self) -> f64 {
        self.y
    }

    /// Set cursor X
    pub fn set_x(&mut self, x: f64) {
        self.x = x;
    }

    /// Set cursor Y
    pub fn set_y(&mut self, y: f64) {
        self.y = y;
    }

    /// Set both cursor coordinates
    pub fn set_xy(&mut self, x: f64, y: f64) {
        self.x = x;
        self.y = y;
    }

    /// Line break: advance Y by `dy` and reset X to the left margin
    pub fn br(&mut self, dy: f64) {
        self.y += dy;
        self.x = self.margin;
    }

    /// Register a font family with its variants
    ///
    /// # Example
    /// ```ignore
    /// canvas.register_font_family("inter",
    ///     FontFamilyBuilder::new()
    ///         .regular(std::fs::read("Inter.ttf")?)
    ///         .bold(std::fs::read("Inter-Bold.ttf")?),
    /// )?;
    /// ```
    pub fn register_font_family(&mut self, name: &str, builder: FontFamilyBuilder) -> Result<()> {
        if self.font_families.contains_key(name) {
            return Err(CanvasError::FontAlreadyExists(name.to_string()));
        }

        let family = builder.build(name)?;
        self.font_families.insert(name.to_string(), family);

        Ok(())
    }

    /// Set the current font family and size
    pub fn set_font(&mut self, family: &str, size: f32) -> Result<()> {
        if !self.font_families.contains_key(family) {
            return Err(CanvasError::FontNotFound(family.to_string()));
        }

        self.current_family = Some(family.to_string());
        self.current_font_size = size;

        Ok(())
    }

    /// Set the font weight (keeps current family/size)
    pub fn set_font_weight(&mut self, weight: FontWeight) -> Result<()> {
        if self.current_family.is_none() {
            return Err(CanvasError::FontNotFound("no font family set".to_string()));
        }

        self.current_weight = weight;
        Ok(())
    }

    /// Set the text color
    pub fn set_text_color(&mut self, color: Color) {
        self.text_color = color;
    }

    /// Set the stroke color used for lines
    pub fn set_stroke_color(&mut self, color: Color) {
        self.stroke_color = color;
    }

    /// Variant font name for the current family and weight
    fn current_font_name(&self) -> Result<String> {
        let family_name = self
            .current_family
            .as_ref()
            .ok_or_else(|| CanvasError::FontNotFound("no font family set".to_string()))?;

        let family = self
            .font_families
            .get(family_name)
            .ok_or_else(|| CanvasError::FontNotFound(family_name.clone()))?;

        Ok(family.get_variant_name(family_name, self.current_weight))
    }

    /// Font data by variant name
    fn get_font_data(&self, name: &str) -> Result<&FontData> {
        for family in self.font_families.values() {
            for variant in [&family.regular, &family.bold].into_iter().flatten() {
                if variant.name == name {
                    return Ok(variant);
                }
            }
        }

        Err(CanvasError::FontNotFound(name.to_string()))
    }

    /// Measure the width of `text` under the current font and size
    pub fn text_width(&self, text: &str) -> Result<f64> {
        let font_name = self.current_font_name()?;
        let font_data = self.get_font_data(&font_name)?;

        Ok(font_data.text_width_points(text, self.current_font_size) as f64)
    }

    /// Draw a text string at the cursor without moving it
    pub fn cell(&mut self, text: &str) -> Result<()> {
        if text.is_empty() {
            return Ok(());
        }

        let font_name = self.current_font_name()?;

        // Track characters for subsetting
        {
            let family_name = self.current_family.clone().unwrap_or_default();
            let family = self
                .font_families
                .get_mut(&family_name)
                .ok_or_else(|| CanvasError::FontNotFound(family_name.clone()))?;
            if let Some(font_data) = family.get_variant_mut(self.current_weight) {
                font_data.add_chars(text);
            }
        }

        let font_resource_name = self.get_or_create_font_ref(&font_name);

        self.buffered_text_ops.push(BufferedTextOp {
            text: text.to_string(),
            font_name,
            font_resource_name,
            x: self.x,
            y: self.height - self.y,
            font_size: self.current_font_size,
            color: self.text_color,
        });

        Ok(())
    }

    /// Draw a straight line between two points (top-origin Y)
    pub fn line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64) {
        let ops = generate_line_operators(
            x1,
            self.height - y1,
            x2,
            self.height - y2,
            self.stroke_color,
            1.0,
        );
        self.content.extend_from_slice(&ops);
    }

    /// Place an image at a position (top-origin Y)
    ///
    /// Returns the actual drawn (width, height) after scaling.
    pub fn image(
        &mut self,
        data: &[u8],
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        mode: ImageScaleMode,
    ) -> Result<(f64, f64)> {
        let xobject = ImageXObject::decode(data)?;

        let (actual_width, actual_height) =
            calculate_scaled_dimensions(xobject.width, xobject.height, width, height, mode);

        let resource_name = format!("Im{}", self.next_image_resource);
        self.next_image_resource += 1;

        let pdf_y = self.height - y - actual_height;
        let ops = generate_image_operators(&resource_name, x, pdf_y, actual_width, actual_height);
        self.content.extend_from_slice(&ops);

        self.images.push((resource_name, xobject));

        Ok((actual_width, actual_height))
    }

    /// Font resource name for a variant, allocating one on first use
    fn get_or_create_font_ref(&mut self, font_name: &str) -> String {
        if let Some(resource_name) = self.font_resources.get(font_name) {
            return resource_name.clone();
        }

        let resource_name = format!("F{}", self.next_font_resource);
        self.next_font_resource += 1;
        self.font_resources
            .insert(font_name.to_string(), resource_name.clone());

        resource_name
    }

    /// Subset every font that drew text
    fn subset_fonts(&mut self) -> Result<()> {
        for family in self.font_families.values_mut() {
            for font_data in [&mut family.regular, &mut family.bold]
                .into_iter()
                .flatten()
            {
                if !font_data.used_chars.is_empty() {
                    font_data.create_subset()?;
                }
            }
        }

        Ok(())
    }

    /// Encode buffered text operations with post-subset glyph IDs
    fn encode_buffered_text(&self) -> Result<Vec<u8>> {
        let mut ops = Vec::new();

        for op in &self.buffered_text_ops {
            let font_data = self.get_font_data(&op.font_name)?;
            let text_hex = font_data.encode_text_hex(&op.text);

            let ctx = TextRenderContext {
                font_name: op.font_resource_name.clone(),
                font_size: op.font_size,
                color: op.color,
            };

            ops.extend_from_slice(&generate_text_operators(&text_hex, op.x, op.y, &ctx));
        }

        Ok(ops)
    }

    /// Finalize the page and return the PDF bytes
    pub fn to_bytes(&mut self) -> Result<Vec<u8>> {
        // 1. Subset fonts down to the glyphs actually drawn
        self.subset_fonts()?;

        // 2. Encode buffered text with remapped glyph IDs
        let text_content = self.encode_buffered_text()?;

        // 3. Assemble the document
        let mut doc = lopdf::Document::with_version("1.5");

        let pages_id = doc.new_object_id();

        // Embed fonts that were used and build the page font dictionary
        let mut font_dict = Dictionary::new();
        let mut embedded: Vec<(String, Object)> = Vec::new();
        for family in self.font_families.values() {
            for font_data in [&family.regular, &family.bold].into_iter().flatten() {
                if font_data.used_chars.is_empty() {
                    continue;
                }
                let Some(resource_name) = self.font_resources.get(&font_data.name) else {
                    continue;
                };

                let objects = font_data.to_pdf_objects()?;

                let font_file_id = doc.add_object(objects.font_file_stream);

                let mut font_descriptor = objects.font_descriptor;
                font_descriptor.set("FontFile2", Object::Reference(font_file_id));
                let font_descriptor_id = doc.add_object(font_descriptor);

                let mut cid_font = objects.cid_font;
                cid_font.set("FontDescriptor", Object::Reference(font_descriptor_id));
                let cid_font_id = doc.add_object(cid_font);

                let tounicode_id = doc.add_object(objects.tounicode_stream);

                let mut type0_font = objects.type0_font;
                type0_font.set(
                    "DescendantFonts",
                    Object::Array(vec![Object::Reference(cid_font_id)]),
                );
                type0_font.set("ToUnicode", Object::Reference(tounicode_id));
                let type0_font_id = doc.add_object(type0_font);

                embedded.push((resource_name.clone(), Object::Reference(type0_font_id)));
            }
        }
        for (resource_name, reference) in embedded {
            font_dict.set(resource_name.as_bytes(), reference);
        }

        // Embed images and build the page XObject dictionary
        let mut xobject_dict = Dictionary::new();
        for (resource_name, xobject) in &self.images {
            let object_id = doc.add_object(xobject.to_pdf_stream());
            xobject_dict.set(resource_name.as_bytes(), Object::Reference(object_id));
        }

        // Page content: graphics operators first, then text
        let mut content = self.content.clone();
        content.extend_from_slice(&text_content);
        let content_id = doc.add_object(Stream::new(Dictionary::new(), content));

        let mut resources = Dictionary::new();
        if !font_dict.is_empty() {
            resources.set("Font", Object::Dictionary(font_dict));
        }
        if !xobject_dict.is_empty() {
            resources.set("XObject", Object::Dictionary(xobject_dict));
        }

        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => vec![0.into(), 0.into(), self.width.into(), self.height.into()],
            "Resources" => resources,
            "Contents" => content_id,
        });

        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Count" => 1,
                "Kids" => vec![Object::Reference(page_id)],
            }),
        );

        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut buffer = Vec::new();
        doc.save_to(&mut buffer)
            .map_err(|e| CanvasError::Save(e.to_string()))?;

        Ok(buffer)
    }

    /// Finalize the page and write it to a file
    pub fn save<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        let bytes = self.to_bytes()?;
        std::fs::write(path, bytes)?;
        Ok(())
    }
}
