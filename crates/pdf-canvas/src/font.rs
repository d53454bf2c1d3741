//! TrueType font handling: parsing, measurement, subsetting, embedding

use crate::{CanvasError, Result};
use lopdf::{Dictionary, Object, Stream};
use std::collections::{HashMap, HashSet};

/// Font weight
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FontWeight {
    #[default]
    Regular,
    Bold,
}

/// A single embedded TrueType font
#[derive(Debug, Clone)]
pub struct FontData {
    /// Font name/identifier
    pub name: String,
    /// Raw TTF data
    pub ttf_data: Vec<u8>,
    /// Characters drawn with this font (drives subsetting)
    pub used_chars: HashSet<char>,
    /// Parsed font face
    face: Option<ttf_parser::Face<'static>>,
    /// Subset produced at save time
    subset: Option<FontSubset>,
}

/// Result of glyph subsetting: the reduced font plus the char → new-GID map
#[derive(Debug, Clone)]
struct FontSubset {
    data: Vec<u8>,
    gid_map: HashMap<char, u16>,
}

/// PDF objects generated for font embedding
pub struct FontObjects {
    /// Type0 font dictionary
    pub type0_font: Dictionary,
    /// CIDFont Type2 dictionary
    pub cid_font: Dictionary,
    /// Font descriptor dictionary
    pub font_descriptor: Dictionary,
    /// Font file stream (TTF data)
    pub font_file_stream: Stream,
    /// ToUnicode CMap stream
    pub tounicode_stream: Stream,
}

/// Font family with regular and bold variants
#[derive(Debug, Clone, Default)]
pub struct FontFamily {
    /// Regular variant (required)
    pub regular: Option<FontData>,
    /// Bold variant
    pub bold: Option<FontData>,
}

impl FontFamily {
    /// Get the font data for the specified weight
    /// Falls back to regular if the bold variant is not available
    pub fn get_variant(&self, weight: FontWeight) -> Option<&FontData> {
        match weight {
            FontWeight::Bold => self.bold.as_ref().or(self.regular.as_ref()),
            FontWeight::Regular => self.regular.as_ref(),
        }
    }

    /// Mutable access to the variant for the specified weight
    pub fn get_variant_mut(&mut self, weight: FontWeight) -> Option<&mut FontData> {
        match weight {
            FontWeight::Bold => {
                if self.bold.is_some() {
                    self.bold.as_mut()
                } else {
                    self.regular.as_mut()
                }
            }
            FontWeight::Regular => self.regular.as_mut(),
        }
    }

    /// Internal font name for the variant (used for PDF resource naming)
    pub fn get_variant_name(&self, family_name: &str, weight: FontWeight) -> String {
        match weight {
            FontWeight::Bold if self.bold.is_some() => format!("{family_name}-bold"),
            _ => format!("{family_name}-regular"),
        }
    }
}

/// Builder for registering font families
pub struct FontFamilyBuilder {
    regular: Option<Vec<u8>>,
    bold: Option<Vec<u8>>,
}

impl FontFamilyBuilder {
    pub fn new() -> Self {
        Self {
            regular: None,
            bold: None,
        }
    }

    pub fn regular(mut self, ttf_data: Vec<u8>) -> Self {
        self.regular = Some(ttf_data);
        self
    }

    pub fn bold(mut self, ttf_data: Vec<u8>) -> Self {
        self.bold = Some(ttf_data);
        self
    }

    /// Build the FontFamily from the provided TTF data
    pub fn build(self, family_name: &str) -> Result<FontFamily> {
        let regular = match self.regular {
            Some(ttf_data) => Some(FontData::from_ttf(
                &format!("{family_name}-regular"),
                &ttf_data,
            )?),
            None => {
                return Err(CanvasError::FontParse(
                    "font family must have at least a regular variant".to_string(),
                ))
            }
        };

        let bold = self
            .bold
            .map(|data| FontData::from_ttf(&format!("{family_name}-bold"), &data))
            .transpose()?;

        Ok(FontFamily { regular, bold })
    }
}

impl Default for FontFamilyBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl FontData {
    /// Create font data from TTF bytes
    ///
    /// The face borrows the data for the document lifetime, so the copy is
    /// leaked to obtain the 'static lifetime ttf-parser requires here.
    pub fn from_ttf(name: &str, ttf_data: &[u8]) -> Result<Self> {
        let data = ttf_data.to_vec();
        let static_data: &'static [u8] = Box::leak(data.clone().into_boxed_slice());

        let face = ttf_parser::Face::parse(static_data, 0)
            .map_err(|e| CanvasError::FontParse(format!("{e:?}")))?;

        Ok(Self {
            name: name.to_string(),
            ttf_data: data,
            used_chars: HashSet::new(),
            face: Some(face),
            subset: None,
        })
    }

    /// Record characters as used (for subsetting)
    pub fn add_chars(&mut self, text: &str) {
        for c in text.chars() {
            self.used_chars.insert(c);
        }
    }

    /// Get the glyph ID for a character in the original font
    pub fn glyph_id(&self, c: char) -> Option<u16> {
        self.face
            .as_ref()
            .and_then(|face| face.glyph_index(c).map(|id| id.0))
    }

    /// Get glyph advance width in font units
    pub fn glyph_advance(&self, c: char) -> Option<u16> {
        self.face.as_ref().and_then(|face| {
            let glyph_id = face.glyph_index(c)?;
            face.glyph_hor_advance(glyph_id)
        })
    }

    /// Font units per em
    pub fn units_per_em(&self) -> u16 {
        self.face
            .as_ref()
            .map(|face| face.units_per_em())
            .unwrap_or(1000)
    }

    /// Font ascender in font units
    pub fn ascender(&self) -> i16 {
        self.face
            .as_ref()
            .map(|face| face.ascender())
            .unwrap_or(800)
    }

    /// Font descender in font units
    pub fn descender(&self) -> i16 {
        self.face
            .as_ref()
            .map(|face| face.descender())
            .unwrap_or(-200)
    }

    /// Calculate text width in font units
    pub fn text_width(&self, text: &str) -> u32 {
        text.chars()
            .filter_map(|c| self.glyph_advance(c))
            .map(|w| w as u32)
            .sum()
    }

    /// Calculate text width in points for a given font size
    pub fn text_width_points(&self, text: &str, font_size: f32) -> f32 {
        let width = self.text_width(text);
        let units_per_em = self.units_per_em() as f32;
        (width as f32 / units_per_em) * font_size
    }

    /// Subset the font to the glyphs of `used_chars`
    ///
    /// Builds a GlyphRemapper over the used glyph IDs, produces the reduced
    /// font file, and keeps the char → remapped-GID table for text encoding.
    /// If subsetting fails the full font is embedded with original GIDs.
    pub fn create_subset(&mut self) -> Result<()> {
        let Some(face) = self.face.as_ref() else {
            return Err(CanvasError::FontSubset(format!(
                "font {} has no parsed face",
                self.name
            )));
        };

        let mut chars: Vec<char> = self.used_chars.iter().copied().collect();
        chars.sort_unstable();

        let mut remapper = subsetter::GlyphRemapper::new();
        let mut gid_map = HashMap::new();
        for &c in &chars {
            if let Some(gid) = face.glyph_index(c) {
                gid_map.insert(c, remapper.remap(gid.0));
            }
        }

        match subsetter::subset(&self.ttf_data, 0, &remapper) {
            Ok(data) => {
                self.subset = Some(FontSubset { data, gid_map });
            }
            Err(e) => {
                log::warn!(
                    "font subsetting failed for {}: {e} - embedding full font",
                    self.name
                );
                let full_map = chars
                    .iter()
                    .filter_map(|&c| self.glyph_id(c).map(|gid| (c, gid)))
                    .collect();
                self.subset = Some(FontSubset {
                    data: self.ttf_data.clone(),
                    gid_map: full_map,
                });
            }
        }

        Ok(())
    }

    /// GID used in the embedded font for a character
    fn embedded_gid(&self, c: char) -> u16 {
        match &self.subset {
            Some(subset) => subset.gid_map.get(&c).copied().unwrap_or(0),
            None => self.glyph_id(c).unwrap_or(0),
        }
    }

    /// Bytes of the font file that gets embedded
    fn embedded_data(&self) -> &[u8] {
        match &self.subset {
            Some(subset) => &subset.data,
            None => &self.ttf_data,
        }
    }

    /// Encode text as a hex string for the PDF Tj operator
    ///
    /// Uses subset GIDs once `create_subset` has run.
    pub fn encode_text_hex(&self, text: &str) -> String {
        let mut result = String::new();
        for c in text.chars() {
            result.push_str(&format!("{:04X}", self.embedded_gid(c)));
        }
        format!("<{result}>")
    }

    /// Generate all PDF objects needed to embed this font
    pub fn to_pdf_objects(&self) -> Result<FontObjects> {
        let font_name = Object::Name(self.name.clone().into());
        let embedded = self.embedded_data();

        let tounicode_content = self.generate_tounicode_cmap();
        let tounicode_stream = Stream::new(
            Dictionary::from_iter(vec![
                ("Type", "CMap".into()),
                ("Length", (tounicode_content.len() as i32).into()),
            ]),
            tounicode_content.into_bytes(),
        );

        let font_file_stream = Stream::new(
            Dictionary::from_iter(vec![(
                "Length1",
                (embedded.len() as i32).into(),
            )]),
            embedded.to_vec(),
        );

        // Descriptor metrics are expressed in 1000-unit glyph space
        let scale = 1000.0 / self.units_per_em() as f32;
        let ascent = (self.ascender() as f32 * scale) as i32;
        let descent = (self.descender() as f32 * scale) as i32;

        let font_bbox = vec![0.into(), descent.into(), 1000.into(), ascent.into()];

        let font_descriptor = Dictionary::from_iter(vec![
            ("Type", "FontDescriptor".into()),
            ("FontName", font_name.clone()),
            ("Flags", 4.into()), // Symbolic font
            ("FontBBox", font_bbox.into()),
            ("ItalicAngle", 0.into()),
            ("Ascent", ascent.into()),
            ("Descent", descent.into()),
            ("CapHeight", ascent.into()),
            ("StemV", 80.into()),
            ("FontFile2", Object::Reference((0, 0))), // Set when embedding
        ]);

        let widths_array = self.generate_widths_array();

        let cid_system_info = Dictionary::from_iter(vec![
            ("Registry", Object::string_literal("Adobe")),
            ("Ordering", Object::string_literal("Identity")),
            ("Supplement", 0.into()),
        ]);

        let cid_font = Dictionary::from_iter(vec![
            ("Type", "Font".into()),
            ("Subtype", "CIDFontType2".into()),
            ("BaseFont", font_name.clone()),
            ("CIDSystemInfo", cid_system_info.into()),
            ("FontDescriptor", Object::Reference((0, 0))), // Set when embedding
            ("W", widths_array.into()),
            ("DW", 1000.into()),
            ("CIDToGIDMap", "Identity".into()),
        ]);

        let type0_font = Dictionary::from_iter(vec![
            ("Type", "Font".into()),
            ("Subtype", "Type0".into()),
            ("BaseFont", font_name),
            ("Encoding", "Identity-H".into()),
            ("DescendantFonts", vec![Object::Reference((0, 0))].into()), // Set when embedding
            ("ToUnicode", Object::Reference((0, 0))),                   // Set when embedding
        ]);

        Ok(FontObjects {
            type0_font,
            cid_font,
            font_descriptor,
            font_file_stream,
            tounicode_stream,
        })
    }

    /// Generate the /W array of per-glyph widths (1000-unit glyph space)
    fn generate_widths_array(&self) -> Vec<Object> {
        let mut widths = Vec::new();
        let scale = 1000.0 / self.units_per_em() as f32;

        let mut entries: Vec<(u16, i32)> = self
            .used_chars
            .iter()
            .filter_map(|&c| {
                let advance = self.glyph_advance(c)?;
                Some((self.embedded_gid(c), (advance as f32 * scale) as i32))
            })
            .collect();
        entries.sort_by_key(|&(gid, _)| gid);
        entries.dedup_by_key(|&mut (gid, _)| gid);

        for (gid, width) in entries {
            widths.push(gid.into());
            widths.push(vec![width.into()].into());
        }

        widths
    }

    /// Generate the ToUnicode CMap stream content
    fn generate_tounicode_cmap(&self) -> String {
        let mut cmap = String::new();

        cmap.push_str("/CIDInit /ProcSet findresource begin\n");
        cmap.push_str("12 dict begin\n");
        cmap.push_str("begincmap\n");
        cmap.push_str("/CIDSystemInfo << /Registry (Adobe) /Ordering (UCS) /Supplement 0 >> def\n");
        cmap.push_str("/CMapName /Adobe-Identity-UCS def\n");
        cmap.push_str("/CMapType 2 def\n");
        cmap.push_str("1 begincodespacerange\n");
        cmap.push_str("<0000> <FFFF>\n");
        cmap.push_str("endcodespacerange\n");

        let mut char_list: Vec<char> = self.used_chars.iter().copied().collect();
        char_list.sort_by_key(|c| *c as u32);

        if !char_list.is_empty() {
            // The PDF spec recommends at most 100 entries per bfchar section
            for chunk in char_list.chunks(100) {
                cmap.push_str(&format!("{} beginbfchar\n", chunk.len()));
                for &c in chunk {
                    cmap.push_str(&format!(
                        "<{:04X}> <{:04X}>\n",
                        self.embedded_gid(c),
                        c as u32
                    ));
                }
                cmap.push_str("endbfchar\n");
            }
        }

        cmap.push_str("endcmap\n");
        cmap.push_str("CMapName currentdict /CMap defineresource pop\n");
        cmap.push_str("end\n");
        cmap.push_str("end\n");

        cmap
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Construct FontData without a parsed face
    ///
    /// Real font files are not available in unit tests; the face-less
    /// construction exercises the API with default metrics.
    fn faceless_font() -> FontData {
        FontData {
            name: "test".to_string(),
            ttf_data: vec![0u8; 100],
            used_chars: HashSet::new(),
            face: None,
            subset: None,
        }
    }

    #[test]
    fn test_add_chars() {
        let mut font = faceless_font();

        font.add_chars("Hello");
        assert_eq!(font.used_chars.len(), 4); // H, e, l, o (l appears twice)
        assert!(font.used_chars.contains(&'H'));
        assert!(font.used_chars.contains(&'o'));
    }

    #[test]
    fn test_default_metrics_without_face() {
        let font = faceless_font();

        assert_eq!(font.units_per_em(), 1000);
        assert_eq!(font.ascender(), 800);
        assert_eq!(font.descender(), -200);
    }

    #[test]
    fn test_text_width_without_face() {
        let font = faceless_font();

        assert_eq!(font.text_width("Hello"), 0);
        assert_eq!(font.text_width(""), 0);
        assert_eq!(font.text_width_points("Hello", 12.0), 0.0);
    }

    #[test]
    fn test_encode_text_hex_without_face() {
        let font = faceless_font();

        assert_eq!(font.encode_text_hex(""), "<>");
        // All characters map to GID 0 without a face
        assert_eq!(font.encode_text_hex("A"), "<0000>");
        assert_eq!(font.encode_text_hex("AB"), "<00000000>");
    }

    #[test]
    fn test_tounicode_cmap() {
        let mut font = faceless_font();
        font.add_chars("AB");

        let cmap = font.generate_tounicode_cmap();

        assert!(cmap.contains("/CIDInit"));
        assert!(cmap.contains("begincmap"));
        assert!(cmap.contains("endcmap"));
        assert!(cmap.contains("<0000> <0041>")); // A -> GID 0
        assert!(cmap.contains("<0000> <0042>")); // B -> GID 0
    }

    #[test]
    fn test_to_pdf_objects() {
        let mut font = faceless_font();
        font.add_chars("Hello");

        let objects = font.to_pdf_objects().expect("PDF object generation");

        assert!(!objects.type0_font.is_empty());
        assert!(!objects.cid_font.is_empty());
        assert!(!objects.font_descriptor.is_empty());
        assert!(!objects.font_file_stream.content.is_empty());
        assert!(!objects.tounicode_stream.content.is_empty());
    }

    #[test]
    fn test_family_bold_falls_back_to_regular() {
        let family = FontFamily {
            regular: Some(faceless_font()),
            bold: None,
        };

        assert!(family.get_variant(FontWeight::Bold).is_some());
        assert_eq!(
            family.get_variant_name("inter", FontWeight::Bold),
            "inter-regular"
        );
    }

    #[test]
    fn test_family_variant_names() {
        let family = FontFamily {
            regular: Some(faceless_font()),
            bold: Some(faceless_font()),
        };

        assert_eq!(
            family.get_variant_name("inter", FontWeight::Regular),
            "inter-regular"
        );
        assert_eq!(
            family.get_variant_name("inter", FontWeight::Bold),
            "inter-bold"
        );
    }

    #[test]
    fn test_builder_requires_regular() {
        let result = FontFamilyBuilder::new().build("inter");
        assert!(result.is_err());
    }
}
