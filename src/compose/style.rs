//! Resolves the user's opaque theme/text-style JSON into concrete
//! rendering parameters.
//!
//! Every field has a safe default: a missing or unrecognized value falls
//! back silently. A *present but malformed* hex color is the one hard
//! error — that is caught here, at the resolver boundary, before any
//! document work starts.

use serde_json::Value;

use crate::errors::AppError;
use crate::models::project::DocumentType;

/// An 8-bit RGB color parsed from a `#rrggbb` string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Rgb { r, g, b }
    }

    /// Parse `"#RRGGBB"` or `"RRGGBB"`. Anything else is a validation
    /// error, not undefined behavior.
    pub fn parse(s: &str) -> Result<Self, AppError> {
        let hex = s.trim().trim_start_matches('#');
        if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(AppError::Validation(format!(
                "Invalid hex color '{s}': expected 6 hex digits"
            )));
        }
        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&hex[range], 16)
                .map_err(|e| AppError::Validation(format!("Invalid hex color '{s}': {e}")))
        };
        Ok(Rgb {
            r: channel(0..2)?,
            g: channel(2..4)?,
            b: channel(4..6)?,
        })
    }

    /// Six uppercase hex digits, no leading '#' (the form OOXML wants).
    pub fn to_hex(self) -> String {
        format!("{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

/// Recognized font-family keys and their concrete font names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontFamily {
    Arial,
    Helvetica,
    Georgia,
    Times,
    Courier,
    Verdana,
    Calibri,
}

impl FontFamily {
    pub fn parse(key: &str) -> Option<Self> {
        match key.trim().to_lowercase().as_str() {
            "arial" => Some(FontFamily::Arial),
            "helvetica" => Some(FontFamily::Helvetica),
            "georgia" => Some(FontFamily::Georgia),
            "times" => Some(FontFamily::Times),
            "courier" => Some(FontFamily::Courier),
            "verdana" => Some(FontFamily::Verdana),
            "calibri" => Some(FontFamily::Calibri),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            FontFamily::Arial => "Arial",
            FontFamily::Helvetica => "Helvetica",
            FontFamily::Georgia => "Georgia",
            FontFamily::Times => "Times New Roman",
            FontFamily::Courier => "Courier New",
            FontFamily::Verdana => "Verdana",
            FontFamily::Calibri => "Calibri",
        }
    }

    fn default_for(doc_type: DocumentType) -> Self {
        match doc_type {
            DocumentType::Pptx => FontFamily::Arial,
            DocumentType::Docx => FontFamily::Calibri,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
    Justify,
}

impl TextAlign {
    pub fn parse(key: &str) -> Option<Self> {
        match key.trim().to_lowercase().as_str() {
            "left" => Some(TextAlign::Left),
            "center" => Some(TextAlign::Center),
            "right" => Some(TextAlign::Right),
            "justify" => Some(TextAlign::Justify),
            _ => None,
        }
    }

    /// DrawingML paragraph alignment attribute value.
    pub fn pptx_attr(self) -> &'static str {
        match self {
            TextAlign::Left => "l",
            TextAlign::Center => "ctr",
            TextAlign::Right => "r",
            TextAlign::Justify => "just",
        }
    }

    /// WordprocessingML `w:jc` value.
    pub fn docx_attr(self) -> &'static str {
        match self {
            TextAlign::Left => "left",
            TextAlign::Center => "center",
            TextAlign::Right => "right",
            TextAlign::Justify => "both",
        }
    }
}

/// Where the section image sits relative to the text block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImageAlign {
    #[default]
    Top,
    Bottom,
    Left,
    Right,
}

impl ImageAlign {
    pub fn parse(key: &str) -> Option<Self> {
        match key.trim().to_lowercase().as_str() {
            "top" => Some(ImageAlign::Top),
            "bottom" => Some(ImageAlign::Bottom),
            "left" => Some(ImageAlign::Left),
            "right" => Some(ImageAlign::Right),
            _ => None,
        }
    }

    pub fn is_side(self) -> bool {
        matches!(self, ImageAlign::Left | ImageAlign::Right)
    }
}

/// Concrete rendering parameters for one export. Derived, never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct StyleDescriptor {
    pub primary: Rgb,
    pub secondary: Rgb,
    pub text: Rgb,
    pub accent: Rgb,
    pub font: FontFamily,
    pub text_align: TextAlign,
    pub image_align: ImageAlign,
    pub font_size_pt: u32,
}

impl StyleDescriptor {
    fn defaults(doc_type: DocumentType) -> Self {
        match doc_type {
            DocumentType::Pptx => StyleDescriptor {
                primary: Rgb::new(0x66, 0x7e, 0xea),
                secondary: Rgb::new(0x76, 0x4b, 0xa2),
                text: Rgb::new(0xff, 0xff, 0xff),
                accent: Rgb::new(0x50, 0xe6, 0xff),
                font: FontFamily::default_for(doc_type),
                text_align: TextAlign::Left,
                image_align: ImageAlign::Top,
                font_size_pt: 16,
            },
            DocumentType::Docx => StyleDescriptor {
                primary: Rgb::new(0x00, 0x78, 0xd4),
                secondary: Rgb::new(0x10, 0x6e, 0xbe),
                text: Rgb::new(0x00, 0x00, 0x00),
                accent: Rgb::new(0x50, 0xe6, 0xff),
                font: FontFamily::default_for(doc_type),
                text_align: TextAlign::Left,
                image_align: ImageAlign::Top,
                font_size_pt: 12,
            },
        }
    }

    /// Resolve a project's opaque metadata JSON into a style descriptor.
    ///
    /// Pure and idempotent. Unparseable metadata counts as absent (the
    /// frontend stores it opaquely and older projects may have none);
    /// malformed hex inside parseable metadata is rejected.
    pub fn resolve(
        metadata_json: Option<&str>,
        doc_type: DocumentType,
    ) -> Result<Self, AppError> {
        let mut style = Self::defaults(doc_type);

        let Some(meta) = metadata_json.and_then(|s| serde_json::from_str::<Value>(s).ok()) else {
            return Ok(style);
        };

        let preview = &meta["theme"]["preview"];
        if let Some(hex) = preview["primary"].as_str() {
            style.primary = Rgb::parse(hex)?;
        }
        if let Some(hex) = preview["secondary"].as_str() {
            style.secondary = Rgb::parse(hex)?;
        }
        if let Some(hex) = preview["text"].as_str() {
            style.text = Rgb::parse(hex)?;
        }
        if let Some(hex) = preview["accent"].as_str() {
            style.accent = Rgb::parse(hex)?;
        }

        let text_style = &meta["textStyle"];
        if let Some(font) = text_style["fontFamily"].as_str().and_then(FontFamily::parse) {
            style.font = font;
        }
        if let Some(align) = text_style["alignment"].as_str().and_then(TextAlign::parse) {
            style.text_align = align;
        }
        if let Some(align) = text_style["imageAlignment"].as_str().and_then(ImageAlign::parse) {
            style.image_align = align;
        }
        if let Some(size) = text_style["fontSize"].as_u64() {
            style.font_size_pt = size.clamp(8, 72) as u32;
        }

        Ok(style)
    }

    /// Apply a theme's preview palette on top of the resolved style.
    pub fn with_palette(mut self, primary: Rgb, secondary: Rgb, accent: Rgb, text: Rgb) -> Self {
        self.primary = primary;
        self.secondary = secondary;
        self.accent = accent;
        self.text = text;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_is_idempotent() {
        let meta = r##"{"theme":{"preview":{"primary":"#112233"}},"textStyle":{"alignment":"center"}}"##;
        let a = StyleDescriptor::resolve(Some(meta), DocumentType::Pptx).unwrap();
        let b = StyleDescriptor::resolve(Some(meta), DocumentType::Pptx).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.primary, Rgb::new(0x11, 0x22, 0x33));
        assert_eq!(a.text_align, TextAlign::Center);
    }

    #[test]
    fn missing_fields_take_defaults() {
        let style = StyleDescriptor::resolve(None, DocumentType::Pptx).unwrap();
        assert_eq!(style.primary.to_hex(), "667EEA");
        assert_eq!(style.font.name(), "Arial");
        assert_eq!(style.image_align, ImageAlign::Top);
    }

    #[test]
    fn unknown_font_falls_back() {
        let meta = r#"{"textStyle":{"fontFamily":"comic_sans"}}"#;
        let style = StyleDescriptor::resolve(Some(meta), DocumentType::Docx).unwrap();
        assert_eq!(style.font.name(), "Calibri");
    }

    #[test]
    fn malformed_hex_is_rejected() {
        let meta = r##"{"theme":{"preview":{"primary":"#12345"}}}"##;
        assert!(StyleDescriptor::resolve(Some(meta), DocumentType::Pptx).is_err());
        let meta = r##"{"theme":{"preview":{"accent":"#zzzzzz"}}}"##;
        assert!(StyleDescriptor::resolve(Some(meta), DocumentType::Pptx).is_err());
    }
}
