//! Minimal-but-valid OOXML package writer.
//!
//! Both target formats are zip containers of XML parts plus media. This
//! module owns the container plumbing; `pptx` and `docx` emit the
//! format-specific parts. Parts are built as strings with `xml_escape`
//! applied to every piece of user text; the fixed scaffolding (content
//! types, rels, theme, master) lives in constants.

pub mod docx;
pub mod pptx;

use std::borrow::Cow;
use std::io::{Cursor, Write};

use zip::CompressionMethod;
use zip::write::{SimpleFileOptions, ZipWriter};

use crate::errors::AppError;

/// Escape text for inclusion in XML character data or attribute values.
pub fn xml_escape(raw: &str) -> Cow<'_, str> {
    quick_xml::escape::escape(raw)
}

/// Image container formats we embed. Anything that is not JPEG is
/// written out as PNG — the only producers are the placeholder generator
/// (always PNG) and HTTP backends filtered to jpg/png.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Png,
    Jpeg,
}

impl ImageFormat {
    /// Sniff the container from magic bytes.
    pub fn sniff(data: &[u8]) -> Self {
        if data.starts_with(&[0xFF, 0xD8, 0xFF]) {
            ImageFormat::Jpeg
        } else {
            ImageFormat::Png
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            ImageFormat::Png => "png",
            ImageFormat::Jpeg => "jpeg",
        }
    }
}

/// Accumulates parts and serializes the final archive in memory.
pub struct Package {
    writer: ZipWriter<Cursor<Vec<u8>>>,
}

impl Package {
    pub fn new() -> Self {
        Package {
            writer: ZipWriter::new(Cursor::new(Vec::new())),
        }
    }

    pub fn add_part(&mut self, name: &str, data: &[u8]) -> Result<(), AppError> {
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
        self.writer
            .start_file(name, options)
            .map_err(|e| AppError::Artifact(format!("zip part '{name}': {e}")))?;
        self.writer.write_all(data)?;
        Ok(())
    }

    pub fn finish(self) -> Result<Vec<u8>, AppError> {
        let cursor = self
            .writer
            .finish()
            .map_err(|e| AppError::Artifact(format!("zip finish: {e}")))?;
        Ok(cursor.into_inner())
    }
}

impl Default for Package {
    fn default() -> Self {
        Self::new()
    }
}

pub const XML_DECL: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\r\n";

pub const REL_NS: &str = "http://schemas.openxmlformats.org/package/2006/relationships";
pub const DOC_REL_NS: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
pub const DRAWING_NS: &str = "http://schemas.openxmlformats.org/drawingml/2006/main";
