//! Theme catalog: built-in Office palettes plus custom uploaded templates.
//!
//! Built-ins are static id → palette tables, one per document type.
//! Custom themes are user-uploaded .pptx/.potx (or .docx/.dotx) files kept
//! on disk; their palette is read out of the embedded theme part's color
//! scheme at resolve time. A theme id that matches nothing resolves to
//! `None` and export falls back to the style defaults.

use std::fs;
use std::io::{Cursor, Read as _};
use std::path::{Path, PathBuf};

use log::warn;
use quick_xml::Reader;
use quick_xml::events::Event;
use serde::Serialize;

use crate::compose::style::Rgb;
use crate::errors::AppError;
use crate::models::project::DocumentType;

const PPT_EXTENSIONS: [&str; 2] = ["pptx", "potx"];
const WORD_EXTENSIONS: [&str; 2] = ["docx", "dotx"];

/// Resolved theme colors applied on top of a style descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub primary: Rgb,
    pub secondary: Rgb,
    pub accent: Rgb,
    pub text: Rgb,
}

impl Palette {
    const fn new(primary: u32, secondary: u32, accent: u32, text: u32) -> Self {
        const fn rgb(v: u32) -> Rgb {
            Rgb::new((v >> 16) as u8, (v >> 8) as u8, v as u8)
        }
        Palette {
            primary: rgb(primary),
            secondary: rgb(secondary),
            accent: rgb(accent),
            text: rgb(text),
        }
    }
}

/// JSON shape of a palette preview, hex strings with a leading '#'.
#[derive(Debug, Clone, Serialize)]
pub struct PalettePreview {
    pub primary: String,
    pub secondary: String,
    pub accent: String,
    pub text: String,
}

impl From<Palette> for PalettePreview {
    fn from(p: Palette) -> Self {
        let hex = |c: Rgb| format!("#{}", c.to_hex());
        PalettePreview {
            primary: hex(p.primary),
            secondary: hex(p.secondary),
            accent: hex(p.accent),
            text: hex(p.text),
        }
    }
}

/// One catalog entry as the API reports it.
#[derive(Debug, Clone, Serialize)]
pub struct ThemeInfo {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub document_type: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preview: Option<PalettePreview>,
}

const BUILTIN_PPT: &[(&str, &str, Palette)] = &[
    ("office", "Office Theme", Palette::new(0x0078D4, 0x106EBE, 0x50E6FF, 0xFFFFFF)),
    ("ion", "Ion", Palette::new(0x0072C6, 0x68217A, 0x00BCF2, 0xFFFFFF)),
    ("integral", "Integral", Palette::new(0x7F7F7F, 0xD24726, 0xF79646, 0xFFFFFF)),
    ("facet", "Facet", Palette::new(0x1F4E78, 0x0F2B3C, 0x7BA4DB, 0xFFFFFF)),
    ("retrospect", "Retrospect", Palette::new(0x8B7E66, 0xC9B18A, 0xE7DEC8, 0xFFFFFF)),
    ("slice", "Slice", Palette::new(0xFF6900, 0xFCB900, 0x7BDCB5, 0xFFFFFF)),
    ("wisp", "Wisp", Palette::new(0x6B9BC7, 0x92B4D1, 0xB8CDDB, 0xFFFFFF)),
    ("basis", "Basis", Palette::new(0x2E5090, 0x9DC3E6, 0xE7E6E6, 0xFFFFFF)),
    ("berlin", "Berlin", Palette::new(0xD13438, 0xF4B183, 0xC5E0B4, 0xFFFFFF)),
    ("circuit", "Circuit", Palette::new(0x00B0F0, 0x7030A0, 0xFFC000, 0xFFFFFF)),
];

const BUILTIN_WORD: &[(&str, &str, Palette)] = &[
    ("office", "Office", Palette::new(0x0078D4, 0x106EBE, 0x50E6FF, 0x000000)),
    ("basic", "Basic (Simple)", Palette::new(0x4472C4, 0xED7D31, 0xA5A5A5, 0x000000)),
    ("black_tie", "Black & White (Elegant)", Palette::new(0x000000, 0x595959, 0xAEAAAA, 0x000000)),
    ("facet", "Facet", Palette::new(0x1F4E78, 0x0F2B3C, 0x7BA4DB, 0x000000)),
    ("integral", "Integral", Palette::new(0x7F7F7F, 0xD24726, 0xF79646, 0x000000)),
    ("ion", "Ion", Palette::new(0x0072C6, 0x68217A, 0x00BCF2, 0x000000)),
    ("retrospect", "Retrospect", Palette::new(0x8B7E66, 0xC9B18A, 0xE7DEC8, 0x000000)),
    ("slice", "Slice", Palette::new(0xFF6900, 0xFCB900, 0x7BDCB5, 0x000000)),
    ("wisp", "Wisp", Palette::new(0x6B9BC7, 0x92B4D1, 0xB8CDDB, 0x000000)),
    ("organic", "Organic", Palette::new(0x7BA23F, 0xC5D9A4, 0xE8F2D7, 0x000000)),
    ("dividend", "Dividend", Palette::new(0x4F81BD, 0xC0504D, 0x9BBB59, 0x000000)),
    ("frame", "Frame", Palette::new(0xC0504D, 0x4F81BD, 0x9BBB59, 0x000000)),
];

fn builtin_table(doc_type: DocumentType) -> &'static [(&'static str, &'static str, Palette)] {
    match doc_type {
        DocumentType::Pptx => BUILTIN_PPT,
        DocumentType::Docx => BUILTIN_WORD,
    }
}

/// Look up a built-in palette by id.
pub fn builtin_palette(id: &str, doc_type: DocumentType) -> Option<Palette> {
    builtin_table(doc_type)
        .iter()
        .find(|(tid, _, _)| *tid == id)
        .map(|(_, _, p)| *p)
}

/// Filesystem-backed catalog of custom templates plus the built-in table.
pub struct ThemeStore {
    ppt_dir: PathBuf,
    word_dir: PathBuf,
}

impl ThemeStore {
    /// Open (creating if needed) the theme directories under `root`.
    pub fn open(root: impl AsRef<Path>) -> Result<Self, AppError> {
        let ppt_dir = root.as_ref().join("themes");
        let word_dir = ppt_dir.join("word");
        fs::create_dir_all(&word_dir)?;
        Ok(ThemeStore { ppt_dir, word_dir })
    }

    fn dir(&self, doc_type: DocumentType) -> &Path {
        match doc_type {
            DocumentType::Pptx => &self.ppt_dir,
            DocumentType::Docx => &self.word_dir,
        }
    }

    fn extensions(doc_type: DocumentType) -> [&'static str; 2] {
        match doc_type {
            DocumentType::Pptx => PPT_EXTENSIONS,
            DocumentType::Docx => WORD_EXTENSIONS,
        }
    }

    /// All themes for one document type: built-ins first, then custom
    /// uploads found on disk.
    pub fn available(&self, doc_type: DocumentType) -> Vec<ThemeInfo> {
        let mut themes: Vec<ThemeInfo> = builtin_table(doc_type)
            .iter()
            .map(|(id, name, palette)| ThemeInfo {
                id: id.to_string(),
                name: name.to_string(),
                kind: "builtin",
                document_type: doc_type.as_str(),
                preview: Some((*palette).into()),
            })
            .collect();

        let entries = match fs::read_dir(self.dir(doc_type)) {
            Ok(entries) => entries,
            Err(_) => return themes,
        };
        for entry in entries.flatten() {
            let path = entry.path();
            let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
            if !Self::extensions(doc_type).contains(&ext) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                themes.push(ThemeInfo {
                    id: stem.to_string(),
                    name: display_name(stem),
                    kind: "custom",
                    document_type: doc_type.as_str(),
                    preview: None,
                });
            }
        }
        themes
    }

    /// Resolve a theme id to its palette: custom template first (colors
    /// read from its embedded theme part), then the built-in table.
    pub fn resolve_palette(&self, id: &str, doc_type: DocumentType) -> Option<Palette> {
        if let Some(path) = self.custom_path(id, doc_type) {
            match template_palette(&path, doc_type) {
                Some(palette) => return Some(palette),
                None => warn!("custom theme '{id}' has no readable color scheme"),
            }
        }
        builtin_palette(id, doc_type)
    }

    fn custom_path(&self, id: &str, doc_type: DocumentType) -> Option<PathBuf> {
        let safe = sanitize_name(id);
        if safe.is_empty() {
            return None;
        }
        Self::extensions(doc_type)
            .iter()
            .map(|ext| self.dir(doc_type).join(format!("{safe}.{ext}")))
            .find(|p| p.is_file())
    }

    /// Store an uploaded template. The payload must at least be a zip
    /// archive; anything else is rejected before it reaches disk.
    pub fn save_custom(
        &self,
        name: &str,
        doc_type: DocumentType,
        data: &[u8],
    ) -> Result<String, AppError> {
        let safe = sanitize_name(name);
        if safe.is_empty() {
            return Err(AppError::Validation("Theme name is empty".into()));
        }
        zip::ZipArchive::new(Cursor::new(data))
            .map_err(|e| AppError::Validation(format!("Upload is not a valid template: {e}")))?;

        let ext = Self::extensions(doc_type)[0];
        let path = self.dir(doc_type).join(format!("{safe}.{ext}"));
        fs::write(&path, data)?;
        Ok(safe)
    }

    /// Remove a custom theme. Returns whether a file was deleted;
    /// built-ins are never touched.
    pub fn delete_custom(&self, id: &str, doc_type: DocumentType) -> Result<bool, AppError> {
        match self.custom_path(id, doc_type) {
            Some(path) => {
                fs::remove_file(path)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

/// Keep alphanumerics, spaces, dashes and underscores; spaces become
/// underscores. Doubles as path-traversal protection for lookups.
fn sanitize_name(name: &str) -> String {
    name.trim()
        .chars()
        .filter(|c| c.is_alphanumeric() || matches!(c, ' ' | '-' | '_'))
        .map(|c| if c == ' ' { '_' } else { c })
        .collect()
}

fn display_name(id: &str) -> String {
    id.split('_')
        .filter(|w| !w.is_empty())
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Read the color scheme out of a template's theme1.xml part. Accent
/// slots map onto the palette; text color keeps the document default.
fn template_palette(path: &Path, doc_type: DocumentType) -> Option<Palette> {
    let file = fs::File::open(path).ok()?;
    let mut archive = zip::ZipArchive::new(file).ok()?;
    let part = match doc_type {
        DocumentType::Pptx => "ppt/theme/theme1.xml",
        DocumentType::Docx => "word/theme/theme1.xml",
    };
    let mut xml = String::new();
    archive.by_name(part).ok()?.read_to_string(&mut xml).ok()?;

    let mut reader = Reader::from_str(&xml);
    let mut slot: Option<&'static str> = None;
    let mut accents: [Option<Rgb>; 3] = [None; 3];

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) | Ok(Event::Empty(e)) => match e.local_name().as_ref() {
                b"accent1" => slot = Some("accent1"),
                b"accent2" => slot = Some("accent2"),
                b"accent3" => slot = Some("accent3"),
                b"srgbClr" => {
                    if let (Some(name), Ok(Some(attr))) = (slot, e.try_get_attribute("val")) {
                        if let Ok(val) = attr.unescape_value() {
                            if let Ok(color) = Rgb::parse(&val) {
                                let idx = match name {
                                    "accent1" => 0,
                                    "accent2" => 1,
                                    _ => 2,
                                };
                                accents[idx] = Some(color);
                            }
                        }
                    }
                }
                _ => {}
            },
            Ok(Event::End(e)) => {
                if matches!(e.local_name().as_ref(), b"accent1" | b"accent2" | b"accent3") {
                    slot = None;
                }
            }
            Ok(Event::Eof) => break,
            Err(_) => return None,
            _ => {}
        }
    }

    let defaults = builtin_palette("office", doc_type)?;
    Some(Palette {
        primary: accents[0]?,
        secondary: accents[1].unwrap_or(defaults.secondary),
        accent: accents[2].unwrap_or(defaults.accent),
        text: defaults.text,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_lookup_by_document_type() {
        let ppt = builtin_palette("office", DocumentType::Pptx).unwrap();
        let word = builtin_palette("office", DocumentType::Docx).unwrap();
        assert_eq!(ppt.primary, Rgb::new(0x00, 0x78, 0xD4));
        assert_eq!(ppt.text, Rgb::new(0xFF, 0xFF, 0xFF));
        assert_eq!(word.text, Rgb::new(0x00, 0x00, 0x00));
        assert!(builtin_palette("nonexistent", DocumentType::Pptx).is_none());
    }

    #[test]
    fn word_catalog_has_word_only_entries() {
        assert!(builtin_palette("organic", DocumentType::Docx).is_some());
        assert!(builtin_palette("organic", DocumentType::Pptx).is_none());
    }

    #[test]
    fn sanitize_strips_traversal_attempts() {
        assert_eq!(sanitize_name("../../etc/passwd"), "etcpasswd");
        assert_eq!(sanitize_name("My Cool Theme"), "My_Cool_Theme");
    }

    #[test]
    fn display_name_titlecases_underscores() {
        assert_eq!(display_name("my_cool_theme"), "My Cool Theme");
    }

    #[test]
    fn store_lists_builtins_and_rejects_non_zip_upload() {
        let dir = tempfile::tempdir().unwrap();
        let store = ThemeStore::open(dir.path()).unwrap();

        let themes = store.available(DocumentType::Pptx);
        assert_eq!(themes.len(), BUILTIN_PPT.len());
        assert!(themes.iter().all(|t| t.kind == "builtin"));

        let err = store.save_custom("bad", DocumentType::Pptx, b"not a zip");
        assert!(err.is_err());
        assert!(!store.delete_custom("bad", DocumentType::Pptx).unwrap());
    }

    #[test]
    fn custom_upload_roundtrip() {
        use std::io::Write as _;
        let dir = tempfile::tempdir().unwrap();
        let store = ThemeStore::open(dir.path()).unwrap();

        // A minimal zip payload is enough to pass container validation.
        let mut cursor = Cursor::new(Vec::new());
        {
            let mut zw = zip::ZipWriter::new(&mut cursor);
            zw.start_file("dummy.xml", zip::write::SimpleFileOptions::default())
                .unwrap();
            zw.write_all(b"<x/>").unwrap();
            zw.finish().unwrap();
        }
        let data = cursor.into_inner();

        let id = store.save_custom("My Theme", DocumentType::Pptx, &data).unwrap();
        assert_eq!(id, "My_Theme");
        let themes = store.available(DocumentType::Pptx);
        assert!(themes.iter().any(|t| t.id == "My_Theme" && t.kind == "custom"));
        assert!(store.delete_custom("My_Theme", DocumentType::Pptx).unwrap());
    }
}
