//! Export assembly: project + sections in, finished artifact bytes out.
//!
//! Pipeline per export: resolve the style descriptor from project
//! metadata, overlay the selected theme's palette, fetch one image per
//! section, compose render units, serialize. A missing theme or image
//! degrades with a log line; a malformed color or a serialization
//! failure is an error.

use log::{info, warn};

use super::pages;
use super::slides;
use super::style::StyleDescriptor;
use crate::errors::AppError;
use crate::models::project::{DocumentType, Project};
use crate::models::section::Section;
use crate::ooxml::{docx, pptx};
use crate::providers::ImageProvider;
use crate::themes::ThemeStore;

/// Assemble the export artifact for a project. Sections are rendered in
/// `ord` order; the output always has one leading title unit, so a
/// well-formed artifact holds `sections.len() + 1` units.
pub async fn assemble(
    project: &Project,
    sections: &[Section],
    themes: &ThemeStore,
    images: &ImageProvider,
) -> Result<Vec<u8>, AppError> {
    let doc_type = project.doc_type();
    let mut style = StyleDescriptor::resolve(project.metadata_json.as_deref(), doc_type)?;

    if let Some(theme_id) = selected_theme(project.metadata_json.as_deref()) {
        match themes.resolve_palette(&theme_id, doc_type) {
            Some(palette) => {
                style = style.with_palette(
                    palette.primary,
                    palette.secondary,
                    palette.accent,
                    palette.text,
                );
            }
            None => warn!(
                "project {}: theme '{theme_id}' not found, using default palette",
                project.id
            ),
        }
    }

    let mut ordered: Vec<&Section> = sections.iter().collect();
    ordered.sort_by_key(|s| (s.ord, s.id));

    let bytes = match doc_type {
        DocumentType::Pptx => {
            let mut deck = pptx::Deck::default();
            deck.slides
                .push(slides::title_slide(&project.title, &project.main_topic, &style));
            for section in &ordered {
                let image = images.section_image(&section.title, &project.main_topic).await;
                deck.slides
                    .push(slides::content_slide(&section.title, &section.content, &style, image));
            }
            let bytes = pptx::write(&deck)?;
            info!(
                "project {}: assembled pptx, {} slides, {} bytes",
                project.id,
                deck.unit_count(),
                bytes.len()
            );
            bytes
        }
        DocumentType::Docx => {
            let mut doc = docx::PageDoc::default();
            doc.units.push(pages::title_unit(&project.title, &style));
            for section in &ordered {
                let image = images.section_image(&section.title, &project.main_topic).await;
                doc.units
                    .push(pages::content_unit(&section.title, &section.content, &style, image));
            }
            let bytes = docx::write(&doc)?;
            info!(
                "project {}: assembled docx, {} units, {} bytes",
                project.id,
                doc.unit_count(),
                bytes.len()
            );
            bytes
        }
    };

    Ok(bytes)
}

/// The theme id the frontend stored in project metadata, if any.
fn selected_theme(metadata_json: Option<&str>) -> Option<String> {
    let meta: serde_json::Value = serde_json::from_str(metadata_json?).ok()?;
    meta["theme"]["id"].as_str().map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selected_theme_reads_nested_id() {
        let meta = r#"{"theme":{"id":"berlin","preview":{}}}"#;
        assert_eq!(selected_theme(Some(meta)), Some("berlin".to_string()));
        assert_eq!(selected_theme(Some("{}")), None);
        assert_eq!(selected_theme(Some("not json")), None);
        assert_eq!(selected_theme(None), None);
    }
}
