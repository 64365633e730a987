//! Document (page) composition: the title banner unit plus one unit per
//! section. Blocks map 1:1 onto the WordprocessingML writer's model.

use super::cleaner::{self, CleanContext};
use super::layout::inches;
use super::slides::NO_CONTENT_PLACEHOLDER;
use super::style::{ImageAlign, StyleDescriptor};
use crate::ooxml::{ImageFormat, docx::{DocBlock, DocImage, PageUnit}};

/// Opening unit: shaded title banner, colored rule, breathing room.
pub fn title_unit(project_title: &str, style: &StyleDescriptor) -> PageUnit {
    PageUnit {
        blocks: vec![
            DocBlock::Banner {
                text: project_title.to_string(),
                fill: style.primary,
                color: super::style::Rgb::new(0xff, 0xff, 0xff),
                font: style.font.name(),
                size_pt: 28,
                centered: true,
            },
            DocBlock::Separator { color: style.primary },
            DocBlock::Spacer,
        ],
    }
}

/// One section unit: heading banner, then text and the optional image in
/// the arrangement the resolved alignment asks for.
pub fn content_unit(
    section_title: &str,
    raw_content: &str,
    style: &StyleDescriptor,
    image: Option<Vec<u8>>,
) -> PageUnit {
    let mut blocks = vec![DocBlock::Banner {
        text: section_title.to_string(),
        fill: style.accent,
        color: super::style::Rgb::new(0xff, 0xff, 0xff),
        font: style.font.name(),
        size_pt: 18,
        centered: false,
    }];

    let mut lines = cleaner::clean(raw_content, section_title, CleanContext::Document);
    if lines.is_empty() {
        lines.push(NO_CONTENT_PLACEHOLDER.to_string());
    }

    match (image, style.image_align) {
        (Some(data), align) if align.is_side() => {
            blocks.push(DocBlock::SideBySide {
                image: doc_image(data, inches(2.8), inches(2.1)),
                lines,
                image_left: align == ImageAlign::Left,
                align: style.text_align,
                font: style.font.name(),
                size_pt: style.font_size_pt,
            });
        }
        (Some(data), ImageAlign::Top) => {
            blocks.push(DocBlock::Image(doc_image(data, inches(5.0), inches(3.0))));
            blocks.push(DocBlock::Spacer);
            push_paragraphs(&mut blocks, lines, style);
        }
        (Some(data), _) => {
            push_paragraphs(&mut blocks, lines, style);
            blocks.push(DocBlock::Spacer);
            blocks.push(DocBlock::Image(doc_image(data, inches(5.0), inches(3.0))));
        }
        (None, _) => push_paragraphs(&mut blocks, lines, style),
    }

    blocks.push(DocBlock::Spacer);
    PageUnit { blocks }
}

fn push_paragraphs(blocks: &mut Vec<DocBlock>, lines: Vec<String>, style: &StyleDescriptor) {
    for line in lines {
        blocks.push(DocBlock::Paragraph {
            text: line,
            align: style.text_align,
            font: style.font.name(),
            size_pt: style.font_size_pt,
        });
    }
}

fn doc_image(data: Vec<u8>, width: i64, height: i64) -> DocImage {
    let format = ImageFormat::sniff(&data);
    DocImage { data, format, width, height }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::project::DocumentType;

    fn style() -> StyleDescriptor {
        StyleDescriptor::resolve(None, DocumentType::Docx).unwrap()
    }

    fn styled(meta: &str) -> StyleDescriptor {
        StyleDescriptor::resolve(Some(meta), DocumentType::Docx).unwrap()
    }

    #[test]
    fn title_unit_has_banner_rule_spacer() {
        let unit = title_unit("Annual Report", &style());
        assert_eq!(unit.blocks.len(), 3);
        assert!(matches!(unit.blocks[0], DocBlock::Banner { centered: true, .. }));
        assert!(matches!(unit.blocks[1], DocBlock::Separator { .. }));
    }

    #[test]
    fn empty_section_gets_placeholder_paragraph() {
        let unit = content_unit("Background", "  \n", &style(), None);
        let para = unit.blocks.iter().find_map(|b| match b {
            DocBlock::Paragraph { text, .. } => Some(text.as_str()),
            _ => None,
        });
        assert_eq!(para, Some(NO_CONTENT_PLACEHOLDER));
    }

    #[test]
    fn top_alignment_puts_image_before_text() {
        let unit = content_unit("Background", "- a finding", &style(), Some(vec![0x89]));
        let img_idx = unit.blocks.iter().position(|b| matches!(b, DocBlock::Image(_)));
        let txt_idx = unit.blocks.iter().position(|b| matches!(b, DocBlock::Paragraph { .. }));
        assert!(img_idx.unwrap() < txt_idx.unwrap());
    }

    #[test]
    fn side_alignment_uses_table_block() {
        let s = styled(r#"{"textStyle":{"imageAlignment":"left"}}"#);
        let unit = content_unit("Background", "- a finding", &s, Some(vec![0x89]));
        let side = unit.blocks.iter().find_map(|b| match b {
            DocBlock::SideBySide { image_left, lines, .. } => Some((*image_left, lines.clone())),
            _ => None,
        });
        let (image_left, lines) = side.unwrap();
        assert!(image_left);
        assert_eq!(lines, vec!["a finding"]);
    }

    #[test]
    fn missing_image_composes_text_only() {
        let unit = content_unit("Background", "- a finding", &style(), None);
        assert!(!unit.blocks.iter().any(|b| matches!(b, DocBlock::Image(_) | DocBlock::SideBySide { .. })));
    }
}
