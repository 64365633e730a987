//! Slide composition: one title slide plus one content slide per section.
//!
//! Layout variant is keyed on the resolved image alignment — side-by-side
//! for left/right (image fills the preallocated secondary region),
//! stacked for top/bottom (image sized by the placement calculator from
//! the actual rendered line count). Image absence is never fatal: the
//! slide simply renders text-only.

use super::cleaner::{self, CleanContext};
use super::layout::{self, Region, SLIDE_HEIGHT};
use super::style::{StyleDescriptor, TextAlign};
use crate::ooxml::{ImageFormat, pptx::{PlacedImage, Slide, TextBlock}};

pub const NO_CONTENT_PLACEHOLDER: &str = "No content available";

/// Compose the opening title slide.
pub fn title_slide(project_title: &str, main_topic: &str, style: &StyleDescriptor) -> Slide {
    let subtitle = if main_topic.trim().is_empty()
        || main_topic.trim().to_lowercase() == project_title.trim().to_lowercase()
    {
        "A Comprehensive Overview".to_string()
    } else {
        main_topic.trim().to_string()
    };

    Slide {
        gradient: (style.primary, style.secondary),
        title: TextBlock {
            region: Region::new(0.5, 2.3, 9.0, 1.5),
            lines: vec![project_title.to_string()],
            font: style.font.name(),
            size_pt: 54,
            bold: true,
            color: style.text,
            align: TextAlign::Center,
            spacing_pt: 0,
        },
        body: Some(TextBlock {
            region: Region::new(0.5, 3.9, 9.0, 1.0),
            lines: vec![subtitle],
            font: style.font.name(),
            size_pt: 24,
            bold: false,
            color: style.text,
            align: TextAlign::Center,
            spacing_pt: 0,
        }),
        image: None,
    }
}

/// Compose one content slide from a section's raw text and optional image
/// bytes. Never mutates the section; hard-truncates instead of failing.
pub fn content_slide(
    section_title: &str,
    raw_content: &str,
    style: &StyleDescriptor,
    image: Option<Vec<u8>>,
) -> Slide {
    let align = style.image_align;
    let context = if align.is_side() {
        CleanContext::slide_side_by_side()
    } else {
        CleanContext::slide_stacked()
    };

    let lines = cleaner::clean(raw_content, section_title, context);
    // The placeholder is rendered but does not count as text for image
    // sizing, matching how an empty section should get the largest image.
    let line_count = lines.len();

    let placed_image = image.map(|data| {
        let region = if align.is_side() {
            layout::side_regions(align).0
        } else {
            layout::image_placement(line_count, align, SLIDE_HEIGHT)
        };
        let format = ImageFormat::sniff(&data);
        PlacedImage { region, data, format }
    });

    // With no image the text reclaims the full content area, even for a
    // side alignment.
    let content_region = match (&placed_image, align.is_side()) {
        (Some(_), true) => layout::side_regions(align).1,
        (Some(img), false) => layout::stacked_content_region(align, Some(&img.region)),
        (None, _) => layout::stacked_content_region(align, None),
    };

    let body_lines = if lines.is_empty() {
        vec![NO_CONTENT_PLACEHOLDER.to_string()]
    } else {
        lines
    };

    Slide {
        gradient: (style.primary, style.secondary),
        title: TextBlock {
            region: layout::title_region(),
            lines: vec![section_title.to_string()],
            font: style.font.name(),
            size_pt: 36,
            bold: true,
            color: style.text,
            align: TextAlign::Left,
            spacing_pt: 0,
        },
        body: Some(TextBlock {
            region: content_region,
            lines: body_lines,
            font: style.font.name(),
            size_pt: style.font_size_pt,
            bold: false,
            color: style.text,
            align: style.text_align,
            spacing_pt: 4,
        }),
        image: placed_image,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compose::style::StyleDescriptor;
    use crate::models::project::DocumentType;

    fn style() -> StyleDescriptor {
        StyleDescriptor::resolve(None, DocumentType::Pptx).unwrap()
    }

    #[test]
    fn empty_content_renders_placeholder() {
        let slide = content_slide("Intro", "", &style(), None);
        let body = slide.body.unwrap();
        assert_eq!(body.lines, vec![NO_CONTENT_PLACEHOLDER]);
        assert!(slide.image.is_none());
    }

    #[test]
    fn missing_image_still_composes() {
        let slide = content_slide("Intro", "- a point worth making", &style(), None);
        assert!(slide.image.is_none());
        assert_eq!(slide.body.unwrap().lines, vec!["a point worth making"]);
    }

    #[test]
    fn title_slide_falls_back_to_generic_subtitle() {
        let slide = title_slide("AI in Finance", "ai in finance", &style());
        assert_eq!(slide.body.unwrap().lines, vec!["A Comprehensive Overview"]);
    }

    #[test]
    fn text_without_image_reclaims_full_area() {
        let with = content_slide("Intro", "line of text", &style(), Some(vec![0x89]));
        let without = content_slide("Intro", "line of text", &style(), None);
        assert!(without.body.unwrap().region.top < with.body.unwrap().region.top);
    }

    #[test]
    fn stacked_image_and_text_do_not_overlap() {
        let slide = content_slide("Intro", "one line of text here", &style(), Some(vec![0x89]));
        let img = slide.image.unwrap();
        let body = slide.body.unwrap();
        assert!(body.region.top >= img.region.top + img.region.height);
    }
}
