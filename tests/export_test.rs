//! Export pipeline tests — compose render models from section text and
//! crack the resulting archives open to verify their structure.

use std::io::{Cursor, Read};

use draftdeck::compose::{assembler, pages, slides};
use draftdeck::compose::style::StyleDescriptor;
use draftdeck::models::project::{DocumentType, Project};
use draftdeck::models::section::Section;
use draftdeck::ooxml::{docx, pptx};
use draftdeck::providers::ImageProvider;
use draftdeck::themes::ThemeStore;

fn test_png() -> Vec<u8> {
    let img = image::RgbImage::from_pixel(4, 4, image::Rgb([120, 40, 200]));
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, image::ImageFormat::Png).expect("Failed to encode test PNG");
    out.into_inner()
}

fn archive_names(data: &[u8]) -> Vec<String> {
    let archive = zip::ZipArchive::new(Cursor::new(data)).expect("Artifact is not a zip");
    archive.file_names().map(str::to_string).collect()
}

fn read_part(data: &[u8], name: &str) -> String {
    let mut archive = zip::ZipArchive::new(Cursor::new(data)).expect("Artifact is not a zip");
    let mut part = archive.by_name(name).expect("Part missing");
    let mut xml = String::new();
    part.read_to_string(&mut xml).expect("Part is not UTF-8");
    xml
}

#[test]
fn test_pptx_has_one_slide_per_section_plus_title() {
    let style = StyleDescriptor::resolve(None, DocumentType::Pptx).expect("Style failed");
    let mut deck = pptx::Deck::default();
    deck.slides.push(slides::title_slide("AI in Finance", "fintech trends", &style));
    deck.slides.push(slides::content_slide("Overview", "- first point\n- second point", &style, Some(test_png())));
    deck.slides.push(slides::content_slide("Risks", "- a risk worth noting", &style, None));
    assert_eq!(deck.unit_count(), 3);

    let data = pptx::write(&deck).expect("Write failed");
    let names = archive_names(&data);

    let slide_count = names.iter().filter(|n| {
        n.starts_with("ppt/slides/slide") && n.ends_with(".xml")
    }).count();
    assert_eq!(slide_count, 3);
    assert!(names.iter().any(|n| n == "ppt/presentation.xml"));
    assert!(names.iter().any(|n| n == "ppt/theme/theme1.xml"));
    // Only the slide with an image carries a media part.
    let media_count = names.iter().filter(|n| n.starts_with("ppt/media/")).count();
    assert_eq!(media_count, 1);

    let content_types = read_part(&data, "[Content_Types].xml");
    assert_eq!(content_types.matches("presentationml.slide+xml").count(), 3);

    let presentation = read_part(&data, "ppt/presentation.xml");
    assert_eq!(presentation.matches("<p:sldId ").count(), 3);
}

#[test]
fn test_pptx_slide_renders_cleaned_text_and_gradient() {
    let style = StyleDescriptor::resolve(None, DocumentType::Pptx).expect("Style failed");
    let mut deck = pptx::Deck::default();
    deck.slides.push(slides::content_slide(
        "Overview",
        "**Point one is here**\n- Point two\nOverview\n",
        &style,
        None,
    ));

    let data = pptx::write(&deck).expect("Write failed");
    let slide = read_part(&data, "ppt/slides/slide1.xml");

    assert!(slide.contains("Point one is here"));
    assert!(slide.contains("Point two"));
    // The title echo line is dropped, so the title appears exactly once.
    assert_eq!(slide.matches("Overview").count(), 1);
    // Default pptx gradient stops.
    assert!(slide.contains("667EEA"));
    assert!(slide.contains("764BA2"));
    assert!(slide.contains("<a:gradFill"));
}

#[test]
fn test_pptx_escapes_user_text() {
    let style = StyleDescriptor::resolve(None, DocumentType::Pptx).expect("Style failed");
    let mut deck = pptx::Deck::default();
    deck.slides.push(slides::title_slide("R&D <Plan>", "topic", &style));

    let data = pptx::write(&deck).expect("Write failed");
    let slide = read_part(&data, "ppt/slides/slide1.xml");
    assert!(slide.contains("R&amp;D &lt;Plan&gt;"));
}

#[test]
fn test_docx_has_one_unit_per_section_plus_title() {
    let style = StyleDescriptor::resolve(None, DocumentType::Docx).expect("Style failed");
    let mut doc = docx::PageDoc::default();
    doc.units.push(pages::title_unit("Annual Report", &style));
    doc.units.push(pages::content_unit("Summary", "First paragraph of findings.", &style, Some(test_png())));
    doc.units.push(pages::content_unit("Details", "More detail here.", &style, None));
    assert_eq!(doc.unit_count(), 3);

    let data = docx::write(&doc).expect("Write failed");
    let names = archive_names(&data);
    assert!(names.iter().any(|n| n == "word/document.xml"));
    assert!(names.iter().any(|n| n == "word/styles.xml"));
    assert_eq!(names.iter().filter(|n| n.starts_with("word/media/")).count(), 1);

    let document = read_part(&data, "word/document.xml");
    // Title banner fill is the default docx primary.
    assert!(document.contains("w:fill=\"0078D4\""));
    assert!(document.contains("Annual Report"));
    assert!(document.contains("First paragraph of findings."));
    assert_eq!(document.matches("<w:drawing>").count(), 1);
}

#[test]
fn test_docx_side_alignment_emits_table() {
    let meta = r#"{"textStyle":{"imageAlignment":"left"}}"#;
    let style = StyleDescriptor::resolve(Some(meta), DocumentType::Docx).expect("Style failed");
    let mut doc = docx::PageDoc::default();
    doc.units.push(pages::title_unit("Report", &style));
    doc.units.push(pages::content_unit("Summary", "- one point", &style, Some(test_png())));

    let data = docx::write(&doc).expect("Write failed");
    let document = read_part(&data, "word/document.xml");
    assert_eq!(document.matches("<w:tbl>").count(), 1);
    // Image cell first for left alignment: the drawing precedes the text.
    let drawing_pos = document.find("<w:drawing>").expect("No drawing");
    let text_pos = document.find("one point").expect("No text");
    assert!(drawing_pos < text_pos);
}

#[actix_rt::test]
async fn test_assemble_with_unknown_theme_uses_default_palette() {
    let dir = tempfile::TempDir::new().expect("Failed to create temp dir");
    let themes = ThemeStore::open(dir.path()).expect("Failed to open theme store");
    let images = ImageProvider::from_env();

    let project = Project {
        id: 1,
        user_id: 1,
        title: "AI in Finance".to_string(),
        document_type: "pptx".to_string(),
        main_topic: "fintech trends".to_string(),
        metadata_json: Some(r#"{"theme":{"id":"no_such_theme"}}"#.to_string()),
        created_at: String::new(),
        updated_at: String::new(),
    };
    let sections = vec![Section {
        id: 10,
        project_id: 1,
        title: "Overview".to_string(),
        description: String::new(),
        content: "- first point\n- second point".to_string(),
        ord: 1,
        created_at: String::new(),
        updated_at: String::new(),
    }];

    // An unresolvable theme id degrades to the default palette; it must
    // not abort the export.
    let data = assembler::assemble(&project, &sections, &themes, &images)
        .await
        .expect("Assemble failed");

    let names = archive_names(&data);
    let slide_count = names.iter().filter(|n| {
        n.starts_with("ppt/slides/slide") && n.ends_with(".xml")
    }).count();
    assert_eq!(slide_count, sections.len() + 1);

    let slide = read_part(&data, "ppt/slides/slide1.xml");
    assert!(slide.contains("667EEA"));
    assert!(slide.contains("764BA2"));
}

#[test]
fn test_docx_document_xml_is_well_formed() {
    let style = StyleDescriptor::resolve(None, DocumentType::Docx).expect("Style failed");
    let mut doc = docx::PageDoc::default();
    doc.units.push(pages::title_unit("R&D <Plan>", &style));
    doc.units.push(pages::content_unit("Costs", "5 < 10 & rising", &style, None));

    let data = docx::write(&doc).expect("Write failed");
    let document = read_part(&data, "word/document.xml");

    let mut reader = quick_xml::Reader::from_str(&document);
    loop {
        match reader.read_event() {
            Ok(quick_xml::events::Event::Eof) => break,
            Ok(_) => {}
            Err(e) => panic!("document.xml is not well-formed: {e}"),
        }
    }
    assert!(document.contains("5 &lt; 10 &amp; rising"));
}
