//! WordprocessingML serialization: turns composed page units into .docx
//! bytes.
//!
//! The render model is a flat list of units (title banner first, then one
//! unit per section); each unit is a list of blocks. Measurements:
//! run sizes are half-points (`w:sz`), paragraph spacing twentieths of a
//! point, table cell widths dxa, image extents EMU.

use super::{ImageFormat, Package, XML_DECL, xml_escape};
use crate::compose::style::{Rgb, TextAlign};
use crate::errors::AppError;

#[derive(Debug, Clone)]
pub struct DocImage {
    pub data: Vec<u8>,
    pub format: ImageFormat,
    /// Extent in EMU.
    pub width: i64,
    pub height: i64,
}

#[derive(Debug, Clone)]
pub enum DocBlock {
    /// Colored-background paragraph (document title, section headings).
    Banner {
        text: String,
        fill: Rgb,
        color: Rgb,
        font: &'static str,
        size_pt: u32,
        centered: bool,
    },
    /// Horizontal rule drawn as a run of underscores.
    Separator { color: Rgb },
    Paragraph {
        text: String,
        align: TextAlign,
        font: &'static str,
        size_pt: u32,
    },
    /// Centered inline image.
    Image(DocImage),
    /// Two-cell table: image in one cell, text lines in the other.
    SideBySide {
        image: DocImage,
        lines: Vec<String>,
        image_left: bool,
        align: TextAlign,
        font: &'static str,
        size_pt: u32,
    },
    /// Empty paragraph between sections.
    Spacer,
}

/// One rendered unit: the title banner block group, or one section.
#[derive(Debug, Clone, Default)]
pub struct PageUnit {
    pub blocks: Vec<DocBlock>,
}

#[derive(Debug, Clone, Default)]
pub struct PageDoc {
    pub units: Vec<PageUnit>,
}

impl PageDoc {
    pub fn unit_count(&self) -> usize {
        self.units.len()
    }

    fn images(&self) -> Vec<&DocImage> {
        let mut out = Vec::new();
        for unit in &self.units {
            for block in &unit.blocks {
                match block {
                    DocBlock::Image(img) | DocBlock::SideBySide { image: img, .. } => {
                        out.push(img)
                    }
                    _ => {}
                }
            }
        }
        out
    }
}

/// Serialize the document into a complete .docx archive.
pub fn write(doc: &PageDoc) -> Result<Vec<u8>, AppError> {
    let mut pkg = Package::new();

    pkg.add_part("[Content_Types].xml", CONTENT_TYPES.as_bytes())?;
    pkg.add_part("_rels/.rels", PACKAGE_RELS.as_bytes())?;
    pkg.add_part("word/styles.xml", STYLES.as_bytes())?;
    pkg.add_part("word/document.xml", document_xml(doc).as_bytes())?;
    pkg.add_part("word/_rels/document.xml.rels", document_rels(doc).as_bytes())?;

    for (i, img) in doc.images().iter().enumerate() {
        pkg.add_part(
            &format!("word/media/image{}.{}", i + 1, img.format.extension()),
            &img.data,
        )?;
    }

    pkg.finish()
}

fn document_xml(doc: &PageDoc) -> String {
    let mut body = String::new();
    // Image rel ids follow the styles rel (rId1), in document order.
    let mut next_image = 0usize;

    for unit in &doc.units {
        for block in &unit.blocks {
            match block {
                DocBlock::Banner { text, fill, color, font, size_pt, centered } => {
                    let jc = if *centered { "center" } else { "left" };
                    body.push_str(&format!(
                        "<w:p><w:pPr><w:jc w:val=\"{jc}\"/>\
                         <w:shd w:val=\"clear\" w:color=\"auto\" w:fill=\"{}\"/>\
                         <w:spacing w:before=\"240\" w:after=\"240\"/></w:pPr>\
                         <w:r><w:rPr><w:rFonts w:ascii=\"{font}\" w:hAnsi=\"{font}\"/>\
                         <w:b/><w:color w:val=\"{}\"/><w:sz w:val=\"{}\"/></w:rPr>\
                         <w:t xml:space=\"preserve\">{}</w:t></w:r></w:p>",
                        fill.to_hex(),
                        color.to_hex(),
                        size_pt * 2,
                        xml_escape(text),
                    ));
                }
                DocBlock::Separator { color } => {
                    body.push_str(&format!(
                        "<w:p><w:pPr><w:jc w:val=\"center\"/></w:pPr>\
                         <w:r><w:rPr><w:color w:val=\"{}\"/></w:rPr>\
                         <w:t xml:space=\"preserve\">{}</w:t></w:r></w:p>",
                        color.to_hex(),
                        "_".repeat(80),
                    ));
                }
                DocBlock::Paragraph { text, align, font, size_pt } => {
                    body.push_str(&paragraph(text, *align, font, *size_pt));
                }
                DocBlock::Image(img) => {
                    next_image += 1;
                    body.push_str(&format!(
                        "<w:p><w:pPr><w:jc w:val=\"center\"/></w:pPr><w:r>{}</w:r></w:p>",
                        drawing(img, next_image),
                    ));
                }
                DocBlock::SideBySide { image, lines, image_left, align, font, size_pt } => {
                    next_image += 1;
                    body.push_str(&side_by_side(
                        image, next_image, lines, *image_left, *align, font, *size_pt,
                    ));
                }
                DocBlock::Spacer => body.push_str("<w:p/>"),
            }
        }
    }

    format!(
        "{XML_DECL}<w:document \
         xmlns:w=\"http://schemas.openxmlformats.org/wordprocessingml/2006/main\" \
         xmlns:r=\"http://schemas.openxmlformats.org/officeDocument/2006/relationships\" \
         xmlns:wp=\"http://schemas.openxmlformats.org/drawingml/2006/wordprocessingDrawing\" \
         xmlns:a=\"http://schemas.openxmlformats.org/drawingml/2006/main\" \
         xmlns:pic=\"http://schemas.openxmlformats.org/drawingml/2006/picture\">\
         <w:body>{body}\
         <w:sectPr><w:pgSz w:w=\"12240\" w:h=\"15840\"/>\
         <w:pgMar w:top=\"1440\" w:right=\"1440\" w:bottom=\"1440\" w:left=\"1440\"/></w:sectPr>\
         </w:body></w:document>"
    )
}

fn paragraph(text: &str, align: TextAlign, font: &str, size_pt: u32) -> String {
    format!(
        "<w:p><w:pPr><w:jc w:val=\"{}\"/></w:pPr>\
         <w:r><w:rPr><w:rFonts w:ascii=\"{font}\" w:hAnsi=\"{font}\"/>\
         <w:sz w:val=\"{}\"/></w:rPr>\
         <w:t xml:space=\"preserve\">{}</w:t></w:r></w:p>",
        align.docx_attr(),
        size_pt * 2,
        xml_escape(text),
    )
}

/// Inline picture run content for image number `n` (rel id = rId{n+1}).
fn drawing(img: &DocImage, n: usize) -> String {
    let rid = n + 1;
    format!(
        "<w:drawing><wp:inline distT=\"0\" distB=\"0\" distL=\"0\" distR=\"0\">\
         <wp:extent cx=\"{cx}\" cy=\"{cy}\"/>\
         <wp:docPr id=\"{n}\" name=\"Picture {n}\"/>\
         <a:graphic><a:graphicData uri=\"http://schemas.openxmlformats.org/drawingml/2006/picture\">\
         <pic:pic>\
         <pic:nvPicPr><pic:cNvPr id=\"{n}\" name=\"Picture {n}\"/><pic:cNvPicPr/></pic:nvPicPr>\
         <pic:blipFill><a:blip r:embed=\"rId{rid}\"/><a:stretch><a:fillRect/></a:stretch></pic:blipFill>\
         <pic:spPr><a:xfrm><a:off x=\"0\" y=\"0\"/><a:ext cx=\"{cx}\" cy=\"{cy}\"/></a:xfrm>\
         <a:prstGeom prst=\"rect\"><a:avLst/></a:prstGeom></pic:spPr>\
         </pic:pic></a:graphicData></a:graphic></wp:inline></w:drawing>",
        cx = img.width,
        cy = img.height,
    )
}

fn side_by_side(
    img: &DocImage,
    n: usize,
    lines: &[String],
    image_left: bool,
    align: TextAlign,
    font: &str,
    size_pt: u32,
) -> String {
    // 3in image cell, 4in text cell, in dxa.
    const IMG_W: i64 = 4320;
    const TXT_W: i64 = 5760;

    let image_cell = format!(
        "<w:tc><w:tcPr><w:tcW w:w=\"{IMG_W}\" w:type=\"dxa\"/></w:tcPr>\
         <w:p><w:r>{}</w:r></w:p></w:tc>",
        drawing(img, n),
    );

    let mut text_paras = String::new();
    for line in lines {
        text_paras.push_str(&paragraph(line, align, font, size_pt));
    }
    if lines.is_empty() {
        text_paras.push_str("<w:p/>");
    }
    let text_cell =
        format!("<w:tc><w:tcPr><w:tcW w:w=\"{TXT_W}\" w:type=\"dxa\"/></w:tcPr>{text_paras}</w:tc>");

    let (first, second, first_w, second_w) = if image_left {
        (image_cell, text_cell, IMG_W, TXT_W)
    } else {
        (text_cell, image_cell, TXT_W, IMG_W)
    };

    format!(
        "<w:tbl><w:tblPr><w:tblW w:w=\"0\" w:type=\"auto\"/><w:tblLayout w:type=\"fixed\"/></w:tblPr>\
         <w:tblGrid><w:gridCol w:w=\"{first_w}\"/><w:gridCol w:w=\"{second_w}\"/></w:tblGrid>\
         <w:tr>{first}{second}</w:tr></w:tbl>"
    )
}

fn document_rels(doc: &PageDoc) -> String {
    let mut xml = format!(
        "{XML_DECL}<Relationships xmlns=\"http://schemas.openxmlformats.org/package/2006/relationships\">\
         <Relationship Id=\"rId1\" Type=\"http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles\" Target=\"styles.xml\"/>"
    );
    for (i, img) in doc.images().iter().enumerate() {
        xml.push_str(&format!(
            "<Relationship Id=\"rId{}\" Type=\"http://schemas.openxmlformats.org/officeDocument/2006/relationships/image\" Target=\"media/image{}.{}\"/>",
            i + 2,
            i + 1,
            img.format.extension()
        ));
    }
    xml.push_str("</Relationships>");
    xml
}

const CONTENT_TYPES: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\r\n\
<Types xmlns=\"http://schemas.openxmlformats.org/package/2006/content-types\">\
<Default Extension=\"rels\" ContentType=\"application/vnd.openxmlformats-package.relationships+xml\"/>\
<Default Extension=\"xml\" ContentType=\"application/xml\"/>\
<Default Extension=\"png\" ContentType=\"image/png\"/>\
<Default Extension=\"jpeg\" ContentType=\"image/jpeg\"/>\
<Override PartName=\"/word/document.xml\" ContentType=\"application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml\"/>\
<Override PartName=\"/word/styles.xml\" ContentType=\"application/vnd.openxmlformats-officedocument.wordprocessingml.styles+xml\"/>\
</Types>";

const PACKAGE_RELS: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\r\n\
<Relationships xmlns=\"http://schemas.openxmlformats.org/package/2006/relationships\">\
<Relationship Id=\"rId1\" Type=\"http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument\" Target=\"word/document.xml\"/>\
</Relationships>";

const STYLES: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\r\n\
<w:styles xmlns:w=\"http://schemas.openxmlformats.org/wordprocessingml/2006/main\">\
<w:docDefaults><w:rPrDefault><w:rPr>\
<w:rFonts w:ascii=\"Calibri\" w:hAnsi=\"Calibri\"/><w:sz w:val=\"24\"/>\
</w:rPr></w:rPrDefault></w:docDefaults>\
<w:style w:type=\"paragraph\" w:default=\"1\" w:styleId=\"Normal\">\
<w:name w:val=\"Normal\"/><w:qFormat/>\
</w:style>\
</w:styles>";
