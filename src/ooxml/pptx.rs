//! PresentationML serialization: turns a composed `Deck` into .pptx bytes.
//!
//! The package carries the minimum part set PowerPoint accepts: content
//! types, package rels, presentation + rels, one theme/master/layout
//! chain, and one slide part (plus optional media) per rendered unit.

use super::{ImageFormat, Package, XML_DECL, xml_escape};
use crate::compose::layout::{Region, SLIDE_HEIGHT, SLIDE_WIDTH};
use crate::compose::style::{Rgb, TextAlign};
use crate::errors::AppError;

/// One styled text box.
#[derive(Debug, Clone)]
pub struct TextBlock {
    pub region: Region,
    pub lines: Vec<String>,
    pub font: &'static str,
    pub size_pt: u32,
    pub bold: bool,
    pub color: Rgb,
    pub align: TextAlign,
    /// Space before/after each paragraph, in points.
    pub spacing_pt: u32,
}

#[derive(Debug, Clone)]
pub struct PlacedImage {
    pub region: Region,
    pub data: Vec<u8>,
    pub format: ImageFormat,
}

/// One rendered slide: gradient background, title, optional body text and
/// optional image.
#[derive(Debug, Clone)]
pub struct Slide {
    pub gradient: (Rgb, Rgb),
    pub title: TextBlock,
    pub body: Option<TextBlock>,
    pub image: Option<PlacedImage>,
}

/// The full render model. `slides[0]` is the title slide.
#[derive(Debug, Clone, Default)]
pub struct Deck {
    pub slides: Vec<Slide>,
}

impl Deck {
    pub fn unit_count(&self) -> usize {
        self.slides.len()
    }
}

/// Serialize the deck into a complete .pptx archive.
pub fn write(deck: &Deck) -> Result<Vec<u8>, AppError> {
    let mut pkg = Package::new();

    pkg.add_part("[Content_Types].xml", content_types(deck).as_bytes())?;
    pkg.add_part("_rels/.rels", PACKAGE_RELS.as_bytes())?;
    pkg.add_part("ppt/presentation.xml", presentation(deck).as_bytes())?;
    pkg.add_part("ppt/_rels/presentation.xml.rels", presentation_rels(deck).as_bytes())?;
    pkg.add_part("ppt/theme/theme1.xml", THEME.as_bytes())?;
    pkg.add_part("ppt/slideMasters/slideMaster1.xml", SLIDE_MASTER.as_bytes())?;
    pkg.add_part("ppt/slideMasters/_rels/slideMaster1.xml.rels", SLIDE_MASTER_RELS.as_bytes())?;
    pkg.add_part("ppt/slideLayouts/slideLayout1.xml", SLIDE_LAYOUT.as_bytes())?;
    pkg.add_part("ppt/slideLayouts/_rels/slideLayout1.xml.rels", SLIDE_LAYOUT_RELS.as_bytes())?;

    for (i, slide) in deck.slides.iter().enumerate() {
        let n = i + 1;
        pkg.add_part(&format!("ppt/slides/slide{n}.xml"), slide_xml(slide).as_bytes())?;
        pkg.add_part(
            &format!("ppt/slides/_rels/slide{n}.xml.rels"),
            slide_rels(slide, n).as_bytes(),
        )?;
        if let Some(img) = &slide.image {
            pkg.add_part(
                &format!("ppt/media/image{n}.{}", img.format.extension()),
                &img.data,
            )?;
        }
    }

    pkg.finish()
}

fn content_types(deck: &Deck) -> String {
    let mut xml = String::from(XML_DECL);
    xml.push_str(
        "<Types xmlns=\"http://schemas.openxmlformats.org/package/2006/content-types\">\
         <Default Extension=\"rels\" ContentType=\"application/vnd.openxmlformats-package.relationships+xml\"/>\
         <Default Extension=\"xml\" ContentType=\"application/xml\"/>\
         <Default Extension=\"png\" ContentType=\"image/png\"/>\
         <Default Extension=\"jpeg\" ContentType=\"image/jpeg\"/>\
         <Override PartName=\"/ppt/presentation.xml\" ContentType=\"application/vnd.openxmlformats-officedocument.presentationml.presentation.main+xml\"/>\
         <Override PartName=\"/ppt/theme/theme1.xml\" ContentType=\"application/vnd.openxmlformats-officedocument.theme+xml\"/>\
         <Override PartName=\"/ppt/slideMasters/slideMaster1.xml\" ContentType=\"application/vnd.openxmlformats-officedocument.presentationml.slideMaster+xml\"/>\
         <Override PartName=\"/ppt/slideLayouts/slideLayout1.xml\" ContentType=\"application/vnd.openxmlformats-officedocument.presentationml.slideLayout+xml\"/>",
    );
    for i in 1..=deck.slides.len() {
        xml.push_str(&format!(
            "<Override PartName=\"/ppt/slides/slide{i}.xml\" \
             ContentType=\"application/vnd.openxmlformats-officedocument.presentationml.slide+xml\"/>"
        ));
    }
    xml.push_str("</Types>");
    xml
}

const PACKAGE_RELS: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\r\n\
<Relationships xmlns=\"http://schemas.openxmlformats.org/package/2006/relationships\">\
<Relationship Id=\"rId1\" Type=\"http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument\" Target=\"ppt/presentation.xml\"/>\
</Relationships>";

fn presentation(deck: &Deck) -> String {
    let mut slide_ids = String::new();
    for i in 0..deck.slides.len() {
        // Slide ids start at 256 by convention; rId1 is the master.
        slide_ids.push_str(&format!(
            "<p:sldId id=\"{}\" r:id=\"rId{}\"/>",
            256 + i,
            i + 2
        ));
    }
    format!(
        "{XML_DECL}<p:presentation xmlns:a=\"http://schemas.openxmlformats.org/drawingml/2006/main\" \
         xmlns:r=\"http://schemas.openxmlformats.org/officeDocument/2006/relationships\" \
         xmlns:p=\"http://schemas.openxmlformats.org/presentationml/2006/main\">\
         <p:sldMasterIdLst><p:sldMasterId id=\"2147483648\" r:id=\"rId1\"/></p:sldMasterIdLst>\
         <p:sldIdLst>{slide_ids}</p:sldIdLst>\
         <p:sldSz cx=\"{SLIDE_WIDTH}\" cy=\"{SLIDE_HEIGHT}\"/>\
         <p:notesSz cx=\"{SLIDE_HEIGHT}\" cy=\"{SLIDE_WIDTH}\"/>\
         </p:presentation>"
    )
}

fn presentation_rels(deck: &Deck) -> String {
    let mut xml = format!(
        "{XML_DECL}<Relationships xmlns=\"http://schemas.openxmlformats.org/package/2006/relationships\">\
         <Relationship Id=\"rId1\" Type=\"http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideMaster\" Target=\"slideMasters/slideMaster1.xml\"/>"
    );
    for i in 0..deck.slides.len() {
        xml.push_str(&format!(
            "<Relationship Id=\"rId{}\" Type=\"http://schemas.openxmlformats.org/officeDocument/2006/relationships/slide\" Target=\"slides/slide{}.xml\"/>",
            i + 2,
            i + 1
        ));
    }
    xml.push_str("</Relationships>");
    xml
}

fn slide_rels(slide: &Slide, n: usize) -> String {
    let mut xml = format!(
        "{XML_DECL}<Relationships xmlns=\"http://schemas.openxmlformats.org/package/2006/relationships\">\
         <Relationship Id=\"rId1\" Type=\"http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideLayout\" Target=\"../slideLayouts/slideLayout1.xml\"/>"
    );
    if let Some(img) = &slide.image {
        xml.push_str(&format!(
            "<Relationship Id=\"rId2\" Type=\"http://schemas.openxmlformats.org/officeDocument/2006/relationships/image\" Target=\"../media/image{}.{}\"/>",
            n,
            img.format.extension()
        ));
    }
    xml.push_str("</Relationships>");
    xml
}

fn slide_xml(slide: &Slide) -> String {
    let mut shapes = String::new();
    let mut shape_id = 2;

    shapes.push_str(&text_box(&slide.title, shape_id, "Title"));
    shape_id += 1;

    if let Some(body) = &slide.body {
        shapes.push_str(&text_box(body, shape_id, "Content"));
        shape_id += 1;
    }

    if let Some(img) = &slide.image {
        shapes.push_str(&picture(img, shape_id));
    }

    let (g0, g1) = slide.gradient;
    format!(
        "{XML_DECL}<p:sld xmlns:a=\"http://schemas.openxmlformats.org/drawingml/2006/main\" \
         xmlns:r=\"http://schemas.openxmlformats.org/officeDocument/2006/relationships\" \
         xmlns:p=\"http://schemas.openxmlformats.org/presentationml/2006/main\">\
         <p:cSld>\
         <p:bg><p:bgPr><a:gradFill rotWithShape=\"1\"><a:gsLst>\
         <a:gs pos=\"0\"><a:srgbClr val=\"{}\"/></a:gs>\
         <a:gs pos=\"100000\"><a:srgbClr val=\"{}\"/></a:gs>\
         </a:gsLst><a:lin ang=\"2700000\" scaled=\"1\"/></a:gradFill><a:effectLst/></p:bgPr></p:bg>\
         <p:spTree>\
         <p:nvGrpSpPr><p:cNvPr id=\"1\" name=\"\"/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr>\
         <p:grpSpPr/>\
         {shapes}\
         </p:spTree></p:cSld>\
         <p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr>\
         </p:sld>",
        g0.to_hex(),
        g1.to_hex()
    )
}

fn text_box(block: &TextBlock, id: u32, name: &str) -> String {
    let mut paragraphs = String::new();
    let spacing = block.spacing_pt * 100;
    let bold = if block.bold { " b=\"1\"" } else { "" };

    for line in &block.lines {
        paragraphs.push_str(&format!(
            "<a:p><a:pPr algn=\"{algn}\">\
             <a:spcBef><a:spcPts val=\"{spacing}\"/></a:spcBef>\
             <a:spcAft><a:spcPts val=\"{spacing}\"/></a:spcAft>\
             </a:pPr>\
             <a:r><a:rPr lang=\"en-US\" sz=\"{sz}\"{bold} dirty=\"0\">\
             <a:solidFill><a:srgbClr val=\"{color}\"/></a:solidFill>\
             <a:latin typeface=\"{font}\"/>\
             </a:rPr><a:t>{text}</a:t></a:r></a:p>",
            algn = block.align.pptx_attr(),
            sz = block.size_pt * 100,
            color = block.color.to_hex(),
            font = block.font,
            text = xml_escape(line),
        ));
    }
    if block.lines.is_empty() {
        paragraphs.push_str("<a:p><a:endParaRPr lang=\"en-US\"/></a:p>");
    }

    let r = block.region;
    format!(
        "<p:sp><p:nvSpPr><p:cNvPr id=\"{id}\" name=\"{name}\"/>\
         <p:cNvSpPr txBox=\"1\"/><p:nvPr/></p:nvSpPr>\
         <p:spPr><a:xfrm><a:off x=\"{}\" y=\"{}\"/><a:ext cx=\"{}\" cy=\"{}\"/></a:xfrm>\
         <a:prstGeom prst=\"rect\"><a:avLst/></a:prstGeom></p:spPr>\
         <p:txBody><a:bodyPr wrap=\"square\"><a:normAutofit/></a:bodyPr><a:lstStyle/>{paragraphs}</p:txBody>\
         </p:sp>",
        r.left, r.top, r.width, r.height
    )
}

fn picture(img: &PlacedImage, id: u32) -> String {
    let r = img.region;
    format!(
        "<p:pic><p:nvPicPr><p:cNvPr id=\"{id}\" name=\"Picture {id}\"/>\
         <p:cNvPicPr/><p:nvPr/></p:nvPicPr>\
         <p:blipFill><a:blip r:embed=\"rId2\"/><a:stretch><a:fillRect/></a:stretch></p:blipFill>\
         <p:spPr><a:xfrm><a:off x=\"{}\" y=\"{}\"/><a:ext cx=\"{}\" cy=\"{}\"/></a:xfrm>\
         <a:prstGeom prst=\"rect\"><a:avLst/></a:prstGeom></p:spPr>\
         </p:pic>",
        r.left, r.top, r.width, r.height
    )
}

const SLIDE_MASTER: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\r\n\
<p:sldMaster xmlns:a=\"http://schemas.openxmlformats.org/drawingml/2006/main\" \
xmlns:r=\"http://schemas.openxmlformats.org/officeDocument/2006/relationships\" \
xmlns:p=\"http://schemas.openxmlformats.org/presentationml/2006/main\">\
<p:cSld><p:spTree>\
<p:nvGrpSpPr><p:cNvPr id=\"1\" name=\"\"/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr>\
<p:grpSpPr/>\
</p:spTree></p:cSld>\
<p:clrMap bg1=\"lt1\" tx1=\"dk1\" bg2=\"lt2\" tx2=\"dk2\" accent1=\"accent1\" accent2=\"accent2\" \
accent3=\"accent3\" accent4=\"accent4\" accent5=\"accent5\" accent6=\"accent6\" hlink=\"hlink\" folHlink=\"folHlink\"/>\
<p:sldLayoutIdLst><p:sldLayoutId id=\"2147483649\" r:id=\"rId1\"/></p:sldLayoutIdLst>\
</p:sldMaster>";

const SLIDE_MASTER_RELS: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\r\n\
<Relationships xmlns=\"http://schemas.openxmlformats.org/package/2006/relationships\">\
<Relationship Id=\"rId1\" Type=\"http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideLayout\" Target=\"../slideLayouts/slideLayout1.xml\"/>\
<Relationship Id=\"rId2\" Type=\"http://schemas.openxmlformats.org/officeDocument/2006/relationships/theme\" Target=\"../theme/theme1.xml\"/>\
</Relationships>";

const SLIDE_LAYOUT: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\r\n\
<p:sldLayout xmlns:a=\"http://schemas.openxmlformats.org/drawingml/2006/main\" \
xmlns:r=\"http://schemas.openxmlformats.org/officeDocument/2006/relationships\" \
xmlns:p=\"http://schemas.openxmlformats.org/presentationml/2006/main\" type=\"blank\">\
<p:cSld><p:spTree>\
<p:nvGrpSpPr><p:cNvPr id=\"1\" name=\"\"/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr>\
<p:grpSpPr/>\
</p:spTree></p:cSld>\
<p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr>\
</p:sldLayout>";

const SLIDE_LAYOUT_RELS: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\r\n\
<Relationships xmlns=\"http://schemas.openxmlformats.org/package/2006/relationships\">\
<Relationship Id=\"rId1\" Type=\"http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideMaster\" Target=\"../slideMasters/slideMaster1.xml\"/>\
</Relationships>";

/// A plain Office theme; exported decks style everything at the run level,
/// so the scheme colors only matter to editors that re-theme the file.
const THEME: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\r\n\
<a:theme xmlns:a=\"http://schemas.openxmlformats.org/drawingml/2006/main\" name=\"Office\">\
<a:themeElements>\
<a:clrScheme name=\"Office\">\
<a:dk1><a:sysClr val=\"windowText\" lastClr=\"000000\"/></a:dk1>\
<a:lt1><a:sysClr val=\"window\" lastClr=\"FFFFFF\"/></a:lt1>\
<a:dk2><a:srgbClr val=\"44546A\"/></a:dk2>\
<a:lt2><a:srgbClr val=\"E7E6E6\"/></a:lt2>\
<a:accent1><a:srgbClr val=\"4472C4\"/></a:accent1>\
<a:accent2><a:srgbClr val=\"ED7D31\"/></a:accent2>\
<a:accent3><a:srgbClr val=\"A5A5A5\"/></a:accent3>\
<a:accent4><a:srgbClr val=\"FFC000\"/></a:accent4>\
<a:accent5><a:srgbClr val=\"5B9BD5\"/></a:accent5>\
<a:accent6><a:srgbClr val=\"70AD47\"/></a:accent6>\
<a:hlink><a:srgbClr val=\"0563C1\"/></a:hlink>\
<a:folHlink><a:srgbClr val=\"954F72\"/></a:folHlink>\
</a:clrScheme>\
<a:fontScheme name=\"Office\">\
<a:majorFont><a:latin typeface=\"Calibri Light\"/><a:ea typeface=\"\"/><a:cs typeface=\"\"/></a:majorFont>\
<a:minorFont><a:latin typeface=\"Calibri\"/><a:ea typeface=\"\"/><a:cs typeface=\"\"/></a:minorFont>\
</a:fontScheme>\
<a:fmtScheme name=\"Office\">\
<a:fillStyleLst>\
<a:solidFill><a:schemeClr val=\"phClr\"/></a:solidFill>\
<a:solidFill><a:schemeClr val=\"phClr\"/></a:solidFill>\
<a:solidFill><a:schemeClr val=\"phClr\"/></a:solidFill>\
</a:fillStyleLst>\
<a:lnStyleLst>\
<a:ln w=\"6350\"><a:solidFill><a:schemeClr val=\"phClr\"/></a:solidFill></a:ln>\
<a:ln w=\"12700\"><a:solidFill><a:schemeClr val=\"phClr\"/></a:solidFill></a:ln>\
<a:ln w=\"19050\"><a:solidFill><a:schemeClr val=\"phClr\"/></a:solidFill></a:ln>\
</a:lnStyleLst>\
<a:effectStyleLst>\
<a:effectStyle><a:effectLst/></a:effectStyle>\
<a:effectStyle><a:effectLst/></a:effectStyle>\
<a:effectStyle><a:effectLst/></a:effectStyle>\
</a:effectStyleLst>\
<a:bgFillStyleLst>\
<a:solidFill><a:schemeClr val=\"phClr\"/></a:solidFill>\
<a:solidFill><a:schemeClr val=\"phClr\"/></a:solidFill>\
<a:solidFill><a:schemeClr val=\"phClr\"/></a:solidFill>\
</a:bgFillStyleLst>\
</a:fmtScheme>\
</a:themeElements>\
</a:theme>";
