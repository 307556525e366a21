//! In-memory fixture packages and recording translators.

#![allow(dead_code)]

use doctrans_core::{Error, Result, TextTranslator};
use doctrans_ooxml::Package;

const REL: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
const A_NS: &str = "http://schemas.openxmlformats.org/drawingml/2006/main";
const P_NS: &str = "http://schemas.openxmlformats.org/presentationml/2006/main";
const R_NS: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
const W_NS: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";

/// Translation function that records every call.
pub struct Recorder {
    pub calls: Vec<String>,
    respond: fn(&str) -> Result<String>,
}

impl Recorder {
    pub fn new(respond: fn(&str) -> Result<String>) -> Self {
        Self {
            calls: Vec::new(),
            respond,
        }
    }
}

impl TextTranslator for Recorder {
    fn translate(&mut self, text: &str, _target_language: &str) -> Result<String> {
        self.calls.push(text.to_string());
        (self.respond)(text)
    }
}

pub fn upper(text: &str) -> Result<String> {
    Ok(text.to_uppercase())
}

pub fn append_marker(text: &str) -> Result<String> {
    Ok(format!("{}_X", text))
}

pub fn offline(_: &str) -> Result<String> {
    Err(Error::Translation("connection refused".to_string()))
}

// Presentation fixtures

pub fn sp(text: &str) -> String {
    format!(
        r#"<p:sp><p:nvSpPr><p:cNvPr id="2" name="TextBox"/><p:cNvSpPr txBox="1"/><p:nvPr/></p:nvSpPr><p:spPr/><p:txBody><a:bodyPr wrap="square"/><a:lstStyle/><a:p><a:pPr algn="l"/><a:r><a:rPr lang="en-US" sz="2400"/><a:t>{}</a:t></a:r></a:p></p:txBody></p:sp>"#,
        text
    )
}

pub fn group(shapes: &[String]) -> String {
    format!(
        r#"<p:grpSp><p:nvGrpSpPr><p:cNvPr id="10" name="Group"/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr><p:grpSpPr/>{}</p:grpSp>"#,
        shapes.concat()
    )
}

pub fn pic() -> String {
    r#"<p:pic><p:nvPicPr><p:cNvPr id="5" name="Picture"/><p:cNvPicPr/><p:nvPr/></p:nvPicPr><p:blipFill/><p:spPr/></p:pic>"#.to_string()
}

pub fn table(rows: &[&[&str]]) -> String {
    let rows: String = rows
        .iter()
        .map(|cells| {
            let cells: String = cells
                .iter()
                .map(|text| {
                    format!(
                        r#"<a:tc><a:txBody><a:bodyPr/><a:lstStyle/><a:p><a:r><a:rPr lang="en-US"/><a:t>{}</a:t></a:r></a:p></a:txBody><a:tcPr/></a:tc>"#,
                        text
                    )
                })
                .collect();
            format!(r#"<a:tr h="370840">{}</a:tr>"#, cells)
        })
        .collect();
    format!(
        r#"<p:graphicFrame><p:nvGraphicFramePr><p:cNvPr id="4" name="Table"/><p:cNvGraphicFramePr/><p:nvPr/></p:nvGraphicFramePr><p:xfrm/><a:graphic><a:graphicData uri="http://schemas.openxmlformats.org/drawingml/2006/table"><a:tbl><a:tblPr/><a:tblGrid/>{}</a:tbl></a:graphicData></a:graphic></p:graphicFrame>"#,
        rows
    )
}

fn slide_part(root: &str, shapes: &str) -> Vec<u8> {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<p:{root} xmlns:a="{A_NS}" xmlns:p="{P_NS}" xmlns:r="{R_NS}"><p:cSld><p:spTree><p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr><p:grpSpPr/>{shapes}</p:spTree></p:cSld></p:{root}>"#
    )
    .into_bytes()
}

/// A presentation with one slide per entry of `slides` (the shapes XML of
/// each slide) and, where given, a notes page for that slide.
pub fn pptx_with_notes(slides: &[String], notes: &[Option<String>]) -> Vec<u8> {
    let mut pkg = Package::new();
    pkg.set_part(
        "[Content_Types].xml",
        br#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="xml" ContentType="application/xml"/></Types>"#
            .to_vec(),
    );
    pkg.set_part(
        "_rels/.rels",
        format!(
            r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="{REL}/officeDocument" Target="ppt/presentation.xml"/></Relationships>"#
        )
        .into_bytes(),
    );

    let ids: String = (0..slides.len())
        .map(|i| format!(r#"<p:sldId id="{}" r:id="rId{}"/>"#, 256 + i, i + 2))
        .collect();
    pkg.set_part(
        "ppt/presentation.xml",
        format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<p:presentation xmlns:a="{A_NS}" xmlns:p="{P_NS}" xmlns:r="{R_NS}"><p:sldIdLst>{ids}</p:sldIdLst><p:sldSz cx="9144000" cy="6858000"/></p:presentation>"#
        )
        .into_bytes(),
    );

    let rels: String = (0..slides.len())
        .map(|i| {
            format!(
                r#"<Relationship Id="rId{}" Type="{REL}/slide" Target="slides/slide{}.xml"/>"#,
                i + 2,
                i + 1
            )
        })
        .collect();
    pkg.set_part(
        "ppt/_rels/presentation.xml.rels",
        format!(
            r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">{rels}</Relationships>"#
        )
        .into_bytes(),
    );

    for (i, shapes) in slides.iter().enumerate() {
        pkg.set_part(&format!("ppt/slides/slide{}.xml", i + 1), slide_part("sld", shapes));
        if let Some(Some(note_shapes)) = notes.get(i) {
            pkg.set_part(
                &format!("ppt/slides/_rels/slide{}.xml.rels", i + 1),
                format!(
                    r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="{REL}/notesSlide" Target="../notesSlides/notesSlide{}.xml"/></Relationships>"#,
                    i + 1
                )
                .into_bytes(),
            );
            pkg.set_part(
                &format!("ppt/notesSlides/notesSlide{}.xml", i + 1),
                slide_part("notes", note_shapes),
            );
        }
    }

    pkg.to_bytes().unwrap()
}

pub fn pptx(slides: &[String]) -> Vec<u8> {
    pptx_with_notes(slides, &[])
}

// Word-processing fixtures

pub fn p(text: &str) -> String {
    format!(
        r#"<w:p><w:pPr><w:jc w:val="both"/></w:pPr><w:r><w:rPr><w:i/></w:rPr><w:t xml:space="preserve">{}</w:t></w:r></w:p>"#,
        text
    )
}

pub fn tbl(rows: &[&[&[&str]]]) -> String {
    let rows: String = rows
        .iter()
        .map(|cells| {
            let cells: String = cells
                .iter()
                .map(|paragraphs| {
                    let content: String = paragraphs.iter().map(|text| p(text)).collect();
                    format!(r#"<w:tc><w:tcPr><w:tcW w:w="2000" w:type="dxa"/></w:tcPr>{}</w:tc>"#, content)
                })
                .collect();
            format!("<w:tr>{}</w:tr>", cells)
        })
        .collect();
    format!(r#"<w:tbl><w:tblPr/><w:tblGrid/>{}</w:tbl>"#, rows)
}

pub fn docx(body: &str) -> Vec<u8> {
    let mut pkg = Package::new();
    pkg.set_part("[Content_Types].xml", b"<Types/>".to_vec());
    pkg.set_part(
        "_rels/.rels",
        format!(
            r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="{REL}/officeDocument" Target="word/document.xml"/></Relationships>"#
        )
        .into_bytes(),
    );
    pkg.set_part(
        "word/document.xml",
        format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="{W_NS}" xmlns:r="{R_NS}"><w:body>{body}<w:sectPr><w:pgSz w:w="11906" w:h="16838"/></w:sectPr></w:body></w:document>"#
        )
        .into_bytes(),
    );
    pkg.set_part("word/styles.xml", b"<w:styles/>".to_vec());
    pkg.to_bytes().unwrap()
}

/// Every part of a package as `(name, bytes)`, in archive order.
pub fn parts(bytes: &[u8]) -> Vec<(String, Vec<u8>)> {
    let pkg = Package::open(bytes).unwrap();
    pkg.part_names()
        .map(|name| (name.to_string(), pkg.part(name).unwrap_or_default().to_vec()))
        .collect()
}

/// Texts of every non-empty unit, in visitation order.
pub fn texts(bytes: &[u8], tag: &str) -> Vec<String> {
    doctrans_engine::extract_segments(bytes, tag, true)
        .unwrap()
        .into_iter()
        .map(|s| s.text)
        .collect()
}
