//! Reading and replacing the text of a DrawingML text body (`txBody`).
//!
//! A text body is one text unit. Its text is the paragraphs joined by `\n`,
//! with in-paragraph line breaks (`a:br`) read as vertical tab. Replacing
//! the text keeps every paragraph's `a:pPr`, the first run's `a:rPr` and the
//! `a:endParaRPr`; the runs themselves are rebuilt.

use doctrans_ooxml::{XmlElement, XmlNode};

/// In-paragraph line break marker.
pub const LINE_BREAK: char = '\u{b}';

/// Formatting applied to text bodies that get rewritten.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TextStyle {
    /// Font size in points for every rewritten run.
    pub font_size: Option<f32>,
    /// Let the renderer shrink text to fit its shape.
    pub autofit: bool,
}

/// Full text of a text body.
pub fn frame_text(tx_body: &XmlElement) -> String {
    tx_body
        .children_named("p")
        .map(paragraph_text)
        .collect::<Vec<_>>()
        .join("\n")
}

fn paragraph_text(p: &XmlElement) -> String {
    let mut text = String::new();
    for child in p.elements() {
        match child.local_name() {
            "r" | "fld" => {
                if let Some(t) = child.child("t") {
                    text.push_str(&t.text());
                }
            }
            "br" => text.push(LINE_BREAK),
            _ => {}
        }
    }
    text
}

/// Replace the text of a text body, one line per paragraph.
pub fn set_frame_text(tx_body: &mut XmlElement, text: &str, style: &TextStyle) {
    let text = text.replace("\r\n", "\n");
    let lines: Vec<&str> = text.split('\n').collect();

    let templates: Vec<XmlElement> = tx_body.children_named("p").cloned().collect();
    let insert_at = tx_body
        .position("p")
        .unwrap_or(tx_body.children.len());
    tx_body
        .children
        .retain(|node| !node.as_element().is_some_and(|el| el.is("p")));

    // Paragraphs live in the DrawingML namespace even under `p:txBody`.
    let fallback = XmlElement::new(
        tx_body
            .child("bodyPr")
            .map(|body_pr| body_pr.sibling_name("p"))
            .unwrap_or_else(|| "a:p".to_string()),
    );
    let insert_at = insert_at.min(tx_body.children.len());
    let tail = tx_body.children.split_off(insert_at);
    for (i, line) in lines.iter().enumerate() {
        let template = templates.get(i).or(templates.last()).unwrap_or(&fallback);
        tx_body
            .children
            .push(XmlNode::Element(rebuild_paragraph(template, line, style)));
    }
    tx_body.children.extend(tail);

    if style.autofit {
        apply_autofit(tx_body);
    }
}

/// Build a paragraph with the template's properties and `line` as content.
fn rebuild_paragraph(template: &XmlElement, line: &str, style: &TextStyle) -> XmlElement {
    let mut p = XmlElement {
        name: template.name.clone(),
        attributes: template.attributes.clone(),
        children: Vec::new(),
    };

    if let Some(ppr) = template.child("pPr") {
        p.push(ppr.clone());
    }

    let run_props = template
        .elements()
        .filter(|el| el.is("r") || el.is("fld") || el.is("br"))
        .find_map(|el| el.child("rPr"))
        .cloned()
        .map(|rpr| with_font_size(rpr, style));

    for (i, segment) in line.split(LINE_BREAK).enumerate() {
        if i > 0 {
            let mut br = XmlElement::new(p.sibling_name("br"));
            if let Some(rpr) = &run_props {
                br.push(rpr.clone());
            }
            p.push(br);
        }
        if segment.is_empty() {
            continue;
        }

        let mut run = XmlElement::new(p.sibling_name("r"));
        match &run_props {
            Some(rpr) => run.push(rpr.clone()),
            None if style.font_size.is_some() => {
                run.push(with_font_size(XmlElement::new(p.sibling_name("rPr")), style));
            }
            None => {}
        }
        run.push(XmlElement::new(p.sibling_name("t")).with_text(segment));
        p.push(run);
    }

    if let Some(end) = template.child("endParaRPr") {
        p.push(with_font_size(end.clone(), style));
    }

    p
}

fn with_font_size(mut rpr: XmlElement, style: &TextStyle) -> XmlElement {
    if let Some(points) = style.font_size {
        let hundredths = (points * 100.0).round().clamp(100.0, 400_000.0) as u32;
        rpr.set_attr("sz", &hundredths.to_string());
    }
    rpr
}

/// Switch the body to shrink-on-overflow.
fn apply_autofit(tx_body: &mut XmlElement) {
    let Some(body_pr) = tx_body.child_mut("bodyPr") else {
        log::debug!("Text body without bodyPr, autofit skipped");
        return;
    };

    body_pr.children.retain(|node| {
        !node
            .as_element()
            .is_some_and(|el| matches!(el.local_name(), "noAutofit" | "normAutofit" | "spAutoFit"))
    });
    let at = body_pr
        .position("prstTxWarp")
        .map(|i| i + 1)
        .unwrap_or(0);
    let autofit = XmlElement::new(body_pr.sibling_name("normAutofit"));
    body_pr.children.insert(at, XmlNode::Element(autofit));
}
