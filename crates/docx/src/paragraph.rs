//! Reading and replacing the text of a WordprocessingML paragraph (`w:p`).
//!
//! A paragraph is one text unit. Replacing its text collapses the text runs
//! into a single run that carries the first text run's `w:rPr`; paragraph
//! properties and runs holding drawings, objects or field characters stay.

use doctrans_ooxml::{XmlElement, XmlNode};

/// Elements whose content never counts as paragraph text.
const OPAQUE: &[&str] = &[
    "pPr",
    "rPr",
    "del",
    "moveFrom",
    "delText",
    "instrText",
    "drawing",
    "pict",
    "object",
    "AlternateContent",
];

/// Run content kept when the paragraph is rewritten.
const EMBEDDED: &[&str] = &[
    "drawing",
    "pict",
    "object",
    "AlternateContent",
    "fldChar",
    "instrText",
    "footnoteReference",
    "endnoteReference",
    "commentReference",
];

/// Elements that make up run text.
const TEXT_ELEMENTS: &[&str] = &["t", "tab", "br", "cr"];

/// Full text of a paragraph. Tabs read as `\t`, breaks as `\n`.
pub fn paragraph_text(p: &XmlElement) -> String {
    let mut out = String::new();
    collect_text(p, &mut out);
    out
}

fn collect_text(el: &XmlElement, out: &mut String) {
    for child in el.elements() {
        match child.local_name() {
            "t" => out.push_str(&child.text()),
            "tab" => out.push('\t'),
            "br" | "cr" => out.push('\n'),
            name if OPAQUE.contains(&name) => {}
            _ => collect_text(child, out),
        }
    }
}

/// Text contributed by one child of a paragraph.
fn text_of(el: &XmlElement) -> String {
    if OPAQUE.contains(&el.local_name()) {
        return String::new();
    }
    paragraph_text(el)
}

/// Replace the text of a paragraph.
pub fn set_paragraph_text(p: &mut XmlElement, text: &str) {
    let run_props = first_text_run(p).and_then(|run| run.child("rPr")).cloned();

    let mut insert_at = None;
    for node in std::mem::take(&mut p.children) {
        match node {
            XmlNode::Element(mut el) if !text_of(&el).is_empty() => {
                if insert_at.is_none() {
                    insert_at = Some(p.children.len());
                }
                if EMBEDDED.iter().any(|name| el.contains(name)) {
                    strip_text(&mut el);
                    p.children.push(XmlNode::Element(el));
                }
            }
            other => p.children.push(other),
        }
    }

    if text.is_empty() {
        return;
    }
    let run = build_run(p, text, run_props);
    let at = insert_at.unwrap_or(p.children.len());
    p.children.insert(at, XmlNode::Element(run));
}

/// First run, in document order, that carries text.
fn first_text_run(el: &XmlElement) -> Option<&XmlElement> {
    for child in el.elements() {
        if OPAQUE.contains(&child.local_name()) {
            continue;
        }
        if child.is("r") {
            if !paragraph_text(child).is_empty() {
                return Some(child);
            }
            continue;
        }
        if let Some(run) = first_text_run(child) {
            return Some(run);
        }
    }
    None
}

fn strip_text(el: &mut XmlElement) {
    el.children.retain(|node| {
        !node
            .as_element()
            .is_some_and(|child| TEXT_ELEMENTS.contains(&child.local_name()))
    });
    for child in el.elements_mut() {
        if !OPAQUE.contains(&child.local_name()) {
            strip_text(child);
        }
    }
}

fn build_run(p: &XmlElement, text: &str, run_props: Option<XmlElement>) -> XmlElement {
    let mut run = XmlElement::new(p.sibling_name("r"));
    if let Some(rpr) = run_props {
        run.push(rpr);
    }

    let mut pending = String::new();
    for ch in text.chars() {
        match ch {
            '\t' | '\n' => {
                push_text(&mut run, p, &mut pending);
                let name = if ch == '\t' { "tab" } else { "br" };
                run.push(XmlElement::new(p.sibling_name(name)));
            }
            '\r' => {}
            c => pending.push(c),
        }
    }
    push_text(&mut run, p, &mut pending);
    run
}

fn push_text(run: &mut XmlElement, p: &XmlElement, pending: &mut String) {
    if pending.is_empty() {
        return;
    }
    let t = XmlElement::new(p.sibling_name("t"))
        .with_attr("xml:space", "preserve")
        .with_text(&std::mem::take(pending));
    run.push(t);
}
