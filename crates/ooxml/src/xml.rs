//! Owned XML element tree.
//!
//! Parts are small enough to hold in memory, and an owned tree lets the
//! walkers borrow a single node mutably while they rewrite it. Attribute
//! values are kept in their escaped form so untouched attributes are written
//! back exactly as read.

use doctrans_core::{Error, Result};
use quick_xml::escape::{escape, unescape};
use quick_xml::events::attributes::Attribute;
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::name::QName;
use quick_xml::{Reader, Writer};
use std::borrow::Cow;

/// A node in the tree.
#[derive(Debug, Clone, PartialEq)]
pub enum XmlNode {
    Element(XmlElement),
    /// Character data, unescaped.
    Text(String),
    /// Declarations, comments, CDATA, processing instructions.
    Other(Event<'static>),
}

impl XmlNode {
    pub fn as_element(&self) -> Option<&XmlElement> {
        match self {
            Self::Element(el) => Some(el),
            _ => None,
        }
    }

    pub fn as_element_mut(&mut self) -> Option<&mut XmlElement> {
        match self {
            Self::Element(el) => Some(el),
            _ => None,
        }
    }
}

/// An element with its qualified name, raw attributes and children.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct XmlElement {
    /// Qualified name as written, e.g. `a:p`.
    pub name: String,
    /// `(qualified name, escaped value)` pairs in document order.
    pub attributes: Vec<(String, String)>,
    pub children: Vec<XmlNode>,
}

impl XmlElement {
    /// Create an empty element.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    fn from_start(start: &BytesStart<'_>) -> Self {
        let name = String::from_utf8_lossy(start.name().as_ref()).to_string();
        let attributes = start
            .attributes()
            .flatten()
            .map(|attr| {
                (
                    String::from_utf8_lossy(attr.key.as_ref()).to_string(),
                    // Values are written back in double quotes.
                    String::from_utf8_lossy(&attr.value).replace('"', "&quot;"),
                )
            })
            .collect();
        Self {
            name,
            attributes,
            children: Vec::new(),
        }
    }

    /// Name without its namespace prefix.
    pub fn local_name(&self) -> &str {
        local_name(&self.name)
    }

    /// Namespace prefix, if the name has one.
    pub fn prefix(&self) -> Option<&str> {
        self.name.split_once(':').map(|(prefix, _)| prefix)
    }

    /// Qualify a local name with this element's prefix.
    pub fn sibling_name(&self, local: &str) -> String {
        match self.prefix() {
            Some(prefix) => format!("{}:{}", prefix, local),
            None => local.to_string(),
        }
    }

    /// True if the local name matches.
    pub fn is(&self, local: &str) -> bool {
        self.local_name() == local
    }

    /// Unescaped value of the attribute with this qualified name.
    pub fn attr(&self, name: &str) -> Option<String> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| unescape_lossy(value))
    }

    /// Set an attribute, replacing any existing value.
    pub fn set_attr(&mut self, name: &str, value: &str) {
        let escaped = escape(value).into_owned();
        match self.attributes.iter_mut().find(|(key, _)| key == name) {
            Some(slot) => slot.1 = escaped,
            None => self.attributes.push((name.to_string(), escaped)),
        }
    }

    /// Child elements, skipping text and other nodes.
    pub fn elements(&self) -> impl Iterator<Item = &XmlElement> {
        self.children.iter().filter_map(XmlNode::as_element)
    }

    pub fn elements_mut(&mut self) -> impl Iterator<Item = &mut XmlElement> {
        self.children.iter_mut().filter_map(XmlNode::as_element_mut)
    }

    /// First child element with this local name.
    pub fn child(&self, local: &str) -> Option<&XmlElement> {
        self.elements().find(|el| el.is(local))
    }

    pub fn child_mut(&mut self, local: &str) -> Option<&mut XmlElement> {
        self.elements_mut().find(|el| el.is(local))
    }

    /// All child elements with this local name.
    pub fn children_named<'a>(&'a self, local: &'a str) -> impl Iterator<Item = &'a XmlElement> {
        self.elements().filter(move |el| el.is(local))
    }

    pub fn children_named_mut<'a>(
        &'a mut self,
        local: &'a str,
    ) -> impl Iterator<Item = &'a mut XmlElement> {
        self.elements_mut().filter(move |el| el.is(local))
    }

    /// Follow a path of local names through first matching children.
    pub fn find(&self, path: &[&str]) -> Option<&XmlElement> {
        path.iter().try_fold(self, |el, local| el.child(local))
    }

    pub fn find_mut(&mut self, path: &[&str]) -> Option<&mut XmlElement> {
        let mut current = self;
        for local in path {
            current = current.child_mut(local)?;
        }
        Some(current)
    }

    /// True if any descendant element has this local name.
    pub fn contains(&self, local: &str) -> bool {
        self.elements().any(|el| el.is(local) || el.contains(local))
    }

    /// Concatenated character data of all descendants.
    pub fn text(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        for child in &self.children {
            match child {
                XmlNode::Text(text) => out.push_str(text),
                XmlNode::Element(el) => el.collect_text(out),
                XmlNode::Other(_) => {}
            }
        }
    }

    /// Replace all children with a single text node.
    pub fn set_text(&mut self, text: &str) {
        self.children = vec![XmlNode::Text(text.to_string())];
    }

    /// Append a child element.
    pub fn push(&mut self, child: XmlElement) {
        self.children.push(XmlNode::Element(child));
    }

    /// Builder form of [`push`](Self::push).
    pub fn with_child(mut self, child: XmlElement) -> Self {
        self.push(child);
        self
    }

    /// Builder form of [`set_attr`](Self::set_attr).
    pub fn with_attr(mut self, name: &str, value: &str) -> Self {
        self.set_attr(name, value);
        self
    }

    /// Builder form of [`set_text`](Self::set_text).
    pub fn with_text(mut self, text: &str) -> Self {
        self.set_text(text);
        self
    }

    /// Index in `children` of the first element with this local name.
    pub fn position(&self, local: &str) -> Option<usize> {
        self.children
            .iter()
            .position(|node| node.as_element().is_some_and(|el| el.is(local)))
    }

    fn write<W: std::io::Write>(&self, writer: &mut Writer<W>) -> Result<()> {
        let mut start = BytesStart::new(self.name.as_str());
        for (key, value) in &self.attributes {
            start.push_attribute(Attribute {
                key: QName(key.as_bytes()),
                value: Cow::Borrowed(value.as_bytes()),
            });
        }

        if self.children.is_empty() {
            return write_event(writer, Event::Empty(start));
        }

        write_event(writer, Event::Start(start))?;
        for child in &self.children {
            write_node(writer, child)?;
        }
        write_event(writer, Event::End(BytesEnd::new(self.name.as_str())))
    }
}

/// A parsed XML part: prolog, root element, and anything around them.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct XmlDocument {
    pub nodes: Vec<XmlNode>,
}

impl XmlDocument {
    /// Parse a UTF-8 XML string.
    pub fn parse(xml: &str) -> Result<Self> {
        let xml = xml.strip_prefix('\u{feff}').unwrap_or(xml);
        let mut reader = Reader::from_str(xml);

        let mut top: Vec<XmlNode> = Vec::new();
        let mut stack: Vec<XmlElement> = Vec::new();

        loop {
            let node = match reader.read_event() {
                Ok(Event::Start(ref e)) => {
                    stack.push(XmlElement::from_start(e));
                    continue;
                }
                Ok(Event::End(_)) => {
                    let element = stack.pop().ok_or_else(|| {
                        Error::XmlError(format!(
                            "Unexpected closing tag at position {}",
                            reader.buffer_position()
                        ))
                    })?;
                    XmlNode::Element(element)
                }
                Ok(Event::Empty(ref e)) => XmlNode::Element(XmlElement::from_start(e)),
                Ok(Event::Text(ref e)) => {
                    let text = e.unescape().map_err(|err| {
                        Error::XmlError(format!(
                            "Bad character data at position {}: {}",
                            reader.buffer_position(),
                            err
                        ))
                    })?;
                    XmlNode::Text(text.into_owned())
                }
                Ok(Event::Eof) => break,
                Ok(other) => XmlNode::Other(other.into_owned()),
                Err(e) => {
                    return Err(Error::XmlError(format!(
                        "Error at position {}: {}",
                        reader.buffer_position(),
                        e
                    )));
                }
            };

            match stack.last_mut() {
                Some(parent) => parent.children.push(node),
                None => top.push(node),
            }
        }

        if let Some(open) = stack.last() {
            return Err(Error::XmlError(format!("Unclosed element <{}>", open.name)));
        }

        Ok(Self { nodes: top })
    }

    /// Parse raw part bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let xml = std::str::from_utf8(bytes)
            .map_err(|e| Error::XmlError(format!("Part is not valid UTF-8: {}", e)))?;
        Self::parse(xml)
    }

    /// The document element.
    pub fn root(&self) -> Option<&XmlElement> {
        self.nodes.iter().find_map(XmlNode::as_element)
    }

    pub fn root_mut(&mut self) -> Option<&mut XmlElement> {
        self.nodes.iter_mut().find_map(XmlNode::as_element_mut)
    }

    /// Serialize back to bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut writer = Writer::new(Vec::new());
        for node in &self.nodes {
            write_node(&mut writer, node)?;
        }
        Ok(writer.into_inner())
    }
}

fn write_node<W: std::io::Write>(writer: &mut Writer<W>, node: &XmlNode) -> Result<()> {
    match node {
        XmlNode::Element(el) => el.write(writer),
        XmlNode::Text(text) => write_event(writer, Event::Text(BytesText::new(text))),
        XmlNode::Other(event) => write_event(writer, event),
    }
}

fn write_event<'a, W: std::io::Write, E: AsRef<Event<'a>>>(
    writer: &mut Writer<W>,
    event: E,
) -> Result<()> {
    writer
        .write_event(event)
        .map_err(|e| Error::XmlError(format!("Failed to write XML: {}", e)))
}

/// Extract the local name from a potentially namespaced XML name.
pub fn local_name(name: &str) -> &str {
    match name.split_once(':') {
        Some((_, local)) => local,
        None => name,
    }
}

fn unescape_lossy(value: &str) -> String {
    match unescape(value) {
        Ok(v) => v.into_owned(),
        Err(_) => value.to_string(),
    }
}
