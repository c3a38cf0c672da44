//! A small mutable XML document tree.
//!
//! The typed EAD model is built from this tree, and the export transforms
//! rewrite it in place before it is serialized again. Nodes live in an arena
//! owned by [`Document`] and are addressed by [`NodeId`].
//!
//! Text is kept in its escaped form so that entity references survive a
//! parse/serialize cycle unchanged.
//!
//! # Example
//!
//! ```rust
//! use ead_rs::document::Document;
//!
//! let mut doc = Document::parse_str(r#"<did><container id="b1">1</container></did>"#).unwrap();
//! for container in doc.elements_named_mut("container") {
//!     container.set_attribute("type", "Box");
//! }
//! assert_eq!(
//!     doc.to_xml_string().unwrap(),
//!     r#"<did><container id="b1" type="Box">1</container></did>"#
//! );
//! ```

use crate::error::{Error, Result};
use quick_xml::escape::unescape;
use quick_xml::events::{BytesCData, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};
use std::fmt;
use std::io::{BufRead, Write};
use std::str;

/// Index of a node in a [`Document`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

/// An element with its attributes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Element {
    name: String,
    attributes: Vec<(String, String)>,
    self_closing: bool,
}

impl Element {
    /// Creates an element with a (possibly prefixed) name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Returns the qualified name as written.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the name without any namespace prefix.
    pub fn local_name(&self) -> &str {
        local_part(&self.name)
    }

    /// Returns the unescaped value of the attribute with this local name.
    pub fn attribute(&self, local_name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| local_part(key) == local_name)
            .map(|(_, value)| value.as_str())
    }

    /// Iterates over `(qualified name, value)` pairs in document order.
    pub fn attributes(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attributes
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str()))
    }

    /// Sets an attribute, replacing the value of an existing attribute with
    /// the same local name.
    pub fn set_attribute(&mut self, name: &str, value: impl Into<String>) {
        let value = value.into();
        let local_name = local_part(name);
        match self
            .attributes
            .iter_mut()
            .find(|(key, _)| local_part(key) == local_name)
        {
            Some((_, existing)) => *existing = value,
            None => self.attributes.push((name.to_string(), value)),
        }
    }

    /// Removes the attribute with this local name, returning its value.
    pub fn remove_attribute(&mut self, local_name: &str) -> Option<String> {
        let index = self
            .attributes
            .iter()
            .position(|(key, _)| local_part(key) == local_name)?;
        Some(self.attributes.remove(index).1)
    }
}

fn local_part(name: &str) -> &str {
    name.rsplit(':').next().unwrap_or(name)
}

/// The content of a node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    /// An element
    Element(Element),
    /// Character data, escaped as in the source
    Text(String),
    /// A CDATA section
    CData(String),
    /// A comment
    Comment(String),
    /// A processing instruction (content between `<?` and `?>`)
    ProcessingInstruction(String),
    /// The XML declaration (content between `<?` and `?>`)
    Declaration(String),
    /// A document type declaration (content after `<!DOCTYPE `)
    DocType(String),
}

#[derive(Debug, Clone)]
struct Node {
    kind: NodeKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    attached: bool,
}

/// A parsed XML document.
#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<Node>,
    top_level: Vec<NodeId>,
    root: NodeId,
}

impl Document {
    /// Parses a document from a buffered reader.
    pub fn parse<R: BufRead>(reader: R) -> Result<Self> {
        let mut reader = Reader::from_reader(reader);
        let mut buf = Vec::with_capacity(4096);

        let mut nodes: Vec<Node> = Vec::new();
        let mut top_level = Vec::new();
        let mut root: Option<NodeId> = None;
        let mut open: Vec<NodeId> = Vec::new();

        loop {
            let kind = match reader.read_event_into(&mut buf)? {
                Event::Start(ref e) => {
                    let element = read_element(e, false)?;
                    let id = push_node(&mut nodes, &mut top_level, &open, NodeKind::Element(element));
                    if open.is_empty() {
                        claim_root(&mut root, id)?;
                    }
                    open.push(id);
                    None
                }
                Event::Empty(ref e) => {
                    let element = read_element(e, true)?;
                    let id = push_node(&mut nodes, &mut top_level, &open, NodeKind::Element(element));
                    if open.is_empty() {
                        claim_root(&mut root, id)?;
                    }
                    None
                }
                Event::End(_) => {
                    open.pop().ok_or_else(|| {
                        Error::MalformedDocument("closing tag without a start tag".to_string())
                    })?;
                    None
                }
                Event::Text(ref e) => {
                    e.unescape()
                        .map_err(|err| Error::MalformedDocument(err.to_string()))?;
                    let raw = str::from_utf8(e)?;
                    if open.is_empty() && !raw.trim().is_empty() {
                        return Err(Error::MalformedDocument(
                            "character data outside the root element".to_string(),
                        ));
                    }
                    Some(NodeKind::Text(raw.to_string()))
                }
                Event::CData(ref e) => Some(NodeKind::CData(str::from_utf8(e)?.to_string())),
                Event::Comment(ref e) => Some(NodeKind::Comment(str::from_utf8(e)?.to_string())),
                Event::PI(ref e) => Some(NodeKind::ProcessingInstruction(
                    str::from_utf8(e)?.to_string(),
                )),
                Event::Decl(ref e) => Some(NodeKind::Declaration(str::from_utf8(e)?.to_string())),
                Event::DocType(ref e) => Some(NodeKind::DocType(str::from_utf8(e)?.to_string())),
                Event::Eof => break,
            };
            if let Some(kind) = kind {
                push_node(&mut nodes, &mut top_level, &open, kind);
            }
            buf.clear();
        }

        if !open.is_empty() {
            return Err(Error::MalformedDocument(format!(
                "{} element(s) left unclosed",
                open.len()
            )));
        }
        let root = root
            .ok_or_else(|| Error::MalformedDocument("document has no root element".to_string()))?;

        Ok(Self {
            nodes,
            top_level,
            root,
        })
    }

    /// Parses a document from a string.
    pub fn parse_str(xml: &str) -> Result<Self> {
        Self::parse(xml.as_bytes())
    }

    /// Returns the root element.
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Returns the content of a node.
    pub fn kind(&self, id: NodeId) -> &NodeKind {
        &self.nodes[id.0].kind
    }

    /// Returns the element at `id`, if that node is an element.
    pub fn element(&self, id: NodeId) -> Option<&Element> {
        match &self.nodes[id.0].kind {
            NodeKind::Element(element) => Some(element),
            _ => None,
        }
    }

    /// Returns the element at `id` mutably, if that node is an element.
    pub fn element_mut(&mut self, id: NodeId) -> Option<&mut Element> {
        match &mut self.nodes[id.0].kind {
            NodeKind::Element(element) => Some(element),
            _ => None,
        }
    }

    /// Returns the local name of the element at `id`.
    pub fn local_name(&self, id: NodeId) -> Option<&str> {
        self.element(id).map(Element::local_name)
    }

    /// Returns the child nodes of `id` in document order.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.0].children
    }

    /// Returns the child elements of `id` in document order.
    pub fn child_elements(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.children(id)
            .iter()
            .copied()
            .filter(move |child| self.element(*child).is_some())
    }

    /// Returns the child elements of `id` with this local name.
    pub fn child_elements_named(&self, id: NodeId, local_name: &str) -> Vec<NodeId> {
        self.child_elements(id)
            .filter(|child| self.local_name(*child) == Some(local_name))
            .collect()
    }

    /// Returns the first child element of `id` with this local name.
    pub fn first_child_named(&self, id: NodeId, local_name: &str) -> Option<NodeId> {
        self.child_elements(id)
            .find(|child| self.local_name(*child) == Some(local_name))
    }

    /// Returns the parent element of `id`; `None` for top-level nodes.
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].parent
    }

    /// Returns `id` and every node below it, in document order.
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(node) = stack.pop() {
            out.push(node);
            stack.extend(self.children(node).iter().rev().copied());
        }
        out
    }

    /// Returns every element of the document that satisfies `predicate`, in
    /// document order.
    pub fn find_all<F>(&self, predicate: F) -> Vec<NodeId>
    where
        F: Fn(&Element) -> bool,
    {
        self.descendants(self.root)
            .into_iter()
            .filter(|id| self.element(*id).is_some_and(&predicate))
            .collect()
    }

    /// Returns every element with this local name, in document order.
    pub fn elements_named(&self, local_name: &str) -> Vec<NodeId> {
        self.find_all(|element| element.local_name() == local_name)
    }

    /// Returns mutable access to every element with this local name, in
    /// document order.
    pub fn elements_named_mut(&mut self, local_name: &str) -> Vec<&mut Element> {
        // Nodes are stored in parse order, which is document order.
        self.nodes
            .iter_mut()
            .filter(|node| node.attached)
            .filter_map(|node| match &mut node.kind {
                NodeKind::Element(element) if element.local_name() == local_name => Some(element),
                _ => None,
            })
            .collect()
    }

    /// Returns the unescaped character data below `id`.
    pub fn text_content(&self, id: NodeId) -> Result<String> {
        let mut text = String::new();
        for node in self.descendants(id) {
            match self.kind(node) {
                NodeKind::Text(raw) => {
                    let unescaped =
                        unescape(raw).map_err(|err| Error::MalformedDocument(err.to_string()))?;
                    text.push_str(&unescaped);
                }
                NodeKind::CData(data) => text.push_str(data),
                _ => {}
            }
        }
        Ok(text)
    }

    /// Serializes the children of `id`.
    pub fn inner_xml(&self, id: NodeId) -> Result<String> {
        let mut writer = Writer::new(Vec::new());
        for child in self.children(id) {
            self.write_node(&mut writer, *child)?;
        }
        String::from_utf8(writer.into_inner()).map_err(|err| Error::Utf8(err.utf8_error()))
    }

    /// Detaches `id` and its subtree from the document.
    pub fn remove(&mut self, id: NodeId) -> Result<()> {
        if id == self.root {
            return Err(Error::MalformedDocument(
                "the root element cannot be removed".to_string(),
            ));
        }
        match self.nodes[id.0].parent {
            Some(parent) => self.nodes[parent.0].children.retain(|child| *child != id),
            None => self.top_level.retain(|node| *node != id),
        }
        for node in self.descendants(id) {
            self.nodes[node.0].attached = false;
        }
        self.nodes[id.0].parent = None;
        Ok(())
    }

    /// Writes the document.
    pub fn write<W: Write>(&self, writer: W) -> Result<()> {
        let mut writer = Writer::new(writer);
        for node in &self.top_level {
            self.write_node(&mut writer, *node)?;
        }
        Ok(())
    }

    /// Serializes the document to a string.
    pub fn to_xml_string(&self) -> Result<String> {
        let mut output = Vec::new();
        self.write(&mut output)?;
        String::from_utf8(output).map_err(|err| Error::Utf8(err.utf8_error()))
    }

    fn write_node<W: Write>(&self, writer: &mut Writer<W>, id: NodeId) -> Result<()> {
        match self.kind(id) {
            NodeKind::Element(element) => {
                let mut start = BytesStart::new(element.name.as_str());
                for (key, value) in &element.attributes {
                    start.push_attribute((key.as_str(), value.as_str()));
                }
                let children = self.children(id);
                if children.is_empty() && element.self_closing {
                    writer.write_event(Event::Empty(start))?;
                } else {
                    writer.write_event(Event::Start(start))?;
                    for child in children {
                        self.write_node(writer, *child)?;
                    }
                    writer.write_event(Event::End(BytesEnd::new(element.name.as_str())))?;
                }
            }
            NodeKind::Text(raw) => {
                writer.write_event(Event::Text(BytesText::from_escaped(raw.as_str())))?;
            }
            NodeKind::CData(data) => {
                writer.write_event(Event::CData(BytesCData::new(data.as_str())))?;
            }
            NodeKind::Comment(text) => {
                writer.write_event(Event::Comment(BytesText::from_escaped(text.as_str())))?;
            }
            NodeKind::DocType(text) => {
                writer.write_event(Event::DocType(BytesText::from_escaped(text.as_str())))?;
            }
            NodeKind::ProcessingInstruction(content) | NodeKind::Declaration(content) => {
                let out = writer.get_mut();
                out.write_all(b"<?")?;
                out.write_all(content.as_bytes())?;
                out.write_all(b"?>")?;
            }
        }
        Ok(())
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

fn read_element(e: &BytesStart<'_>, self_closing: bool) -> Result<Element> {
    let name = str::from_utf8(e.name().as_ref())?.to_string();
    let mut attributes = Vec::new();
    for attr in e.attributes() {
        let attr = attr?;
        let key = str::from_utf8(attr.key.as_ref())?.to_string();
        let value = attr
            .unescape_value()
            .map_err(|err| Error::MalformedDocument(err.to_string()))?;
        attributes.push((key, value.into_owned()));
    }
    Ok(Element {
        name,
        attributes,
        self_closing,
    })
}

fn push_node(
    nodes: &mut Vec<Node>,
    top_level: &mut Vec<NodeId>,
    open: &[NodeId],
    kind: NodeKind,
) -> NodeId {
    let id = NodeId(nodes.len());
    let parent = open.last().copied();
    nodes.push(Node {
        kind,
        parent,
        children: Vec::new(),
        attached: true,
    });
    match parent {
        Some(parent) => nodes[parent.0].children.push(id),
        None => top_level.push(id),
    }
    id
}

fn claim_root(root: &mut Option<NodeId>, id: NodeId) -> Result<()> {
    if root.is_some() {
        return Err(Error::MalformedDocument(
            "document has more than one root element".to_string(),
        ));
    }
    *root = Some(id);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<ead xmlns="urn:isbn:1-931666-22-9" xmlns:xlink="http://www.w3.org/1999/xlink">
  <!-- generated -->
  <archdesc level="collection">
    <did>
      <unittitle>Papers of <emph render="italic">A &amp; B</emph></unittitle>
      <dao xlink:href="https://example.org/1" xlink:role="image-service"/>
    </did>
  </archdesc>
</ead>
"#;

    #[test]
    fn test_round_trip_preserves_source() {
        let doc = Document::parse_str(SAMPLE).unwrap();
        assert_eq!(doc.to_xml_string().unwrap(), SAMPLE);
    }

    #[test]
    fn test_queries() {
        let doc = Document::parse_str(SAMPLE).unwrap();
        let root = doc.root();
        assert_eq!(doc.local_name(root), Some("ead"));

        let archdesc = doc.first_child_named(root, "archdesc").unwrap();
        assert_eq!(doc.element(archdesc).unwrap().attribute("level"), Some("collection"));
        assert_eq!(doc.parent(archdesc), Some(root));
        assert_eq!(doc.parent(root), None);

        let title = doc.elements_named("unittitle")[0];
        assert_eq!(doc.text_content(title).unwrap(), "Papers of A & B");
        assert_eq!(
            doc.inner_xml(title).unwrap(),
            r#"Papers of <emph render="italic">A &amp; B</emph>"#
        );

        let dao = doc.elements_named("dao")[0];
        let dao = doc.element(dao).unwrap();
        assert_eq!(dao.name(), "dao");
        assert_eq!(dao.attribute("href"), Some("https://example.org/1"));
        assert_eq!(dao.attribute("role"), Some("image-service"));

        let with_level = doc.find_all(|e| e.attribute("level").is_some());
        assert_eq!(with_level, vec![archdesc]);
    }

    #[test]
    fn test_attribute_edits() {
        let mut element = Element::new("container");
        element.set_attribute("id", "f1");
        element.set_attribute("parent", "b1");
        element.set_attribute("parent", "b2");
        assert_eq!(element.attribute("parent"), Some("b2"));
        assert_eq!(element.attributes().count(), 2);

        assert_eq!(element.remove_attribute("id").as_deref(), Some("f1"));
        assert_eq!(element.remove_attribute("id"), None);
        assert_eq!(element.attributes().collect::<Vec<_>>(), vec![("parent", "b2")]);
    }

    #[test]
    fn test_remove_subtree() {
        let mut doc =
            Document::parse_str(r#"<did><unitid type="aspace_uri">/r/1</unitid><unitid>MS 1</unitid></did>"#)
                .unwrap();
        let internal = doc.elements_named("unitid")[0];
        doc.remove(internal).unwrap();
        assert_eq!(doc.to_xml_string().unwrap(), "<did><unitid>MS 1</unitid></did>");
        assert_eq!(doc.elements_named("unitid").len(), 1);
        assert_eq!(doc.elements_named_mut("unitid").len(), 1);

        let root = doc.root();
        assert!(doc.remove(root).is_err());
    }

    #[test]
    fn test_attribute_values_escaped_on_write() {
        let mut doc = Document::parse_str(r#"<extref href="a?b=1&amp;c=2"/>"#).unwrap();
        let root = doc.root();
        assert_eq!(doc.element(root).unwrap().attribute("href"), Some("a?b=1&c=2"));
        doc.element_mut(root).unwrap().set_attribute("title", "\"quoted\"");
        assert_eq!(
            doc.to_xml_string().unwrap(),
            r#"<extref href="a?b=1&amp;c=2" title="&quot;quoted&quot;"/>"#
        );
    }

    #[test]
    fn test_malformed_documents() {
        assert!(Document::parse_str("<a><b></a>").is_err());
        assert!(Document::parse_str("<a>").is_err());
        assert!(Document::parse_str("<a/><b/>").is_err());
        assert!(Document::parse_str("").is_err());
        assert!(Document::parse_str("text<a/>").is_err());
        assert!(Document::parse_str("<a>&bogus;</a>").is_err());
    }
}
