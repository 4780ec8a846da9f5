//! Element tree and XML output
//!
//! [`XmlNode`] is the output side of rendering: a tag, ordered attributes, optional
//! text and ordered children. [`write_document`] turns a finished tree into text with
//! `quick-xml`'s indenting writer.

use indexmap::IndexMap;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use crate::error::{Error, Result};
use crate::names::is_valid_name;

/// Type alias for attribute mappings
pub type AttributeMap = IndexMap<String, String>;

/// An XML element
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct XmlNode {
    /// The element tag name
    tag: String,
    /// Element attributes, in insertion order
    attributes: AttributeMap,
    /// The text content
    text: Option<String>,
    /// Child elements
    children: Vec<XmlNode>,
}

impl XmlNode {
    /// Create a new element with a tag
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attributes: AttributeMap::new(),
            text: None,
            children: Vec::new(),
        }
    }

    /// Set text content, builder style
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Get the tag name
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Get the text content
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    /// Get the attributes
    pub fn attributes(&self) -> &AttributeMap {
        &self.attributes
    }

    /// Get one attribute
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    /// Get the children
    pub fn children(&self) -> &[XmlNode] {
        &self.children
    }

    /// First child with the given tag
    pub fn child(&self, tag: &str) -> Option<&XmlNode> {
        self.children.iter().find(|c| c.tag == tag)
    }

    /// All children with the given tag
    pub fn children_named<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = &'a XmlNode> + 'a {
        self.children.iter().filter(move |c| c.tag == tag)
    }

    /// Replace the text content
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = Some(text.into());
    }

    /// Set an attribute; an existing attribute keeps its position
    pub fn set_attribute(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.attributes.insert(name.into(), value.into());
    }

    /// Attach a child and return it
    pub fn push_child(&mut self, child: XmlNode) -> &mut XmlNode {
        self.children.push(child);
        let last = self.children.len() - 1;
        &mut self.children[last]
    }

    /// Check if the element has neither text nor children
    pub fn is_empty(&self) -> bool {
        self.text.as_deref().map_or(true, str::is_empty) && self.children.is_empty()
    }
}

// Deep chains would otherwise be freed through one recursive call per level
impl Drop for XmlNode {
    fn drop(&mut self) {
        let mut pending = std::mem::take(&mut self.children);
        while let Some(mut node) = pending.pop() {
            pending.append(&mut node.children);
        }
    }
}

/// Options for writing a document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriteOptions {
    /// Write an XML declaration before the root element
    pub declaration: bool,
    /// Spaces per nesting level; zero writes everything on one line
    pub indent: usize,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            declaration: false,
            indent: 4,
        }
    }
}

/// Serialize a tree as an XML document
pub fn write_document(root: &XmlNode, options: &WriteOptions) -> Result<String> {
    let mut writer = if options.indent == 0 {
        Writer::new(Vec::new())
    } else {
        Writer::new_with_indent(Vec::new(), b' ', options.indent)
    };

    if options.declaration {
        writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
    }
    write_node(&mut writer, root)?;

    String::from_utf8(writer.into_inner()).map_err(|e| Error::Xml(e.to_string()))
}

enum Step<'a> {
    Open(&'a XmlNode),
    Close(&'a str),
}

// Explicit stack: tree depth must not turn into call depth
fn write_node(writer: &mut Writer<Vec<u8>>, root: &XmlNode) -> Result<()> {
    let mut stack = vec![Step::Open(root)];

    while let Some(step) = stack.pop() {
        let node = match step {
            Step::Close(tag) => {
                writer.write_event(Event::End(BytesEnd::new(tag)))?;
                continue;
            }
            Step::Open(node) => node,
        };

        if !is_valid_name(node.tag()) {
            log::warn!("writing element with invalid XML name '{}'", node.tag());
        }

        let mut start = BytesStart::new(node.tag());
        for (name, value) in node.attributes() {
            start.push_attribute((name.as_str(), value.as_str()));
        }

        if node.is_empty() {
            writer.write_event(Event::Empty(start))?;
            continue;
        }

        writer.write_event(Event::Start(start))?;
        if let Some(text) = node.text().filter(|t| !t.is_empty()) {
            writer.write_event(Event::Text(BytesText::new(text)))?;
        }
        stack.push(Step::Close(node.tag()));
        stack.extend(node.children().iter().rev().map(Step::Open));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_node_creation() {
        let node = XmlNode::new("test");
        assert_eq!(node.tag(), "test");
        assert!(node.text().is_none());
        assert!(node.children().is_empty());
        assert!(node.attributes().is_empty());
        assert!(node.is_empty());
    }

    #[test]
    fn test_set_attribute_keeps_position() {
        let mut node = XmlNode::new("a");
        node.set_attribute("x", "1");
        node.set_attribute("y", "2");
        node.set_attribute("x", "3");

        let names: Vec<_> = node.attributes().keys().map(String::as_str).collect();
        assert_eq!(names, vec!["x", "y"]);
        assert_eq!(node.attribute("x"), Some("3"));
    }

    #[test]
    fn test_push_child_returns_child() {
        let mut root = XmlNode::new("root");
        root.push_child(XmlNode::new("a")).set_text("first");
        root.push_child(XmlNode::new("b"));
        root.push_child(XmlNode::new("a"));

        assert_eq!(root.child("a").and_then(XmlNode::text), Some("first"));
        assert_eq!(root.children_named("a").count(), 2);
    }

    #[test]
    fn test_write_text_only() {
        let root = XmlNode::new("response").with_text("5");
        let xml = write_document(&root, &WriteOptions::default()).unwrap();
        assert_eq!(xml, "<response>5</response>");
    }

    #[test]
    fn test_write_nested_indented() {
        let mut root = XmlNode::new("response");
        root.set_attribute("id", "7");
        root.push_child(XmlNode::new("name").with_text("x"));
        root.push_child(XmlNode::new("empty").with_text(""));

        let xml = write_document(&root, &WriteOptions::default()).unwrap();
        assert_eq!(
            xml,
            "<response id=\"7\">\n    <name>x</name>\n    <empty/>\n</response>"
        );
    }

    #[test]
    fn test_write_without_indent() {
        let mut root = XmlNode::new("r");
        root.push_child(XmlNode::new("a").with_text("1"));
        let options = WriteOptions {
            declaration: false,
            indent: 0,
        };

        let xml = write_document(&root, &options).unwrap();
        assert_eq!(xml, "<r><a>1</a></r>");
    }

    #[test]
    fn test_write_declaration_and_escaping() {
        let root = XmlNode::new("r").with_text("a < b & c");
        let options = WriteOptions {
            declaration: true,
            indent: 2,
        };

        let xml = write_document(&root, &options).unwrap();
        assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
        assert!(xml.ends_with("<r>a &lt; b &amp; c</r>"));
    }

    #[test]
    fn test_write_and_drop_deep_chain() {
        let mut node = XmlNode::new("n").with_text("leaf");
        for _ in 0..100_000 {
            let mut parent = XmlNode::new("n");
            parent.push_child(node);
            node = parent;
        }
        let options = WriteOptions {
            declaration: false,
            indent: 0,
        };

        let xml = write_document(&node, &options).unwrap();
        assert!(xml.starts_with("<n><n><n>"));
        assert!(xml.contains("<n>leaf</n>"));
        assert_eq!(xml.matches("</n>").count(), 100_001);
        drop(node);
    }
}
