//! DOM Node
//!
//! Nodes live in the `DomTree` arena and link to each other by `NodeId`.

use crate::{ClassList, NamedNodeMap, NodeId, StyleDeclaration};

/// DOM Node - Core structure
#[derive(Debug)]
pub struct Node {
    /// Parent node (NONE if root or detached)
    pub parent: NodeId,
    pub first_child: NodeId,
    /// Last child (for O(1) append)
    pub last_child: NodeId,
    pub prev_sibling: NodeId,
    pub next_sibling: NodeId,
    /// Node-specific data
    pub data: NodeData,
}

impl Node {
    fn with_data(data: NodeData) -> Self {
        Self {
            parent: NodeId::NONE,
            first_child: NodeId::NONE,
            last_child: NodeId::NONE,
            prev_sibling: NodeId::NONE,
            next_sibling: NodeId::NONE,
            data,
        }
    }

    /// Create a new element node
    pub fn element(tag: &str) -> Self {
        Self::with_data(NodeData::Element(ElementData::new(tag)))
    }

    /// Create a new text node
    pub fn text(content: impl Into<String>) -> Self {
        Self::with_data(NodeData::Text(content.into()))
    }

    /// Create a new comment node
    pub fn comment(content: impl Into<String>) -> Self {
        Self::with_data(NodeData::Comment(content.into()))
    }

    /// Create a doctype node
    pub fn doctype(name: impl Into<String>) -> Self {
        Self::with_data(NodeData::Doctype { name: name.into() })
    }

    /// Create a document node
    pub fn document() -> Self {
        Self::with_data(NodeData::Document)
    }

    /// DOM `nodeType` (1 element, 3 text, 8 comment, 9 document, 10 doctype)
    pub fn node_type(&self) -> u16 {
        match self.data {
            NodeData::Element(_) => 1,
            NodeData::Text(_) => 3,
            NodeData::Comment(_) => 8,
            NodeData::Document => 9,
            NodeData::Doctype { .. } => 10,
        }
    }

    #[inline]
    pub fn is_element(&self) -> bool {
        matches!(self.data, NodeData::Element(_))
    }

    #[inline]
    pub fn is_document(&self) -> bool {
        matches!(self.data, NodeData::Document)
    }

    #[inline]
    pub fn as_element(&self) -> Option<&ElementData> {
        match &self.data {
            NodeData::Element(e) => Some(e),
            _ => None,
        }
    }

    #[inline]
    pub fn as_element_mut(&mut self) -> Option<&mut ElementData> {
        match &mut self.data {
            NodeData::Element(e) => Some(e),
            _ => None,
        }
    }

    #[inline]
    pub fn as_text(&self) -> Option<&str> {
        match &self.data {
            NodeData::Text(t) => Some(t),
            _ => None,
        }
    }
}

/// Node-specific data
#[derive(Debug)]
pub enum NodeData {
    /// Document root
    Document,
    Doctype {
        name: String,
    },
    Element(ElementData),
    Text(String),
    Comment(String),
}

/// Element-specific data
#[derive(Debug)]
pub struct ElementData {
    /// Lowercased local name
    pub tag: String,
    pub attrs: NamedNodeMap,
}

impl ElementData {
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            attrs: NamedNodeMap::new(),
        }
    }

    /// DOM `tagName` (uppercased for HTML elements)
    pub fn tag_name(&self) -> String {
        self.tag.to_ascii_uppercase()
    }

    pub fn get_attr(&self, name: &str) -> Option<&str> {
        self.attrs.get(name)
    }

    pub fn set_attr(&mut self, name: &str, value: &str) {
        self.attrs.set(name, value);
    }

    pub fn remove_attr(&mut self, name: &str) -> bool {
        self.attrs.remove(name).is_some()
    }

    pub fn id(&self) -> Option<&str> {
        self.attrs.get("id")
    }

    /// Class tokens parsed from the `class` attribute
    pub fn class_list(&self) -> ClassList {
        ClassList::parse(self.attrs.get("class").unwrap_or(""))
    }

    pub fn set_class_list(&mut self, classes: &ClassList) {
        self.attrs.set("class", &classes.value());
    }

    /// Inline style parsed from the `style` attribute
    pub fn style(&self) -> StyleDeclaration {
        StyleDeclaration::parse(self.attrs.get("style").unwrap_or(""))
    }

    pub fn set_style(&mut self, style: &StyleDeclaration) {
        self.attrs.set("style", &style.css_text());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_types() {
        assert_eq!(Node::element("div").node_type(), 1);
        assert_eq!(Node::text("x").node_type(), 3);
        assert_eq!(Node::document().node_type(), 9);
    }

    #[test]
    fn test_element_class_and_style_round_trip() {
        let mut elem = ElementData::new("DIV");
        assert_eq!(elem.tag, "div");
        assert_eq!(elem.tag_name(), "DIV");

        let mut classes = elem.class_list();
        classes.add("a");
        classes.add("b");
        elem.set_class_list(&classes);
        assert_eq!(elem.get_attr("class"), Some("a b"));

        let mut style = elem.style();
        style.set_property("color", "red");
        elem.set_style(&style);
        assert_eq!(elem.get_attr("style"), Some("color:red;"));
    }
}
