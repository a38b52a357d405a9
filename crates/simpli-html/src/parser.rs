//! HTML5 Parser implementation
//!
//! Parses with html5ever's RcDom and converts the result into the arena
//! tree.

use html5ever::parse_document;
use html5ever::tendril::TendrilSink;
use markup5ever_rcdom::{Handle, NodeData as RcNodeData, RcDom};
use simpli_dom::{Document, DomTree, NodeId};

use crate::HtmlError;

/// HTML5 parser
#[derive(Debug, Clone, Copy)]
pub struct HtmlParser {
    keep_whitespace: bool,
}

impl HtmlParser {
    /// Parser that drops whitespace-only text nodes
    pub fn new() -> Self {
        Self {
            keep_whitespace: false,
        }
    }

    /// Keep whitespace-only text nodes
    pub fn keep_whitespace(mut self, keep: bool) -> Self {
        self.keep_whitespace = keep;
        self
    }

    /// Parse HTML string into a Document
    pub fn parse(&self, html: &str) -> Result<Document, HtmlError> {
        self.parse_with_url(html, "about:blank")
    }

    /// Parse HTML with a document URL
    pub fn parse_with_url(&self, html: &str, url: &str) -> Result<Document, HtmlError> {
        tracing::debug!(url, "parsing HTML document");
        let dom = Self::read(html)?;

        let mut tree = DomTree::new();
        let root = tree.root();
        self.convert_node(&dom.document, &mut tree, root)?;
        let document = Document::from_tree(tree, url);

        tracing::debug!(nodes = document.tree.len(), "parsed");
        Ok(document)
    }

    /// Parse `markup` as body content and append it to `parent`.
    /// Returns the top-level nodes created.
    pub fn parse_fragment_into(
        &self,
        tree: &mut DomTree,
        parent: NodeId,
        markup: &str,
    ) -> Result<Vec<NodeId>, HtmlError> {
        let dom = Self::read(markup)?;
        let Some(body) = find_element(&dom.document, "body") else {
            return Ok(Vec::new());
        };
        let before = tree.children(parent).len();
        for child in body.children.borrow().iter() {
            self.convert_node(child, tree, parent)?;
        }
        Ok(tree.children(parent).into_iter().skip(before).collect())
    }

    fn read(html: &str) -> Result<RcDom, HtmlError> {
        let dom = parse_document(RcDom::default(), Default::default())
            .from_utf8()
            .read_from(&mut html.as_bytes())?;
        Ok(dom)
    }

    /// Convert an RcDom node (and its subtree) under `parent`
    fn convert_node(&self, handle: &Handle, tree: &mut DomTree, parent: NodeId) -> Result<(), HtmlError> {
        match &handle.data {
            RcNodeData::Document => {
                for child in handle.children.borrow().iter() {
                    self.convert_node(child, tree, parent)?;
                }
            }
            RcNodeData::Doctype { name, .. } => {
                let id = tree.create_doctype(name);
                tree.append_child(parent, id)?;
            }
            RcNodeData::Text { contents } => {
                let text = contents.borrow();
                if self.keep_whitespace || !text.trim().is_empty() {
                    let id = tree.create_text(&text);
                    tree.append_child(parent, id)?;
                }
            }
            RcNodeData::Comment { contents } => {
                let id = tree.create_comment(contents);
                tree.append_child(parent, id)?;
            }
            RcNodeData::Element { name, attrs, .. } => {
                let id = tree.create_element(&name.local);
                {
                    let elem = tree.element_mut(id)?;
                    for attr in attrs.borrow().iter() {
                        elem.set_attr(&attr.name.local, &attr.value);
                    }
                }
                tree.append_child(parent, id)?;

                for child in handle.children.borrow().iter() {
                    self.convert_node(child, tree, id)?;
                }
            }
            RcNodeData::ProcessingInstruction { .. } => {}
        }
        Ok(())
    }
}

impl Default for HtmlParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Depth-first search for the first element named `tag`
fn find_element(handle: &Handle, tag: &str) -> Option<Handle> {
    if let RcNodeData::Element { name, .. } = &handle.data {
        if &*name.local == tag {
            return Some(handle.clone());
        }
    }
    handle
        .children
        .borrow()
        .iter()
        .find_map(|child| find_element(child, tag))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple() {
        let html = "<html><head><title>Test</title></head><body><p>Hello</p></body></html>";
        let doc = HtmlParser::new().parse(html).unwrap();

        assert_eq!(doc.title(), "Test");
        let p = doc.tree.element_children(doc.body());
        assert_eq!(p.len(), 1);
        assert_eq!(doc.tree.text_content(p[0]), "Hello");
    }

    #[test]
    fn test_parse_fragment_wraps_in_body() {
        let doc = HtmlParser::new().parse("<div><span>Text</span></div>").unwrap();
        let divs = doc.tree.query_selector_all(doc.body(), "div > span").unwrap();
        assert_eq!(divs.len(), 1);
    }

    #[test]
    fn test_parse_fragment_into() {
        let mut doc = simpli_dom::Document::new();
        let body = doc.body();
        let parser = HtmlParser::new().keep_whitespace(true);
        let created = parser
            .parse_fragment_into(&mut doc.tree, body, "<b>a</b> <i class=\"x\">b</i>")
            .unwrap();

        assert_eq!(created.len(), 3);
        assert_eq!(doc.tree.inner_html(body), "<b>a</b> <i class=\"x\">b</i>");
    }
}
