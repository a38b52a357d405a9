//! Selector queries
//!
//! querySelectorAll over the arena tree. Supported grammar: `*`, type,
//! `#id`, `.class`, `[attr]`, `[attr=value]`, the descendant and `>`
//! combinators, and comma-separated lists. Anything else is rejected.

use crate::{DomError, DomResult, DomTree, NodeId};

/// One simple selector
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SimpleSelector {
    Universal,
    Tag(String),
    Id(String),
    Class(String),
    Attribute { name: String, value: Option<String> },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Combinator {
    Descendant,
    Child,
}

/// Simple selectors that must all match the same element
#[derive(Debug, Clone, PartialEq, Eq)]
struct Compound(Vec<SimpleSelector>);

impl Compound {
    fn matches(&self, tree: &DomTree, id: NodeId) -> bool {
        let Ok(elem) = tree.element(id) else {
            return false;
        };
        self.0.iter().all(|simple| match simple {
            SimpleSelector::Universal => true,
            SimpleSelector::Tag(tag) => elem.tag == *tag,
            SimpleSelector::Id(want) => elem.id() == Some(want.as_str()),
            SimpleSelector::Class(class) => elem.class_list().contains(class),
            SimpleSelector::Attribute { name, value: None } => elem.attrs.has(name),
            SimpleSelector::Attribute { name, value: Some(want) } => {
                elem.get_attr(name) == Some(want.as_str())
            }
        })
    }
}

/// A complex selector (compounds joined by combinators)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    compounds: Vec<Compound>,
    /// `combinators[i]` joins `compounds[i]` and `compounds[i + 1]`
    combinators: Vec<Combinator>,
}

impl Selector {
    /// Whether element `id` matches, evaluated right to left
    pub fn matches(&self, tree: &DomTree, id: NodeId) -> bool {
        self.matches_at(tree, id, self.compounds.len() - 1)
    }

    fn matches_at(&self, tree: &DomTree, id: NodeId, index: usize) -> bool {
        if !self.compounds[index].matches(tree, id) {
            return false;
        }
        if index == 0 {
            return true;
        }
        match self.combinators[index - 1] {
            Combinator::Child => tree
                .parent(id)
                .is_some_and(|p| self.matches_at(tree, p, index - 1)),
            Combinator::Descendant => tree
                .ancestors(id)
                .into_iter()
                .any(|a| self.matches_at(tree, a, index - 1)),
        }
    }
}

/// Comma-separated selector list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectorList(Vec<Selector>);

impl SelectorList {
    pub fn parse(input: &str) -> DomResult<Self> {
        let mut parser = Parser::new(input);
        let mut selectors = vec![parser.complex()?];
        loop {
            parser.skip_ws();
            match parser.peek() {
                None => break,
                Some(',') => {
                    parser.bump();
                    selectors.push(parser.complex()?);
                }
                Some(c) => return Err(parser.error(&format!("unexpected '{c}'"))),
            }
        }
        Ok(Self(selectors))
    }

    pub fn matches(&self, tree: &DomTree, id: NodeId) -> bool {
        self.0.iter().any(|s| s.matches(tree, id))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

struct Parser<'a> {
    source: &'a str,
    chars: Vec<char>,
    pos: usize,
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_' || !c.is_ascii()
}

impl<'a> Parser<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            source,
            chars: source.chars().collect(),
            pos: 0,
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn bump(&mut self) {
        self.pos += 1;
    }

    /// Skip whitespace, returns whether any was skipped
    fn skip_ws(&mut self) -> bool {
        let start = self.pos;
        while self.peek().is_some_and(char::is_whitespace) {
            self.bump();
        }
        self.pos != start
    }

    fn error(&self, message: &str) -> DomError {
        DomError::InvalidSelector(format!("{message} in '{}' at {}", self.source, self.pos))
    }

    fn complex(&mut self) -> DomResult<Selector> {
        self.skip_ws();
        let mut compounds = vec![self.compound()?];
        let mut combinators = Vec::new();
        loop {
            let had_ws = self.skip_ws();
            match self.peek() {
                None | Some(',') => break,
                Some('>') => {
                    self.bump();
                    self.skip_ws();
                    combinators.push(Combinator::Child);
                    compounds.push(self.compound()?);
                }
                Some(_) if had_ws => {
                    combinators.push(Combinator::Descendant);
                    compounds.push(self.compound()?);
                }
                Some(c) => return Err(self.error(&format!("unexpected '{c}'"))),
            }
        }
        Ok(Selector {
            compounds,
            combinators,
        })
    }

    fn compound(&mut self) -> DomResult<Compound> {
        let mut parts = Vec::new();
        match self.peek() {
            Some('*') => {
                self.bump();
                parts.push(SimpleSelector::Universal);
            }
            Some(c) if is_ident_char(c) => {
                parts.push(SimpleSelector::Tag(self.ident()?.to_ascii_lowercase()));
            }
            _ => {}
        }
        loop {
            match self.peek() {
                Some('#') => {
                    self.bump();
                    parts.push(SimpleSelector::Id(self.ident()?));
                }
                Some('.') => {
                    self.bump();
                    parts.push(SimpleSelector::Class(self.ident()?));
                }
                Some('[') => {
                    self.bump();
                    parts.push(self.attribute()?);
                }
                _ => break,
            }
        }
        if parts.is_empty() {
            return Err(self.error("expected a selector"));
        }
        Ok(Compound(parts))
    }

    fn ident(&mut self) -> DomResult<String> {
        let start = self.pos;
        while self.peek().is_some_and(is_ident_char) {
            self.bump();
        }
        if start == self.pos {
            return Err(self.error("expected an identifier"));
        }
        Ok(self.chars[start..self.pos].iter().collect())
    }

    fn attribute(&mut self) -> DomResult<SimpleSelector> {
        self.skip_ws();
        let name = self.ident()?.to_ascii_lowercase();
        self.skip_ws();
        let value = if self.peek() == Some('=') {
            self.bump();
            self.skip_ws();
            let value = match self.peek() {
                Some(q @ ('"' | '\'')) => self.quoted(q)?,
                _ => self.ident()?,
            };
            self.skip_ws();
            Some(value)
        } else {
            None
        };
        if self.peek() != Some(']') {
            return Err(self.error("expected ']'"));
        }
        self.bump();
        Ok(SimpleSelector::Attribute { name, value })
    }

    fn quoted(&mut self, quote: char) -> DomResult<String> {
        self.bump();
        let start = self.pos;
        while let Some(c) = self.peek() {
            if c == quote {
                let value = self.chars[start..self.pos].iter().collect();
                self.bump();
                return Ok(value);
            }
            self.bump();
        }
        Err(self.error("unterminated string"))
    }
}

impl DomTree {
    /// All descendant elements of `root` matching `selector`, in document order
    pub fn query_selector_all(&self, root: NodeId, selector: &str) -> DomResult<Vec<NodeId>> {
        let list = SelectorList::parse(selector)?;
        Ok(self
            .descendants(root)
            .into_iter()
            .filter(|&id| list.matches(self, id))
            .collect())
    }

    /// First descendant element of `root` matching `selector`
    pub fn query_selector(&self, root: NodeId, selector: &str) -> DomResult<Option<NodeId>> {
        let list = SelectorList::parse(selector)?;
        Ok(self
            .descendants(root)
            .into_iter()
            .find(|&id| list.matches(self, id)))
    }

    /// Element.matches
    pub fn matches(&self, id: NodeId, selector: &str) -> DomResult<bool> {
        Ok(SelectorList::parse(selector)?.matches(self, id))
    }
}
