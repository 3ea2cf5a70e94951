//! Virtual node tree produced by the renderer
//!
//! Rendering builds a small element tree rather than markup text so that
//! callers (and tests) can inspect structure, attributes and styles. The
//! tree serialises to HTML with [`Node::to_html`].

use serde::Serialize;
use std::collections::BTreeMap;

use crate::core::style::StyleMap;

const VOID_ELEMENTS: &[&str] = &["img", "hr", "br", "input"];

/// A rendered node
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Node {
    Element(Element),
    Text { text: String },
    /// Renders nothing
    Empty,
}

/// An element with attributes, inline style and children
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Element {
    pub tag: String,
    pub attrs: BTreeMap<String, String>,
    pub style: StyleMap,
    pub children: Vec<Node>,
}

impl Element {
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_string(),
            attrs: BTreeMap::new(),
            style: StyleMap::new(),
            children: Vec::new(),
        }
    }

    pub fn attr(mut self, key: &str, value: impl Into<String>) -> Self {
        self.attrs.insert(key.to_string(), value.into());
        self
    }

    /// Append a class name
    pub fn class(mut self, class: &str) -> Self {
        let entry = self.attrs.entry("class".to_string()).or_default();
        if !entry.is_empty() {
            entry.push(' ');
        }
        entry.push_str(class);
        self
    }

    pub fn style(mut self, style: StyleMap) -> Self {
        self.style.merge(&style);
        self
    }

    pub fn css(mut self, key: &str, value: impl Into<crate::core::style::StyleValue>) -> Self {
        self.style.set(key, value);
        self
    }

    pub fn child(mut self, child: impl Into<Node>) -> Self {
        let child = child.into();
        if child != Node::Empty {
            self.children.push(child);
        }
        self
    }

    pub fn children(mut self, children: impl IntoIterator<Item = Node>) -> Self {
        self.children
            .extend(children.into_iter().filter(|c| *c != Node::Empty));
        self
    }

    pub fn text(self, text: &str) -> Self {
        self.child(Node::text(text))
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.attrs
            .get("class")
            .map(|c| c.split_whitespace().any(|c| c == class))
            .unwrap_or(false)
    }
}

impl From<Element> for Node {
    fn from(element: Element) -> Self {
        Node::Element(element)
    }
}

impl Node {
    pub fn text(text: &str) -> Self {
        Node::Text {
            text: text.to_string(),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Node::Empty)
    }

    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Node::Element(el) => Some(el),
            _ => None,
        }
    }

    /// Depth-first search for the first element matching `predicate`,
    /// including `self`.
    pub fn find(&self, predicate: &dyn Fn(&Element) -> bool) -> Option<&Element> {
        let el = self.as_element()?;
        if predicate(el) {
            return Some(el);
        }
        el.children.iter().find_map(|child| child.find(predicate))
    }

    /// All matching elements, depth-first
    pub fn find_all(&self, predicate: &dyn Fn(&Element) -> bool) -> Vec<&Element> {
        let mut out = Vec::new();
        self.collect(predicate, &mut out);
        out
    }

    fn collect<'a>(&'a self, predicate: &dyn Fn(&Element) -> bool, out: &mut Vec<&'a Element>) {
        if let Node::Element(el) = self {
            if predicate(el) {
                out.push(el);
            }
            for child in &el.children {
                child.collect(predicate, out);
            }
        }
    }

    /// Element carrying `attr="value"`
    pub fn find_by_attr(&self, attr: &str, value: &str) -> Option<&Element> {
        self.find(&|el| el.attrs.get(attr).map(String::as_str) == Some(value))
    }

    /// Concatenated text of this node and everything below it
    pub fn text_content(&self) -> String {
        match self {
            Node::Text { text } => text.clone(),
            Node::Element(el) => el.children.iter().map(Node::text_content).collect(),
            Node::Empty => String::new(),
        }
    }

    pub fn to_html(&self) -> String {
        let mut out = String::new();
        self.write_html(&mut out);
        out
    }

    fn write_html(&self, out: &mut String) {
        match self {
            Node::Empty => {}
            Node::Text { text } => out.push_str(&escape(text)),
            Node::Element(el) => {
                out.push('<');
                out.push_str(&el.tag);
                for (key, value) in &el.attrs {
                    out.push_str(&format!(" {}=\"{}\"", key, escape(value)));
                }
                if !el.style.is_empty() {
                    out.push_str(&format!(" style=\"{}\"", escape(&el.style.to_css())));
                }
                out.push('>');
                if VOID_ELEMENTS.contains(&el.tag.as_str()) {
                    return;
                }
                for child in &el.children {
                    child.write_html(out);
                }
                out.push_str("</");
                out.push_str(&el.tag);
                out.push('>');
            }
        }
    }
}

fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}
