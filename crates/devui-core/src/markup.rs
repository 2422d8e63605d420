//! Rendered output of overlay components.
//!
//! Components do not talk to a DOM directly; they describe what they render
//! as a small element tree that a host turns into real nodes, or that tests
//! inspect directly.
//!
//! ```
//! use devui_core::Markup;
//!
//! let html = Markup::new("div")
//!     .class("absolute z-50")
//!     .attr("role", "menu")
//!     .child(Markup::new("span").text("Copy <all>"))
//!     .to_html();
//! assert_eq!(
//!     html,
//!     r#"<div class="absolute z-50" role="menu"><span>Copy &lt;all&gt;</span></div>"#
//! );
//! ```

use serde::Serialize;
use std::fmt::Write;

/// An element in the rendered tree.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Markup {
    /// Tag name
    pub tag: String,
    /// Attributes in insertion order (excluding `class`)
    pub attrs: Vec<(String, String)>,
    /// Class list
    pub classes: Vec<String>,
    /// Text content, rendered before children
    pub text: Option<String>,
    /// Child elements
    pub children: Vec<Markup>,
}

impl Markup {
    /// Create an element with the given tag.
    #[must_use]
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Self::default()
        }
    }

    /// Append whitespace-separated classes. Empty input is ignored.
    #[must_use]
    pub fn class(mut self, classes: &str) -> Self {
        self.classes
            .extend(classes.split_whitespace().map(str::to_owned));
        self
    }

    /// Set an attribute, replacing an existing value.
    #[must_use]
    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let name = name.into();
        let value = value.into();
        if let Some(slot) = self.attrs.iter_mut().find(|(n, _)| *n == name) {
            slot.1 = value;
        } else {
            self.attrs.push((name, value));
        }
        self
    }

    /// Set text content.
    #[must_use]
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Append a child element.
    #[must_use]
    pub fn child(mut self, child: Self) -> Self {
        self.children.push(child);
        self
    }

    /// Append several child elements.
    #[must_use]
    pub fn children(mut self, children: impl IntoIterator<Item = Self>) -> Self {
        self.children.extend(children);
        self
    }

    /// Look up an attribute value.
    #[must_use]
    pub fn get_attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Check for a class.
    #[must_use]
    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    /// Depth-first search for the first element with `attr == value`.
    #[must_use]
    pub fn find_by_attr(&self, attr: &str, value: &str) -> Option<&Self> {
        if self.get_attr(attr) == Some(value) {
            return Some(self);
        }
        self.children
            .iter()
            .find_map(|c| c.find_by_attr(attr, value))
    }

    /// Concatenated text of this element and its descendants.
    #[must_use]
    pub fn text_content(&self) -> String {
        let mut out = self.text.clone().unwrap_or_default();
        for child in &self.children {
            out.push_str(&child.text_content());
        }
        out
    }

    /// Serialize to an HTML string.
    #[must_use]
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        self.write_html(&mut out);
        out
    }

    fn write_html(&self, out: &mut String) {
        out.push('<');
        out.push_str(&self.tag);
        if !self.classes.is_empty() {
            let _ = write!(out, " class=\"{}\"", escape(&self.classes.join(" ")));
        }
        for (name, value) in &self.attrs {
            let _ = write!(out, " {name}=\"{}\"", escape(value));
        }
        out.push('>');
        if let Some(text) = &self.text {
            out.push_str(&escape(text));
        }
        for child in &self.children {
            child.write_html(out);
        }
        let _ = write!(out, "</{}>", self.tag);
    }
}

fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
