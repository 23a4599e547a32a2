//! In-memory XML document structures.
//!
//! These structures represent a complete XML document loaded in memory:
//! - produced by `formats::xml::parse` and by the JSON→XML converter
//! - consumed by the XML→JSON converter and `formats::xml::write`
//!
//! Only elements and text are modelled. Comments, processing instructions
//! and the XML declaration are dropped by the parser.

/// A single node in an element's child list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum XmlNode {
    Element(XmlElement),
    Text(String),
}

/// An XML element with a qualified name (`alias:local` or `local`).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct XmlElement {
    pub name: String,

    /// Attributes in document order. Names are unique.
    pub attributes: Vec<(String, String)>,

    pub children: Vec<XmlNode>,
}

/// A complete XML document: a single root element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlDocument {
    pub root: XmlElement,
}

impl XmlDocument {
    pub fn new(root: XmlElement) -> Self {
        Self { root }
    }
}

impl XmlElement {
    /// Create an empty element with the given qualified name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Builder-style attribute setter, mainly for tests and envelope shaping.
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attribute(name, value);
        self
    }

    /// Builder-style child appender.
    pub fn with_child(mut self, child: XmlElement) -> Self {
        self.children.push(XmlNode::Element(child));
        self
    }

    /// Builder-style text appender.
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.children.push(XmlNode::Text(text.into()));
        self
    }

    /// Set an attribute, replacing the value if the name already exists.
    pub fn set_attribute(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.attributes.iter_mut().find(|(n, _)| *n == name) {
            Some(existing) => existing.1 = value,
            None => self.attributes.push((name, value)),
        }
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn append_child(&mut self, child: XmlElement) {
        self.children.push(XmlNode::Element(child));
    }

    /// Replace all text children with a single text node, keeping element
    /// children in place. An empty string just removes the text.
    pub fn set_text(&mut self, text: impl Into<String>) {
        let text = text.into();
        self.children.retain(|c| matches!(c, XmlNode::Element(_)));
        if !text.is_empty() {
            self.children.push(XmlNode::Text(text));
        }
    }

    /// Concatenation of the direct text children.
    pub fn text(&self) -> Option<String> {
        let mut out: Option<String> = None;
        for child in &self.children {
            if let XmlNode::Text(t) = child {
                out.get_or_insert_with(String::new).push_str(t);
            }
        }
        out
    }

    /// Iterate over the direct element children.
    pub fn child_elements(&self) -> impl Iterator<Item = &XmlElement> {
        self.children.iter().filter_map(|c| match c {
            XmlNode::Element(e) => Some(e),
            XmlNode::Text(_) => None,
        })
    }

    /// Namespace alias of the element name, if qualified.
    pub fn prefix(&self) -> Option<&str> {
        self.name.split_once(':').map(|(p, _)| p)
    }

    /// Element name without its namespace alias.
    pub fn local_name(&self) -> &str {
        self.name
            .split_once(':')
            .map(|(_, l)| l)
            .unwrap_or(&self.name)
    }
}
