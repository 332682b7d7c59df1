//! Generic XML tree parsing for feed documents.
//!
//! Feeds in the wild carry vendor extensions, namespace-prefixed
//! elements, and drifting optional structure. Instead of binding to a
//! fixed RSS schema, this module folds the `quick-xml` event stream
//! into a generic order-preserving [`Node`] tree and leaves all
//! interpretation to the normalizer. Unknown namespaces and elements
//! pass through as ordinary tagged nodes; prefixed names (e.g.
//! `itunes:author`) are kept as literal tag strings.

use quick_xml::events::Event;
use quick_xml::Reader;
use std::collections::HashMap;
use thiserror::Error;

/// SEC-003: Maximum element nesting depth. Prevents unbounded stack
/// growth from maliciously nested documents.
const MAX_XML_DEPTH: usize = 100;

/// Errors produced while parsing a feed document into a [`Node`] tree.
#[derive(Debug, Error)]
pub enum XmlError {
    /// The underlying XML reader rejected the document.
    #[error("XML parse error: {0}")]
    Malformed(#[from] quick_xml::Error),

    /// An attribute could not be decoded or unescaped.
    #[error("XML attribute error: {0}")]
    Attribute(String),

    /// The document ended before the root element was closed.
    #[error("Unexpected end of document inside <{0}>")]
    UnexpectedEof(String),

    /// The document contains no element at all.
    #[error("Document contains no root element")]
    NoRoot,

    /// Content found after the root element closed.
    #[error("Trailing content after root element")]
    TrailingContent,

    /// SEC-003: Nesting depth exceeds safety limit.
    #[error("XML nesting depth exceeds maximum of {0} levels")]
    MaxDepthExceeded(usize),
}

/// One element in the parsed tree: tag name, attributes, ordered
/// children, and accumulated text content.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Node {
    /// Tag name as written in the document, prefix included.
    pub name: String,
    pub attributes: HashMap<String, String>,
    /// Child elements in document order.
    pub children: Vec<Node>,
    /// Concatenated text/CDATA content, trimmed. `None` when empty.
    pub text: Option<String>,
}

impl Node {
    fn named(name: String) -> Self {
        Node {
            name,
            ..Node::default()
        }
    }

    /// First child with the given tag name, or `None`.
    ///
    /// Single-valued feed elements (title, description, ...) sometimes
    /// appear more than once in sloppy feeds; the first occurrence wins.
    pub fn child(&self, name: &str) -> Option<&Node> {
        self.children.iter().find(|c| c.name == name)
    }

    /// All children with the given tag name, in document order.
    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Node> {
        self.children.iter().filter(move |c| c.name == name)
    }

    /// Attribute value by name, or `None`.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    /// Text of the first child with the given tag name.
    ///
    /// This is the safe-lookup-with-default accessor the normalizer is
    /// built on: a missing child, or a present-but-empty one, both
    /// yield `None` rather than an error.
    pub fn child_text(&self, name: &str) -> Option<String> {
        self.child(name).and_then(|c| c.text.clone())
    }

    /// Attribute of the first child with the given tag name.
    pub fn child_attr(&self, name: &str, attr: &str) -> Option<String> {
        self.child(name).and_then(|c| c.attr(attr)).map(str::to_owned)
    }
}

/// Parses raw feed bytes into a generic element tree.
///
/// Tolerates XML declarations, comments, processing instructions, and
/// DOCTYPE before or after the root. Any malformed-XML condition is
/// returned as an [`XmlError`] value; this function never panics on
/// untrusted input.
///
/// # Security
///
/// XXE is structurally mitigated: `quick-xml` (0.37) does not parse
/// `<!ENTITY>` declarations, and unescaping resolves only the five XML
/// builtin entities. Custom entities fail the unescape step and surface
/// as a parse error.
pub fn parse(bytes: &[u8]) -> Result<Node, XmlError> {
    let mut reader = Reader::from_reader(bytes);
    reader.config_mut().trim_text(true);

    // Elements currently open, innermost last. The completed root is
    // moved into `root` when its end tag arrives.
    let mut stack: Vec<Node> = Vec::new();
    let mut root: Option<Node> = None;
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) => {
                if root.is_some() && stack.is_empty() {
                    return Err(XmlError::TrailingContent);
                }
                if stack.len() >= MAX_XML_DEPTH {
                    return Err(XmlError::MaxDepthExceeded(MAX_XML_DEPTH));
                }
                stack.push(open_node(&e, &reader)?);
            }
            Event::Empty(e) => {
                if root.is_some() && stack.is_empty() {
                    return Err(XmlError::TrailingContent);
                }
                let node = open_node(&e, &reader)?;
                attach(&mut stack, &mut root, node);
            }
            Event::End(_) => {
                // check_end_names is on by default, so a mismatched or
                // stray end tag has already errored in read_event_into.
                if let Some(node) = stack.pop() {
                    attach(&mut stack, &mut root, node);
                }
            }
            Event::Text(e) => {
                if let Some(current) = stack.last_mut() {
                    let text = e.unescape()?;
                    append_text(current, &text);
                }
                // Whitespace and stray text outside any element is ignored.
            }
            Event::CData(e) => {
                if let Some(current) = stack.last_mut() {
                    let text = String::from_utf8_lossy(&e.into_inner()).into_owned();
                    append_text(current, &text);
                }
            }
            Event::Decl(_) | Event::PI(_) | Event::Comment(_) | Event::DocType(_) => {}
            Event::Eof => break,
        }
        buf.clear();
    }

    if let Some(open) = stack.pop() {
        return Err(XmlError::UnexpectedEof(open.name));
    }
    root.ok_or(XmlError::NoRoot)
}

/// Builds a node from a start (or self-closing) tag, decoding its
/// attributes.
fn open_node(
    e: &quick_xml::events::BytesStart<'_>,
    reader: &Reader<&[u8]>,
) -> Result<Node, XmlError> {
    let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
    let mut node = Node::named(name);

    for attr_result in e.attributes() {
        let attr = attr_result.map_err(|e| XmlError::Attribute(e.to_string()))?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr
            .decode_and_unescape_value(reader.decoder())
            .map_err(|e| XmlError::Attribute(e.to_string()))?
            .into_owned();
        node.attributes.insert(key, value);
    }

    Ok(node)
}

/// Attaches a completed node to its parent, or records it as the root.
fn attach(stack: &mut Vec<Node>, root: &mut Option<Node>, node: Node) {
    match stack.last_mut() {
        Some(parent) => parent.children.push(node),
        None => {
            // First completed top-level element wins; a second one is
            // caught as TrailingContent at the next Start event.
            if root.is_none() {
                *root = Some(node);
            }
        }
    }
}

fn append_text(node: &mut Node, text: &str) {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return;
    }
    match &mut node.text {
        Some(existing) => {
            existing.push(' ');
            existing.push_str(trimmed);
        }
        None => node.text = Some(trimmed.to_owned()),
    }
}
