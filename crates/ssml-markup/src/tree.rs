//! Minimal element tree over `quick-xml` events.
//!
//! Text is attached the way speech markup needs it: an element's `text` is
//! the content before its first child, and each child's `tail` is the
//! content between that child's end tag and the next sibling.

use quick_xml::Reader;
use quick_xml::events::attributes::AttrError;
use quick_xml::events::{BytesStart, Event};

/// Deepest element nesting accepted by [`parse`].
pub const MAX_DEPTH: usize = 256;

/// Reasons a document is not a well-formed element tree.
#[derive(Debug, thiserror::Error)]
pub enum TreeError {
    #[error("xml error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("malformed attribute: {0}")]
    Attr(#[from] AttrError),

    #[error("document has no root element")]
    Empty,

    #[error("document has more than one root element")]
    MultipleRoots,

    #[error("text outside the root element")]
    ContentOutsideRoot,

    #[error("unclosed element <{0}>")]
    Unclosed(String),

    #[error("elements nested deeper than {}", MAX_DEPTH)]
    TooDeep,
}

/// A parsed markup element.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Element {
    /// Local tag name, namespace prefix removed.
    pub name: String,
    /// Attributes in document order.
    pub attrs: Vec<(String, String)>,
    /// Text before the first child.
    pub text: String,
    /// Text after this element's end tag, up to the next sibling.
    pub tail: String,
    /// Child elements.
    pub children: Vec<Element>,
}

impl Element {
    /// Look up an attribute value by exact name.
    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    fn from_start(start: &BytesStart<'_>) -> Result<Self, TreeError> {
        let name = String::from_utf8_lossy(start.local_name().as_ref()).into_owned();
        let mut attrs = Vec::new();
        for attr in start.attributes() {
            let attr = attr?;
            let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
            let value = attr.unescape_value()?.into_owned();
            attrs.push((key, value));
        }
        Ok(Self {
            name,
            attrs,
            ..Default::default()
        })
    }
}

/// Parse `markup` into its root element.
///
/// Nesting beyond [`MAX_DEPTH`] is rejected with [`TreeError::TooDeep`], so
/// later recursive walks and drops stay bounded.
pub fn parse(markup: &str) -> Result<Element, TreeError> {
    let mut reader = Reader::from_str(markup);
    reader.config_mut().trim_text(false);

    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;

    loop {
        match reader.read_event()? {
            Event::Start(start) => {
                if root.is_some() {
                    return Err(TreeError::MultipleRoots);
                }
                if stack.len() >= MAX_DEPTH {
                    return Err(TreeError::TooDeep);
                }
                stack.push(Element::from_start(&start)?);
            }
            Event::Empty(start) => {
                if root.is_some() {
                    return Err(TreeError::MultipleRoots);
                }
                let element = Element::from_start(&start)?;
                close(element, &mut stack, &mut root);
            }
            Event::End(_) => match stack.pop() {
                Some(element) => close(element, &mut stack, &mut root),
                None => return Err(TreeError::ContentOutsideRoot),
            },
            Event::Text(text) => {
                let text = text.unescape()?;
                append_text(&mut stack, &text)?;
            }
            Event::CData(data) => {
                let data = data.into_inner();
                append_text(&mut stack, &String::from_utf8_lossy(&data))?;
            }
            Event::Eof => break,
            // comments, declarations, processing instructions, doctype
            _ => {}
        }
    }

    if let Some(open) = stack.pop() {
        return Err(TreeError::Unclosed(open.name));
    }
    root.ok_or(TreeError::Empty)
}

fn close(element: Element, stack: &mut [Element], root: &mut Option<Element>) {
    match stack.last_mut() {
        Some(parent) => parent.children.push(element),
        None => *root = Some(element),
    }
}

fn append_text(stack: &mut [Element], text: &str) -> Result<(), TreeError> {
    let Some(parent) = stack.last_mut() else {
        return if text.trim().is_empty() {
            Ok(())
        } else {
            Err(TreeError::ContentOutsideRoot)
        };
    };
    match parent.children.last_mut() {
        Some(prev) => prev.tail.push_str(text),
        None => parent.text.push_str(text),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_and_tail() {
        let root = parse(r#"<speak>A<prosody rate="fast">B<break time="1s"/>C</prosody>D</speak>"#)
            .unwrap();
        assert_eq!(root.name, "speak");
        assert_eq!(root.text, "A");
        let prosody = &root.children[0];
        assert_eq!(prosody.attr("rate"), Some("fast"));
        assert_eq!(prosody.text, "B");
        assert_eq!(prosody.tail, "D");
        assert_eq!(prosody.children[0].name, "break");
        assert_eq!(prosody.children[0].tail, "C");
    }

    #[test]
    fn test_namespace_prefix_and_entities() {
        let root = parse(r#"<s:speak xmlns:s="urn:x">Tom &amp; Jerry<![CDATA[ <raw> ]]></s:speak>"#)
            .unwrap();
        assert_eq!(root.name, "speak");
        assert_eq!(root.text, "Tom & Jerry <raw> ");
    }

    #[test]
    fn test_prolog_and_comments_ignored() {
        let root = parse("<?xml version=\"1.0\"?>\n<!-- c --><speak>x<!-- y -->z</speak>\n").unwrap();
        assert_eq!(root.text, "xz");
    }

    #[test]
    fn test_malformed_documents() {
        assert!(matches!(parse(""), Err(TreeError::Empty)));
        assert!(matches!(parse("plain text"), Err(TreeError::ContentOutsideRoot)));
        assert!(matches!(parse("<a>x</a><b/>"), Err(TreeError::MultipleRoots)));
        assert!(matches!(parse("<a>x</a> trailing"), Err(TreeError::ContentOutsideRoot)));
        assert!(matches!(parse("<a><b>x</a>"), Err(_)));
        assert!(matches!(parse("<a>unclosed"), Err(_)));
        assert!(matches!(parse(r#"<a x="1" x="2"/>"#), Err(_)));
    }

    fn nested(depth: usize) -> String {
        format!("{}x{}", "<p>".repeat(depth), "</p>".repeat(depth))
    }

    #[test]
    fn test_depth_limit() {
        let root = parse(&nested(MAX_DEPTH)).unwrap();
        assert_eq!(root.name, "p");
        assert!(matches!(parse(&nested(MAX_DEPTH + 1)), Err(TreeError::TooDeep)));
        assert!(matches!(parse(&nested(100_000)), Err(TreeError::TooDeep)));
    }
}
