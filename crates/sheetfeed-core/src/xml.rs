//! XML to feed tree conversion.
//!
//! [`FeedTreeBuilder`] accepts the response body in chunks and, once the
//! body is complete, turns the whole document into a [`FeedNode`]:
//!
//! - children of the root element become keys of the top-level map, except
//!   `<entry>` elements which are collected under `items`
//! - element and attribute names are lowercased
//! - a leaf without attributes becomes [`FeedNode::Text`], or an empty map
//!   when it has no text either
//! - an element with attributes or children becomes a map, with its text
//!   under `text`
//! - repeated keys collapse into a [`FeedNode::List`]

use quick_xml::Reader;
use quick_xml::events::attributes::AttrError;
use quick_xml::events::{BytesStart, Event};
use thiserror::Error;
use tracing::trace;

use crate::tree::{FeedMap, FeedNode, TEXT_KEY};

/// Top-level key collecting the feed's `<entry>` elements.
pub const ITEMS_KEY: &str = "items";

const ENTRY_ELEMENT: &str = "entry";

/// Errors produced while building a feed tree.
#[derive(Debug, Error)]
pub enum TreeError {
    /// The document is not well-formed XML.
    #[error("malformed feed XML: {0}")]
    Xml(#[from] quick_xml::Error),

    /// An attribute could not be parsed.
    #[error("malformed feed attribute: {0}")]
    Attribute(#[from] AttrError),

    /// The document ended before an element was closed.
    #[error("feed ended inside <{0}>")]
    Unclosed(String),

    /// The document has no root element.
    #[error("feed document has no root element")]
    MissingRoot,
}

/// Incremental builder for a feed tree.
///
/// Chunks are buffered by [`write`](Self::write); the tree is only assembled
/// by [`end`](Self::end), once the entire body has been received.
#[derive(Debug, Default)]
pub struct FeedTreeBuilder {
    buf: Vec<u8>,
}

impl FeedTreeBuilder {
    /// Creates an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a chunk of the document.
    pub fn write(&mut self, chunk: &[u8]) {
        self.buf.extend_from_slice(chunk);
    }

    /// Returns the number of bytes received so far.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Returns true if nothing has been written yet.
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Finishes the document and assembles the tree.
    pub fn end(self) -> Result<FeedNode, TreeError> {
        trace!(bytes = self.buf.len(), "assembling feed tree");
        parse_feed(&self.buf)
    }
}

/// An element that has been opened but not yet closed.
struct Frame {
    name: String,
    attrs: FeedMap,
    children: FeedMap,
    text: String,
}

impl Frame {
    fn open(start: &BytesStart<'_>) -> Result<Self, TreeError> {
        let name = String::from_utf8_lossy(start.name().as_ref()).to_lowercase();
        let mut attrs = FeedMap::new();
        for attr in start.attributes() {
            let attr = attr?;
            let key = String::from_utf8_lossy(attr.key.as_ref()).to_lowercase();
            if key == "xmlns" || key.starts_with("xmlns:") {
                continue;
            }
            let value = attr.unescape_value()?.into_owned();
            attrs.insert(key, FeedNode::Text(value));
        }

        Ok(Self {
            name,
            attrs,
            children: FeedMap::new(),
            text: String::new(),
        })
    }

    fn into_node(self) -> FeedNode {
        if self.attrs.is_empty() && self.children.is_empty() {
            if self.text.is_empty() {
                return FeedNode::Map(FeedMap::new());
            }
            return FeedNode::Text(self.text);
        }

        let mut map = self.attrs;
        for (key, value) in self.children {
            map.insert(key, value);
        }
        if !self.text.is_empty() {
            map.insert(TEXT_KEY, FeedNode::Text(self.text));
        }
        FeedNode::Map(map)
    }
}

/// Parses a complete feed document into a tree.
///
/// Text values are kept verbatim, including surrounding spaces; only
/// whitespace-only text between elements is dropped.
pub fn parse_feed(xml: &[u8]) -> Result<FeedNode, TreeError> {
    let mut reader = Reader::from_reader(xml);

    let mut stack: Vec<Frame> = Vec::new();
    let mut root: Option<FeedNode> = None;
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) => stack.push(Frame::open(&e)?),
            Event::Empty(e) => {
                let frame = Frame::open(&e)?;
                close(&mut stack, &mut root, frame);
            }
            Event::End(_) => {
                if let Some(frame) = stack.pop() {
                    close(&mut stack, &mut root, frame);
                }
            }
            Event::Text(e) => {
                let text = e.unescape()?;
                // Whitespace-only runs are indentation between elements.
                if let Some(top) = stack.last_mut().filter(|_| !text.trim().is_empty()) {
                    top.text.push_str(&text);
                }
            }
            Event::CData(e) => {
                if let Some(top) = stack.last_mut() {
                    top.text.push_str(&String::from_utf8_lossy(&e));
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    if let Some(open) = stack.pop() {
        return Err(TreeError::Unclosed(open.name));
    }
    root.ok_or(TreeError::MissingRoot)
}

/// Attaches a closed element to its parent, or makes it the root.
fn close(stack: &mut [Frame], root: &mut Option<FeedNode>, frame: Frame) {
    let depth = stack.len();
    match stack.last_mut() {
        Some(parent) => {
            let key = if depth == 1 && frame.name == ENTRY_ELEMENT {
                ITEMS_KEY.to_string()
            } else {
                frame.name.clone()
            };
            parent.children.append(key, frame.into_node());
        }
        None => {
            // Root attributes carry namespaces and feed-level metadata that
            // the tree does not expose.
            *root = Some(FeedNode::Map(frame.children));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WORKSHEETS_FEED: &str = r#"<?xml version='1.0' encoding='UTF-8'?>
<feed xmlns='http://www.w3.org/2005/Atom' xmlns:gs='http://schemas.google.com/spreadsheets/2006'>
  <id>https://spreadsheets.google.com/feeds/worksheets/KEY/public/values</id>
  <updated>2013-05-01T10:00:00.000Z</updated>
  <title type='text'>Budget</title>
  <author><name>alice</name><email>alice@example.com</email></author>
  <entry>
    <id>https://spreadsheets.google.com/feeds/worksheets/KEY/public/values/od6</id>
    <title type='text'>Sheet1</title>
    <gs:rowCount>100</gs:rowCount>
    <gs:colCount>20</gs:colCount>
  </entry>
  <entry>
    <id>https://spreadsheets.google.com/feeds/worksheets/KEY/public/values/od7</id>
    <title type='text'>Sheet2</title>
    <gs:rowCount>5</gs:rowCount>
    <gs:colCount>3</gs:colCount>
  </entry>
</feed>"#;

    #[test]
    fn builds_top_level_map() {
        let tree = parse_feed(WORKSHEETS_FEED.as_bytes()).unwrap();

        assert_eq!(tree.text_at("updated"), Some("2013-05-01T10:00:00.000Z"));
        assert_eq!(tree.get("title").and_then(|t| t.text_leaf()), Some("Budget"));
        assert_eq!(tree.get("title").and_then(|t| t.text_at("type")), Some("text"));

        let author = tree.get("author").unwrap();
        assert_eq!(author.text_at("name"), Some("alice"));
        assert_eq!(author.text_at("email"), Some("alice@example.com"));
    }

    #[test]
    fn entries_are_collected_under_items() {
        let tree = parse_feed(WORKSHEETS_FEED.as_bytes()).unwrap();
        assert!(tree.get("entry").is_none());

        let items = tree.items(ITEMS_KEY);
        assert_eq!(items.len(), 2);
        assert_eq!(items[1].text_at("gs:rowcount"), Some("5"));
        assert_eq!(items[1].text_at("gs:colcount"), Some("3"));
    }

    #[test]
    fn single_entry_stays_bare() {
        let xml = "<feed><entry><id>one</id></entry></feed>";
        let tree = parse_feed(xml.as_bytes()).unwrap();

        let items = tree.get(ITEMS_KEY).unwrap();
        assert!(matches!(items, FeedNode::Map(_)));
        assert_eq!(items.text_at("id"), Some("one"));
    }

    #[test]
    fn empty_element_becomes_empty_map() {
        let xml = "<feed><entry><gsx:notes></gsx:notes><gsx:flag/></entry></feed>";
        let tree = parse_feed(xml.as_bytes()).unwrap();
        let entry = tree.get(ITEMS_KEY).unwrap();

        assert!(entry.get("gsx:notes").unwrap().is_empty_map());
        assert!(entry.get("gsx:flag").unwrap().is_empty_map());
    }

    #[test]
    fn attributes_and_text_share_a_map() {
        let xml = r#"<feed><entry><gs:cell row="2" col="3" inputValue="=A1">42</gs:cell></entry></feed>"#;
        let tree = parse_feed(xml.as_bytes()).unwrap();
        let cell = tree.get(ITEMS_KEY).and_then(|e| e.get("gs:cell")).unwrap();

        assert_eq!(cell.text_at("row"), Some("2"));
        assert_eq!(cell.text_at("col"), Some("3"));
        assert_eq!(cell.text_at("inputvalue"), Some("=A1"));
        assert_eq!(cell.text_leaf(), Some("42"));
    }

    #[test]
    fn repeated_children_become_list() {
        let xml = r#"<feed><entry><link rel="self" href="a"/><link rel="edit" href="b"/></entry></feed>"#;
        let tree = parse_feed(xml.as_bytes()).unwrap();
        let entry = tree.get(ITEMS_KEY).unwrap();

        let links = entry.items("link");
        assert_eq!(links.len(), 2);
        assert_eq!(links[0].text_at("href"), Some("a"));
        assert_eq!(links[1].text_at("rel"), Some("edit"));
    }

    #[test]
    fn entities_are_unescaped() {
        let xml = "<feed><title>Fish &amp; Chips</title></feed>";
        let tree = parse_feed(xml.as_bytes()).unwrap();
        assert_eq!(tree.text_at("title"), Some("Fish & Chips"));
    }

    #[test]
    fn values_keep_surrounding_spaces() {
        let xml = r#"<feed>
  <entry>
    <gsx:name>  Alice </gsx:name>
    <gs:cell row="1" col="1">  padded  </gs:cell>
  </entry>
</feed>"#;
        let tree = parse_feed(xml.as_bytes()).unwrap();
        let entry = tree.get("items").unwrap();

        assert_eq!(entry.text_at("gsx:name"), Some("  Alice "));
        assert_eq!(
            entry.get("gs:cell").and_then(|c| c.text_leaf()),
            Some("  padded  ")
        );
        assert_eq!(entry.text_leaf(), None);
        assert!(tree.text_leaf().is_none());
    }

    #[test]
    fn chunked_writes_match_single_parse() {
        let mut builder = FeedTreeBuilder::new();
        assert!(builder.is_empty());
        for chunk in WORKSHEETS_FEED.as_bytes().chunks(7) {
            builder.write(chunk);
        }
        assert_eq!(builder.len(), WORKSHEETS_FEED.len());

        let tree = builder.end().unwrap();
        assert_eq!(tree, parse_feed(WORKSHEETS_FEED.as_bytes()).unwrap());
    }

    #[test]
    fn mismatched_tags_are_rejected() {
        let err = parse_feed(b"<feed><title>x</feed>").unwrap_err();
        assert!(matches!(err, TreeError::Xml(_)));
    }

    #[test]
    fn truncated_document_is_rejected() {
        let err = parse_feed(b"<feed><title>x").unwrap_err();
        assert!(matches!(err, TreeError::Unclosed(_) | TreeError::Xml(_)));
    }

    #[test]
    fn empty_document_has_no_root() {
        let err = FeedTreeBuilder::new().end().unwrap_err();
        assert!(matches!(err, TreeError::MissingRoot));
    }
}
