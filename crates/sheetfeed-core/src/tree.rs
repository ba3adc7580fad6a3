//! Generic feed tree.
//!
//! The XML tree builder produces a [`FeedNode`] mirroring the element /
//! attribute / text structure of a feed document. The shape is loose: a
//! repeatable element appears as a bare node when it occurs once and as a
//! [`FeedNode::List`] when it occurs more than once, and a leaf may be plain
//! text or a map carrying a `text` entry. Use [`to_sequence`] (or
//! [`FeedNode::items`]) whenever an element may repeat.

/// Key under which an element's character data is stored when the element
/// also has attributes or children.
pub const TEXT_KEY: &str = "text";

/// A node of the generic feed tree.
#[derive(Debug, Clone, PartialEq)]
pub enum FeedNode {
    /// Character data of a leaf element without attributes.
    Text(String),
    /// An element with attributes and/or child elements.
    Map(FeedMap),
    /// A repeated element.
    List(Vec<FeedNode>),
}

/// An ordered string-keyed map of feed nodes.
///
/// Keys are unique and kept in document order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeedMap {
    entries: Vec<(String, FeedNode)>,
}

impl FeedMap {
    /// Creates an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the node stored under `key`.
    pub fn get(&self, key: &str) -> Option<&FeedNode> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    /// Inserts `value` under `key`, replacing any previous value in place.
    pub fn insert(&mut self, key: impl Into<String>, value: FeedNode) {
        let key = key.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => *slot = value,
            None => self.entries.push((key, value)),
        }
    }

    /// Adds `value` under `key`, turning the existing value into a list if
    /// the key is already present.
    pub fn append(&mut self, key: impl Into<String>, value: FeedNode) {
        let key = key.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, FeedNode::List(items))) => items.push(value),
            Some((_, slot)) => {
                let first = std::mem::replace(slot, FeedNode::List(Vec::with_capacity(2)));
                if let FeedNode::List(items) = slot {
                    items.push(first);
                    items.push(value);
                }
            }
            None => self.entries.push((key, value)),
        }
    }

    /// Iterates over the entries in document order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FeedNode)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Returns the number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the map has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl IntoIterator for FeedMap {
    type Item = (String, FeedNode);
    type IntoIter = std::vec::IntoIter<(String, FeedNode)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<K: Into<String>> FromIterator<(K, FeedNode)> for FeedMap {
    fn from_iter<I: IntoIterator<Item = (K, FeedNode)>>(iter: I) -> Self {
        let mut map = FeedMap::new();
        for (key, value) in iter {
            map.insert(key, value);
        }
        map
    }
}

impl FeedNode {
    /// Builds a map node from key/value pairs.
    pub fn map<K: Into<String>>(entries: impl IntoIterator<Item = (K, FeedNode)>) -> Self {
        FeedNode::Map(entries.into_iter().collect())
    }

    /// Looks up a child of a map node. Other nodes have no children.
    pub fn get(&self, key: &str) -> Option<&FeedNode> {
        match self {
            FeedNode::Map(map) => map.get(key),
            _ => None,
        }
    }

    /// Returns the string of a [`FeedNode::Text`] node.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FeedNode::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Returns the `text` leaf of a map node.
    pub fn text_leaf(&self) -> Option<&str> {
        self.get(TEXT_KEY).and_then(FeedNode::as_text)
    }

    /// Returns the textual value of a leaf, whether it arrived as plain text
    /// or as a map with a `text` leaf.
    pub fn text(&self) -> Option<&str> {
        self.as_text().or_else(|| self.text_leaf())
    }

    /// Shorthand for `self.get(key).and_then(FeedNode::text)`.
    pub fn text_at(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(FeedNode::text)
    }

    /// Returns true for a map with no entries.
    ///
    /// Empty elements (no attributes, children or text) are encoded this
    /// way, and usually mean "no value".
    pub fn is_empty_map(&self) -> bool {
        matches!(self, FeedNode::Map(map) if map.is_empty())
    }

    /// Returns the child under `key` as a sequence: empty when absent,
    /// otherwise coerced with [`to_sequence`].
    pub fn items(&self, key: &str) -> Vec<&FeedNode> {
        self.get(key).map(to_sequence).unwrap_or_default()
    }
}

impl From<&str> for FeedNode {
    fn from(text: &str) -> Self {
        FeedNode::Text(text.to_string())
    }
}

impl From<String> for FeedNode {
    fn from(text: String) -> Self {
        FeedNode::Text(text)
    }
}

/// Coerces a node that may be a singleton or a list into a sequence.
///
/// A list yields its items in order; anything else yields a one-element
/// sequence.
pub fn to_sequence(node: &FeedNode) -> Vec<&FeedNode> {
    match node {
        FeedNode::List(items) => items.iter().collect(),
        other => vec![other],
    }
}
