//! Domain types shared by the layer builder and its strategies.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::hash::Hasher;
use twox_hash::XxHash64;

pub type DocId = String;
pub type Meta = HashMap<String, String>;

/// Metadata key under which a summary lists the ids it was built from.
pub const CHILDREN_KEY: &str = "children";

/// An immutable unit of text with identity and free-form metadata.
///
/// Layer 0 documents come from ingestion; every later document is the
/// summary of one block of the layer below.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub id: DocId,
    pub text: String,
    #[serde(default)]
    pub metadata: Meta,
}

impl Document {
    pub fn new(id: impl Into<DocId>, text: impl Into<String>) -> Self {
        Self { id: id.into(), text: text.into(), metadata: Meta::new() }
    }

    pub fn with_meta(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Builds a summary document whose id is a digest of the child ids.
    ///
    /// The same children always yield the same id, so rebuilding a hierarchy
    /// from the same input reproduces the same identifiers.
    pub fn summary_of(text: impl Into<String>, children: &[Document]) -> Self {
        let mut hasher = XxHash64::with_seed(0);
        for child in children {
            hasher.write(child.id.as_bytes());
            hasher.write_u8(0);
        }
        let children_ids = children.iter().map(|c| c.id.as_str()).collect::<Vec<_>>().join(",");
        Self::new(format!("summary:{:016x}", hasher.finish()), text).with_meta(CHILDREN_KEY, children_ids)
    }

    /// Ids recorded by [`Document::summary_of`], empty for ingested documents.
    pub fn children(&self) -> Vec<&str> {
        self.metadata
            .get(CHILDREN_KEY)
            .map(|s| s.split(',').filter(|id| !id.is_empty()).collect())
            .unwrap_or_default()
    }
}

/// An ordered group of nodes summarized together into one document.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Block {
    pub nodes: Vec<Document>,
}

impl Block {
    pub fn new(nodes: Vec<Document>) -> Self { Self { nodes } }

    pub fn len(&self) -> usize { self.nodes.len() }

    pub fn is_empty(&self) -> bool { self.nodes.is_empty() }

    pub fn node_ids(&self) -> Vec<&str> { self.nodes.iter().map(|n| n.id.as_str()).collect() }

    /// Node texts joined with `separator`, in block order.
    pub fn text(&self, separator: &str) -> String {
        self.nodes.iter().map(|n| n.text.as_str()).collect::<Vec<_>>().join(separator)
    }
}

/// All blocks derived from one layer, in summary order.
pub type Partition = Vec<Block>;

/// Parameters handed to an index when a query engine is built for it.
///
/// `extra` carries engine-specific settings the core does not interpret.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryParams {
    pub similarity_top_k: usize,
    #[serde(default)]
    pub extra: Meta,
}

impl Default for QueryParams {
    fn default() -> Self { Self { similarity_top_k: 3, extra: Meta::new() } }
}

impl QueryParams {
    pub fn with_top_k(mut self, k: usize) -> Self {
        self.similarity_top_k = k;
        self
    }
}

/// One document that contributed to a [`Response`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceNode {
    pub document_id: DocId,
    pub score: f32,
    pub text: String,
}

/// Answer produced by a query engine, with optional source attribution.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Response {
    pub answer: String,
    #[serde(default)]
    pub sources: Vec<SourceNode>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_id_is_stable_and_order_sensitive() {
        let a = Document::new("a", "alpha");
        let b = Document::new("b", "bravo");
        let ab1 = Document::summary_of("x", &[a.clone(), b.clone()]);
        let ab2 = Document::summary_of("y", &[a.clone(), b.clone()]);
        let ba = Document::summary_of("x", &[b, a]);
        assert_eq!(ab1.id, ab2.id);
        assert_ne!(ab1.id, ba.id);
        assert_eq!(ab1.children(), vec!["a", "b"]);
    }

    #[test]
    fn ingested_document_has_no_children() {
        assert!(Document::new("d", "text").children().is_empty());
    }

    #[test]
    fn block_text_keeps_node_order() {
        let block = Block::new(vec![Document::new("1", "one"), Document::new("2", "two")]);
        assert_eq!(block.text(" | "), "one | two");
        assert_eq!(block.node_ids(), vec!["1", "2"]);
    }
}
