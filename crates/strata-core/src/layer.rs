use std::fmt;

use crate::traits::LayerIndex;
use crate::types::Document;

/// One level of the hierarchy: an ordered document collection and the index
/// built over it. Immutable once constructed.
///
/// Level 0 holds the ingested documents; level `k` holds one summary per
/// block of level `k - 1`, in block order.
pub struct Layer {
    level: usize,
    documents: Vec<Document>,
    index: Box<dyn LayerIndex>,
}

impl Layer {
    pub fn new(level: usize, documents: Vec<Document>, index: Box<dyn LayerIndex>) -> Self {
        Self { level, documents, index }
    }

    pub fn level(&self) -> usize { self.level }

    pub fn documents(&self) -> &[Document] { &self.documents }

    pub fn index(&self) -> &dyn LayerIndex { self.index.as_ref() }

    pub fn len(&self) -> usize { self.documents.len() }

    pub fn is_empty(&self) -> bool { self.documents.is_empty() }
}

impl fmt::Debug for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Layer")
            .field("level", &self.level)
            .field("documents", &self.documents.len())
            .field("indexed", &self.index.len())
            .finish()
    }
}
