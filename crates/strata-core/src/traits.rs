//! Strategy contracts that parameterize the layer builder.
//!
//! Each contract is a single-method trait. Closures with the matching
//! signature implement them, so tests and small callers can pass a lambda
//! while real collaborators get a named type.

use crate::error::Result;
use crate::layer::Layer;
use crate::types::{Block, Document, Partition, QueryParams, Response};

/// Reads a resource into the ordered documents of layer 0.
pub trait Ingestor {
    fn ingest(&self, locator: &str) -> Result<Vec<Document>>;
}

/// Splits a layer into the blocks that become the next layer's documents.
///
/// Returning no blocks signals convergence to the builder.
pub trait Partitioner {
    fn partition(&self, layer: &Layer) -> Result<Partition>;
}

/// Reduces one block to a single, shorter document.
pub trait Summarizer {
    fn summarize(&self, block: &Block) -> Result<Document>;
}

/// Builds a searchable index over an ordered document collection.
///
/// Must accept the empty collection and must not return a partially built
/// index.
pub trait IndexBuilder {
    fn create_index(&self, documents: &[Document]) -> Result<Box<dyn LayerIndex>>;

    /// Same as [`IndexBuilder::create_index`] for the layer at `level`.
    /// Builders that keep per-layer state key it by level.
    fn create_layer_index(&self, _level: usize, documents: &[Document]) -> Result<Box<dyn LayerIndex>> {
        self.create_index(documents)
    }
}

/// An immutable index over one layer's documents.
pub trait LayerIndex: Send + Sync {
    /// Number of documents the index was built over.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool { self.len() == 0 }

    fn query_engine(&self, params: &QueryParams) -> Result<Box<dyn QueryEngine + '_>>;
}

pub trait QueryEngine {
    fn query(&self, text: &str) -> Result<Response>;
}

impl<F> Ingestor for F where F: Fn(&str) -> Result<Vec<Document>> {
    fn ingest(&self, locator: &str) -> Result<Vec<Document>> { self(locator) }
}

impl<F> Partitioner for F where F: Fn(&Layer) -> Result<Partition> {
    fn partition(&self, layer: &Layer) -> Result<Partition> { self(layer) }
}

impl<F> Summarizer for F where F: Fn(&Block) -> Result<Document> {
    fn summarize(&self, block: &Block) -> Result<Document> { self(block) }
}

impl<F> IndexBuilder for F where F: Fn(&[Document]) -> Result<Box<dyn LayerIndex>> {
    fn create_index(&self, documents: &[Document]) -> Result<Box<dyn LayerIndex>> { self(documents) }
}
