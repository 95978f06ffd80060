//! Order-preserving partitioners.
//!
//! Both cover every document of the layer exactly once, in document order,
//! and return no blocks for a layer that is already down to one document.

use crate::error::{Error, Result};
use crate::ingest::count_tokens;
use crate::layer::Layer;
use crate::traits::Partitioner;
use crate::types::{Block, Partition};

/// Consecutive runs of `block_size` documents; `ceil(n / block_size)` blocks.
#[derive(Debug, Clone, Copy)]
pub struct FixedSizePartitioner {
    block_size: usize,
}

impl FixedSizePartitioner {
    pub fn new(block_size: usize) -> Result<Self> {
        if block_size < 2 {
            return Err(Error::InvalidConfig(format!("block size must be at least 2, got {block_size}")));
        }
        Ok(Self { block_size })
    }

    pub fn block_size(&self) -> usize { self.block_size }
}

impl Partitioner for FixedSizePartitioner {
    fn partition(&self, layer: &Layer) -> Result<Partition> {
        if layer.len() <= 1 { return Ok(Vec::new()); }
        Ok(layer.documents().chunks(self.block_size).map(|c| Block::new(c.to_vec())).collect())
    }
}

/// Greedy packing under an approximate token budget.
///
/// A block always takes at least two documents while two remain, so every
/// multi-document layer shrinks even when single documents exceed the budget.
#[derive(Debug, Clone, Copy)]
pub struct TokenBudgetPartitioner {
    max_tokens: usize,
}

impl TokenBudgetPartitioner {
    pub fn new(max_tokens: usize) -> Result<Self> {
        if max_tokens == 0 {
            return Err(Error::InvalidConfig("token budget must be positive".into()));
        }
        Ok(Self { max_tokens })
    }
}

impl Partitioner for TokenBudgetPartitioner {
    fn partition(&self, layer: &Layer) -> Result<Partition> {
        let docs = layer.documents();
        if docs.len() <= 1 { return Ok(Vec::new()); }
        let mut blocks = Vec::new();
        let mut current = Vec::new();
        let mut tokens = 0;
        for doc in docs {
            let doc_tokens = count_tokens(&doc.text);
            if current.len() >= 2 && tokens + doc_tokens > self.max_tokens {
                blocks.push(Block::new(std::mem::take(&mut current)));
                tokens = 0;
            }
            tokens += doc_tokens;
            current.push(doc.clone());
        }
        if !current.is_empty() { blocks.push(Block::new(current)); }
        Ok(blocks)
    }
}
