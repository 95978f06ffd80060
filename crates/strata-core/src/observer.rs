//! Progress callbacks for layer construction.

use crate::layer::Layer;
use crate::types::Document;

/// Receives per-block and per-layer progress while a hierarchy is built.
///
/// Calls arrive on the building thread, in block order. All methods default
/// to no-ops so implementors only override what they display.
pub trait BuildObserver {
    /// Summarization of `block_count` blocks into layer `level` is starting.
    fn layer_started(&self, _level: usize, _block_count: usize) {}

    fn block_summarized(&self, _level: usize, _block_index: usize, _block_count: usize, _summary: &Document) {}

    /// Layer `level` has been indexed and appended.
    fn layer_built(&self, _level: usize, _layer: &Layer) {}
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl BuildObserver for NoopObserver {}
