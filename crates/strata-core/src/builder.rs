//! Layer construction: partition, summarize block by block, index, repeat.

use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::layer::Layer;
use crate::observer::{BuildObserver, NoopObserver};
use crate::traits::{IndexBuilder, Partitioner, Summarizer};
use crate::types::{Block, Document, Partition};

/// Builds a stack of progressively coarser layers from three strategies.
///
/// Construction is sequential: the summaries of one layer are produced one
/// block at a time, in block order, and the layer is indexed only after the
/// last block has been summarized. Summary `i` of a new layer always belongs
/// to block `i` of the partition it came from.
pub struct LayerBuilder<'a> {
    partitioner: &'a dyn Partitioner,
    summarizer: &'a dyn Summarizer,
    indexer: &'a dyn IndexBuilder,
    max_layers: Option<usize>,
    observer: &'a dyn BuildObserver,
}

impl<'a> LayerBuilder<'a> {
    pub fn new(partitioner: &'a dyn Partitioner, summarizer: &'a dyn Summarizer, indexer: &'a dyn IndexBuilder) -> Self {
        Self { partitioner, summarizer, indexer, max_layers: None, observer: &NoopObserver }
    }

    /// Caps the total number of layers, layer 0 included. `None` builds until convergence.
    pub fn with_max_layers(mut self, max_layers: Option<usize>) -> Self {
        self.max_layers = max_layers;
        self
    }

    pub fn with_observer(mut self, observer: &'a dyn BuildObserver) -> Self {
        self.observer = observer;
        self
    }

    /// Indexes `documents` as layer 0.
    pub fn create_base_layer(&self, documents: Vec<Document>) -> Result<Layer> {
        self.index_layer(0, documents)
    }

    /// Produces the layer above `layer`: one summary per block, then an index.
    ///
    /// Any strategy failure aborts the step and no layer is returned. An empty
    /// partition yields an empty layer; [`LayerBuilder::create_layers`] treats
    /// that case as convergence instead of calling this.
    pub fn create_next_layer(&self, layer: &Layer) -> Result<Layer> {
        let blocks = self.partition(layer)?;
        self.summarize_into_layer(layer.level() + 1, &blocks)
    }

    /// Builds the full stack starting from the ingested documents.
    ///
    /// Stops when the latest layer holds at most one document, when the
    /// partitioner returns no blocks, or when `max_layers` is reached. The
    /// result always holds at least layer 0, even for empty input.
    pub fn create_layers(&self, initial: Vec<Document>) -> Result<Vec<Layer>> {
        if self.max_layers == Some(0) {
            return Err(Error::InvalidConfig("max_layers must be at least 1".into()));
        }
        let mut layers = vec![self.create_base_layer(initial)?];
        while let Some(current) = layers.last() {
            if self.max_layers.is_some_and(|max| layers.len() >= max) {
                debug!(layers = layers.len(), "reached layer limit");
                break;
            }
            if current.len() <= 1 {
                debug!(level = current.level(), documents = current.len(), "converged");
                break;
            }
            let blocks = self.partition(current)?;
            if blocks.is_empty() {
                warn!(level = current.level(), documents = current.len(), "partitioner returned no blocks; stopping");
                break;
            }
            if self.max_layers.is_none() && blocks.len() == current.len() {
                return Err(Error::Partition(format!(
                    "layer {} has {} documents and was split into as many blocks; without a layer limit this never converges",
                    current.level(),
                    current.len()
                )));
            }
            let next = self.summarize_into_layer(current.level() + 1, &blocks)?;
            layers.push(next);
        }
        info!(layers = layers.len(), "built layer stack");
        Ok(layers)
    }

    fn partition(&self, layer: &Layer) -> Result<Partition> {
        let blocks = self.partitioner.partition(layer)?;
        if blocks.len() > layer.len() {
            return Err(Error::Partition(format!(
                "layer {} has {} documents but was split into {} blocks",
                layer.level(),
                layer.len(),
                blocks.len()
            )));
        }
        if let Some(i) = blocks.iter().position(Block::is_empty) {
            return Err(Error::Partition(format!("block {i} of layer {} is empty", layer.level())));
        }
        Ok(blocks)
    }

    fn summarize_into_layer(&self, level: usize, blocks: &[Block]) -> Result<Layer> {
        self.observer.layer_started(level, blocks.len());
        let mut documents = Vec::with_capacity(blocks.len());
        for (i, block) in blocks.iter().enumerate() {
            let summary = self.summarizer.summarize(block)?;
            debug!(level, block = i, nodes = block.len(), summary = %summary.id, "summarized block");
            self.observer.block_summarized(level, i, blocks.len(), &summary);
            documents.push(summary);
        }
        self.index_layer(level, documents)
    }

    fn index_layer(&self, level: usize, documents: Vec<Document>) -> Result<Layer> {
        let index = self.indexer.create_layer_index(level, &documents)?;
        let layer = Layer::new(level, documents, index);
        info!(level, documents = layer.len(), "built layer");
        self.observer.layer_built(level, &layer);
        Ok(layer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::{LayerIndex, QueryEngine};
    use crate::types::QueryParams;

    struct NullIndex(usize);

    impl LayerIndex for NullIndex {
        fn len(&self) -> usize { self.0 }
        fn query_engine(&self, _params: &QueryParams) -> Result<Box<dyn QueryEngine + '_>> {
            Err(Error::Query("not queryable".into()))
        }
    }

    fn null_index(docs: &[Document]) -> Result<Box<dyn LayerIndex>> { Ok(Box::new(NullIndex(docs.len()))) }

    fn pairs(layer: &Layer) -> Result<Partition> {
        Ok(layer.documents().chunks(2).map(|c| Block::new(c.to_vec())).collect())
    }

    fn join(block: &Block) -> Result<Document> { Ok(Document::summary_of(block.text("+"), &block.nodes)) }

    fn docs(n: usize) -> Vec<Document> { (0..n).map(|i| Document::new(format!("d{i}"), format!("t{i}"))).collect() }

    #[test]
    fn next_layer_has_one_document_per_block() {
        let builder = LayerBuilder::new(&pairs, &join, &null_index);
        let base = builder.create_base_layer(docs(5)).expect("base");
        let next = builder.create_next_layer(&base).expect("next");
        assert_eq!(next.level(), 1);
        let texts: Vec<_> = next.documents().iter().map(|d| d.text.as_str()).collect();
        assert_eq!(texts, vec!["t0+t1", "t2+t3", "t4"]);
        assert_eq!(next.index().len(), 3);
    }

    #[test]
    fn next_layer_from_empty_partition_is_empty_and_indexed() {
        let nothing = |_: &Layer| -> Result<Partition> { Ok(Vec::new()) };
        let builder = LayerBuilder::new(&nothing, &join, &null_index);
        let base = builder.create_base_layer(docs(4)).expect("base");
        let next = builder.create_next_layer(&base).expect("next");
        assert_eq!(next.level(), 1);
        assert!(next.is_empty());
        assert_eq!(next.index().len(), 0);
    }

    #[test]
    fn pairing_converges_to_single_document() {
        let builder = LayerBuilder::new(&pairs, &join, &null_index);
        let layers = builder.create_layers(docs(8)).expect("layers");
        let counts: Vec<_> = layers.iter().map(Layer::len).collect();
        assert_eq!(counts, vec![8, 4, 2, 1]);
    }

    #[test]
    fn zero_layer_limit_is_rejected() {
        let builder = LayerBuilder::new(&pairs, &join, &null_index).with_max_layers(Some(0));
        assert!(matches!(builder.create_layers(docs(3)), Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn partition_with_more_blocks_than_documents_is_rejected() {
        let splitter = |layer: &Layer| -> Result<Partition> {
            Ok(layer.documents().iter().chain(layer.documents()).map(|d| Block::new(vec![d.clone()])).collect())
        };
        let builder = LayerBuilder::new(&splitter, &join, &null_index);
        assert!(matches!(builder.create_layers(docs(3)), Err(Error::Partition(_))));
    }

    #[test]
    fn empty_block_is_rejected() {
        let hollow = |_: &Layer| -> Result<Partition> { Ok(vec![Block::default()]) };
        let builder = LayerBuilder::new(&hollow, &join, &null_index);
        assert!(matches!(builder.create_layers(docs(3)), Err(Error::Partition(_))));
    }

    #[test]
    fn identity_partition_needs_a_layer_limit() {
        let singles = |layer: &Layer| -> Result<Partition> {
            Ok(layer.documents().iter().map(|d| Block::new(vec![d.clone()])).collect())
        };
        let unbounded = LayerBuilder::new(&singles, &join, &null_index);
        assert!(matches!(unbounded.create_layers(docs(3)), Err(Error::Partition(_))));

        let bounded = LayerBuilder::new(&singles, &join, &null_index).with_max_layers(Some(3));
        let counts: Vec<_> = bounded.create_layers(docs(3)).expect("layers").iter().map(Layer::len).collect();
        assert_eq!(counts, vec![3, 3, 3]);
    }
}
