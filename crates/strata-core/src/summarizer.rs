use tracing::{debug, info};

use crate::builder::LayerBuilder;
use crate::error::{Error, Result};
use crate::layer::Layer;
use crate::traits::Ingestor;
use crate::types::{QueryParams, Response};

/// A finished layer stack for one resource, queryable at any level of detail.
///
/// Level 0 is the ingested text; the highest level is the coarsest summary.
/// Read-only after construction, so it can be shared between readers.
#[derive(Debug)]
pub struct ResourceSummarizer {
    layers: Vec<Layer>,
}

impl ResourceSummarizer {
    pub fn new(layers: Vec<Layer>) -> Result<Self> {
        if layers.is_empty() {
            return Err(Error::InvalidConfig("a summarizer needs at least one layer".into()));
        }
        Ok(Self { layers })
    }

    /// Number of layers; valid query levels are `0..levels_of_detail()`.
    pub fn levels_of_detail(&self) -> usize { self.layers.len() }

    pub fn layers(&self) -> &[Layer] { &self.layers }

    pub fn layer(&self, level: usize) -> Option<&Layer> { self.layers.get(level) }

    /// Answers `text` from the index of layer `level`.
    ///
    /// The level is validated before any index is touched: negative values
    /// and values at or beyond [`levels_of_detail`](Self::levels_of_detail)
    /// fail with [`Error::InvalidLevel`].
    pub fn query(&self, text: &str, level: i64, params: &QueryParams) -> Result<Response> {
        let layer = usize::try_from(level)
            .ok()
            .and_then(|l| self.layers.get(l))
            .ok_or(Error::InvalidLevel { level, levels: self.levels_of_detail() })?;
        debug!(level, documents = layer.len(), top_k = params.similarity_top_k, "querying layer");
        let engine = layer.index().query_engine(params)?;
        engine.query(text)
    }
}

/// Ingests `locator` and builds its full layer stack.
///
/// A failure anywhere yields no summarizer at all.
pub fn create_summarizer(locator: &str, ingestor: &dyn Ingestor, builder: &LayerBuilder<'_>) -> Result<ResourceSummarizer> {
    let documents = ingestor.ingest(locator)?;
    info!(locator, documents = documents.len(), "ingested resource");
    let layers = builder.create_layers(documents)?;
    ResourceSummarizer::new(layers)
}
