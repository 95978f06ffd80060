#![deny(warnings)]
#![deny(dead_code)]
#![deny(unused_variables)]
#![deny(unused_imports)]

//! strata-core
//!
//! Recursive layered summarization. A resource is ingested into layer 0, then
//! each layer is partitioned into blocks, every block is summarized into one
//! document and the summaries are indexed as the next, coarser layer. The
//! finished stack is wrapped in a [`ResourceSummarizer`] that answers queries
//! at a chosen level of detail.

pub mod builder;
pub mod config;
pub mod error;
pub mod ingest;
pub mod layer;
pub mod observer;
pub mod partition;
pub mod summarize;
pub mod summarizer;
pub mod traits;
pub mod types;

pub use builder::LayerBuilder;
pub use error::{Error, Result};
pub use layer::Layer;
pub use observer::{BuildObserver, NoopObserver};
pub use summarizer::{create_summarizer, ResourceSummarizer};
pub use traits::{IndexBuilder, Ingestor, LayerIndex, Partitioner, QueryEngine, Summarizer};
pub use types::{Block, DocId, Document, Meta, Partition, QueryParams, Response, SourceNode};
