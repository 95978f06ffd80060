use thiserror::Error;

/// Failures raised while building or querying a layer stack.
///
/// Strategy failures abort the current layer-construction step and reach the
/// caller unchanged; nothing is retried and no partial layer is kept.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Ingestion failed: {0}")]
    Ingestion(String),

    #[error("Invalid partition: {0}")]
    Partition(String),

    #[error("Summarization failed: {0}")]
    Summarization(String),

    #[error("Indexing failed: {0}")]
    Indexing(String),

    #[error("Query failed: {0}")]
    Query(String),

    #[error("Invalid level {level}: resource has {levels} levels of detail (valid: 0..{levels})")]
    InvalidLevel { level: i64, levels: usize },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, Error>;
