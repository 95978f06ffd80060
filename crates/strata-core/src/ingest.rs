//! File ingestion: paragraphs of text files become layer 0 documents.
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::config::expand_path;
use crate::error::{Error, Result};
use crate::traits::Ingestor;
use crate::types::Document;

#[derive(Debug, Clone)]
pub struct ChunkingConfig {
    pub max_tokens: usize,
    pub overlap_percent: f32,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self { max_tokens: 500, overlap_percent: 0.2 }
    }
}

/// Splits a text file, or every `.txt`/`.md` file under a directory, on blank
/// lines. Oversized paragraphs are cut into overlapping word windows.
#[derive(Debug, Clone, Default)]
pub struct ParagraphIngestor {
    chunking_config: ChunkingConfig,
}

impl ParagraphIngestor {
    pub fn new() -> Self { Self::default() }

    pub fn with_max_tokens(mut self, max_tokens: usize) -> Self {
        self.chunking_config.max_tokens = max_tokens.max(1);
        self
    }

    /// `overlap_percent` is clamped to `0.0..=1.0`.
    pub fn with_chunking_config(mut self, config: ChunkingConfig) -> Self {
        self.chunking_config = ChunkingConfig {
            max_tokens: config.max_tokens.max(1),
            overlap_percent: config.overlap_percent.clamp(0.0, 1.0),
        };
        self
    }

    fn ingest_path(&self, path: &Path) -> Result<Vec<Document>> {
        if path.is_dir() {
            let files = list_text_files(path)?;
            let mut documents = Vec::new();
            for (file_index, file_path) in files.iter().enumerate() {
                debug!(file = %file_path.display(), "ingesting file {}/{}", file_index + 1, files.len());
                documents.extend(self.ingest_file(file_path)?);
            }
            Ok(documents)
        } else {
            self.ingest_file(path)
        }
    }

    fn ingest_file(&self, file_path: &Path) -> Result<Vec<Document>> {
        let content = read_file_content(file_path)?;
        let doc_id = file_path.file_stem().map_or_else(|| "doc".to_string(), |s| s.to_string_lossy().to_string());
        Ok(self.chunk_content(&content, &doc_id, file_path))
    }

    fn chunk_content(&self, content: &str, doc_id: &str, file_path: &Path) -> Vec<Document> {
        let mut texts = Vec::new();
        for paragraph in content.split("\n\n") {
            let paragraph = paragraph.trim();
            if paragraph.is_empty() { continue; }
            if count_tokens(paragraph) <= self.chunking_config.max_tokens {
                texts.push(paragraph.to_string());
            } else {
                texts.extend(self.split_paragraph_with_overlap(paragraph));
            }
        }
        let doc_path = file_path.to_string_lossy().to_string();
        texts
            .into_iter()
            .enumerate()
            .map(|(chunk_index, text)| {
                Document::new(format!("{doc_id}:{chunk_index}"), text)
                    .with_meta("doc_path", doc_path.clone())
                    .with_meta("chunk_index", chunk_index.to_string())
            })
            .collect()
    }

    fn split_paragraph_with_overlap(&self, paragraph: &str) -> Vec<String> {
        let words: Vec<&str> = paragraph.split_whitespace().collect();
        // inverse of count_tokens
        let words_per_chunk = ((self.chunking_config.max_tokens * 3) / 4).max(1);
        let overlap_words = ((words_per_chunk as f32 * self.chunking_config.overlap_percent) as usize).min(words_per_chunk - 1);
        let mut chunks = Vec::new();
        let mut start = 0;
        while start < words.len() {
            let end = (start + words_per_chunk).min(words.len());
            chunks.push(words[start..end].join(" "));
            if end >= words.len() { break; }
            start = end - overlap_words;
        }
        chunks
    }
}

impl Ingestor for ParagraphIngestor {
    fn ingest(&self, locator: &str) -> Result<Vec<Document>> {
        let path = expand_path(locator);
        if !path.exists() {
            return Err(Error::Ingestion(format!("{} does not exist", path.display())));
        }
        self.ingest_path(&path)
    }
}

/// Rough token estimate: words / 0.75.
pub fn count_tokens(text: &str) -> usize {
    let word_count = text.split_whitespace().count();
    (word_count as f32 / 0.75) as usize
}

fn read_file_content(file_path: &Path) -> Result<String> {
    let bytes = fs::read(file_path).map_err(|e| Error::Ingestion(format!("{}: {e}", file_path.display())))?;
    match String::from_utf8(bytes) {
        Ok(content) => Ok(content),
        Err(e) => Ok(String::from_utf8_lossy(e.as_bytes()).to_string()),
    }
}

/// Unreadable entries fail the walk rather than shrinking the resource.
fn list_text_files(root: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in walkdir::WalkDir::new(root).follow_links(true) {
        let entry = entry.map_err(|e| Error::Ingestion(format!("{}: {e}", root.display())))?;
        if !entry.file_type().is_file() { continue; }
        let path = entry.path();
        if matches!(path.extension().and_then(|s| s.to_str()), Some("txt" | "md")) { files.push(path.to_path_buf()); }
    }
    files.sort();
    Ok(files)
}
