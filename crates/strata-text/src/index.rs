//! strata-text
//!
//! Tantivy-backed indexing strategy. Each layer gets its own index, built once
//! and read-only afterwards, either in memory or under `<root>/layer-NNN`.
use std::path::{Path, PathBuf};
use tantivy::{doc, Index, IndexReader, IndexWriter, ReloadPolicy};
use tracing::debug;

use strata_core::error::{Error, Result};
use strata_core::traits::{IndexBuilder, LayerIndex, QueryEngine};
use strata_core::types::{Document, QueryParams};

use crate::search::TantivyQueryEngine;
use crate::tantivy_utils::{build_schema, register_tokenizer, Fields};

const WRITER_MEMORY_BYTES: usize = 20_000_000;

pub struct TantivyIndexBuilder {
	root: Option<PathBuf>,
}

impl TantivyIndexBuilder {
	pub fn in_ram() -> Self { Self { root: None } }

	/// Persists every layer index under `root/layer-NNN`, `NNN` being the
	/// layer level. Building layer 0 starts a new stack and removes every
	/// `layer-*` directory left by an earlier build.
	pub fn persistent(root: impl Into<PathBuf>) -> Self { Self { root: Some(root.into()) } }

	fn create(&self, level: usize) -> Result<(Index, Fields)> {
		let (schema, fields) = build_schema();
		let index = match &self.root {
			None => Index::create_in_ram(schema),
			Some(root) => {
				if level == 0 { clear_layer_dirs(root)?; }
				let index_dir = root.join(format!("layer-{level:03}"));
				if index_dir.exists() { std::fs::remove_dir_all(&index_dir).map_err(|e| indexing(&e))?; }
				std::fs::create_dir_all(&index_dir).map_err(|e| indexing(&e))?;
				debug!(dir = %index_dir.display(), "creating layer index");
				Index::create_in_dir(&index_dir, schema).map_err(|e| indexing(&e))?
			}
		};
		register_tokenizer(&index);
		Ok((index, fields))
	}
}

impl IndexBuilder for TantivyIndexBuilder {
	/// Outside a layer build the index is treated as layer 0.
	fn create_index(&self, documents: &[Document]) -> Result<Box<dyn LayerIndex>> {
		self.create_layer_index(0, documents)
	}

	fn create_layer_index(&self, level: usize, documents: &[Document]) -> Result<Box<dyn LayerIndex>> {
		let (index, fields) = self.create(level)?;
		Ok(Box::new(TantivyLayerIndex::build(index, fields, documents)?))
	}
}

fn clear_layer_dirs(root: &Path) -> Result<()> {
	if !root.exists() { return Ok(()); }
	for entry in std::fs::read_dir(root).map_err(|e| indexing(&e))? {
		let entry = entry.map_err(|e| indexing(&e))?;
		let is_layer = entry.file_name().to_str().is_some_and(|name| name.starts_with("layer-"));
		if is_layer && entry.path().is_dir() {
			debug!(dir = %entry.path().display(), "removing stale layer index");
			std::fs::remove_dir_all(entry.path()).map_err(|e| indexing(&e))?;
		}
	}
	Ok(())
}

/// A committed tantivy index over one layer's documents.
pub struct TantivyLayerIndex {
	index: Index,
	reader: IndexReader,
	fields: Fields,
	len: usize,
}

impl TantivyLayerIndex {
	fn build(index: Index, fields: Fields, documents: &[Document]) -> Result<Self> {
		let mut index_writer: IndexWriter = index.writer_with_num_threads(1, WRITER_MEMORY_BYTES).map_err(|e| indexing(&e))?;
		for d in documents {
			index_writer
				.add_document(doc!(fields.id => d.id.clone(), fields.text => d.text.clone()))
				.map_err(|e| indexing(&e))?;
		}
		index_writer.commit().map_err(|e| indexing(&e))?;
		let reader = index.reader_builder().reload_policy(ReloadPolicy::Manual).try_into().map_err(|e| indexing(&e))?;
		debug!(documents = documents.len(), "committed layer index");
		Ok(Self { index, reader, fields, len: documents.len() })
	}

	pub fn index(&self) -> &Index { &self.index }

	pub(crate) fn reader(&self) -> &IndexReader { &self.reader }

	pub(crate) fn fields(&self) -> Fields { self.fields }
}

impl LayerIndex for TantivyLayerIndex {
	fn len(&self) -> usize { self.len }

	fn query_engine(&self, params: &QueryParams) -> Result<Box<dyn QueryEngine + '_>> {
		Ok(Box::new(TantivyQueryEngine::new(self, params)))
	}
}

fn indexing(e: &dyn std::fmt::Display) -> Error { Error::Indexing(e.to_string()) }
