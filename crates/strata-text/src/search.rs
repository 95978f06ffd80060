use tantivy::collector::TopDocs;
use tantivy::query::QueryParser;
use tantivy::schema::Value;
use tantivy::TantivyDocument;
use tracing::debug;

use strata_core::error::{Error, Result};
use strata_core::traits::QueryEngine;
use strata_core::types::{QueryParams, Response, SourceNode};

use crate::index::TantivyLayerIndex;

/// Keyword search over one layer. The answer is the matching texts, best
/// first, separated by blank lines.
pub struct TantivyQueryEngine<'a> {
	layer: &'a TantivyLayerIndex,
	top_k: usize,
}

impl<'a> TantivyQueryEngine<'a> {
	pub fn new(layer: &'a TantivyLayerIndex, params: &QueryParams) -> Self { Self { layer, top_k: params.similarity_top_k } }

	pub fn search(&self, query_text: &str) -> Result<Vec<SourceNode>> {
		if self.top_k == 0 { return Ok(Vec::new()); }
		let fields = self.layer.fields();
		let searcher = self.layer.reader().searcher();
		let query_parser = QueryParser::for_index(self.layer.index(), vec![fields.text]);
		let (query, errors) = query_parser.parse_query_lenient(query_text);
		if !errors.is_empty() { debug!(query = query_text, errors = errors.len(), "query parsed leniently"); }
		let top_docs = searcher.search(&query, &TopDocs::with_limit(self.top_k)).map_err(|e| Error::Query(e.to_string()))?;
		let mut sources = Vec::with_capacity(top_docs.len());
		for (score, doc_address) in top_docs {
			let doc: TantivyDocument = searcher.doc(doc_address).map_err(|e| Error::Query(e.to_string()))?;
			let document_id = doc.get_first(fields.id).and_then(|v| v.as_str()).unwrap_or("").to_string();
			let text = doc.get_first(fields.text).and_then(|v| v.as_str()).unwrap_or("").to_string();
			sources.push(SourceNode { document_id, score, text });
		}
		Ok(sources)
	}
}

impl QueryEngine for TantivyQueryEngine<'_> {
	fn query(&self, text: &str) -> Result<Response> {
		let sources = self.search(text)?;
		let answer = sources.iter().map(|s| s.text.as_str()).collect::<Vec<_>>().join("\n\n");
		Ok(Response { answer, sources })
	}
}
