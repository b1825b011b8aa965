//! In-memory semantic index over a local corpus.

use std::path::Path;

use bon::Builder;
use serde::Serialize;
use tracing::{info, warn};

use super::chunking::{split_chunks, DEFAULT_CHUNK_SIZE};
use super::embedding::{cosine_similarity, embed, DEFAULT_DIMENSION};
use super::loader::load_documents;
use crate::error::Result;

/// Indexing parameters.
#[derive(Debug, Clone, Copy, Builder)]
pub struct IndexOptions {
    #[builder(default = DEFAULT_DIMENSION)]
    pub dimension: usize,
    #[builder(default = DEFAULT_CHUNK_SIZE)]
    pub chunk_size: usize,
}

impl Default for IndexOptions {
    fn default() -> Self {
        Self {
            dimension: DEFAULT_DIMENSION,
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }
}

/// A text chunk paired with its embedding vector.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmbeddedDocument {
    pub filename: String,
    pub text: String,
    #[serde(skip)]
    pub embedding: Vec<f32>,
}

/// A search hit.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchResult {
    #[serde(flatten)]
    pub document: EmbeddedDocument,
    pub similarity: f32,
}

/// Brute-force nearest-neighbour index.
///
/// Built once (`index`/`add_text`) and then shared read-only; `search` takes
/// `&self` and never mutates.
#[derive(Debug, Clone, Default)]
pub struct DocumentIndex {
    options: IndexOptions,
    docs: Vec<EmbeddedDocument>,
}

impl DocumentIndex {
    pub fn new(options: IndexOptions) -> Self {
        Self {
            options,
            docs: Vec::new(),
        }
    }

    /// Build an index from every supported file in `dir`.
    pub fn build(dir: impl AsRef<Path>, options: IndexOptions) -> Result<Self> {
        let mut index = Self::new(options);
        index.index(dir)?;
        Ok(index)
    }

    /// Load, chunk, and embed the corpus in `dir`, returning the number of
    /// chunks added. A missing directory adds nothing.
    pub fn index(&mut self, dir: impl AsRef<Path>) -> Result<usize> {
        let dir = dir.as_ref();
        let Some(sources) = load_documents(dir)? else {
            warn!(dir = %dir.display(), "document directory not found; search will return no results");
            return Ok(0);
        };

        let before = self.docs.len();
        for source in sources {
            self.add_text(source.filename, &source.text);
        }
        let added = self.docs.len() - before;

        if added == 0 {
            warn!(dir = %dir.display(), "no documents found; search will return no results");
        } else {
            info!(dir = %dir.display(), chunks = added, "indexed documents");
        }
        Ok(added)
    }

    /// Chunk and embed one document's text.
    pub fn add_text(&mut self, filename: impl Into<String>, text: &str) {
        let filename = filename.into();
        for chunk in split_chunks(text, self.options.chunk_size) {
            let embedding = embed(&chunk, self.options.dimension);
            self.docs.push(EmbeddedDocument {
                filename: filename.clone(),
                text: chunk,
                embedding,
            });
        }
    }

    /// The `top_k` chunks most similar to `query`, best first.
    ///
    /// Ties keep index order. `top_k` is clamped to the index size.
    pub fn search(&self, query: &str, top_k: usize) -> Vec<SearchResult> {
        if self.docs.is_empty() || top_k == 0 {
            return Vec::new();
        }

        let query_vec = embed(query, self.options.dimension);
        let mut scored: Vec<(usize, f32)> = self
            .docs
            .iter()
            .enumerate()
            .map(|(i, doc)| (i, cosine_similarity(&query_vec, &doc.embedding)))
            .collect();
        scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

        scored
            .into_iter()
            .take(top_k)
            .map(|(i, similarity)| SearchResult {
                document: self.docs[i].clone(),
                similarity,
            })
            .collect()
    }

    pub fn documents(&self) -> &[EmbeddedDocument] {
        &self.docs
    }

    pub fn options(&self) -> IndexOptions {
        self.options
    }

    pub fn len(&self) -> usize {
        self.docs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }
}
