//! lexrag: document retrieval core for question answering over uploaded
//! documents.
//!
//! Pipeline per document: chunk the extracted text, embed every chunk with
//! a pretrained sentence-embedding model, and persist an exact
//! nearest-neighbor index under the document's key. Answering a question
//! embeds the query, pulls the nearest chunks from that index, and hands
//! the ordered chunk texts downstream to whatever generates the answer.
//! Answer generation, PDF/DOCX extraction and conversation state all live
//! outside this crate.

pub mod chunking;
pub mod document;
pub mod embedding;
pub mod error;
pub mod indexing;

pub use chunking::{DEFAULT_CHUNK_SIZE, chunk_text};
pub use document::{
    Document, MIN_USABLE_LEN, PlainTextExtractor, TextExtractor, collect_documents, index_key,
    load_document,
};
pub use embedding::{Embedder, Encoder};
pub use error::{RagError, Result};
pub use indexing::{FlatIndex, IndexStore};

/// Default number of chunks returned by a search.
pub const DEFAULT_TOP_K: usize = 5;

/// Outcome of indexing one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IndexOutcome {
    /// An index entry was persisted with this many chunks.
    Indexed { chunks: usize },
    /// The text was empty or below [`MIN_USABLE_LEN`]; nothing was persisted.
    NoUsableContent,
}

/// The document-to-index and question-to-chunks pipeline: an encoder plus
/// an [`IndexStore`], wired together.
///
/// Generic over [`Encoder`] so the embedding model is an explicit, owned
/// resource rather than process-wide state; production code uses
/// [`Embedder`], tests substitute a deterministic stand-in. The same
/// encoder must be used for indexing and for searching a given key.
pub struct Retriever<E: Encoder = Embedder> {
    encoder: E,
    store: IndexStore,
}

impl Retriever<Embedder> {
    /// Opens a retriever over `root` with the default fastembed model.
    pub fn new(root: impl Into<std::path::PathBuf>) -> Result<Self> {
        Ok(Self {
            encoder: Embedder::new()?,
            store: IndexStore::open(root)?,
        })
    }
}

impl<E: Encoder> Retriever<E> {
    pub fn with_encoder(encoder: E, store: IndexStore) -> Self {
        Self { encoder, store }
    }

    pub fn store(&self) -> &IndexStore {
        &self.store
    }

    /// Chunks, embeds and persists `text` under `key` with the default
    /// chunk budget, replacing any prior entry for `key`.
    pub fn index_document(&mut self, text: &str, key: &str) -> Result<IndexOutcome> {
        self.index_document_with(text, key, DEFAULT_CHUNK_SIZE)
    }

    pub fn index_document_with(
        &mut self,
        text: &str,
        key: &str,
        chunk_size: usize,
    ) -> Result<IndexOutcome> {
        if text.trim().len() < MIN_USABLE_LEN {
            log::info!("no usable content for key {:?}, nothing indexed", key);
            return Ok(IndexOutcome::NoUsableContent);
        }

        let chunks = chunk_text(text, chunk_size);
        if chunks.is_empty() {
            return Ok(IndexOutcome::NoUsableContent);
        }

        let embeddings = self.encoder.encode(&chunks)?;
        self.store.save(&chunks, embeddings, key)?;

        Ok(IndexOutcome::Indexed {
            chunks: chunks.len(),
        })
    }

    /// Indexes every plain-text document under `root`, keyed by file stem.
    /// Returns the outcome per key.
    pub fn index_directory(
        &mut self,
        root: &std::path::Path,
    ) -> Result<Vec<(String, IndexOutcome)>> {
        let docs = collect_documents(root)?;
        let mut outcomes = Vec::with_capacity(docs.len());
        for doc in docs {
            let outcome = self.index_document(&doc.text, &doc.key)?;
            outcomes.push((doc.key, outcome));
        }
        Ok(outcomes)
    }

    /// Embeds `query` and returns the `top_k` nearest chunk texts from the
    /// entry for `key`, nearest first, clamped to the entry size.
    pub fn search(&mut self, query: &str, key: &str, top_k: usize) -> Result<Vec<String>> {
        let query_text = [query.to_string()];
        let encoded = self.encoder.encode(&query_text)?;
        let query_vec = encoded
            .into_iter()
            .next()
            .ok_or_else(|| RagError::Embedding("model returned no vector for query".to_string()))?;

        self.store.search(&query_vec, key, top_k)
    }
}

/// Joins retrieved chunks into the context block handed to the
/// answer-generation collaborator.
pub fn context_block(chunks: &[String]) -> String {
    chunks.join("\n\n")
}
