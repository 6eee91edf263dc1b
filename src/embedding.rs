use fastembed::{EmbeddingModel, InitOptions, TextEmbedding};

use crate::error::{RagError, Result};

/// The embedding-model collaborator interface: maps an ordered sequence of
/// texts to an ordered sequence of fixed-length vectors, same length and
/// order as the input. Implementations must be all-or-nothing: a failure
/// mid-batch fails the whole call, never a truncated result.
pub trait Encoder {
    fn encode(&mut self, texts: &[String]) -> Result<Vec<Vec<f32>>>;
}

/// Owned wrapper around a pretrained fastembed sentence-embedding model.
///
/// The model is loaded once at construction and reused across calls; there
/// is no reload path short of constructing a new `Embedder`. Indexes built
/// with one model version are only meaningful when searched with the same
/// model version.
pub struct Embedder {
    model: TextEmbedding,
    model_id: EmbeddingModel,
}

impl Embedder {
    /// Loads the default model, all-MiniLM-L6-v2 (384 dimensions).
    pub fn new() -> Result<Self> {
        Self::with_model(EmbeddingModel::AllMiniLML6V2)
    }

    pub fn with_model(model_id: EmbeddingModel) -> Result<Self> {
        log::info!("loading embedding model {:?}", model_id);
        let model = TextEmbedding::try_new(
            InitOptions::new(model_id.clone()).with_show_download_progress(false),
        )
        .map_err(|e| RagError::ModelInit(e.to_string()))?;

        Ok(Self { model, model_id })
    }

    pub fn model_id(&self) -> &EmbeddingModel {
        &self.model_id
    }

    /// Embeds the whole chunk collection in one call, preserving order.
    pub fn embed_chunks(&mut self, chunks: &[String]) -> Result<Vec<Vec<f32>>> {
        if chunks.is_empty() {
            return Ok(Vec::new());
        }

        let texts: Vec<&str> = chunks.iter().map(String::as_str).collect();
        let embeddings = self
            .model
            .embed(texts, None)
            .map_err(|e| RagError::Embedding(e.to_string()))?;

        // Positional correspondence is the only link between a vector and
        // its source chunk; a short batch from the backend is fatal.
        if embeddings.len() != chunks.len() {
            return Err(RagError::ChunkEmbeddingMismatch {
                chunks: chunks.len(),
                embeddings: embeddings.len(),
            });
        }

        Ok(embeddings)
    }

    pub fn embed_query(&mut self, query: &str) -> Result<Vec<f32>> {
        let mut embeddings = self
            .model
            .embed(vec![query], None)
            .map_err(|e| RagError::Embedding(e.to_string()))?;

        embeddings
            .pop()
            .ok_or_else(|| RagError::Embedding("model returned no vector for query".to_string()))
    }
}

impl Encoder for Embedder {
    fn encode(&mut self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        self.embed_chunks(texts)
    }
}
