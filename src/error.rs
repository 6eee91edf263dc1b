use std::io;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum RagError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Failed to read file at {path}: {source}")]
    FileRead { path: PathBuf, source: io::Error },

    #[error("Invalid UTF-8 in file {path}")]
    InvalidUtf8 { path: PathBuf },

    #[error("Embedding model initialization failed: {0}")]
    ModelInit(String),

    #[error("Embedding generation failed: {0}")]
    Embedding(String),

    #[error("Serialization failed: {0}")]
    Serialization(String),

    #[error("Chunk/embedding count mismatch: {chunks} chunks, {embeddings} embeddings")]
    ChunkEmbeddingMismatch { chunks: usize, embeddings: usize },

    #[error("Dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },

    #[error("Empty embeddings vector")]
    EmptyEmbeddings,

    #[error("No index entry found for key {key:?}")]
    IndexNotFound { key: String },

    #[error("Corrupt index entry for key {key:?}: {reason}")]
    CorruptIndex { key: String, reason: String },
}

pub type Result<T> = std::result::Result<T, RagError>;
