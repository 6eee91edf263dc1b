//! Exact nearest-neighbor index and its per-key persistence.
//!
//! Distances are squared Euclidean over the raw embedding vectors, exactly
//! as produced by the model. This is not cosine similarity; the metric is
//! kept as-is so that indexes rank identically to the system this replaces,
//! and changing it would silently reorder every search result.

use std::fs;
use std::path::{Path, PathBuf};

use rayon::{
    iter::{IndexedParallelIterator, IntoParallelRefIterator, ParallelIterator},
    slice::ParallelSliceMut,
};
use serde::{Deserialize, Serialize};
use sha2::Digest;

use crate::error::{RagError, Result};

/// Exact (non-approximate) nearest-neighbor structure over an embedding
/// matrix. Row `i` of the matrix corresponds to chunk `i` of the collection
/// it was built from; that positional pairing is the caller's invariant.
#[derive(Debug, Serialize, Deserialize)]
pub struct FlatIndex {
    dim: usize,
    vectors: Vec<Vec<f32>>,
}

impl FlatIndex {
    /// Builds an index over `embeddings`. Rejects an empty matrix and any
    /// row whose width disagrees with the first row.
    pub fn build(embeddings: Vec<Vec<f32>>) -> Result<Self> {
        let dim = match embeddings.first() {
            Some(v) => v.len(),
            None => return Err(RagError::EmptyEmbeddings),
        };

        for vector in &embeddings {
            if vector.len() != dim {
                return Err(RagError::DimensionMismatch {
                    expected: dim,
                    got: vector.len(),
                });
            }
        }

        Ok(Self {
            dim,
            vectors: embeddings,
        })
    }

    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Returns the `k` nearest rows to `query`, as `(row, squared distance)`
    /// pairs in ascending distance order. Ties break toward the lower row;
    /// that order is deterministic but not semantically meaningful. Fewer
    /// than `k` rows in the index returns them all.
    pub fn search(&self, query: &[f32], k: usize) -> Result<Vec<(usize, f32)>> {
        if query.len() != self.dim {
            return Err(RagError::DimensionMismatch {
                expected: self.dim,
                got: query.len(),
            });
        }

        let mut scored: Vec<(usize, f32)> = self
            .vectors
            .par_iter()
            .enumerate()
            .map(|(i, v)| (i, squared_l2(query, v)))
            .collect();

        scored.par_sort_unstable_by(|a, b| a.1.total_cmp(&b.1).then(a.0.cmp(&b.0)));
        scored.truncate(k);
        Ok(scored)
    }
}

fn squared_l2(a: &[f32], b: &[f32]) -> f32 {
    let mut acc = 0.0;
    for i in 0..a.len() {
        let d = a[i] - b[i];
        acc += d * d;
    }
    acc
}

/// One persisted unit: the search structure paired with the chunk texts in
/// the exact order the structure was built from.
#[derive(Serialize, Deserialize)]
struct IndexEntry {
    index: FlatIndex,
    chunks: Vec<String>,
}

/// Per-key persistence of index entries under a root directory.
///
/// Each `save` replaces the entry for its key wholesale via a
/// write-to-temp-then-rename, so a concurrent reader on the same filesystem
/// sees either the old entry or the new one, never a torn mix. There is no
/// cross-process locking beyond that: one writer per key is the caller's
/// contract. Entries for distinct keys are fully independent.
pub struct IndexStore {
    root: PathBuf,
}

impl IndexStore {
    /// Opens a store rooted at `root`, creating the directory if needed.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the entry file for `key`. Keys are arbitrary strings, so the
    /// file name is the hex SHA-256 of the key. Stale entries are never
    /// removed by this store; cleanup is out of band.
    pub fn entry_path(&self, key: &str) -> PathBuf {
        let digest: [u8; 32] = sha2::Sha256::digest(key.as_bytes()).into();
        let stem: String = digest.iter().map(|b| format!("{b:02x}")).collect();
        self.root.join(format!("{stem}.idx"))
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entry_path(key).exists()
    }

    /// Persists `chunks` and `embeddings` under `key`, replacing any prior
    /// entry for that key. `chunks[i]` must correspond to `embeddings[i]`;
    /// a count mismatch aborts the save with nothing written, leaving any
    /// prior entry untouched.
    pub fn save(&self, chunks: &[String], embeddings: Vec<Vec<f32>>, key: &str) -> Result<()> {
        if chunks.len() != embeddings.len() {
            return Err(RagError::ChunkEmbeddingMismatch {
                chunks: chunks.len(),
                embeddings: embeddings.len(),
            });
        }

        let index = FlatIndex::build(embeddings)?;
        let entry = IndexEntry {
            index,
            chunks: chunks.to_vec(),
        };

        let bytes =
            bincode::serialize(&entry).map_err(|e| RagError::Serialization(e.to_string()))?;

        let path = self.entry_path(key);
        let tmp = path.with_extension("idx.tmp");
        fs::write(&tmp, &bytes)?;
        fs::rename(&tmp, &path)?;

        log::debug!(
            "saved index entry for key {:?}: {} chunks, dim {}",
            key,
            chunks.len(),
            entry.index.dim()
        );
        Ok(())
    }

    fn load(&self, key: &str) -> Result<IndexEntry> {
        let path = self.entry_path(key);
        if !path.exists() {
            return Err(RagError::IndexNotFound {
                key: key.to_string(),
            });
        }

        let bytes = fs::read(&path)?;
        let entry: IndexEntry =
            bincode::deserialize(&bytes).map_err(|e| RagError::CorruptIndex {
                key: key.to_string(),
                reason: e.to_string(),
            })?;

        if entry.index.len() != entry.chunks.len() {
            return Err(RagError::CorruptIndex {
                key: key.to_string(),
                reason: format!(
                    "index has {} vectors but {} chunks",
                    entry.index.len(),
                    entry.chunks.len()
                ),
            });
        }

        Ok(entry)
    }

    /// Returns the chunk texts nearest to `query` in the entry for `key`,
    /// nearest first, at most `top_k` of them. Fails with `IndexNotFound`
    /// when no entry exists for `key`.
    pub fn search(&self, query: &[f32], key: &str, top_k: usize) -> Result<Vec<String>> {
        let entry = self.load(key)?;
        let hits = entry.index.search(query, top_k)?;

        log::debug!(
            "search on key {:?} returned {} of {} chunks",
            key,
            hits.len(),
            entry.chunks.len()
        );

        Ok(hits
            .into_iter()
            .map(|(i, _)| entry.chunks[i].clone())
            .collect())
    }
}
