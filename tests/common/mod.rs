use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use lexrag::{Encoder, Result};

/// Deterministic stand-in for the embedding model: hashes each text into a
/// fixed 4-dimensional vector. Identical texts get identical vectors,
/// distinct texts get (practically always) distinct vectors, which is all
/// the positional-correspondence and exact-match tests need.
pub struct FakeEncoder;

impl Encoder for FakeEncoder {
    fn encode(&mut self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|t| embed_one(t)).collect())
    }
}

pub fn embed_one(text: &str) -> Vec<f32> {
    let mut hasher = DefaultHasher::new();
    text.hash(&mut hasher);
    let bits = hasher.finish();
    (0..4)
        .map(|i| ((bits >> (i * 16)) & 0xffff) as f32 / 65535.0)
        .collect()
}
