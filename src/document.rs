use std::collections::HashSet;
use std::fs;
use std::path::Path;

use jwalk::WalkDir;
use lazy_static::lazy_static;
use rayon::iter::{IntoParallelRefIterator, ParallelIterator};

use crate::error::{RagError, Result};

/// Minimum usable length of extracted text, after trimming. Anything
/// shorter is treated as "nothing to index".
pub const MIN_USABLE_LEN: usize = 100;

/// A document ready for indexing: extracted text plus the key its index
/// entry will be saved under.
#[derive(Debug, Clone)]
pub struct Document {
    /// Index key, derived from the source file's base name without extension.
    pub key: String,
    pub path: String,
    pub text: String,
    pub size: u64,
}

/// Text-extraction collaborator. PDF and DOCX extractors live outside this
/// crate and plug in through this trait; `Ok(None)` means extraction ran
/// but produced nothing usable.
pub trait TextExtractor {
    fn extract(&self, path: &Path) -> Result<Option<String>>;
}

/// Extractor for plain-text files: reads the bytes and validates UTF-8.
pub struct PlainTextExtractor;

impl TextExtractor for PlainTextExtractor {
    fn extract(&self, path: &Path) -> Result<Option<String>> {
        let bytes = fs::read(path).map_err(|e| RagError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;

        match simdutf8::basic::from_utf8(&bytes) {
            Ok(text) => Ok(Some(text.to_string())),
            Err(_) => Err(RagError::InvalidUtf8 {
                path: path.to_path_buf(),
            }),
        }
    }
}

lazy_static! {
    static ref TEXT_EXTENSIONS: HashSet<&'static str> = {
        let mut s = HashSet::new();
        s.insert("txt");
        s.insert("text");
        s.insert("md");
        s
    };
}

/// Derives the index key for a source file: its base name without extension.
pub fn index_key(path: &Path) -> String {
    path.file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or_default()
        .to_string()
}

/// Loads one document through `extractor`. Returns `Ok(None)` when the file
/// yields no text or the text is below [`MIN_USABLE_LEN`].
pub fn load_document(path: &Path, extractor: &impl TextExtractor) -> Result<Option<Document>> {
    let Some(text) = extractor.extract(path)? else {
        return Ok(None);
    };

    if text.trim().len() < MIN_USABLE_LEN {
        log::debug!("skipping {}: below usable length", path.display());
        return Ok(None);
    }

    let size = fs::metadata(path)
        .map_err(|e| RagError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?
        .len();

    Ok(Some(Document {
        key: index_key(path),
        path: path.display().to_string(),
        text,
        size,
    }))
}

/// Walks `root` and loads every recognized plain-text file in parallel.
/// Files below the usable-length threshold are skipped, not errors.
pub fn collect_documents(root: &Path) -> Result<Vec<Document>> {
    if !root.exists() {
        return Err(RagError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("Root path does not exist: {}", root.display()),
        )));
    }

    let paths: Vec<_> = WalkDir::new(root)
        .into_iter()
        .filter_map(|e| match e {
            Ok(entry) if entry.file_type().is_file() => {
                let path = entry.path();
                let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
                TEXT_EXTENSIONS.contains(ext).then_some(path)
            }
            Ok(_) => None,
            Err(err) => {
                log::warn!("failed to walk directory entry: {}", err);
                None
            }
        })
        .collect();

    let extractor = PlainTextExtractor;
    let loaded: Result<Vec<Option<Document>>> = paths
        .par_iter()
        .map(|path| load_document(path, &extractor))
        .collect();

    Ok(loaded?.into_iter().flatten().collect())
}
