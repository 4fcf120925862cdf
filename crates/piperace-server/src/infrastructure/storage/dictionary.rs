//! The word dictionary served to clients.
//!
//! A flat file, one word per line, loaded once at startup and read-only
//! afterwards.  Workers share it behind an `Arc` and draw from it with
//! their own generators, so no synchronization is needed.

use std::io;
use std::path::{Path, PathBuf};

use rand::rngs::StdRng;
use rand::Rng;
use thiserror::Error;

/// Words shipped in the binary, used when no word file is configured.
const BUILTIN_WORDS: &[&str] = &[
    "alabaster",
    "bulwark",
    "cataract",
    "dulcimer",
    "eiderdown",
    "farrier",
    "gossamer",
    "hinterland",
    "isinglass",
    "juniper",
    "kestrel",
    "lodestone",
    "marzipan",
    "nimbus",
    "oriel",
    "palimpsest",
    "quicksilver",
    "rookery",
    "sassafras",
    "tourmaline",
    "umber",
    "vellum",
    "wainscot",
    "yardarm",
    "zephyr",
];

/// Error type for dictionary loading.
#[derive(Debug, Error)]
pub enum DictionaryError {
    /// The word list file could not be read.
    #[error("failed to read word list {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// The file existed but held no usable words.
    #[error("word list {path} contains no words")]
    Empty { path: PathBuf },
}

/// An immutable, non-empty word list.
#[derive(Debug, Clone)]
pub struct Dictionary {
    words: Vec<String>,
}

impl Dictionary {
    /// Loads one word per line from `path`, trimming surrounding whitespace
    /// and skipping blank lines.
    ///
    /// # Errors
    ///
    /// Returns [`DictionaryError::Io`] when the file cannot be read and
    /// [`DictionaryError::Empty`] when no usable word remains.
    pub fn from_file(path: &Path) -> Result<Self, DictionaryError> {
        let content = std::fs::read_to_string(path).map_err(|source| DictionaryError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let words: Vec<String> = content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect();

        if words.is_empty() {
            return Err(DictionaryError::Empty {
                path: path.to_path_buf(),
            });
        }
        Ok(Self { words })
    }

    /// The built-in list used when no file is configured.
    pub fn builtin() -> Self {
        Self {
            words: BUILTIN_WORDS.iter().map(|word| word.to_string()).collect(),
        }
    }

    /// Picks one word uniformly at random with the caller's generator.
    pub fn pick(&self, rng: &mut StdRng) -> &str {
        &self.words[rng.random_range(0..self.words.len())]
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
