//! Dictionary entries and the dataset loader.
//!
//! The dataset is a single JSON array, one object per entry:
//!
//! ```json
//! [
//!   {
//!     "traditional": "你好",
//!     "simplified": "你好",
//!     "pinyin": "nǐ hǎo",
//!     "definitions": ["hello", "hi"]
//!   }
//! ]
//! ```
//!
//! Array order is preserved: it is the order links appear on the index page.
//!
//! The simplified form is the entry's key and becomes the page filename
//! (`你好.html`), so keys are checked with [`validate_key`] before anything is
//! written for them.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("cannot read {}: {source}", .path.display())]
    DataSource {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("cannot parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Why a key cannot be used as a page filename.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InvalidKey {
    #[error("key is empty")]
    Empty,
    #[error("key {0:?} is a relative path component")]
    Relative(String),
    #[error("key {0:?} would overwrite the index page")]
    Reserved(String),
    #[error("key {key:?} contains forbidden character {ch:?}")]
    ForbiddenChar { key: String, ch: char },
}

/// Stem of the index page. No entry may be published under it, in any case,
/// since case-folding filesystems map `Index.html` onto `index.html` too.
pub const RESERVED_KEY: &str = "index";

/// One dictionary entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    /// Traditional characters. Display only.
    pub traditional: String,
    /// Simplified characters. Doubles as the page key.
    pub simplified: String,
    /// Romanization, e.g. `nǐ hǎo`.
    pub pinyin: String,
    /// English definitions in dataset order.
    #[serde(default)]
    pub definitions: Vec<String>,
}

impl Entry {
    /// The key this entry is published under.
    pub fn key(&self) -> &str {
        &self.simplified
    }

    /// Filename of this entry's page, relative to the output directory.
    pub fn page_filename(&self) -> String {
        format!("{}.html", self.simplified)
    }
}

/// Read and parse the dataset at `path`.
pub fn load(path: &Path) -> Result<Vec<Entry>, LoadError> {
    let content = fs::read_to_string(path).map_err(|source| LoadError::DataSource {
        path: path.to_path_buf(),
        source,
    })?;
    parse(&content).map_err(|source| LoadError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Parse dataset JSON already in memory.
pub fn parse(content: &str) -> Result<Vec<Entry>, serde_json::Error> {
    serde_json::from_str(content)
}

/// Check that `key` names a file directly inside the output directory.
pub fn validate_key(key: &str) -> Result<(), InvalidKey> {
    if key.is_empty() {
        return Err(InvalidKey::Empty);
    }
    if key == "." || key == ".." {
        return Err(InvalidKey::Relative(key.to_string()));
    }
    if key.eq_ignore_ascii_case(RESERVED_KEY) {
        return Err(InvalidKey::Reserved(key.to_string()));
    }
    if let Some(ch) = key.chars().find(|c| matches!(c, '/' | '\\' | '\0')) {
        return Err(InvalidKey::ForbiddenChar {
            key: key.to_string(),
            ch,
        });
    }
    Ok(())
}
