//! Shared test utilities.
//!
//! Entry builders, dataset fixtures, and small readers for generated output.
//!
//! # Usage
//!
//! ```rust,ignore
//! use crate::test_helpers::*;
//!
//! let tmp = TempDir::new().unwrap();
//! let input = write_dataset(tmp.path(), &[entry("你好", &["hello"])]);
//! let report = generate(&input, &tmp.path().join("build"), ...).unwrap();
//! assert_eq!(html_files(&tmp.path().join("build")), vec!["index.html", "你好.html"]);
//! ```

use crate::entry::Entry;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

// =========================================================================
// Fixture setup
// =========================================================================

/// Entry keyed by `key`, with the key reused for the traditional form.
pub fn entry(key: &str, definitions: &[&str]) -> Entry {
    Entry {
        traditional: key.to_string(),
        simplified: key.to_string(),
        pinyin: format!("pinyin of {key}"),
        definitions: definitions.iter().map(|d| d.to_string()).collect(),
    }
}

/// Write `entries` as `cedict.json` in `dir` and return its path.
pub fn write_dataset(dir: &Path, entries: &[Entry]) -> PathBuf {
    let path = dir.join("cedict.json");
    std::fs::write(&path, serde_json::to_string_pretty(entries).unwrap()).unwrap();
    path
}

// =========================================================================
// Output readers
// =========================================================================

/// Sorted names of the `*.html` files directly inside `dir`.
pub fn html_files(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().path())
        .filter(|p| p.is_file() && p.extension().is_some_and(|ext| ext == "html"))
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

/// `href` values of every `<a>` element, in document order.
pub fn anchor_hrefs(html: &str) -> Vec<&str> {
    html.split("<a ")
        .skip(1)
        .map(|tag| {
            let start = tag.find("href=\"").expect("anchor without href") + "href=\"".len();
            let len = tag[start..].find('"').expect("unterminated href");
            &tag[start..start + len]
        })
        .collect()
}

/// Cloneable in-memory writer for capturing console output across threads.
#[derive(Clone, Default)]
pub struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

impl SharedBuffer {
    pub fn contents(&self) -> String {
        String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}
