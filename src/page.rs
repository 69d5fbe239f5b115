//! Per-entry pages.
//!
//! Every entry becomes `{output}/{simplified}.html`:
//!
//! ```text
//! 你好
//! Simplified: 你好
//! Traditional: 你好
//! Pinyin: nǐ hǎo
//! hello
//! ```
//!
//! ## Writes
//!
//! Pages are rendered to a string first, written to a temp file inside the
//! output directory and renamed over the final path. Two entries sharing a key
//! race to the rename; whichever lands last wins and the file always holds one
//! complete page.
//!
//! Uses [maud](https://maud.lambda.xyz/), so every field is HTML-escaped.

use crate::entry::Entry;
use maud::{DOCTYPE, Markup, PreEscaped, html};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use thiserror::Error;

/// A page that could not be written. Carries the entry key for reporting.
#[derive(Error, Debug)]
#[error("cannot write page for {key:?}: {source}")]
pub struct WriteError {
    pub key: String,
    #[source]
    pub source: std::io::Error,
}

/// Renders the shared HTML document shell.
pub(crate) fn base_document(title: &str, lang: &str, css: Option<&str>, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang=(lang) {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                title { (title) }
                @if let Some(css) = css {
                    style { (PreEscaped(css)) }
                }
            }
            body {
                (content)
            }
        }
    }
}

/// Renders the page for one entry.
pub fn render(entry: &Entry, lang: &str) -> Markup {
    let content = html! {
        h1 { (entry.simplified) }
        p { "Simplified: " (entry.simplified) }
        p { "Traditional: " (entry.traditional) }
        p { "Pinyin: " (entry.pinyin) }
        @for definition in &entry.definitions {
            p { (definition) }
        }
    };

    base_document(&entry.simplified, lang, None, content)
}

/// Render `entry` and write it to `output_dir`, replacing any existing page.
///
/// Returns the path of the written page.
pub fn write_page(entry: &Entry, output_dir: &Path, lang: &str) -> Result<PathBuf, WriteError> {
    let path = output_dir.join(entry.page_filename());
    let html = render(entry, lang).into_string();

    let persist = || -> std::io::Result<()> {
        let mut tmp = NamedTempFile::new_in(output_dir)?;
        tmp.write_all(html.as_bytes())?;
        tmp.persist(&path).map_err(|e| e.error)?;
        Ok(())
    };

    persist().map_err(|source| WriteError {
        key: entry.key().to_string(),
        source,
    })?;
    Ok(path)
}
