//! # cedict-site
//!
//! A static site generator for dictionary datasets. Reads `cedict.json`, a
//! JSON array of entries (simplified, traditional, pinyin, definitions), and
//! writes one HTML page per entry plus an index page linking them all in a
//! responsive grid.
//!
//! # Pipeline
//!
//! ```text
//! cedict.json ──load──> Vec<Entry> ──┬──> IndexBuilder ──> index.html
//!                                    └──> WorkerPool ──> {simplified}.html
//!                                              │
//!                                              └──> Progress (bar on stdout)
//! ```
//!
//! Entries are walked once in dataset order. Each one adds its link to the
//! index and is dispatched as a render task; dispatch blocks while every
//! worker slot is taken. The index is written as soon as the walk ends, then
//! the run waits for the remaining renders.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`entry`] | Dataset loading and key validation |
//! | [`page`] | Per-entry page rendering and atomic writes |
//! | [`index`] | Index page assembly |
//! | [`pool`] | Bounded worker pool with a completion barrier |
//! | [`progress`] | Shared completion counter and progress bar |
//! | [`generate`] | Output directory setup and the build itself |
//! | [`config`] | Optional `site.toml`, run modes, fixed paths |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Maud for Markup
//!
//! Pages are built with [Maud](https://maud.lambda.xyz/), so the templates are
//! checked at compile time and every dictionary field is HTML-escaped. A
//! definition like `<b>` shows up as text rather than markup.
//!
//! ## Unsafe Keys Are Skipped
//!
//! The simplified form is used as a filename. Entries whose key is empty,
//! `.`/`..`, the index stem `index`, or contains a path separator are left
//! out of the site entirely (no page, no index link) and listed in the build
//! report.
//!
//! ## Failures Are Reported, Not Fatal
//!
//! A page that cannot be written is logged and the build continues. The CLI
//! prints the failed keys at the end and exits non-zero, so a dangling index
//! link never goes unnoticed.

pub mod config;
pub mod entry;
pub mod generate;
pub mod index;
pub mod output;
pub mod page;
pub mod pool;
pub mod progress;

#[cfg(test)]
pub(crate) mod test_helpers;
