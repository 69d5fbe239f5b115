//! Site generation.
//!
//! Turns the dataset into the published directory:
//!
//! ```text
//! build/
//! ├── index.html      # Grid of links, one per entry, dataset order
//! ├── 你好.html        # One page per entry
//! ├── 们.html
//! └── ...
//! ```
//!
//! ## Order of Operations
//!
//! 1. Load and parse the dataset. Any failure here is fatal and happens before
//!    the output directory is touched.
//! 2. Drop entries whose key cannot be a filename (logged, reported).
//! 3. Create the output directory and delete every `*.html` already in it, so
//!    each run regenerates the site from scratch.
//! 4. For each entry, in dataset order: append its index link, then dispatch
//!    its page render to the [`WorkerPool`]. Dispatch blocks while all slots
//!    are busy.
//! 5. Write `index.html`. It needs only the links, not the rendered pages.
//! 6. Wait for every render to finish.
//!
//! A page that fails to write is logged and listed in the [`BuildReport`]; the
//! other renders carry on and the progress bar still reaches 100%.

use crate::config::SiteConfig;
use crate::entry::{self, Entry, InvalidKey, LoadError};
use crate::index::IndexBuilder;
use crate::page::{self, WriteError};
use crate::pool::{self, PoolError, WorkerPool};
use crate::progress::Progress;
use log::{debug, info, warn};
use std::fs;
use std::io::Write;
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use walkdir::WalkDir;

/// Name of the index page inside the output directory.
pub const INDEX_FILE: &str = "index.html";

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("cannot prepare output directory {}: {source}", .path.display())]
    Setup {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Load(#[from] LoadError),
    #[error("cannot write {}: {source}", .path.display())]
    Index {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Pool(#[from] PoolError),
}

/// An entry left out of the site because its key is not a usable filename.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedEntry {
    /// 1-based position in the dataset.
    pub position: usize,
    pub reason: InvalidKey,
}

/// What a build did.
#[derive(Debug)]
pub struct BuildReport {
    pub output_dir: PathBuf,
    /// Stale `*.html` files deleted before generating.
    pub removed: usize,
    /// Pages dispatched for rendering; also the number of index links.
    pub dispatched: usize,
    pub skipped: Vec<SkippedEntry>,
    pub failures: Vec<WriteError>,
}

impl BuildReport {
    /// Pages that were written successfully.
    pub fn written(&self) -> usize {
        self.dispatched - self.failures.len()
    }

    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Split entries into publishable ones and those with unusable keys.
pub fn partition_entries(entries: Vec<Entry>) -> (Vec<Entry>, Vec<SkippedEntry>) {
    let mut valid = Vec::with_capacity(entries.len());
    let mut skipped = Vec::new();
    for (i, entry) in entries.into_iter().enumerate() {
        match entry::validate_key(entry.key()) {
            Ok(()) => valid.push(entry),
            Err(reason) => skipped.push(SkippedEntry {
                position: i + 1,
                reason,
            }),
        }
    }
    (valid, skipped)
}

/// Load `input` and find unpublishable entries without writing anything.
///
/// Returns the entry count and the entries that would be skipped.
pub fn check(input: &Path) -> Result<(usize, Vec<SkippedEntry>), LoadError> {
    let entries = entry::load(input)?;
    let total = entries.len();
    let (_, skipped) = partition_entries(entries);
    Ok((total, skipped))
}

/// Create `dir` if needed and delete the `*.html` files directly inside it.
///
/// Returns how many files were deleted.
pub fn prepare_output_dir(dir: &Path) -> Result<usize, GenerateError> {
    let setup_error = |source: std::io::Error| GenerateError::Setup {
        path: dir.to_path_buf(),
        source,
    };

    fs::create_dir_all(dir).map_err(setup_error)?;

    let mut removed = 0;
    for dir_entry in WalkDir::new(dir).min_depth(1).max_depth(1) {
        let dir_entry = dir_entry.map_err(|e| setup_error(e.into()))?;
        let path = dir_entry.path();
        if dir_entry.file_type().is_file() && path.extension().is_some_and(|ext| ext == "html") {
            fs::remove_file(path).map_err(setup_error)?;
            removed += 1;
        }
    }
    Ok(removed)
}

/// Run one page write, turning a panic into a [`WriteError`] for `key`.
///
/// Every render task reports exactly one outcome, so a panicking render still
/// advances the progress bar and shows up as a failure in the report.
fn run_render<F>(key: &str, render: F) -> Result<(), WriteError>
where
    F: FnOnce() -> Result<PathBuf, WriteError>,
{
    match panic::catch_unwind(AssertUnwindSafe(render)) {
        Ok(written) => written.map(|path| debug!("Wrote {}", path.display())),
        Err(payload) => Err(WriteError {
            key: key.to_string(),
            source: std::io::Error::other(format!(
                "render panicked: {}",
                pool::panic_message(&*payload)
            )),
        }),
    }
}

/// Build the site from `input` into `output_dir`.
///
/// At most `workers` pages render at once. The progress bar is drawn on
/// `progress_out`.
pub fn generate<W>(
    input: &Path,
    output_dir: &Path,
    config: &SiteConfig,
    workers: usize,
    progress_out: W,
) -> Result<BuildReport, GenerateError>
where
    W: Write + Send + 'static,
{
    let entries = entry::load(input)?;
    info!("Loaded {} entries from {}", entries.len(), input.display());

    let (entries, skipped) = partition_entries(entries);
    for s in &skipped {
        warn!("Skipping entry {}: {}", s.position, s.reason);
    }

    let removed = prepare_output_dir(output_dir)?;
    debug!("Removed {} stale pages from {}", removed, output_dir.display());

    let pool = WorkerPool::new(workers)?;
    let progress = Arc::new(Progress::new(entries.len(), progress_out));
    let shared_dir: Arc<Path> = Arc::from(output_dir);
    let lang: Arc<str> = Arc::from(config.lang.as_str());

    let mut index = IndexBuilder::begin_page(config);
    for entry in entries {
        index.append_link(&entry);

        let progress = Arc::clone(&progress);
        let dir = Arc::clone(&shared_dir);
        let lang = Arc::clone(&lang);
        pool.dispatch(move || {
            let outcome = run_render(entry.key(), || page::write_page(&entry, &dir, &lang));
            progress.record_completion(outcome);
        });
    }

    let index_path = output_dir.join(INDEX_FILE);
    let index_written = fs::write(&index_path, index.end_page().into_string());

    pool.wait_all();

    index_written.map_err(|source| GenerateError::Index {
        path: index_path,
        source,
    })?;

    Ok(BuildReport {
        output_dir: output_dir.to_path_buf(),
        removed,
        dispatched: progress.total(),
        skipped,
        failures: progress.take_failures(),
    })
}
