//! Site configuration and run modes.
//!
//! Presentation settings come from an optional `site.toml` in the working
//! directory. Everything about *where* the build reads and writes is fixed:
//! the dataset is always `cedict.json`, the output directory is chosen by the
//! run [`Mode`], and the render worker count is [`WORKER_SLOTS`].
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! title = "CC-CEDICT"       # <title> of the index page
//! lang = "zh"               # <html lang> on every page
//!
//! [grid]
//! cell_size = "100px"       # Width and height of an index grid cell
//! compact_cell_size = "50px" # Cell size on narrow screens
//! breakpoint = "600px"      # Viewport width below which cells shrink
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Dataset file, relative to the working directory.
pub const INPUT_FILE: &str = "cedict.json";

/// Optional presentation config, relative to the working directory.
pub const CONFIG_FILE: &str = "site.toml";

/// Maximum number of pages rendered at the same time.
pub const WORKER_SLOTS: usize = 8;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Where a run writes its pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Local build into `build/`.
    Build,
    /// Publishable build into `docs/` (served by GitHub Pages).
    Publish,
}

impl Mode {
    pub fn output_dir(self) -> PathBuf {
        match self {
            Mode::Build => PathBuf::from("build"),
            Mode::Publish => PathBuf::from("docs"),
        }
    }
}

/// Presentation settings loaded from `site.toml`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Title of the index page.
    pub title: String,
    /// Language tag for the `lang` attribute of every page.
    pub lang: String,
    /// Index grid layout.
    pub grid: GridConfig,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "CC-CEDICT".to_string(),
            lang: "zh".to_string(),
            grid: GridConfig::default(),
        }
    }
}

/// Index page grid dimensions, as CSS lengths.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GridConfig {
    pub cell_size: String,
    pub compact_cell_size: String,
    pub breakpoint: String,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            cell_size: "100px".to_string(),
            compact_cell_size: "50px".to_string(),
            breakpoint: "600px".to_string(),
        }
    }
}

impl SiteConfig {
    /// Validate config values are usable in the generated markup.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.title.trim().is_empty() {
            return Err(ConfigError::Validation("title must not be empty".into()));
        }
        if self.lang.trim().is_empty() {
            return Err(ConfigError::Validation("lang must not be empty".into()));
        }
        for (name, value) in [
            ("grid.cell_size", &self.grid.cell_size),
            ("grid.compact_cell_size", &self.grid.compact_cell_size),
            ("grid.breakpoint", &self.grid.breakpoint),
        ] {
            if !is_css_length(value) {
                return Err(ConfigError::Validation(format!(
                    "{name} must be a CSS length like \"100px\", got {value:?}"
                )));
            }
        }
        Ok(())
    }
}

/// Accepts a number followed by a unit made of letters or `%`.
///
/// Values end up inside a `<style>` block, so anything that could close a
/// declaration is refused.
fn is_css_length(value: &str) -> bool {
    let digits = value
        .find(|c: char| !(c.is_ascii_digit() || c == '.'))
        .unwrap_or(value.len());
    let (number, unit) = value.split_at(digits);
    !number.is_empty()
        && number.parse::<f64>().is_ok()
        && unit.chars().all(|c| c.is_ascii_alphabetic() || c == '%')
}

/// Load `site.toml` from `dir`.
///
/// Returns stock defaults when the file does not exist. Missing keys keep
/// their defaults; unknown keys are an error.
pub fn load_config(dir: &Path) -> Result<SiteConfig, ConfigError> {
    let config_path = dir.join(CONFIG_FILE);
    if !config_path.exists() {
        return Ok(SiteConfig::default());
    }
    let content = fs::read_to_string(&config_path)?;
    let config: SiteConfig = toml::from_str(&content)?;
    config.validate()?;
    Ok(config)
}

/// CSS custom properties for the index grid, prepended to the index stylesheet.
pub fn generate_grid_css(grid: &GridConfig) -> String {
    format!(
        ":root {{\n    --cell-size: {};\n}}\n@media (max-width: {}) {{\n    :root {{\n        --cell-size: {};\n    }}\n}}",
        grid.cell_size, grid.breakpoint, grid.compact_cell_size
    )
}

/// Returns a fully-commented stock `site.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# cedict-site configuration
# =========================
# All settings are optional. Values shown below are the defaults.
# Place this file next to cedict.json as site.toml.
# Unknown keys will cause an error.

# Title of the index page.
title = "CC-CEDICT"

# Language tag used for the lang attribute of every page.
lang = "zh"

[grid]
# Width and height of one index cell.
cell_size = "100px"
# Cell size once the viewport is narrower than the breakpoint.
compact_cell_size = "50px"
# Viewport width at which cells switch to the compact size.
breakpoint = "600px"
"##
}
