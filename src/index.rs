//! The index page.
//!
//! One grid cell per entry, in dataset order, each linking to the entry's
//! page. Links are appended while pages are still being dispatched; the index
//! only needs data that is already in memory, so it never waits on renders.

use crate::config::{self, SiteConfig};
use crate::entry::Entry;
use crate::page::base_document;
use maud::{Markup, html};

const CSS_STATIC: &str = include_str!("../static/index.css");

/// Anchor for one entry.
pub fn link(entry: &Entry) -> Markup {
    html! {
        a.grid-item href=(entry.page_filename()) { (entry.simplified) }
    }
}

/// Accumulates index links in the order they are appended.
pub struct IndexBuilder {
    title: String,
    lang: String,
    css: String,
    links: Vec<Markup>,
}

impl IndexBuilder {
    /// Start an index page styled from `config`.
    pub fn begin_page(config: &SiteConfig) -> Self {
        let grid_css = config::generate_grid_css(&config.grid);
        Self {
            title: config.title.clone(),
            lang: config.lang.clone(),
            css: format!("{}\n\n{}", grid_css, CSS_STATIC),
            links: Vec::new(),
        }
    }

    pub fn append_link(&mut self, entry: &Entry) {
        self.links.push(link(entry));
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    /// Close the page and return the full document.
    pub fn end_page(self) -> Markup {
        let content = html! {
            div.grid-container {
                @for link in &self.links {
                    (link)
                }
            }
        };
        base_document(&self.title, &self.lang, Some(&self.css), content)
    }
}
