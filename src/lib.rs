//! coverage-bundler: turn an Istanbul HTML coverage report into one file
//!
//! The report directory (an `index.html`, one page per source file and
//! directory, and a handful of shared CSS/JS/PNG assets) is read into memory,
//! inter-page links are rewritten to in-document anchors, and everything is
//! rendered into a single HTML document with a sidebar file tree and a small
//! navigation runtime. Coverage markup is treated as opaque.

pub mod assets;
pub mod collector;
pub mod config;
pub mod error;
pub mod links;
pub mod page;
pub mod renderer;
pub mod tree;
pub mod watcher;

pub use collector::{collect, Collected, RawPage};
pub use error::{BundleError, Result};
pub use links::{resolve_link, rewrite_links, PathIndex};
pub use page::{Page, DEFAULT_TITLE};
pub use tree::{build_tree, FileTreeNode};

use renderer::HtmlRenderer;
use serde::Serialize;
use std::path::PathBuf;

/// Input for [`bundle`]
#[derive(Debug, Clone, Default)]
pub struct BundleOptions {
    /// Report directory containing `index.html`
    pub input_dir: PathBuf,
    /// Document title; [`DEFAULT_TITLE`] when `None`
    pub title: Option<String>,
}

impl BundleOptions {
    pub fn new(input_dir: impl Into<PathBuf>) -> Self {
        Self {
            input_dir: input_dir.into(),
            title: None,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }
}

/// The rendered bundle and its summary
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BundleResult {
    #[serde(skip)]
    pub html: String,
    /// Number of bundled pages
    pub file_count: usize,
    /// Byte length of `html`
    pub total_size: usize,
    /// Relative paths of the bundled pages, sorted
    #[serde(skip)]
    pub pages: Vec<String>,
}

impl BundleResult {
    /// Human-readable size, e.g. `512 B`, `12.34 KB`, `1.50 MB`
    pub fn formatted_size(&self) -> String {
        format_size(self.total_size)
    }
}

/// Collect the report at `options.input_dir` and render it as one document
pub fn bundle(options: &BundleOptions) -> Result<BundleResult> {
    let collected = collect(&options.input_dir)?;
    bundle_collected(&collected, options.title.as_deref())
}

/// Render already-collected input. Pure: same input, same bytes.
pub fn bundle_collected(collected: &Collected, title: Option<&str>) -> Result<BundleResult> {
    let mut pages: Vec<Page> = collected
        .pages()
        .iter()
        .map(|raw| Page::new(raw.path.as_str(), &raw.markup))
        .collect();

    let index = PathIndex::from_pages(&pages);
    for page in &mut pages {
        let body = rewrite_links(page.body(), page.path(), &index);
        page.set_body(body);
    }

    let tree = build_tree(pages.iter().map(Page::path))?;
    let title = title.unwrap_or(DEFAULT_TITLE);
    let html = HtmlRenderer::new(title).render(&pages, &tree, &index, collected.assets());

    Ok(BundleResult {
        file_count: pages.len(),
        total_size: html.len(),
        pages: pages.iter().map(|p| p.path().to_string()).collect(),
        html,
    })
}

/// Format a byte count with binary units
pub fn format_size(bytes: usize) -> String {
    const KB: f64 = 1024.0;
    const MB: f64 = KB * 1024.0;
    let b = bytes as f64;
    if b < KB {
        format!("{} B", bytes)
    } else if b < MB {
        format!("{:.2} KB", b / KB)
    } else {
        format!("{:.2} MB", b / MB)
    }
}
