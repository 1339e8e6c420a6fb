//! Report discovery: walks the input directory and loads pages and assets

use crate::assets::AssetSet;
use crate::error::{BundleError, Result};
use crate::page::INDEX_PAGE;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// Some coverage tools write a second full copy of the HTML report into an
/// `lcov-report` directory next to the top-level one. It is never bundled.
pub const NESTED_REPORT_DIR: &str = "lcov-report";

const HTML_SUFFIX: &str = ".html";

/// An HTML file as read from disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawPage {
    /// Path relative to the report root, `/`-separated
    pub path: String,
    pub markup: String,
}

impl RawPage {
    pub fn new(path: impl Into<String>, markup: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            markup: markup.into(),
        }
    }
}

/// Everything the bundler needs from a report directory
#[derive(Debug, Clone)]
pub struct Collected {
    root: PathBuf,
    pages: Vec<RawPage>,
    assets: AssetSet,
}

impl Collected {
    /// Validate and take ownership of collected input. Pages are sorted by
    /// path. Fails when there are no pages or no root `index.html`.
    pub fn new(root: impl Into<PathBuf>, mut pages: Vec<RawPage>, assets: AssetSet) -> Result<Self> {
        let root = root.into();
        if pages.is_empty() {
            return Err(BundleError::NoHtmlFiles(root));
        }
        if !pages.iter().any(|p| p.path == INDEX_PAGE) {
            return Err(BundleError::MissingIndex(root));
        }
        pages.sort_by(|a, b| a.path.cmp(&b.path));
        Ok(Self {
            root,
            pages,
            assets,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn pages(&self) -> &[RawPage] {
        &self.pages
    }

    pub fn assets(&self) -> &AssetSet {
        &self.assets
    }
}

/// Read every HTML page under `input_dir` plus the shared assets at its root
pub fn collect(input_dir: &Path) -> Result<Collected> {
    let root = std::path::absolute(input_dir).unwrap_or_else(|_| input_dir.to_path_buf());
    if !root.is_dir() {
        return Err(BundleError::InputNotFound(root));
    }

    let mut pages = Vec::new();
    let walker = WalkDir::new(&root)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| !is_nested_report(e));

    for entry in walker {
        let entry = entry?;
        if !entry.file_type().is_file() || !is_html_file(entry.path()) {
            continue;
        }
        let bytes = fs::read(entry.path()).map_err(|source| BundleError::Read {
            path: entry.path().to_path_buf(),
            source,
        })?;
        pages.push(RawPage::new(
            relative_path(&root, entry.path()),
            String::from_utf8_lossy(&bytes),
        ));
    }

    let assets = AssetSet::load(&root)?;
    Collected::new(root, pages, assets)
}

fn is_nested_report(entry: &DirEntry) -> bool {
    entry.depth() > 0 && entry.file_type().is_dir() && entry.file_name() == NESTED_REPORT_DIR
}

/// Whether the file name ends in `.html`
pub fn is_html_file(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.ends_with(HTML_SUFFIX))
}

/// `path` relative to `root`, always with forward slashes
pub fn relative_path(root: &Path, path: &Path) -> String {
    let rel = path.strip_prefix(root).unwrap_or(path);
    rel.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
