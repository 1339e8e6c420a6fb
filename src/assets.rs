//! Shared report assets (stylesheets, scripts, images)
//!
//! Istanbul writes a fixed set of support files next to the root `index.html`.
//! Only that set is bundled, and only from the report root. Any of them may be
//! missing; a missing asset simply contributes nothing to the output.

use crate::error::{BundleError, Result};
use base64::prelude::BASE64_STANDARD;
use base64::Engine;
use std::fs;
use std::path::Path;

/// Stylesheets concatenated into the output `<style>` block, in this order.
pub const STYLESHEETS: [&str; 2] = ["base.css", "prettify.css"];

/// Scripts concatenated into the trailing `<script>` block, in this order.
pub const SCRIPTS: [&str; 3] = ["prettify.js", "sorter.js", "block-navigation.js"];

/// Page icon, emitted as `<link rel="icon">`.
pub const FAVICON: &str = "favicon.png";

/// Sorting arrows referenced from `base.css` via `url(sort-arrow-sprite.png)`.
pub const SORT_ARROW_SPRITE: &str = "sort-arrow-sprite.png";

/// Images loaded as binary assets.
pub const IMAGES: [&str; 2] = [FAVICON, SORT_ARROW_SPRITE];

/// Asset payload: text is inlined verbatim, binary as a base64 data URI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssetContent {
    Text(String),
    Binary(Vec<u8>),
}

/// A named shared resource from the report root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Asset {
    /// File name relative to the report root (e.g. `base.css`)
    pub name: String,
    pub content: AssetContent,
}

impl Asset {
    pub fn text(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: AssetContent::Text(content.into()),
        }
    }

    pub fn binary(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            content: AssetContent::Binary(bytes),
        }
    }

    /// Text content, or `None` for binary assets
    pub fn as_text(&self) -> Option<&str> {
        match &self.content {
            AssetContent::Text(s) => Some(s),
            AssetContent::Binary(_) => None,
        }
    }

    /// `data:` URI for the asset. Text assets are encoded as UTF-8 bytes.
    pub fn data_uri(&self) -> String {
        let bytes = match &self.content {
            AssetContent::Text(s) => s.as_bytes(),
            AssetContent::Binary(b) => b.as_slice(),
        };
        format!(
            "data:{};base64,{}",
            mime_for(&self.name),
            BASE64_STANDARD.encode(bytes)
        )
    }
}

/// MIME type for an image asset. Only `.png` is recognised; everything else is
/// treated as an icon.
pub fn mime_for(name: &str) -> &'static str {
    let is_png = Path::new(name)
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("png"));
    if is_png {
        "image/png"
    } else {
        "image/x-icon"
    }
}

/// The assets found in a report root
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssetSet {
    assets: Vec<Asset>,
}

impl AssetSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load every known asset present in `root`. Absent files are skipped.
    pub fn load(root: &Path) -> Result<Self> {
        let mut set = Self::new();
        for name in STYLESHEETS.iter().chain(SCRIPTS.iter()) {
            if let Some(bytes) = read_optional(&root.join(name))? {
                set.insert(Asset::text(*name, String::from_utf8_lossy(&bytes)));
            }
        }
        for name in IMAGES {
            if let Some(bytes) = read_optional(&root.join(name))? {
                set.insert(Asset::binary(name, bytes));
            }
        }
        Ok(set)
    }

    /// Add or replace an asset by name
    pub fn insert(&mut self, asset: Asset) {
        self.assets.retain(|a| a.name != asset.name);
        self.assets.push(asset);
    }

    pub fn get(&self, name: &str) -> Option<&Asset> {
        self.assets.iter().find(|a| a.name == name)
    }

    pub fn len(&self) -> usize {
        self.assets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }

    /// Concatenated stylesheets with the sort sprite inlined when present
    pub fn stylesheet_text(&self) -> String {
        let css = concat_text(self, &STYLESHEETS);
        match self.get(SORT_ARROW_SPRITE) {
            Some(sprite) => css.replace(SORT_ARROW_SPRITE, &sprite.data_uri()),
            None => css,
        }
    }

    /// Concatenated scripts in load order
    pub fn script_text(&self) -> String {
        concat_text(self, &SCRIPTS)
    }

    pub fn favicon_data_uri(&self) -> Option<String> {
        self.get(FAVICON).map(Asset::data_uri)
    }
}

fn concat_text(set: &AssetSet, names: &[&str]) -> String {
    let mut out = String::new();
    for name in names {
        if let Some(text) = set.get(name).and_then(Asset::as_text) {
            out.push_str(text);
            if !text.ends_with('\n') {
                out.push('\n');
            }
        }
    }
    out
}

fn read_optional(path: &Path) -> Result<Option<Vec<u8>>> {
    if !path.is_file() {
        return Ok(None);
    }
    fs::read(path).map(Some).map_err(|source| BundleError::Read {
        path: path.to_path_buf(),
        source,
    })
}
