//! Error types for report bundling

use std::path::PathBuf;
use thiserror::Error;

/// Everything that can abort a bundle operation. There is no partial result.
#[derive(Debug, Error)]
pub enum BundleError {
    /// Input directory does not exist or is not a directory
    #[error("input directory not found: {}", .0.display())]
    InputNotFound(PathBuf),

    /// The walk found no `.html` files at all
    #[error("no HTML files found in {}", .0.display())]
    NoHtmlFiles(PathBuf),

    /// HTML files exist but none of them is the root `index.html`
    #[error("no index.html found in {}", .0.display())]
    MissingIndex(PathBuf),

    /// A path segment is used both as a page and as a directory
    #[error("'{path}' is both a page and a directory in the report tree")]
    TreeConflict { path: String },

    /// Reading a page or asset failed
    #[error("failed to read {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Directory traversal failed
    #[error(transparent)]
    Walk(#[from] walkdir::Error),
}

/// Result type for bundle operations.
pub type Result<T> = std::result::Result<T, BundleError>;
