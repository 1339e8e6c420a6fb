//! Sidebar file tree

use crate::error::{BundleError, Result};
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// A node of the report's file hierarchy
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileTreeNode {
    Folder {
        name: String,
        children: Vec<FileTreeNode>,
    },
    Leaf {
        name: String,
        /// Relative path of the bound page
        path: String,
    },
}

impl FileTreeNode {
    pub fn name(&self) -> &str {
        match self {
            FileTreeNode::Folder { name, .. } | FileTreeNode::Leaf { name, .. } => name,
        }
    }

    pub fn is_folder(&self) -> bool {
        matches!(self, FileTreeNode::Folder { .. })
    }

    /// Number of leaves under (or at) this node
    pub fn leaf_count(&self) -> usize {
        match self {
            FileTreeNode::Folder { children, .. } => children.iter().map(Self::leaf_count).sum(),
            FileTreeNode::Leaf { .. } => 1,
        }
    }
}

/// Folders first, then case-sensitive by name
fn display_order(a: &FileTreeNode, b: &FileTreeNode) -> Ordering {
    b.is_folder()
        .cmp(&a.is_folder())
        .then_with(|| a.name().cmp(b.name()))
}

#[derive(Default)]
struct Builder {
    folders: BTreeMap<String, Builder>,
    leaves: BTreeMap<String, String>,
}

impl Builder {
    fn insert(&mut self, segments: &[&str], path: &str) -> Result<()> {
        let conflict = || BundleError::TreeConflict {
            path: path.to_string(),
        };
        match segments {
            [] => Ok(()),
            [leaf] => {
                if self.folders.contains_key(*leaf) {
                    return Err(conflict());
                }
                self.leaves.insert((*leaf).to_string(), path.to_string());
                Ok(())
            }
            [folder, rest @ ..] => {
                if self.leaves.contains_key(*folder) {
                    return Err(conflict());
                }
                self.folders
                    .entry((*folder).to_string())
                    .or_default()
                    .insert(rest, path)
            }
        }
    }

    fn into_nodes(self) -> Vec<FileTreeNode> {
        let mut nodes: Vec<FileTreeNode> = self
            .folders
            .into_iter()
            .map(|(name, sub)| FileTreeNode::Folder {
                name,
                children: sub.into_nodes(),
            })
            .chain(
                self.leaves
                    .into_iter()
                    .map(|(name, path)| FileTreeNode::Leaf { name, path }),
            )
            .collect();
        nodes.sort_by(display_order);
        nodes
    }
}

/// Build the top-level nodes for a set of relative page paths.
///
/// Fails with [`BundleError::TreeConflict`] when one path segment would be
/// both a page and a directory.
pub fn build_tree<'a>(paths: impl IntoIterator<Item = &'a str>) -> Result<Vec<FileTreeNode>> {
    let mut root = Builder::default();
    for path in paths {
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        root.insert(&segments, path)?;
    }
    Ok(root.into_nodes())
}
