//! File system watcher for watch mode

use crate::assets::{IMAGES, SCRIPTS, STYLESHEETS};
use crate::collector::{is_html_file, NESTED_REPORT_DIR};
use notify::{Config, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{channel, Receiver};
use std::time::Duration;

const DEBOUNCE_MS: u64 = 300;

/// Watches a report directory and emits changed report files
pub struct ReportWatcher {
    _watcher: RecommendedWatcher,
    root: PathBuf,
    receiver: Receiver<notify::Result<notify::Event>>,
    ignored: Option<PathBuf>,
}

fn is_relevant_kind(kind: &EventKind) -> bool {
    matches!(
        kind,
        EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_)
    )
}

impl ReportWatcher {
    /// Start watching `dir` recursively
    pub fn watch(dir: &Path) -> notify::Result<Self> {
        let (tx, rx) = channel();
        let mut watcher = RecommendedWatcher::new(
            move |res| {
                let _ = tx.send(res);
            },
            Config::default().with_poll_interval(Duration::from_millis(DEBOUNCE_MS)),
        )?;
        watcher.watch(dir, RecursiveMode::Recursive)?;

        Ok(Self {
            _watcher: watcher,
            root: absolute(dir),
            receiver: rx,
            ignored: None,
        })
    }

    /// Never report `path` (the bundle output when it sits inside the report)
    pub fn ignoring(mut self, path: &Path) -> Self {
        self.ignored = Some(absolute(path));
        self
    }

    /// Whether a change to `p` under the report `root` affects the bundle:
    /// any HTML page outside a nested `lcov-report` copy, or one of the known
    /// shared assets. Only components below `root` count as nested, so a root
    /// that is itself named `lcov-report` still reports its pages.
    pub fn is_report_file(root: &Path, p: &Path) -> bool {
        let below_root = p.strip_prefix(root).unwrap_or(p);
        if below_root
            .components()
            .any(|c| c.as_os_str() == NESTED_REPORT_DIR)
        {
            return false;
        }
        if is_html_file(p) {
            return true;
        }
        let Some(name) = p.file_name().and_then(|n| n.to_str()) else {
            return false;
        };
        STYLESHEETS
            .iter()
            .chain(SCRIPTS.iter())
            .chain(IMAGES.iter())
            .any(|asset| *asset == name)
    }

    fn paths_from_event(&self, event: &notify::Event) -> Vec<PathBuf> {
        if !is_relevant_kind(&event.kind) {
            return vec![];
        }
        event
            .paths
            .iter()
            .filter(|p| Self::is_report_file(&self.root, &absolute(p)))
            .filter(|p| self.ignored.as_ref() != Some(&absolute(p)))
            .cloned()
            .collect()
    }

    /// Wait for the next batch of changes (debounced). Blocks until at least one change, then drains for DEBOUNCE_MS.
    pub fn next_changes(&self) -> Vec<PathBuf> {
        let mut all = HashSet::new();

        match self.receiver.recv_timeout(Duration::from_secs(3600)) {
            Ok(Ok(event)) => all.extend(self.paths_from_event(&event)),
            Ok(Err(_)) | Err(_) => return vec![],
        }

        std::thread::sleep(Duration::from_millis(DEBOUNCE_MS));
        while let Ok(ev) = self.receiver.try_recv() {
            if let Ok(event) = ev {
                all.extend(self.paths_from_event(&event));
            }
        }

        let mut changed: Vec<PathBuf> = all.into_iter().collect();
        changed.sort();
        changed
    }
}

fn absolute(p: &Path) -> PathBuf {
    std::path::absolute(p).unwrap_or_else(|_| p.to_path_buf())
}
