//! Config schema and deserialization

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Output file used when neither the CLI nor the config names one
pub const DEFAULT_OUTPUT: &str = "coverage-report.html";

/// Root config structure for .bundlerc.json
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Config {
    /// Document title for the bundle
    #[serde(default)]
    pub title: Option<String>,

    /// Output file. Relative paths are resolved against the config file's
    /// directory when loaded from disk.
    #[serde(default)]
    pub output: Option<PathBuf>,
}

/// Settings after CLI flags have been applied over the config file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EffectiveConfig {
    pub title: Option<String>,
    pub output: PathBuf,
}

impl Config {
    /// Anchor a relative `output` at `base_dir`
    pub fn resolve_relative_to(mut self, base_dir: &Path) -> Self {
        if let Some(output) = self.output.take() {
            self.output = Some(if output.is_relative() {
                base_dir.join(output)
            } else {
                output
            });
        }
        self
    }

    /// CLI values win over config values, which win over defaults
    pub fn merge_with_cli(self, title: Option<String>, output: Option<PathBuf>) -> EffectiveConfig {
        EffectiveConfig {
            title: title.or(self.title),
            output: output
                .or(self.output)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT)),
        }
    }
}
