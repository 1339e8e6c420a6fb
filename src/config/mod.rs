//! Configuration loading for coverage-bundler

mod schema;

pub use schema::{Config, EffectiveConfig, DEFAULT_OUTPUT};

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

pub const CONFIG_FILENAME: &str = ".bundlerc.json";

/// Find and load the config file. With `custom_path` that file must exist;
/// otherwise `work_dir` and its parents are searched and a missing file means
/// defaults.
pub fn load_config(work_dir: &Path, custom_path: Option<&Path>) -> Result<Config> {
    let path = if let Some(p) = custom_path {
        if !p.is_file() {
            anyhow::bail!("Config file not found: {}", p.display());
        }
        Some(p.to_path_buf())
    } else {
        let start = std::path::absolute(work_dir).unwrap_or_else(|_| work_dir.to_path_buf());
        find_config_in_parents(&start)
    };

    match path {
        Some(path) => load_config_file(&path),
        None => Ok(Config::default()),
    }
}

fn load_config_file(config_path: &Path) -> Result<Config> {
    let content = fs::read_to_string(config_path)
        .with_context(|| format!("Failed to read config: {}", config_path.display()))?;
    let config: Config = serde_json::from_str(&content)
        .with_context(|| format!("Invalid JSON in config: {}", config_path.display()))?;
    let base_dir = config_path.parent().unwrap_or(Path::new("."));
    Ok(config.resolve_relative_to(base_dir))
}

/// Search for .bundlerc.json in directory and its parents
fn find_config_in_parents(mut dir: &Path) -> Option<PathBuf> {
    loop {
        let candidate = dir.join(CONFIG_FILENAME);
        if candidate.is_file() {
            return Some(candidate);
        }
        dir = dir.parent()?;
    }
}
