use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use super::QualityConfig;
use crate::core::{QualityError, Result};

/// File name searched for when no explicit configuration is given
pub const CONFIG_FILE_NAME: &str = ".qualitymap.toml";

/// Pure function to parse config from a TOML string
pub fn parse_config(contents: &str) -> Result<QualityConfig> {
    Ok(toml::from_str::<QualityConfig>(contents)?)
}

/// Load an explicit configuration file. Missing or malformed files are errors.
pub fn load_config_file(path: &Path) -> Result<QualityConfig> {
    let contents = fs::read_to_string(path).map_err(|e| {
        QualityError::Configuration(format!("Failed to read {}: {}", path.display(), e))
    })?;
    let config = parse_config(&contents)?;
    debug!(path = %path.display(), "Loaded config");
    Ok(config)
}

/// Pure function to generate directory ancestors up to a depth limit
pub fn directory_ancestors(start: PathBuf, max_depth: usize) -> impl Iterator<Item = PathBuf> {
    std::iter::successors(Some(start), |dir| {
        let mut parent = dir.clone();
        if parent.pop() {
            Some(parent)
        } else {
            None
        }
    })
    .take(max_depth)
}

fn try_load_config_from_path(config_path: &Path) -> Option<QualityConfig> {
    if !config_path.is_file() {
        return None;
    }
    match load_config_file(config_path) {
        Ok(config) => Some(config),
        Err(e) => {
            warn!(path = %config_path.display(), error = %e, "Ignoring unreadable config");
            None
        }
    }
}

/// Search `start` and its ancestors for `.qualitymap.toml`, falling back to defaults.
pub fn discover_config(start: &Path) -> QualityConfig {
    const MAX_TRAVERSAL_DEPTH: usize = 10;

    directory_ancestors(start.to_path_buf(), MAX_TRAVERSAL_DEPTH)
        .map(|dir| dir.join(CONFIG_FILE_NAME))
        .find_map(|path| try_load_config_from_path(&path))
        .unwrap_or_else(|| {
            debug!(
                depth = MAX_TRAVERSAL_DEPTH,
                "No config found, using default config"
            );
            QualityConfig::default()
        })
}
