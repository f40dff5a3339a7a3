//! Configuration file loading and discovery.

use std::path::{Path, PathBuf};

use super::defaults::CONFIG_FILE_NAMES;
use super::types::AppConfig;
use super::validation::Validatable;
use crate::error::{Result, SbomGraphError};

/// Discover a config file by searching standard locations.
///
/// Search order:
/// 1. Explicit path if provided
/// 2. Current directory
/// 3. Git repository root (if in a repo)
/// 4. User config directory (~/.config/sbomgraph/)
/// 5. Home directory
#[must_use]
pub fn discover_config_file(explicit_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        if path.exists() {
            return Some(path.to_path_buf());
        }
    }

    let cwd = std::env::current_dir().ok();
    let candidates = [
        cwd.clone(),
        cwd.as_deref().and_then(find_git_root),
        dirs::config_dir().map(|d| d.join("sbomgraph")),
        dirs::home_dir(),
    ];
    candidates
        .iter()
        .flatten()
        .find_map(|dir| find_config_in_dir(dir))
}

/// Find a config file in a specific directory.
fn find_config_in_dir(dir: &Path) -> Option<PathBuf> {
    CONFIG_FILE_NAMES
        .iter()
        .map(|name| dir.join(name))
        .find(|path| path.exists())
}

/// Find the git repository root by walking up from `start`.
pub fn find_git_root(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .find(|dir| dir.join(".git").exists())
        .map(Path::to_path_buf)
}

/// Load an `AppConfig` from a YAML file.
pub fn load_config_file(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        SbomGraphError::config(format!("failed to read {}: {e}", path.display()))
    })?;
    serde_yaml::from_str(&content)
        .map_err(|e| SbomGraphError::config(format!("failed to parse {}: {e}", path.display())))
}

/// Load and validate the configuration.
///
/// An explicit path that does not exist, an unreadable file, or a file that
/// fails validation is an error. With no explicit path and nothing
/// discovered, defaults are returned.
pub fn load_config(explicit_path: Option<&Path>) -> Result<(AppConfig, Option<PathBuf>)> {
    if let Some(path) = explicit_path {
        if !path.exists() {
            return Err(SbomGraphError::config(format!(
                "config file not found: {}",
                path.display()
            )));
        }
    }
    let Some(path) = discover_config_file(explicit_path) else {
        return Ok((AppConfig::default(), None));
    };
    let config = load_config_file(&path)?;
    let errors = config.validate();
    if !errors.is_empty() {
        let joined: Vec<String> = errors.iter().map(ToString::to_string).collect();
        return Err(SbomGraphError::config(format!(
            "{}: {}",
            path.display(),
            joined.join("; ")
        )));
    }
    tracing::debug!(path = %path.display(), "loaded configuration");
    Ok((config, Some(path)))
}

/// Load config from discovered file, or return default.
///
/// Load failures are logged and fall back to defaults.
#[must_use]
pub fn load_or_default(explicit_path: Option<&Path>) -> (AppConfig, Option<PathBuf>) {
    discover_config_file(explicit_path).map_or_else(
        || (AppConfig::default(), None),
        |path| match load_config_file(&path) {
            Ok(config) => (config, Some(path)),
            Err(e) => {
                tracing::warn!("Failed to load config from {}: {}", path.display(), e);
                (AppConfig::default(), None)
            }
        },
    )
}

/// Generate an example config file content.
#[must_use]
pub fn generate_example_config() -> String {
    format!(
        r"# sbomgraph configuration
# Place this file at .sbomgraph.yaml in your project root or ~/.config/sbomgraph/

{}",
        serde_yaml::to_string(&AppConfig::default()).unwrap_or_default()
    )
}
