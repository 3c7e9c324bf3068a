// Filesystem path utilities.
// Resolves the config and log locations from the platform project directories.

use std::path::PathBuf;

use directories::ProjectDirs;

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("", "", "tiledeck")
}

/// Get the config directory (~/.config/tiledeck on Linux).
pub fn config_dir() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.config_dir().to_path_buf())
}

/// Path to the default config file.
pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("config.json"))
}

/// Get the cache directory (~/.cache/tiledeck on Linux).
pub fn cache_dir() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.cache_dir().to_path_buf())
}

/// Path to the default log file.
pub fn log_path() -> Option<PathBuf> {
    cache_dir().map(|dir| dir.join("tiledeck.log"))
}
