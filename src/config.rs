//! Store configuration and data-directory resolution.
//!
//! The data directory holds one collection file per entity kind. Resolution
//! order: explicit path, `LEXISTORE_DATA_DIR`, platform data directory,
//! `./data` as a last resort.

use directories::ProjectDirs;
use std::path::{Path, PathBuf};

/// Environment variable overriding the data directory.
pub const DATA_DIR_ENV: &str = "LEXISTORE_DATA_DIR";

/// Configuration for record stores.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Directory holding the per-entity collection files.
    data_dir: PathBuf,
}

impl StoreConfig {
    /// Creates a configuration with an explicit data directory.
    #[must_use]
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Resolves the configuration from the environment.
    ///
    /// Uses `LEXISTORE_DATA_DIR` when set, otherwise the platform data
    /// directory, otherwise `./data`.
    #[must_use]
    pub fn from_env() -> Self {
        if let Ok(dir) = std::env::var(DATA_DIR_ENV) {
            if !dir.trim().is_empty() {
                return Self::new(dir);
            }
        }

        let data_dir = ProjectDirs::from("", "", "lexistore")
            .map_or_else(|| PathBuf::from("data"), |dirs| dirs.data_dir().to_path_buf());

        Self { data_dir }
    }

    /// Returns the data directory.
    #[must_use]
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_data_dir() {
        let config = StoreConfig::new("/tmp/lexistore-test");
        assert_eq!(config.data_dir(), Path::new("/tmp/lexistore-test"));
    }

    #[test]
    fn test_from_env_falls_back() {
        // Whatever the environment, resolution must yield a non-empty path.
        let config = StoreConfig::from_env();
        assert!(!config.data_dir().as_os_str().is_empty());
    }
}
