//! Configuration and derived data paths
//!
//! User settings live as YAML at `.semsearch/config.yaml` under the working
//! directory; a missing file means defaults. `DataPaths` holds every path
//! derived from the root so commands and the MCP server agree on layout.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, SearchError};
use crate::search::embedding::DEFAULT_DIMENSION;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Embedding dimension. Changing this on an existing database requires
    /// a reindex (`semsearch index`).
    pub dimension: usize,
    /// Default number of search results.
    pub default_limit: usize,
    /// Default glob pattern for `import`.
    pub import_glob: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            dimension: DEFAULT_DIMENSION,
            default_limit: 5,
            import_glob: "**/*.txt".to_string(),
        }
    }
}

impl Config {
    /// Load from path. A missing file yields defaults; a malformed file or
    /// an out-of-range value is an error.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let raw = fs::read_to_string(path)?;
        let config: Self = serde_yaml::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    // The embedder takes hash % dimension, so zero must never reach it
    fn validate(&self) -> Result<()> {
        if self.dimension == 0 {
            return Err(SearchError::InvalidConfig(
                "dimension must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_yaml::to_string(self)?)?;
        Ok(())
    }
}

/// Paths derived from the engine's root directory.
pub struct DataPaths {
    pub root: PathBuf,
    pub data_dir: PathBuf,
    pub db: PathBuf,
    pub config: PathBuf,
}

impl DataPaths {
    pub fn new() -> Self {
        let root = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        Self::from_root(root)
    }

    pub fn from_root(root: PathBuf) -> Self {
        let data_dir = root.join(".semsearch");
        Self {
            db: data_dir.join("search.db"),
            config: data_dir.join("config.yaml"),
            data_dir,
            root,
        }
    }
}

impl Default for DataPaths {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_when_file_missing() {
        let dir = tempfile::TempDir::new().unwrap();

        let config = Config::load(&dir.path().join("config.yaml")).unwrap();
        assert_eq!(config.dimension, DEFAULT_DIMENSION);
        assert_eq!(config.default_limit, 5);
        assert_eq!(config.import_glob, "**/*.txt");
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.yaml");

        let config = Config {
            dimension: 128,
            default_limit: 10,
            import_glob: "**/*.md".to_string(),
        };
        config.save(&path).unwrap();

        let loaded = Config::load(&path).unwrap();
        assert_eq!(loaded.dimension, 128);
        assert_eq!(loaded.default_limit, 10);
        assert_eq!(loaded.import_glob, "**/*.md");
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.yaml");
        fs::write(&path, "dimension: 64\n").unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.dimension, 64);
        assert_eq!(config.default_limit, 5);
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.yaml");
        fs::write(&path, "dimension: [not closed\n").unwrap();

        assert!(Config::load(&path).is_err());
    }

    #[test]
    fn test_zero_dimension_is_rejected() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.yaml");
        fs::write(&path, "dimension: 0\n").unwrap();

        let err = Config::load(&path).unwrap_err();
        assert!(matches!(err, SearchError::InvalidConfig(_)));
    }

    #[test]
    fn test_derived_paths() {
        let paths = DataPaths::from_root(PathBuf::from("/tmp/project"));

        assert_eq!(paths.data_dir, PathBuf::from("/tmp/project/.semsearch"));
        assert_eq!(paths.db, PathBuf::from("/tmp/project/.semsearch/search.db"));
        assert_eq!(
            paths.config,
            PathBuf::from("/tmp/project/.semsearch/config.yaml")
        );
    }
}
