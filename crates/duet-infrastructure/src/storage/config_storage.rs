//! Config file storage.
//!
//! Reads `config.toml` into [`ConfigFileDTO`]. A missing file is not an
//! error: everything can come from the environment.

use crate::dto::ConfigFileDTO;
use duet_core::DuetError;
use std::fs;
use std::path::{Path, PathBuf};

/// Errors that can occur during config storage operations.
#[derive(Debug)]
pub enum ConfigStorageError {
    /// File I/O error.
    IoError(PathBuf, std::io::Error),
    /// TOML parsing error.
    TomlParseError(PathBuf, toml::de::Error),
}

impl std::fmt::Display for ConfigStorageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigStorageError::IoError(path, e) => {
                write!(f, "I/O error reading {}: {}", path.display(), e)
            }
            ConfigStorageError::TomlParseError(path, e) => {
                write!(f, "TOML parse error in {}: {}", path.display(), e)
            }
        }
    }
}

impl std::error::Error for ConfigStorageError {}

impl From<ConfigStorageError> for DuetError {
    fn from(e: ConfigStorageError) -> Self {
        DuetError::config(e.to_string())
    }
}

/// Read-only access to one config file.
pub struct ConfigStorage {
    path: PathBuf,
}

impl ConfigStorage {
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the file, returning `None` if it does not exist.
    pub fn load(&self) -> Result<Option<ConfigFileDTO>, ConfigStorageError> {
        if !self.path.exists() {
            tracing::debug!(path = %self.path.display(), "config file not present");
            return Ok(None);
        }

        let content = fs::read_to_string(&self.path)
            .map_err(|e| ConfigStorageError::IoError(self.path.clone(), e))?;
        let dto = toml::from_str(&content)
            .map_err(|e| ConfigStorageError::TomlParseError(self.path.clone(), e))?;

        tracing::debug!(path = %self.path.display(), "loaded config file");
        Ok(Some(dto))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_load_nonexistent_file() {
        let temp_dir = TempDir::new().unwrap();
        let storage = ConfigStorage::with_path(temp_dir.path().join("config.toml"));

        assert!(storage.load().unwrap().is_none());
    }

    #[test]
    fn test_load_valid_toml() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("config.toml");
        fs::write(
            &file_path,
            r#"
            [agent]
            base_url = "http://localhost:8800"
            agent_id = "agent-42"

            [completion]
            model = "anthropic/claude-3.5-sonnet"
            "#,
        )
        .unwrap();

        let dto = ConfigStorage::with_path(file_path).load().unwrap().unwrap();
        assert_eq!(dto.agent.agent_id.as_deref(), Some("agent-42"));
        assert_eq!(
            dto.completion.model.as_deref(),
            Some("anthropic/claude-3.5-sonnet")
        );
    }

    #[test]
    fn test_load_invalid_toml() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("config.toml");
        fs::write(&file_path, "[agent\nbase_url = ").unwrap();

        let result = ConfigStorage::with_path(file_path.clone()).load();
        match result {
            Err(ConfigStorageError::TomlParseError(path, _)) => assert_eq!(path, file_path),
            other => panic!("Expected TomlParseError, got {other:?}"),
        }
    }
}
