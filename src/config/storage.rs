//! Session storage configuration

use serde::Deserialize;
use std::path::PathBuf;

use super::error::ValidationError;

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    #[serde(default)]
    pub backend: StorageBackend,

    /// Directory holding one YAML file per session (file backend)
    #[serde(default = "default_sessions_dir")]
    pub sessions_dir: PathBuf,
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    File,
    /// Process memory; sessions are lost on restart
    Memory,
}

impl StorageConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.backend == StorageBackend::File && self.sessions_dir.as_os_str().is_empty() {
            return Err(ValidationError::EmptySessionsDir);
        }
        Ok(())
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::default(),
            sessions_dir: default_sessions_dir(),
        }
    }
}

fn default_sessions_dir() -> PathBuf {
    PathBuf::from("sessions")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_defaults() {
        let config = StorageConfig::default();
        assert_eq!(config.backend, StorageBackend::File);
        assert_eq!(config.sessions_dir, PathBuf::from("sessions"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_file_backend_needs_directory() {
        let config = StorageConfig {
            sessions_dir: PathBuf::new(),
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ValidationError::EmptySessionsDir));

        let config = StorageConfig {
            backend: StorageBackend::Memory,
            sessions_dir: PathBuf::new(),
        };
        assert!(config.validate().is_ok());
    }
}
