use std::path::{Path, PathBuf};

use arbiter_core::config::EngineConfig;
use arbiter_core::errors::ConfigError;
use arbiter_core::schema::parse_config;
use arbiter_core::traits::ConfigStore;

use super::atomic::{atomic_write, AdvisoryLock};

/// Configuration document stored as pretty-printed JSON on disk.
#[derive(Debug, Clone)]
pub struct FileConfigStore {
    path: PathBuf,
}

impl FileConfigStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ConfigStore for FileConfigStore {
    fn load(&self) -> Result<EngineConfig, ConfigError> {
        if !self.path.exists() {
            return Err(ConfigError::NotFound(self.path.display().to_string()));
        }
        let content = std::fs::read_to_string(&self.path)
            .map_err(|e| ConfigError::Read(format!("{}: {e}", self.path.display())))?;
        parse_config(&content)
    }

    fn save(&self, config: &EngineConfig) -> Result<(), ConfigError> {
        let write_err = |e: anyhow::Error| ConfigError::Write(format!("{e:#}"));

        if let Some(dir) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir)
                .map_err(|e| ConfigError::Write(format!("{}: {e}", dir.display())))?;
        }
        let json = serde_json::to_string_pretty(config)
            .map_err(|e| ConfigError::Write(e.to_string()))?;

        let lock = AdvisoryLock::acquire(&self.path).map_err(write_err)?;
        atomic_write(&self.path, json.as_bytes()).map_err(write_err)?;
        lock.release().map_err(write_err)
    }
}
