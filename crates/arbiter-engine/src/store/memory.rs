use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use arbiter_core::config::EngineConfig;
use arbiter_core::errors::ConfigError;
use arbiter_core::traits::ConfigStore;

/// In-process configuration store for tests and embedding.
#[derive(Debug, Default)]
pub struct MemoryConfigStore {
    document: Mutex<Option<EngineConfig>>,
    fail_loads: AtomicBool,
    fail_saves: AtomicBool,
    saves: AtomicUsize,
}

impl MemoryConfigStore {
    /// An empty store: the first load reports the document as missing.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: EngineConfig) -> Self {
        Self {
            document: Mutex::new(Some(config)),
            ..Self::default()
        }
    }

    pub fn fail_loads(self, fail: bool) -> Self {
        self.fail_loads.store(fail, Ordering::SeqCst);
        self
    }

    pub fn fail_saves(self, fail: bool) -> Self {
        self.fail_saves.store(fail, Ordering::SeqCst);
        self
    }

    /// Last document written (or seeded).
    pub fn stored(&self) -> Option<EngineConfig> {
        self.document
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }
}

impl ConfigStore for MemoryConfigStore {
    fn load(&self) -> Result<EngineConfig, ConfigError> {
        if self.fail_loads.load(Ordering::SeqCst) {
            return Err(ConfigError::Read("memory store configured to fail".into()));
        }
        self.stored()
            .ok_or_else(|| ConfigError::NotFound("memory store is empty".into()))
    }

    fn save(&self, config: &EngineConfig) -> Result<(), ConfigError> {
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(ConfigError::Write("memory store configured to fail".into()));
        }
        *self.document.lock().unwrap_or_else(|e| e.into_inner()) = Some(config.clone());
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_store_reports_not_found() {
        let store = MemoryConfigStore::new();
        assert!(matches!(store.load(), Err(ConfigError::NotFound(_))));
    }

    #[test]
    fn save_is_visible_to_load() {
        let store = MemoryConfigStore::new();
        let mut config = EngineConfig::default();
        config.high_cost_threshold = 42.0;
        store.save(&config).unwrap();
        assert_eq!(store.load().unwrap().high_cost_threshold, 42.0);
        assert_eq!(store.save_count(), 1);
    }

    #[test]
    fn failure_switches() {
        let store = MemoryConfigStore::with_config(EngineConfig::default())
            .fail_loads(true)
            .fail_saves(true);
        assert!(store.load().is_err());
        assert!(store.save(&EngineConfig::default()).is_err());
        assert_eq!(store.save_count(), 0);
    }
}
