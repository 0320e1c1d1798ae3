use crate::config::EngineConfig;
use crate::errors::{AuditError, ConfigError};
use crate::outcome::DecisionOutcome;

/// Loads and saves the engine configuration document.
pub trait ConfigStore: Send + Sync {
    fn load(&self) -> Result<EngineConfig, ConfigError>;
    fn save(&self, config: &EngineConfig) -> Result<(), ConfigError>;
}

/// Receives completed decision outcomes for persistence.
pub trait AuditSink: Send + Sync {
    fn record(&self, outcome: &DecisionOutcome) -> Result<(), AuditError>;
}
