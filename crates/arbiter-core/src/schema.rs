use std::sync::OnceLock;

use jsonschema::Validator;
use serde_json::Value;

use crate::config::EngineConfig;
use crate::errors::ConfigError;

const CONFIG_SCHEMA: &str = include_str!("../schema/arbiter-config.schema.json");

/// The embedded configuration schema, compiled on first use.
fn config_validator() -> Result<&'static Validator, ConfigError> {
    static COMPILED: OnceLock<Result<Validator, String>> = OnceLock::new();
    COMPILED
        .get_or_init(|| {
            let schema: Value = serde_json::from_str(CONFIG_SCHEMA)
                .map_err(|e| format!("embedded schema is invalid JSON: {e}"))?;
            Validator::new(&schema).map_err(|e| format!("schema compilation failed: {e}"))
        })
        .as_ref()
        .map_err(|e| ConfigError::Invalid(e.clone()))
}

/// Check a configuration document against the schema.
///
/// Every violation is reported as `<json pointer>: <message>`, joined by "; ".
pub fn validate(data: &Value) -> Result<(), ConfigError> {
    let validator = config_validator()?;
    let violations: Vec<String> = validator
        .iter_errors(data)
        .map(|error| {
            let pointer = error.instance_path.to_string();
            let at = if pointer.is_empty() { "/" } else { pointer.as_str() };
            format!("{at}: {error}")
        })
        .collect();
    if violations.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::Invalid(violations.join("; ")))
    }
}

/// Parse and validate a configuration document.
pub fn parse_config(content: &str) -> Result<EngineConfig, ConfigError> {
    let data: Value =
        serde_json::from_str(content).map_err(|e| ConfigError::Invalid(e.to_string()))?;
    validate(&data)?;
    serde_json::from_value(data).map_err(|e| ConfigError::Invalid(e.to_string()))
}
