use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

pub const SECURITY: &str = "security";
pub const PERFORMANCE: &str = "performance";
pub const MAINTAINABILITY: &str = "maintainability";
pub const BUSINESS_VALUE: &str = "business_value";
pub const RESOURCE_EFFICIENCY: &str = "resource_efficiency";
pub const USER_EXPERIENCE: &str = "user_experience";

pub const DEFAULT_MIN_ACCEPTABLE_SCORE: f64 = 0.3;
pub const DEFAULT_HIGH_COST_THRESHOLD: f64 = 1000.0;

/// Built-in criteria and their weights.
pub const DEFAULT_CRITERIA: [(&str, f64); 6] = [
    (SECURITY, 0.25),
    (PERFORMANCE, 0.20),
    (MAINTAINABILITY, 0.20),
    (BUSINESS_VALUE, 0.15),
    (RESOURCE_EFFICIENCY, 0.10),
    (USER_EXPERIENCE, 0.10),
];

pub const DEFAULT_ETHICAL_BOUNDARIES: [&str; 5] = [
    "Do not compromise system security",
    "Respect user privacy and data protection",
    "Maintain system reliability and availability",
    "Ensure fairness and avoid discriminatory outcomes",
    "Keep automated decisions transparent and accountable",
];

/// A named criterion with its weight and acceptance floor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CriteriaWeight {
    pub name: String,
    pub weight: f64,
    pub min_acceptable_score: f64,
}

/// A human-readable rule that can veto an option.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EthicalBoundary {
    pub text: String,
}

impl EthicalBoundary {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

/// Persisted configuration document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    pub criteria_weights: BTreeMap<String, f64>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub min_acceptable_scores: BTreeMap<String, f64>,

    pub ethical_boundaries: Vec<String>,

    #[serde(default)]
    pub performance_metrics: BTreeMap<String, Vec<f64>>,

    #[serde(default = "default_high_cost_threshold")]
    pub high_cost_threshold: f64,
}

fn default_high_cost_threshold() -> f64 {
    DEFAULT_HIGH_COST_THRESHOLD
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            criteria_weights: DEFAULT_CRITERIA
                .iter()
                .map(|(name, weight)| (name.to_string(), *weight))
                .collect(),
            min_acceptable_scores: BTreeMap::new(),
            ethical_boundaries: DEFAULT_ETHICAL_BOUNDARIES
                .iter()
                .map(|s| s.to_string())
                .collect(),
            performance_metrics: BTreeMap::new(),
            high_cost_threshold: DEFAULT_HIGH_COST_THRESHOLD,
        }
    }
}

impl EngineConfig {
    /// Configured criteria in name order.
    pub fn criteria(&self) -> Vec<CriteriaWeight> {
        self.criteria_weights
            .iter()
            .map(|(name, weight)| CriteriaWeight {
                name: name.clone(),
                weight: *weight,
                min_acceptable_score: self
                    .min_acceptable_scores
                    .get(name)
                    .copied()
                    .unwrap_or(DEFAULT_MIN_ACCEPTABLE_SCORE),
            })
            .collect()
    }

    pub fn boundaries(&self) -> Vec<EthicalBoundary> {
        self.ethical_boundaries
            .iter()
            .map(EthicalBoundary::new)
            .collect()
    }

    /// Overwrite (or insert) weights. Existing criteria are never removed.
    pub fn merge_weights(&mut self, weights: &BTreeMap<String, f64>) {
        for (name, weight) in weights {
            self.criteria_weights.insert(name.clone(), *weight);
        }
    }

    /// Append a boundary unless the exact text is already present.
    ///
    /// Returns `true` when the list changed.
    pub fn add_boundary(&mut self, text: &str) -> bool {
        if self.ethical_boundaries.iter().any(|b| b == text) {
            return false;
        }
        self.ethical_boundaries.push(text.to_string());
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_carry_six_criteria_and_five_boundaries() {
        let config = EngineConfig::default();
        assert_eq!(config.criteria_weights.len(), 6);
        assert_eq!(config.criteria_weights[SECURITY], 0.25);
        assert_eq!(config.criteria_weights[USER_EXPERIENCE], 0.10);
        let total: f64 = config.criteria_weights.values().sum();
        assert!((total - 1.0).abs() < 1e-9);
        assert_eq!(config.ethical_boundaries.len(), 5);
    }

    #[test]
    fn criteria_use_default_floor() {
        let mut config = EngineConfig::default();
        config
            .min_acceptable_scores
            .insert(SECURITY.to_string(), 0.5);
        let criteria = config.criteria();
        let security = criteria.iter().find(|c| c.name == SECURITY).unwrap();
        let perf = criteria.iter().find(|c| c.name == PERFORMANCE).unwrap();
        assert_eq!(security.min_acceptable_score, 0.5);
        assert_eq!(perf.min_acceptable_score, DEFAULT_MIN_ACCEPTABLE_SCORE);
    }

    #[test]
    fn add_boundary_is_idempotent() {
        let mut config = EngineConfig::default();
        assert!(config.add_boundary("No dark patterns"));
        assert!(!config.add_boundary("No dark patterns"));
        assert_eq!(config.ethical_boundaries.len(), 6);
    }

    #[test]
    fn merge_weights_overwrites_without_deleting() {
        let mut config = EngineConfig::default();
        let mut update = BTreeMap::new();
        update.insert(SECURITY.to_string(), 0.5);
        update.insert("compliance".to_string(), 0.1);
        config.merge_weights(&update);
        assert_eq!(config.criteria_weights.len(), 7);
        assert_eq!(config.criteria_weights[SECURITY], 0.5);
        assert_eq!(config.criteria_weights[PERFORMANCE], 0.20);
    }

    #[test]
    fn document_defaults_optional_fields() {
        let doc = serde_json::json!({
            "criteria_weights": {"security": 1.0},
            "ethical_boundaries": []
        });
        let config: EngineConfig = serde_json::from_value(doc).unwrap();
        assert!(config.performance_metrics.is_empty());
        assert_eq!(config.high_cost_threshold, DEFAULT_HIGH_COST_THRESHOLD);
    }
}
