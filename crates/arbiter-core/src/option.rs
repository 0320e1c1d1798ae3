use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::errors::EngineError;
use crate::types::{Impact, Level, RiskLevel};

/// Candidate option as supplied by the caller.
///
/// Deserialized from an open JSON object: only the keys below are read,
/// anything else is ignored. Absent signals leave the matching criterion at
/// its neutral baseline.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawOption {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub description: String,

    // security
    pub security_improvements: bool,
    pub uses_encryption: bool,
    pub requires_authentication: bool,
    pub security_risks: bool,

    // performance
    pub performance_improvements: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub performance_impact: Option<Impact>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_usage: Option<Level>,

    // maintainability
    #[serde(skip_serializing_if = "Option::is_none")]
    pub complexity: Option<Level>,
    pub has_documentation: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub test_coverage: Option<f64>,

    // business value
    #[serde(skip_serializing_if = "Option::is_none")]
    pub business_impact: Option<Level>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_value: Option<Level>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub revenue_impact: Option<Impact>,

    // resource efficiency
    pub resource_requirements: ResourceRequirements,

    // user experience
    pub ux_improvements: bool,
    pub accessibility_compliant: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usability: Option<Level>,

    // risk flags
    pub experimental: bool,
    pub breaking_change: bool,
    pub external_dependencies: u32,

    pub implementation_plan: ImplementationPlan,
    pub rollback_plan: RollbackPlan,
    pub estimated_effort: f64,
    pub estimated_impact: f64,
}

/// Fractional resource demand (0..1 of available capacity) plus absolute cost.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResourceRequirements {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cpu: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub memory: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storage: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cost: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImplementationPlan {
    pub steps: Vec<String>,
    pub timeline: String,
    pub resources: Vec<String>,
    pub dependencies: Vec<String>,
    pub testing_requirements: Vec<String>,
    pub deployment_strategy: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RollbackPlan {
    pub triggers: Vec<String>,
    pub steps: Vec<String>,
    pub timeline: String,
    pub backup_required: bool,
    pub testing_required: bool,
}

impl RawOption {
    /// Parse and check the option at `index` of the caller's list.
    ///
    /// Missing `id`/`name` are filled positionally (`option-<n>`, 1-based) so
    /// identical inputs always produce identical identifiers.
    pub fn from_value(index: usize, value: &serde_json::Value) -> Result<Self, EngineError> {
        if !value.is_object() {
            return Err(EngineError::MalformedOption {
                index,
                message: "option must be a JSON object".to_string(),
            });
        }
        let mut option: RawOption =
            serde_json::from_value(value.clone()).map_err(|e| EngineError::MalformedOption {
                index,
                message: e.to_string(),
            })?;

        let id = option
            .id
            .clone()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| format!("option-{}", index + 1));
        if option.name.as_deref().map_or(true, |n| n.trim().is_empty()) {
            option.name = Some(id.clone());
        }
        option.id = Some(id);

        option.check_signals()?;
        Ok(option)
    }

    pub fn option_id(&self) -> &str {
        self.id.as_deref().unwrap_or_default()
    }

    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .or(self.id.as_deref())
            .unwrap_or_default()
    }

    /// Reject numeric signals that would make scoring meaningless.
    fn check_signals(&self) -> Result<(), EngineError> {
        let invalid = |field: &'static str, message: String| EngineError::InvalidSignal {
            option: self.display_name().to_string(),
            field,
            message,
        };

        if let Some(cov) = self.test_coverage {
            if !cov.is_finite() || !(0.0..=1.0).contains(&cov) {
                return Err(invalid("test_coverage", format!("{cov} not in [0, 1]")));
            }
        }

        let req = &self.resource_requirements;
        for (field, value) in [
            ("resource_requirements.cpu", req.cpu),
            ("resource_requirements.memory", req.memory),
            ("resource_requirements.storage", req.storage),
            ("resource_requirements.cost", req.cost),
        ] {
            if let Some(v) = value {
                if !v.is_finite() || v < 0.0 {
                    return Err(invalid(field, format!("{v} must be a non-negative number")));
                }
            }
        }

        if !self.estimated_effort.is_finite() || self.estimated_effort < 0.0 {
            return Err(invalid(
                "estimated_effort",
                format!("{} must be a non-negative number", self.estimated_effort),
            ));
        }
        if !self.estimated_impact.is_finite() || !(0.0..=1.0).contains(&self.estimated_impact) {
            return Err(invalid(
                "estimated_impact",
                format!("{} not in [0, 1]", self.estimated_impact),
            ));
        }
        Ok(())
    }
}

/// An option after scoring and risk assessment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionOption {
    pub option_id: String,
    pub name: String,
    pub description: String,
    /// One entry per criterion configured at evaluation time.
    pub criteria_scores: BTreeMap<String, f64>,
    pub overall_score: f64,
    pub risk_level: RiskLevel,
    pub implementation_plan: ImplementationPlan,
    pub rollback_plan: RollbackPlan,
    pub estimated_effort: f64,
    pub estimated_impact: f64,
}

impl DecisionOption {
    pub fn score_for(&self, criterion: &str) -> Option<f64> {
        self.criteria_scores.get(criterion).copied()
    }
}
