use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::context::DecisionContext;
use crate::option::DecisionOption;
use crate::types::{AuditEventType, DecisionStatus};

/// Result of re-checking a selected option against thresholds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub valid: bool,
    pub warnings: Vec<String>,
    pub errors: Vec<String>,
}

impl Default for ValidationResult {
    fn default() -> Self {
        Self {
            valid: true,
            warnings: Vec::new(),
            errors: Vec::new(),
        }
    }
}

/// One timestamped entry in a decision's audit trail.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditEvent {
    pub timestamp: DateTime<Utc>,
    pub decision_id: String,
    pub event_type: AuditEventType,
    pub data: serde_json::Value,
}

/// Terminal record of a single decision request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionOutcome {
    pub decision_id: String,
    pub context: DecisionContext,
    /// `None` when the request was rejected before an option could be chosen.
    pub selected_option: Option<DecisionOption>,
    /// Ranked runner-ups, selected option excluded.
    pub alternatives: Vec<DecisionOption>,
    pub rationale: String,
    pub confidence_score: f64,
    pub risk_mitigation: Vec<String>,
    pub status: DecisionStatus,
    pub ethical_approval: bool,
    pub validation_result: ValidationResult,
    pub audit_trail: Vec<AuditEvent>,
}

impl DecisionOutcome {
    pub fn is_approved(&self) -> bool {
        self.status == DecisionStatus::Approved
    }
}
