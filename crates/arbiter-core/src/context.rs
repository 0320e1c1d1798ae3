use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{DecisionType, Level, Urgency};

/// Caller-supplied context for a decision request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawContext {
    pub requester: String,
    pub urgency: Urgency,
    pub business_impact: Level,
    pub technical_complexity: Level,
    pub resource_requirements: BTreeMap<String, serde_json::Value>,
    pub constraints: Vec<String>,
    pub stakeholders: Vec<String>,
}

/// Immutable per-call context, stamped with identity and creation time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionContext {
    pub decision_id: String,
    pub decision_type: DecisionType,
    pub created_at: DateTime<Utc>,
    pub requester: String,
    pub urgency: Urgency,
    pub business_impact: Level,
    pub technical_complexity: Level,
    pub resource_requirements: BTreeMap<String, serde_json::Value>,
    pub constraints: Vec<String>,
    pub stakeholders: Vec<String>,
}

impl DecisionContext {
    pub fn new(decision_id: String, decision_type: DecisionType, raw: RawContext) -> Self {
        Self {
            decision_id,
            decision_type,
            created_at: Utc::now(),
            requester: raw.requester,
            urgency: raw.urgency,
            business_impact: raw.business_impact,
            technical_complexity: raw.technical_complexity,
            resource_requirements: raw.resource_requirements,
            constraints: raw.constraints,
            stakeholders: raw.stakeholders,
        }
    }
}
