use arbiter_core::config::{EthicalBoundary, SECURITY};
use arbiter_core::option::DecisionOption;
use arbiter_core::types::RiskLevel;
use serde::Serialize;

pub const VIOLATION_REASON: &str = "ethical boundary violation";

const MIN_SECURITY_SCORE: f64 = 0.3;
const PRIVACY_VIOLATION_MARKER: &str = "privacy violation";

/// Concrete check a boundary's text maps onto.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundaryRule {
    Security,
    Privacy,
    Stability,
}

impl BoundaryRule {
    /// Rules implied by a boundary's text (case-insensitive keyword match).
    ///
    /// Text matching no keyword yields no rules and therefore always passes.
    pub fn for_boundary(boundary: &EthicalBoundary) -> Vec<BoundaryRule> {
        let text = boundary.text.to_lowercase();
        let mut rules = Vec::new();
        if text.contains("security") {
            rules.push(BoundaryRule::Security);
        }
        if text.contains("privacy") {
            rules.push(BoundaryRule::Privacy);
        }
        if text.contains("stability") {
            rules.push(BoundaryRule::Stability);
        }
        rules
    }

    /// Returns a description of the violation, or `None` when the option passes.
    pub fn check(self, option: &DecisionOption) -> Option<String> {
        match self {
            BoundaryRule::Security => {
                let score = option.score_for(SECURITY).unwrap_or(0.5);
                (score < MIN_SECURITY_SCORE).then(|| {
                    format!("security score {score:.2} below required {MIN_SECURITY_SCORE:.2}")
                })
            }
            BoundaryRule::Privacy => option
                .description
                .to_lowercase()
                .contains(PRIVACY_VIOLATION_MARKER)
                .then(|| "description indicates a privacy violation".to_string()),
            BoundaryRule::Stability => matches!(option.risk_level, RiskLevel::High | RiskLevel::Critical)
                .then(|| format!("{} risk exceeds the stability ceiling", option.risk_level)),
        }
    }
}

/// An option excluded by a boundary.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EthicalRejection {
    pub option_id: String,
    pub option_name: String,
    pub boundary: String,
    pub reason: &'static str,
    pub detail: String,
}

#[derive(Debug, Clone, Default)]
pub struct FilterResult {
    pub passed: Vec<DecisionOption>,
    pub rejected: Vec<EthicalRejection>,
}

/// Split options into those passing every boundary and those violating one.
///
/// Boundaries are evaluated in order; the first violation is recorded.
pub fn filter(options: Vec<DecisionOption>, boundaries: &[EthicalBoundary]) -> FilterResult {
    let rules: Vec<(&EthicalBoundary, Vec<BoundaryRule>)> = boundaries
        .iter()
        .map(|b| (b, BoundaryRule::for_boundary(b)))
        .collect();

    let mut result = FilterResult::default();
    'options: for option in options {
        for (boundary, boundary_rules) in &rules {
            for rule in boundary_rules {
                if let Some(detail) = rule.check(&option) {
                    tracing::warn!(
                        option = %option.name,
                        boundary = %boundary.text,
                        %detail,
                        "option excluded by ethical boundary"
                    );
                    result.rejected.push(EthicalRejection {
                        option_id: option.option_id.clone(),
                        option_name: option.name.clone(),
                        boundary: boundary.text.clone(),
                        reason: VIOLATION_REASON,
                        detail,
                    });
                    continue 'options;
                }
            }
        }
        result.passed.push(option);
    }
    result
}
