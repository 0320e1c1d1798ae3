mod rules;

pub use rules::{score_criterion, RuleSettings};

use std::collections::BTreeMap;

use arbiter_core::config::CriteriaWeight;
use arbiter_core::errors::EngineError;
use arbiter_core::option::{DecisionOption, RawOption};
use arbiter_core::types::RiskLevel;

/// Compute a per-criterion score for every option.
///
/// Every configured criterion gets an entry, even when the option carries no
/// signal for it. `overall_score` and `risk_level` are left at their
/// defaults for later stages.
pub fn score_options(
    options: &[RawOption],
    criteria: &[CriteriaWeight],
    settings: &RuleSettings,
) -> Vec<DecisionOption> {
    options
        .iter()
        .map(|raw| {
            let criteria_scores: BTreeMap<String, f64> = criteria
                .iter()
                .map(|c| (c.name.clone(), score_criterion(&c.name, raw, settings)))
                .collect();
            tracing::debug!(option = raw.display_name(), scores = ?criteria_scores, "scored option");

            DecisionOption {
                option_id: raw.option_id().to_string(),
                name: raw.display_name().to_string(),
                description: raw.description.clone(),
                criteria_scores,
                overall_score: 0.0,
                risk_level: RiskLevel::default(),
                implementation_plan: raw.implementation_plan.clone(),
                rollback_plan: raw.rollback_plan.clone(),
                estimated_effort: raw.estimated_effort,
                estimated_impact: raw.estimated_impact,
            }
        })
        .collect()
}

/// Weighted mean of the option's scores over the criteria it was scored on.
///
/// Normalizes by the total weight actually present, so uniformly scaling all
/// weights leaves the result unchanged.
pub fn overall_score(
    scores: &BTreeMap<String, f64>,
    criteria: &[CriteriaWeight],
) -> Result<f64, EngineError> {
    let mut weighted = 0.0;
    let mut total_weight = 0.0;
    for criterion in criteria {
        if let Some(score) = scores.get(&criterion.name) {
            weighted += score * criterion.weight;
            total_weight += criterion.weight;
        }
    }
    if total_weight <= 0.0 || !total_weight.is_finite() {
        return Err(EngineError::Internal(
            "no positively weighted criteria configured".to_string(),
        ));
    }
    Ok(weighted / total_weight)
}
