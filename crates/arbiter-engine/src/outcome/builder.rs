use arbiter_core::option::DecisionOption;
use arbiter_core::types::RiskLevel;

const BASE_CONFIDENCE: f64 = 0.5;
const MAX_BASE_CONFIDENCE: f64 = 0.9;
const MARGIN_FACTOR: f64 = 2.0;
const MIN_CONFIDENCE: f64 = 0.1;
const MAX_CONFIDENCE: f64 = 0.95;

const CONCERN_THRESHOLD: f64 = 0.4;

const HIGH_RISK_ACTIONS: [&str; 3] = [
    "Implement comprehensive monitoring",
    "Prepare rollback plan",
    "Conduct thorough testing",
];

const CRITICAL_RISK_ACTIONS: [&str; 3] = [
    "Require manual approval",
    "Implement staged rollout",
    "Prepare emergency response plan",
];

/// Deterministic explanation of why `selected` won.
///
/// `alternatives` is the ranked list without the selected option.
pub fn rationale(selected: &DecisionOption, alternatives: &[DecisionOption]) -> String {
    let scores = selected
        .criteria_scores
        .iter()
        .map(|(name, score)| format!("{name} {score:.2}"))
        .collect::<Vec<_>>()
        .join(", ");

    let mut text = format!(
        "Selected '{}' with overall score {:.2} and {} risk. Criteria scores: {}.",
        selected.name, selected.overall_score, selected.risk_level, scores
    );

    if let Some(best_alt) = alternatives.first() {
        text.push_str(&format!(
            " Considered {} alternative(s); best alternative '{}' scored {:.2}.",
            alternatives.len(),
            best_alt.name,
            best_alt.overall_score
        ));
    }
    text
}

/// Confidence in the selection, from the winning margin and the risk level.
pub fn confidence_score(selected: &DecisionOption, best_alternative: Option<&DecisionOption>) -> f64 {
    let base = match best_alternative {
        Some(alt) => {
            let margin = selected.overall_score - alt.overall_score;
            (BASE_CONFIDENCE + MARGIN_FACTOR * margin).min(MAX_BASE_CONFIDENCE)
        }
        None => BASE_CONFIDENCE,
    };

    let adjustment = match selected.risk_level {
        RiskLevel::Low => 0.1,
        RiskLevel::Medium => 0.0,
        RiskLevel::High => -0.1,
        RiskLevel::Critical => -0.2,
    };

    (base + adjustment).clamp(MIN_CONFIDENCE, MAX_CONFIDENCE)
}

/// Actions to reduce the risk of implementing `selected`.
pub fn risk_mitigation(selected: &DecisionOption) -> Vec<String> {
    let mut actions: Vec<String> = Vec::new();

    if matches!(selected.risk_level, RiskLevel::High | RiskLevel::Critical) {
        actions.extend(HIGH_RISK_ACTIONS.iter().map(|s| s.to_string()));
    }
    if selected.risk_level == RiskLevel::Critical {
        actions.extend(CRITICAL_RISK_ACTIONS.iter().map(|s| s.to_string()));
    }

    for (criterion, score) in &selected.criteria_scores {
        if *score < CONCERN_THRESHOLD {
            actions.push(format!("Address {criterion} concerns before implementation"));
        }
    }
    actions
}
