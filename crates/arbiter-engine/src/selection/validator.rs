use arbiter_core::config::CriteriaWeight;
use arbiter_core::option::DecisionOption;
use arbiter_core::outcome::ValidationResult;
use arbiter_core::types::RiskLevel;

pub const CRITICAL_RISK_ERROR: &str = "Critical risk level requires manual approval";

/// Re-check a selected option against per-criterion floors and the risk ceiling.
///
/// Scores under a floor only warn. Critical risk, or a criterion the option
/// was never scored on, invalidates the decision.
pub fn validate(option: &DecisionOption, criteria: &[CriteriaWeight]) -> ValidationResult {
    let mut result = ValidationResult::default();

    for criterion in criteria {
        match option.score_for(&criterion.name) {
            Some(score) if score < criterion.min_acceptable_score => {
                result.warnings.push(format!(
                    "{} score {:.2} is below minimum acceptable {:.2}",
                    criterion.name, score, criterion.min_acceptable_score
                ));
            }
            Some(_) => {}
            None => {
                result
                    .errors
                    .push(format!("missing score for criterion '{}'", criterion.name));
            }
        }
    }

    if option.risk_level == RiskLevel::Critical {
        result.errors.push(CRITICAL_RISK_ERROR.to_string());
    }

    result.valid = result.errors.is_empty();
    if !result.valid {
        tracing::warn!(option = %option.name, errors = ?result.errors, "validation failed");
    }
    result
}
