use std::cmp::Ordering;

use arbiter_core::errors::EngineError;
use arbiter_core::option::DecisionOption;

/// Ranking order: overall score DESC, then risk level ASC.
pub fn rank_order(a: &DecisionOption, b: &DecisionOption) -> Ordering {
    b.overall_score
        .total_cmp(&a.overall_score)
        .then_with(|| a.risk_level.cmp(&b.risk_level))
}

/// Rank the surviving options and return the winner plus the full ranking.
///
/// The ranking includes the winner at index 0. Remaining ties keep the
/// caller's input order.
pub fn select_best(
    mut options: Vec<DecisionOption>,
) -> Result<(DecisionOption, Vec<DecisionOption>), EngineError> {
    options.sort_by(rank_order);
    let best = options.first().cloned().ok_or_else(|| {
        EngineError::Internal("option selection received an empty candidate list".to_string())
    })?;
    Ok((best, options))
}
