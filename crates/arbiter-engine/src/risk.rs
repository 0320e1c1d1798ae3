use std::collections::BTreeMap;

use arbiter_core::config::{PERFORMANCE, SECURITY};
use arbiter_core::option::RawOption;
use arbiter_core::types::RiskLevel;

/// Risk points contributed by each trigger.
const WEAK_SECURITY_POINTS: u32 = 2;
const WEAK_PERFORMANCE_POINTS: u32 = 1;
const EXPERIMENTAL_POINTS: u32 = 2;
const BREAKING_CHANGE_POINTS: u32 = 3;
const DEPENDENCY_SPRAWL_POINTS: u32 = 1;

const WEAK_SCORE: f64 = 0.3;
const MAX_EXTERNAL_DEPENDENCIES: u32 = 5;

/// Accumulate risk points for an option from its scores and explicit flags.
pub fn risk_points(option: &RawOption, scores: &BTreeMap<String, f64>) -> u32 {
    let mut points = 0;
    if scores.get(SECURITY).is_some_and(|s| *s < WEAK_SCORE) {
        points += WEAK_SECURITY_POINTS;
    }
    if scores.get(PERFORMANCE).is_some_and(|s| *s < WEAK_SCORE) {
        points += WEAK_PERFORMANCE_POINTS;
    }
    if option.experimental {
        points += EXPERIMENTAL_POINTS;
    }
    if option.breaking_change {
        points += BREAKING_CHANGE_POINTS;
    }
    if option.external_dependencies > MAX_EXTERNAL_DEPENDENCIES {
        points += DEPENDENCY_SPRAWL_POINTS;
    }
    points
}

/// Deterministic risk level for an option.
pub fn assess_risk(option: &RawOption, scores: &BTreeMap<String, f64>) -> RiskLevel {
    let points = risk_points(option, scores);
    let level = RiskLevel::from_points(points);
    tracing::debug!(option = option.display_name(), points, %level, "assessed risk");
    level
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scores(security: f64, performance: f64) -> BTreeMap<String, f64> {
        let mut map = BTreeMap::new();
        map.insert(SECURITY.to_string(), security);
        map.insert(PERFORMANCE.to_string(), performance);
        map
    }

    #[test]
    fn clean_option_is_low_risk() {
        assert_eq!(
            assess_risk(&RawOption::default(), &scores(0.5, 0.5)),
            RiskLevel::Low
        );
    }

    #[test]
    fn weak_scores_add_points() {
        let option = RawOption::default();
        assert_eq!(risk_points(&option, &scores(0.1, 0.5)), 2);
        assert_eq!(risk_points(&option, &scores(0.5, 0.2)), 1);
        assert_eq!(risk_points(&option, &scores(0.1, 0.2)), 3);
        assert_eq!(assess_risk(&option, &scores(0.1, 0.2)), RiskLevel::High);
        // exactly at the threshold does not count
        assert_eq!(risk_points(&option, &scores(0.3, 0.3)), 0);
    }

    #[test]
    fn breaking_and_experimental_is_critical() {
        let option = RawOption {
            experimental: true,
            breaking_change: true,
            ..Default::default()
        };
        assert_eq!(risk_points(&option, &scores(0.5, 0.5)), 5);
        assert_eq!(assess_risk(&option, &scores(0.5, 0.5)), RiskLevel::Critical);
    }

    #[test]
    fn dependency_count_above_five() {
        let five = RawOption {
            external_dependencies: 5,
            ..Default::default()
        };
        let six = RawOption {
            external_dependencies: 6,
            ..Default::default()
        };
        assert_eq!(assess_risk(&five, &scores(0.5, 0.5)), RiskLevel::Low);
        assert_eq!(assess_risk(&six, &scores(0.5, 0.5)), RiskLevel::Medium);
    }

    #[test]
    fn missing_criteria_contribute_nothing() {
        let option = RawOption::default();
        assert_eq!(risk_points(&option, &BTreeMap::new()), 0);
    }

    #[test]
    fn assessment_is_deterministic() {
        let option = RawOption {
            experimental: true,
            external_dependencies: 9,
            ..Default::default()
        };
        let s = scores(0.2, 0.9);
        let first = assess_risk(&option, &s);
        for _ in 0..10 {
            assert_eq!(assess_risk(&option, &s), first);
        }
        assert_eq!(first, RiskLevel::Critical);
    }
}
