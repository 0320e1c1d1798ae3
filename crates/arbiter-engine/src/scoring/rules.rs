//! Per-criterion scoring rules.
//!
//! Every rule starts from a neutral 0.5 and applies fixed adjustments for the
//! signals present on the option. Risk penalties are larger than the matching
//! improvement bonuses. The result is clamped to [0, 1] once all
//! adjustments are applied.
//!
//! The magnitudes are calibration constants kept for behavioural
//! compatibility with existing decision records.

use arbiter_core::config::{
    BUSINESS_VALUE, MAINTAINABILITY, PERFORMANCE, RESOURCE_EFFICIENCY, SECURITY, USER_EXPERIENCE,
};
use arbiter_core::option::RawOption;
use arbiter_core::types::{Impact, Level, UnitFloat};

pub(crate) const NEUTRAL: f64 = 0.5;
const LIGHT_DEMAND: f64 = 0.5;

/// Knobs that the rules read from configuration rather than literals.
#[derive(Debug, Clone, Copy)]
pub struct RuleSettings {
    pub high_cost_threshold: f64,
}

/// Score `option` on `criterion`. Unknown criteria stay neutral.
pub fn score_criterion(criterion: &str, option: &RawOption, settings: &RuleSettings) -> f64 {
    let raw = match criterion {
        SECURITY => security(option),
        PERFORMANCE => performance(option),
        MAINTAINABILITY => maintainability(option),
        BUSINESS_VALUE => business_value(option),
        RESOURCE_EFFICIENCY => resource_efficiency(option, settings),
        USER_EXPERIENCE => user_experience(option),
        _ => NEUTRAL,
    };
    UnitFloat::saturating(raw).value()
}

fn security(o: &RawOption) -> f64 {
    let mut score = NEUTRAL;
    if o.security_improvements {
        score += 0.3;
    }
    if o.uses_encryption {
        score += 0.2;
    }
    if o.requires_authentication {
        score += 0.1;
    }
    if o.security_risks {
        score -= 0.4;
    }
    score
}

fn performance(o: &RawOption) -> f64 {
    let mut score = NEUTRAL;
    if o.performance_improvements {
        score += 0.3;
    }
    match o.performance_impact {
        Some(Impact::Positive) => score += 0.2,
        Some(Impact::Negative) => score -= 0.3,
        _ => {}
    }
    match o.resource_usage {
        Some(Level::Low) => score += 0.1,
        Some(Level::High) => score -= 0.2,
        _ => {}
    }
    score
}

fn maintainability(o: &RawOption) -> f64 {
    let mut score = NEUTRAL;
    match o.complexity {
        Some(Level::Low) => score += 0.2,
        Some(Level::High) => score -= 0.3,
        _ => {}
    }
    if o.has_documentation {
        score += 0.2;
    }
    if let Some(coverage) = o.test_coverage {
        if coverage > 0.8 {
            score += 0.2;
        } else if coverage < 0.5 {
            score -= 0.2;
        }
    }
    score
}

fn business_value(o: &RawOption) -> f64 {
    let mut score = NEUTRAL;
    match o.business_impact {
        Some(Level::High) => score += 0.3,
        Some(Level::Low) => score -= 0.2,
        _ => {}
    }
    match o.user_value {
        Some(Level::High) => score += 0.2,
        Some(Level::Low) => score -= 0.1,
        _ => {}
    }
    match o.revenue_impact {
        Some(Impact::Positive) => score += 0.2,
        Some(Impact::Negative) => score -= 0.3,
        _ => {}
    }
    score
}

fn resource_efficiency(o: &RawOption, settings: &RuleSettings) -> f64 {
    let req = &o.resource_requirements;
    let mut score = NEUTRAL;
    // an undeclared demand counts as none
    for demand in [req.cpu, req.memory, req.storage] {
        if demand.unwrap_or(0.0) < LIGHT_DEMAND {
            score += 0.1;
        }
    }
    if let Some(cost) = req.cost {
        if cost == 0.0 {
            score += 0.2;
        } else if cost > settings.high_cost_threshold {
            score -= 0.3;
        }
    }
    score
}

fn user_experience(o: &RawOption) -> f64 {
    let mut score = NEUTRAL;
    if o.ux_improvements {
        score += 0.3;
    }
    if o.accessibility_compliant {
        score += 0.2;
    }
    match o.usability {
        Some(Level::High) => score += 0.2,
        Some(Level::Low) => score -= 0.3,
        _ => {}
    }
    score
}
