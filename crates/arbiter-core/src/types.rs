use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// A floating-point value constrained to [0.0, 1.0].
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct UnitFloat(f64);

impl UnitFloat {
    pub fn new(v: f64) -> Option<Self> {
        if (0.0..=1.0).contains(&v) {
            Some(Self(v))
        } else {
            None
        }
    }

    /// Clamp any finite value into the unit interval. NaN maps to 0.0.
    pub fn saturating(v: f64) -> Self {
        if v.is_nan() {
            Self(0.0)
        } else {
            Self(v.clamp(0.0, 1.0))
        }
    }

    pub fn value(self) -> f64 {
        self.0
    }
}

impl fmt::Display for UnitFloat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

impl Serialize for UnitFloat {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.0.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for UnitFloat {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let v = f64::deserialize(deserializer)?;
        UnitFloat::new(v).ok_or_else(|| serde::de::Error::custom(format!("{v} not in [0.0, 1.0]")))
    }
}

/// Kind of decision being requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionType {
    #[default]
    CodeChange,
    SecurityAction,
    PerformanceOptimization,
    ResourceAllocation,
    TeamCoordination,
    EmergencyResponse,
}

impl DecisionType {
    pub fn as_str(self) -> &'static str {
        match self {
            DecisionType::CodeChange => "code_change",
            DecisionType::SecurityAction => "security_action",
            DecisionType::PerformanceOptimization => "performance_optimization",
            DecisionType::ResourceAllocation => "resource_allocation",
            DecisionType::TeamCoordination => "team_coordination",
            DecisionType::EmergencyResponse => "emergency_response",
        }
    }
}

impl fmt::Display for DecisionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for DecisionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "code_change" => Ok(DecisionType::CodeChange),
            "security_action" => Ok(DecisionType::SecurityAction),
            "performance_optimization" => Ok(DecisionType::PerformanceOptimization),
            "resource_allocation" => Ok(DecisionType::ResourceAllocation),
            "team_coordination" => Ok(DecisionType::TeamCoordination),
            "emergency_response" => Ok(DecisionType::EmergencyResponse),
            other => Err(format!("unknown decision type: {other}")),
        }
    }
}

/// Discrete risk ordinal. Ordering is Low < Medium < High < Critical.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    #[default]
    Low,
    Medium,
    High,
    Critical,
}

impl RiskLevel {
    /// Map accumulated risk points onto a level.
    pub fn from_points(points: u32) -> Self {
        match points {
            p if p >= 5 => RiskLevel::Critical,
            p if p >= 3 => RiskLevel::High,
            p if p >= 1 => RiskLevel::Medium,
            _ => RiskLevel::Low,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RiskLevel::Low => "low",
            RiskLevel::Medium => "medium",
            RiskLevel::High => "high",
            RiskLevel::Critical => "critical",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle of a decision.
///
/// The engine drives `Pending → Analyzing → Validating → Approved | Rejected`.
/// `Implemented` and `RolledBack` are set later by collaborators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionStatus {
    Pending,
    Analyzing,
    Validating,
    Approved,
    Rejected,
    Implemented,
    RolledBack,
}

impl DecisionStatus {
    /// Whether the lifecycle permits moving from `self` to `next`.
    pub fn can_transition_to(self, next: DecisionStatus) -> bool {
        use DecisionStatus::*;
        matches!(
            (self, next),
            (Pending, Analyzing)
                | (Pending, Rejected)
                | (Analyzing, Validating)
                | (Analyzing, Rejected)
                | (Validating, Approved)
                | (Validating, Rejected)
                | (Approved, Implemented)
                | (Approved, RolledBack)
                | (Implemented, RolledBack)
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DecisionStatus::Pending => "pending",
            DecisionStatus::Analyzing => "analyzing",
            DecisionStatus::Validating => "validating",
            DecisionStatus::Approved => "approved",
            DecisionStatus::Rejected => "rejected",
            DecisionStatus::Implemented => "implemented",
            DecisionStatus::RolledBack => "rolled_back",
        }
    }
}

impl fmt::Display for DecisionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Coarse three-step grading used by several raw option signals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Low,
    #[default]
    Medium,
    High,
}

/// Direction of an expected effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Impact {
    Positive,
    #[default]
    Neutral,
    Negative,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Urgency {
    Low,
    #[default]
    Medium,
    High,
    Critical,
}

/// Audit event taxonomy for a single decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditEventType {
    DecisionStarted,
    StatusChanged,
    OptionsScored,
    OptionFiltered,
    OptionSelected,
    ValidationCompleted,
    DecisionCompleted,
    DecisionRejected,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unit_float_bounds() {
        assert!(UnitFloat::new(0.0).is_some());
        assert!(UnitFloat::new(1.0).is_some());
        assert!(UnitFloat::new(-0.1).is_none());
        assert!(UnitFloat::new(1.1).is_none());
        assert_eq!(UnitFloat::saturating(1.7).value(), 1.0);
        assert_eq!(UnitFloat::saturating(-3.0).value(), 0.0);
        assert_eq!(UnitFloat::saturating(f64::NAN).value(), 0.0);
    }

    #[test]
    fn risk_points_thresholds() {
        assert_eq!(RiskLevel::from_points(0), RiskLevel::Low);
        assert_eq!(RiskLevel::from_points(1), RiskLevel::Medium);
        assert_eq!(RiskLevel::from_points(2), RiskLevel::Medium);
        assert_eq!(RiskLevel::from_points(3), RiskLevel::High);
        assert_eq!(RiskLevel::from_points(4), RiskLevel::High);
        assert_eq!(RiskLevel::from_points(5), RiskLevel::Critical);
        assert_eq!(RiskLevel::from_points(9), RiskLevel::Critical);
    }

    #[test]
    fn risk_ordering_lower_is_safer() {
        assert!(RiskLevel::Low < RiskLevel::Medium);
        assert!(RiskLevel::Medium < RiskLevel::High);
        assert!(RiskLevel::High < RiskLevel::Critical);
    }

    #[test]
    fn status_lifecycle() {
        use DecisionStatus::*;
        assert!(Pending.can_transition_to(Analyzing));
        assert!(Validating.can_transition_to(Approved));
        assert!(Approved.can_transition_to(Implemented));
        assert!(Implemented.can_transition_to(RolledBack));
        assert!(!Rejected.can_transition_to(Approved));
        assert!(!RolledBack.can_transition_to(Implemented));
        assert!(!Approved.can_transition_to(Rejected));
    }

    #[test]
    fn decision_type_parses_snake_case() {
        let parsed: DecisionType = "emergency_response".parse().unwrap();
        assert_eq!(parsed, DecisionType::EmergencyResponse);
        assert!("deploy".parse::<DecisionType>().is_err());
        let json = serde_json::to_string(&DecisionType::PerformanceOptimization).unwrap();
        assert_eq!(json, "\"performance_optimization\"");
    }
}
