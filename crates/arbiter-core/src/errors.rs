use crate::types::DecisionStatus;

/// Failure inside the decision pipeline.
///
/// Never returned from `make_decision`: the orchestrator folds every variant
/// into a `Rejected` outcome whose rationale carries the message.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EngineError {
    #[error("No options provided for decision")]
    NoOptions,
    #[error("malformed option at index {index}: {message}")]
    MalformedOption { index: usize, message: String },
    #[error("option '{option}' has invalid {field}: {message}")]
    InvalidSignal {
        option: String,
        field: &'static str,
        message: String,
    },
    #[error("No options passed ethical validation")]
    NoOptionsPassedEthics,
    #[error("internal error: {0}")]
    Internal(String),
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("configuration not found: {0}")]
    NotFound(String),
    #[error("cannot read configuration: {0}")]
    Read(String),
    #[error("invalid configuration: {0}")]
    Invalid(String),
    #[error("cannot write configuration: {0}")]
    Write(String),
}

/// Rejected mutation of the criteria or boundary configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigUpdateError {
    #[error("weight for '{name}' must be within [0, 1], got {value}")]
    InvalidWeight { name: String, value: f64 },
    #[error("criterion name must not be empty")]
    EmptyCriterion,
    #[error("ethical boundary text must not be empty")]
    EmptyBoundary,
}

#[derive(Debug, thiserror::Error)]
pub enum AuditError {
    #[error("write failure: {0}")]
    WriteFailure(String),
    #[error("cannot read journal: {0}")]
    Read(String),
    #[error("hash chain broken at entry {entry}: {detail}")]
    ChainCorruption { entry: u64, detail: String },
}

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum StatusError {
    #[error("decision not found: {0}")]
    NotFound(String),
    #[error("cannot move decision {id} from {from} to {to}")]
    InvalidTransition {
        id: String,
        from: DecisionStatus,
        to: DecisionStatus,
    },
}
