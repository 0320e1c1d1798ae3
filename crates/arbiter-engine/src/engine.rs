use std::collections::{BTreeMap, VecDeque};
use std::sync::{Mutex, MutexGuard, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::{Duration, Instant};

use arbiter_core::config::{CriteriaWeight, EngineConfig, EthicalBoundary};
use arbiter_core::context::{DecisionContext, RawContext};
use arbiter_core::errors::{ConfigError, ConfigUpdateError, EngineError, StatusError};
use arbiter_core::option::{DecisionOption, RawOption};
use arbiter_core::outcome::{DecisionOutcome, ValidationResult};
use arbiter_core::traits::{AuditSink, ConfigStore};
use arbiter_core::types::{AuditEventType, DecisionStatus, DecisionType, UnitFloat};
use serde_json::json;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::ethics;
use crate::metrics::{DecisionSample, MetricSummary, PerformanceMetrics};
use crate::outcome::{confidence_score, rationale, risk_mitigation, AuditTrail};
use crate::risk::assess_risk;
use crate::scoring::{overall_score, score_options, RuleSettings};
use crate::selection::{select_best, validate};

/// Outcomes kept in memory, and samples kept per metric series.
pub const HISTORY_CAPACITY: usize = 100;

fn read<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(PoisonError::into_inner)
}

fn write<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(PoisonError::into_inner)
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Configuration as seen by a single decision.
struct Snapshot {
    criteria: Vec<CriteriaWeight>,
    boundaries: Vec<EthicalBoundary>,
    settings: RuleSettings,
}

/// Result of a pipeline run that reached validation.
struct Evaluation {
    selected: DecisionOption,
    alternatives: Vec<DecisionOption>,
    validation: ValidationResult,
}

/// Multi-criteria decision engine.
///
/// Pipeline per call:
/// 1. Parse raw options and score every configured criterion
/// 2. Weighted overall score and risk level per option
/// 3. Drop options violating an ethical boundary
/// 4. Rank by score DESC, risk ASC and pick the top option
/// 5. Validate against criterion floors and the risk ceiling
/// 6. Build the outcome, append to history, fold into metrics
///
/// Shared state (configuration, history, metrics) sits behind locks so one
/// engine can serve concurrent callers; everything else is call-local.
pub struct DecisionEngine {
    config: RwLock<EngineConfig>,
    history: Mutex<VecDeque<DecisionOutcome>>,
    metrics: Mutex<PerformanceMetrics>,
    store: Box<dyn ConfigStore>,
    sink: Option<Box<dyn AuditSink>>,
}

impl DecisionEngine {
    /// Load configuration from `store`, falling back to (and persisting) the
    /// built-in defaults when it is missing or unusable.
    pub fn new(store: Box<dyn ConfigStore>) -> Self {
        let config = match store.load() {
            Ok(config) => {
                info!(
                    criteria = config.criteria_weights.len(),
                    boundaries = config.ethical_boundaries.len(),
                    "loaded decision engine configuration"
                );
                config
            }
            Err(err) => {
                warn!(error = %err, "configuration unavailable, using defaults");
                let defaults = EngineConfig::default();
                if let Err(err) = store.save(&defaults) {
                    warn!(error = %err, "cannot persist default configuration");
                }
                defaults
            }
        };
        let metrics =
            PerformanceMetrics::from_document(&config.performance_metrics, HISTORY_CAPACITY);

        Self {
            config: RwLock::new(config),
            history: Mutex::new(VecDeque::with_capacity(HISTORY_CAPACITY)),
            metrics: Mutex::new(metrics),
            store,
            sink: None,
        }
    }

    /// Seed history with earlier outcomes, most recent first (as returned by
    /// `DecisionJournal::history`). Only the newest `HISTORY_CAPACITY` are kept.
    pub fn with_history(self, outcomes: Vec<DecisionOutcome>) -> Self {
        {
            let mut history = lock(&self.history);
            history.clear();
            history.extend(outcomes.into_iter().take(HISTORY_CAPACITY).rev());
        }
        self
    }

    /// Forward every completed outcome to `sink`.
    pub fn with_audit_sink(mut self, sink: Box<dyn AuditSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Evaluate `options` and return a complete outcome.
    ///
    /// Never fails: empty input, malformed options, ethical exclusion of every
    /// candidate and internal errors all come back as `Rejected` outcomes.
    pub fn make_decision(
        &self,
        decision_type: DecisionType,
        options: &[serde_json::Value],
        context: RawContext,
    ) -> DecisionOutcome {
        let started = Instant::now();
        let decision_id = Uuid::new_v4().to_string();
        let context = DecisionContext::new(decision_id.clone(), decision_type, context);

        let mut trail = AuditTrail::new(&decision_id);
        trail.record(
            AuditEventType::DecisionStarted,
            json!({
                "decision_type": decision_type,
                "option_count": options.len(),
                "requester": context.requester,
            }),
        );
        info!(%decision_id, %decision_type, options = options.len(), "decision started");

        let snapshot = self.snapshot();
        let mut status = DecisionStatus::Pending;
        let outcome = match evaluate(options, &snapshot, &mut trail, &mut status) {
            Ok(evaluation) => approve_or_reject(context, evaluation, trail, status),
            Err(err) => reject(context, &err, trail, status),
        };

        info!(
            %decision_id,
            status = %outcome.status,
            confidence = outcome.confidence_score,
            selected = outcome.selected_option.as_ref().map(|o| o.name.as_str()),
            "decision finished"
        );
        self.record(&outcome, started.elapsed(), options.len());
        outcome
    }

    /// Most recent outcomes first.
    pub fn get_decision_history(&self, limit: usize) -> Vec<DecisionOutcome> {
        lock(&self.history)
            .iter()
            .rev()
            .take(limit)
            .cloned()
            .collect()
    }

    pub fn get_performance_metrics(&self) -> BTreeMap<String, MetricSummary> {
        lock(&self.metrics).summary()
    }

    /// Current configuration, including the live metric series.
    pub fn config(&self) -> EngineConfig {
        let config = read(&self.config);
        let metrics = lock(&self.metrics);
        let mut snapshot = config.clone();
        snapshot.performance_metrics = metrics.to_document();
        snapshot
    }

    /// Overwrite criteria weights and persist. Criteria are never removed.
    ///
    /// A failed write is logged; the in-memory update stands.
    pub fn update_criteria_weights(
        &self,
        weights: &BTreeMap<String, f64>,
    ) -> Result<(), ConfigUpdateError> {
        for (name, weight) in weights {
            if name.trim().is_empty() {
                return Err(ConfigUpdateError::EmptyCriterion);
            }
            if UnitFloat::new(*weight).is_none() {
                return Err(ConfigUpdateError::InvalidWeight {
                    name: name.clone(),
                    value: *weight,
                });
            }
        }

        let mut config = write(&self.config);
        config.merge_weights(weights);
        info!(updated = weights.len(), "criteria weights updated");

        let metrics = lock(&self.metrics);
        if let Err(err) = self.persist(&config, &metrics) {
            warn!(error = %err, "cannot persist criteria weights");
        }
        Ok(())
    }

    /// Append an ethical boundary and persist. Duplicate text is a no-op.
    ///
    /// Returns whether the boundary list changed.
    pub fn add_ethical_boundary(&self, text: &str) -> Result<bool, ConfigUpdateError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(ConfigUpdateError::EmptyBoundary);
        }

        let mut config = write(&self.config);
        if !config.add_boundary(text) {
            debug!(boundary = text, "ethical boundary already present");
            return Ok(false);
        }
        info!(boundary = text, "ethical boundary added");

        let metrics = lock(&self.metrics);
        if let Err(err) = self.persist(&config, &metrics) {
            warn!(error = %err, "cannot persist ethical boundaries");
        }
        Ok(true)
    }

    /// Move an approved decision to `Implemented` or `RolledBack`.
    ///
    /// Only those two targets can be set from outside the engine.
    pub fn transition_status(
        &self,
        decision_id: &str,
        next: DecisionStatus,
    ) -> Result<DecisionOutcome, StatusError> {
        let mut history = lock(&self.history);
        let outcome = history
            .iter_mut()
            .rev()
            .find(|o| o.decision_id == decision_id)
            .ok_or_else(|| StatusError::NotFound(decision_id.to_string()))?;

        let external = matches!(next, DecisionStatus::Implemented | DecisionStatus::RolledBack);
        if !external || !outcome.status.can_transition_to(next) {
            return Err(StatusError::InvalidTransition {
                id: decision_id.to_string(),
                from: outcome.status,
                to: next,
            });
        }

        let mut trail = AuditTrail::new(decision_id);
        trail.record(
            AuditEventType::StatusChanged,
            json!({ "from": outcome.status, "to": next, "source": "external" }),
        );
        outcome.audit_trail.extend(trail.into_events());
        info!(%decision_id, from = %outcome.status, to = %next, "decision status changed");
        outcome.status = next;
        Ok(outcome.clone())
    }

    fn snapshot(&self) -> Snapshot {
        let config = read(&self.config);
        Snapshot {
            criteria: config.criteria(),
            boundaries: config.boundaries(),
            settings: RuleSettings {
                high_cost_threshold: config.high_cost_threshold,
            },
        }
    }

    fn persist(
        &self,
        config: &EngineConfig,
        metrics: &PerformanceMetrics,
    ) -> Result<(), ConfigError> {
        let mut document = config.clone();
        document.performance_metrics = metrics.to_document();
        self.store.save(&document)
    }

    /// Append to history, sample metrics, persist them, notify the sink.
    fn record(&self, outcome: &DecisionOutcome, elapsed: Duration, options_considered: usize) {
        let success_rate = {
            let mut history = lock(&self.history);
            history.push_back(outcome.clone());
            while history.len() > HISTORY_CAPACITY {
                history.pop_front();
            }
            let approved = history
                .iter()
                .filter(|o| {
                    matches!(
                        o.status,
                        DecisionStatus::Approved
                            | DecisionStatus::Implemented
                            | DecisionStatus::RolledBack
                    )
                })
                .count();
            approved as f64 / history.len() as f64
        };

        {
            let config = read(&self.config);
            let mut metrics = lock(&self.metrics);
            metrics.record(DecisionSample {
                success_rate,
                confidence_score: outcome.confidence_score,
                options_considered,
                decision_time_ms: elapsed.as_secs_f64() * 1000.0,
            });
            if let Err(err) = self.persist(&config, &metrics) {
                warn!(error = %err, "cannot persist performance metrics");
            }
        }

        if let Some(sink) = &self.sink {
            if let Err(err) = sink.record(outcome) {
                warn!(decision_id = %outcome.decision_id, error = %err, "audit sink rejected outcome");
            }
        }
    }
}

fn advance(status: &mut DecisionStatus, next: DecisionStatus, trail: &mut AuditTrail) {
    debug_assert!(status.can_transition_to(next), "{status} -> {next}");
    trail.status_changed(*status, next);
    *status = next;
}

/// Steps 1–5. Any error aborts the run and becomes a rejection.
fn evaluate(
    options: &[serde_json::Value],
    snapshot: &Snapshot,
    trail: &mut AuditTrail,
    status: &mut DecisionStatus,
) -> Result<Evaluation, EngineError> {
    advance(status, DecisionStatus::Analyzing, trail);

    if options.is_empty() {
        return Err(EngineError::NoOptions);
    }
    let raw = options
        .iter()
        .enumerate()
        .map(|(index, value)| RawOption::from_value(index, value))
        .collect::<Result<Vec<_>, _>>()?;

    let mut scored = score_options(&raw, &snapshot.criteria, &snapshot.settings);
    for (option, raw) in scored.iter_mut().zip(&raw) {
        option.overall_score = overall_score(&option.criteria_scores, &snapshot.criteria)?;
        option.risk_level = assess_risk(raw, &option.criteria_scores);
    }
    trail.record(
        AuditEventType::OptionsScored,
        json!({
            "options": scored
                .iter()
                .map(|o| json!({
                    "option_id": o.option_id,
                    "name": o.name,
                    "overall_score": o.overall_score,
                    "risk_level": o.risk_level,
                }))
                .collect::<Vec<_>>(),
        }),
    );

    let filtered = ethics::filter(scored, &snapshot.boundaries);
    for rejection in &filtered.rejected {
        trail.record(
            AuditEventType::OptionFiltered,
            json!({
                "option_id": rejection.option_id,
                "name": rejection.option_name,
                "boundary": rejection.boundary,
                "reason": rejection.reason,
                "detail": rejection.detail,
            }),
        );
    }
    if filtered.passed.is_empty() {
        return Err(EngineError::NoOptionsPassedEthics);
    }

    let (selected, ranked) = select_best(filtered.passed)?;
    let alternatives: Vec<DecisionOption> = ranked.into_iter().skip(1).collect();
    trail.record(
        AuditEventType::OptionSelected,
        json!({
            "option_id": selected.option_id,
            "name": selected.name,
            "overall_score": selected.overall_score,
            "risk_level": selected.risk_level,
            "alternatives": alternatives.len(),
        }),
    );

    advance(status, DecisionStatus::Validating, trail);
    let validation = validate(&selected, &snapshot.criteria);
    trail.record(
        AuditEventType::ValidationCompleted,
        json!({
            "valid": validation.valid,
            "warnings": validation.warnings,
            "errors": validation.errors,
        }),
    );

    Ok(Evaluation {
        selected,
        alternatives,
        validation,
    })
}

/// Step 6 for a run that reached validation.
fn approve_or_reject(
    context: DecisionContext,
    evaluation: Evaluation,
    mut trail: AuditTrail,
    mut status: DecisionStatus,
) -> DecisionOutcome {
    let Evaluation {
        selected,
        alternatives,
        validation,
    } = evaluation;

    let confidence = confidence_score(&selected, alternatives.first());
    let mitigation = risk_mitigation(&selected);
    let explanation = rationale(&selected, &alternatives);

    let text = if validation.valid {
        advance(&mut status, DecisionStatus::Approved, &mut trail);
        trail.record(
            AuditEventType::DecisionCompleted,
            json!({ "option_id": selected.option_id, "confidence": confidence }),
        );
        explanation
    } else {
        let reason = validation.errors.join("; ");
        advance(&mut status, DecisionStatus::Rejected, &mut trail);
        trail.record(
            AuditEventType::DecisionRejected,
            json!({ "reason": reason, "option_id": selected.option_id }),
        );
        format!("Decision rejected by validation: {reason}. {explanation}")
    };

    DecisionOutcome {
        decision_id: context.decision_id.clone(),
        context,
        selected_option: Some(selected),
        alternatives,
        rationale: text,
        confidence_score: confidence,
        risk_mitigation: mitigation,
        status,
        ethical_approval: true,
        validation_result: validation,
        audit_trail: trail.into_events(),
    }
}

/// Step 6 for a run that stopped early.
fn reject(
    context: DecisionContext,
    err: &EngineError,
    mut trail: AuditTrail,
    mut status: DecisionStatus,
) -> DecisionOutcome {
    let reason = err.to_string();
    warn!(decision_id = %context.decision_id, %reason, "decision rejected");
    advance(&mut status, DecisionStatus::Rejected, &mut trail);
    trail.record(AuditEventType::DecisionRejected, json!({ "reason": reason }));

    DecisionOutcome {
        decision_id: context.decision_id.clone(),
        context,
        selected_option: None,
        alternatives: Vec::new(),
        rationale: reason.clone(),
        confidence_score: 0.0,
        risk_mitigation: Vec::new(),
        status,
        ethical_approval: false,
        validation_result: ValidationResult {
            valid: false,
            warnings: Vec::new(),
            errors: vec![reason],
        },
        audit_trail: trail.into_events(),
    }
}
