#![no_main]
use arbiter_core::config::EngineConfig;
use arbiter_core::context::RawContext;
use arbiter_core::types::{DecisionStatus, DecisionType, RiskLevel};
use arbiter_engine::store::MemoryConfigStore;
use arbiter_engine::DecisionEngine;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(serde_json::Value::Array(options)) = serde_json::from_slice(data) else {
        return;
    };
    let engine = DecisionEngine::new(Box::new(MemoryConfigStore::with_config(
        EngineConfig::default(),
    )));
    let outcome = engine.make_decision(DecisionType::CodeChange, &options, RawContext::default());

    assert!(matches!(
        outcome.status,
        DecisionStatus::Approved | DecisionStatus::Rejected
    ));
    if let Some(selected) = &outcome.selected_option {
        assert!((0.0..=1.0).contains(&selected.overall_score));
        if outcome.status == DecisionStatus::Approved {
            assert_ne!(selected.risk_level, RiskLevel::Critical);
        }
    }
});
