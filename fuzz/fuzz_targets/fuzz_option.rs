#![no_main]
use arbiter_core::config::EngineConfig;
use arbiter_core::option::RawOption;
use arbiter_engine::risk::assess_risk;
use arbiter_engine::scoring::{overall_score, score_options, RuleSettings};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(value) = serde_json::from_slice::<serde_json::Value>(data) else {
        return;
    };
    let Ok(option) = RawOption::from_value(0, &value) else {
        return;
    };
    let config = EngineConfig::default();
    let criteria = config.criteria();
    let settings = RuleSettings {
        high_cost_threshold: config.high_cost_threshold,
    };
    for scored in score_options(std::slice::from_ref(&option), &criteria, &settings) {
        assert!(scored.criteria_scores.values().all(|s| (0.0..=1.0).contains(s)));
        if let Ok(overall) = overall_score(&scored.criteria_scores, &criteria) {
            assert!((0.0..=1.0).contains(&overall));
        }
        let _ = assess_risk(&option, &scored.criteria_scores);
    }
});
