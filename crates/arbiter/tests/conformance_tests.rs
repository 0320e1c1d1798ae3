//! CLI integration via the JSON interface.

mod test_helpers;
use test_helpers::{workspace_root, Workspace};

// ── Configuration ───────────────────────────────────────────────

#[test]
fn init_writes_default_configuration() {
    let ws = Workspace::new();
    let v = ws.json(&["init"], 0);
    assert_eq!(v["criteria_weights"]["security"], 0.25);
    assert_eq!(v["ethical_boundaries"].as_array().unwrap().len(), 5);
    assert!(ws.config().exists());

    // second init refuses to clobber
    let out = ws.run(&["init"]);
    assert_eq!(out.status.code(), Some(1));
    ws.json(&["init", "--force"], 0);
}

#[test]
fn weights_update_persists() {
    let ws = Workspace::new();
    let v = ws.json(&["weights", "--set", "security=0.4", "--set", "compliance=0.1"], 0);
    assert_eq!(v["security"], 0.4);
    assert_eq!(v["compliance"], 0.1);

    let v = ws.json(&["weights"], 0);
    assert_eq!(v["security"], 0.4);
    assert_eq!(v["performance"], 0.2);
}

#[test]
fn out_of_range_weight_is_refused() {
    let ws = Workspace::new();
    let out = ws.run(&["weights", "--set", "security=1.5"]);
    assert_eq!(out.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&out.stderr).contains("must be within [0, 1]"));
    let v = ws.json(&["weights"], 0);
    assert_eq!(v["security"], 0.25);
}

#[test]
fn boundaries_add_is_idempotent() {
    let ws = Workspace::new();
    let v = ws.json(&["boundaries", "--add", "Preserve production stability"], 0);
    assert_eq!(v.as_array().unwrap().len(), 6);
    let v = ws.json(&["boundaries", "--add", "Preserve production stability"], 0);
    assert_eq!(v.as_array().unwrap().len(), 6);
}

#[test]
fn corrupt_configuration_falls_back_to_defaults() {
    let ws = Workspace::new();
    std::fs::write(ws.config(), "{ not json").unwrap();
    let v = ws.json(&["weights"], 0);
    assert_eq!(v["security"], 0.25);
    // defaults were written back
    let stored: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(ws.config()).unwrap()).unwrap();
    assert_eq!(stored["criteria_weights"]["user_experience"], 0.1);
}

// ── Decisions ───────────────────────────────────────────────────

#[test]
fn clean_win_is_approved() {
    let ws = Workspace::new();
    let v = ws.json(
        &[
            "decide",
            "fixtures/options_clean_win.json",
            "--type",
            "performance_optimization",
            "--context",
            "fixtures/context.json",
        ],
        0,
    );
    assert_eq!(v["status"], "approved");
    assert_eq!(v["ethical_approval"], true);
    assert_eq!(v["selected_option"]["option_id"], "cache-layer");
    assert_eq!(v["selected_option"]["risk_level"], "low");
    assert!(v["selected_option"]["overall_score"].as_f64().unwrap() > 0.7);
    assert_eq!(v["alternatives"][0]["option_id"], "query-rewrite");
    assert_eq!(v["context"]["decision_type"], "performance_optimization");
    assert_eq!(v["context"]["requester"], "platform-team");
    let confidence = v["confidence_score"].as_f64().unwrap();
    assert!((0.1..=0.95).contains(&confidence));
    assert_eq!(
        v["selected_option"]["implementation_plan"]["deployment_strategy"],
        "canary"
    );
}

#[test]
fn privacy_violation_is_excluded() {
    let ws = Workspace::new();
    let v = ws.json(&["decide", "fixtures/options_privacy.json"], 0);
    assert_eq!(v["selected_option"]["option_id"], "consent-banner");
    let filtered: Vec<_> = v["audit_trail"]
        .as_array()
        .unwrap()
        .iter()
        .filter(|e| e["event_type"] == "option_filtered")
        .collect();
    assert_eq!(filtered.len(), 1);
    assert_eq!(filtered[0]["data"]["option_id"], "fingerprint");
}

#[test]
fn all_critical_is_rejected_with_exit_1() {
    let ws = Workspace::new();
    let v = ws.json(&["decide", "fixtures/options_all_critical.json"], 1);
    assert_eq!(v["status"], "rejected");
    assert_eq!(v["selected_option"]["risk_level"], "critical");
    let errors = v["validation_result"]["errors"].as_array().unwrap();
    assert!(errors
        .iter()
        .any(|e| e == "Critical risk level requires manual approval"));
}

#[test]
fn ethical_rejection_of_every_option() {
    let ws = Workspace::new();
    let v = ws.json(&["decide", "fixtures/options_rejected.json"], 1);
    assert_eq!(v["status"], "rejected");
    assert_eq!(v["ethical_approval"], false);
    assert!(v["selected_option"].is_null());
    assert_eq!(v["rationale"], "No options passed ethical validation");
}

#[test]
fn empty_option_list_is_rejected() {
    let ws = Workspace::new();
    let path = ws.path().join("empty.json");
    std::fs::write(&path, "[]").unwrap();
    let v = ws.json(&["decide", path.to_str().unwrap()], 1);
    assert_eq!(v["rationale"], "No options provided for decision");
}

#[test]
fn non_array_input_is_an_error() {
    let ws = Workspace::new();
    let out = ws.run(&["decide", "fixtures/context.json"]);
    assert_eq!(out.status.code(), Some(1));
    assert!(out.stdout.is_empty());
    assert!(String::from_utf8_lossy(&out.stderr).contains("expected a JSON array"));
}

#[test]
fn unknown_decision_type_is_a_usage_error() {
    let ws = Workspace::new();
    let out = ws.run(&["decide", "fixtures/options_clean_win.json", "--type", "vibes"]);
    assert_eq!(out.status.code(), Some(2));
}

// ── Journal, history, metrics ───────────────────────────────────

#[test]
fn decisions_are_journaled_and_verifiable() {
    let ws = Workspace::new();
    let first = ws.json(&["decide", "fixtures/options_clean_win.json"], 0);
    let second = ws.json(&["decide", "fixtures/options_all_critical.json"], 1);

    let history = ws.json(&["history", "--limit", "5"], 0);
    let history = history.as_array().unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0]["decision_id"], second["decision_id"]);
    assert_eq!(history[1]["decision_id"], first["decision_id"]);

    let report = ws.json(&["audit", "--verify"], 0);
    assert_eq!(report["valid"], true);
    assert_eq!(report["entries"], 2);
}

#[test]
fn tampered_journal_fails_verification() {
    let ws = Workspace::new();
    ws.json(&["decide", "fixtures/options_clean_win.json"], 0);
    ws.json(&["decide", "fixtures/options_privacy.json"], 0);

    let content = std::fs::read_to_string(ws.journal()).unwrap();
    std::fs::write(ws.journal(), content.replacen("approved", "rejected", 1)).unwrap();

    let report = ws.json(&["audit", "--verify"], 1);
    assert_eq!(report["valid"], false);
    assert!(report["error"].as_str().unwrap().contains("hash chain broken"));
}

#[test]
fn missing_journal_is_empty() {
    let ws = Workspace::new();
    let report = ws.json(&["audit", "--verify"], 0);
    assert_eq!(report["entries"], 0);
    let history = ws.json(&["history"], 0);
    assert_eq!(history.as_array().unwrap().len(), 0);
}

#[test]
fn metrics_accumulate_across_runs() {
    let ws = Workspace::new();
    ws.json(&["decide", "fixtures/options_clean_win.json"], 0);
    ws.json(&["decide", "fixtures/options_rejected.json"], 1);

    // history is seeded from the journal, so the rate spans both runs
    let v = ws.json(&["metrics"], 0);
    assert_eq!(v["success_rate"]["current"], 0.5);
    assert_eq!(v["success_rate"]["average"], 0.75);
    assert_eq!(v["success_rate"]["trend"], "stable");
    assert_eq!(v["options_considered"]["current"], 1.0);
    assert_eq!(v["options_considered"]["average"], 1.5);
    assert_eq!(v["confidence_score"]["current"], 0.0);
    assert_eq!(v["confidence_score"]["trend"], "stable");
}

#[test]
fn fixtures_are_present() {
    for name in [
        "options_clean_win.json",
        "options_all_critical.json",
        "options_privacy.json",
        "options_rejected.json",
        "context.json",
    ] {
        assert!(workspace_root().join("fixtures").join(name).exists(), "{name}");
    }
}
