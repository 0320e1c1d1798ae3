use arbiter_core::outcome::AuditEvent;
use arbiter_core::types::{AuditEventType, DecisionStatus};
use chrono::Utc;

/// Append-only event log for one decision.
#[derive(Debug, Clone)]
pub struct AuditTrail {
    decision_id: String,
    events: Vec<AuditEvent>,
}

impl AuditTrail {
    pub fn new(decision_id: &str) -> Self {
        Self {
            decision_id: decision_id.to_string(),
            events: Vec::new(),
        }
    }

    pub fn record(&mut self, event_type: AuditEventType, data: serde_json::Value) {
        self.events.push(AuditEvent {
            timestamp: Utc::now(),
            decision_id: self.decision_id.clone(),
            event_type,
            data,
        });
    }

    pub fn status_changed(&mut self, from: DecisionStatus, to: DecisionStatus) {
        self.record(
            AuditEventType::StatusChanged,
            serde_json::json!({ "from": from, "to": to }),
        );
    }

    pub fn events(&self) -> &[AuditEvent] {
        &self.events
    }

    pub fn into_events(self) -> Vec<AuditEvent> {
        self.events
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_keep_order_and_decision_id() {
        let mut trail = AuditTrail::new("d-1");
        trail.record(AuditEventType::DecisionStarted, serde_json::json!({}));
        trail.status_changed(DecisionStatus::Pending, DecisionStatus::Analyzing);
        trail.record(AuditEventType::DecisionCompleted, serde_json::json!({}));

        let events = trail.into_events();
        assert_eq!(events.len(), 3);
        assert!(events.iter().all(|e| e.decision_id == "d-1"));
        assert_eq!(events[0].event_type, AuditEventType::DecisionStarted);
        assert_eq!(events[1].data["to"], "analyzing");
        assert!(events[0].timestamp <= events[2].timestamp);
    }
}
