pub mod builder;
pub mod trail;

pub use builder::{confidence_score, rationale, risk_mitigation};
pub use trail::AuditTrail;
